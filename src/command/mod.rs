use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::fastp::{FastpRunner, DEFAULT_FASTP, DEFAULT_THREADS};

pub mod listen;
pub mod run;

pub use listen::ListenCMD;
pub use run::RunCMD;

///////////////////////////////
/// Possible subcommands to parse
#[derive(Subcommand)]
pub enum Commands {
    /// Process dispatcher messages from a queue and store results in Postgres
    Listen(ListenCMD),
    /// Process a single sample and append the result to a JSON lines file
    Run(RunCMD),
}

impl std::fmt::Debug for Commands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cmd = match self {
            Commands::Listen(_) => "Listen",
            Commands::Run(_) => "Run",
        };
        write!(f, "{}", cmd)
    }
}

///////////////////////////////
/// How fastp is invoked; shared by all commands
#[derive(Args, Clone, Debug)]
pub struct ToolArgs {
    /// fastp executable
    #[arg(long = "fastp", value_parser = clap::value_parser!(PathBuf), default_value = DEFAULT_FASTP)]
    pub path_fastp: PathBuf,

    /// Worker threads per fastp run
    #[arg(short = 'w', long = "threads", value_parser = clap::value_parser!(usize), default_value_t = DEFAULT_THREADS)]
    pub threads: usize,

    /// Kill a fastp run after this many seconds. Runs are not limited by default
    #[arg(long = "timeout", value_parser = clap::value_parser!(u64))]
    pub timeout_secs: Option<u64>,
}

impl ToolArgs {
    pub fn runner(&self) -> FastpRunner {
        FastpRunner::new(self.path_fastp.clone(), self.timeout_secs.map(Duration::from_secs))
    }
}
