use std::process::ExitCode;

use clap::Parser;
use fastp_worker::command::Commands;
use fastp_worker::runtime::{setup_global_logger, LogLevel};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// trace, debug, info, warn, error or off. Overrides RUST_LOG
    #[arg(long = "log-level", global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_global_logger(cli.log_level);
    log::debug!("Executing {:?}", cli.command);

    let result = match cli.command {
        Commands::Listen(mut cmd) => cmd.try_execute(),
        Commands::Run(mut cmd) => cmd.try_execute(),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
