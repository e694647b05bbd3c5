use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::{error, info, warn};

use super::ToolArgs;
use crate::job::{JobRunner, MessageReader, PgResultStore};
use crate::runtime::{DatabaseConfig, PluginConfig};
use crate::utils::check_fastp;

#[derive(Args)]
pub struct ListenCMD {
    /// Root that samples are downloaded to
    #[arg(long = "download-path", env = "DOWNLOAD_PATH", value_parser = clap::value_parser!(PathBuf))]
    pub path_download: PathBuf,

    /// Queue to consume: JSON lines file of dispatcher messages. Reads stdin if not given
    #[arg(short = 'i', long = "queue", value_parser = clap::value_parser!(PathBuf))]
    pub path_queue: Option<PathBuf>,

    /// Plugin config JSON; defaults to plugin name "fastp"
    #[arg(long = "plugin-config", value_parser = clap::value_parser!(PathBuf))]
    pub path_plugin_config: Option<PathBuf>,

    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub tool: ToolArgs,
}

impl ListenCMD {
    /// Run the commandline option
    pub fn try_execute(&mut self) -> Result<()> {
        let plugin = PluginConfig::load(self.path_plugin_config.as_deref())?;
        check_fastp(&self.tool.path_fastp)?;
        let store = PgResultStore::connect(&self.database)?;
        let tool = self.tool.runner();

        let runner = JobRunner {
            download_path: self.path_download.clone(),
            plugin: plugin.name.clone(),
            threads: self.tool.threads,
            tool: &tool,
            store: &store,
        };

        let input: Box<dyn BufRead> = match &self.path_queue {
            Some(p) => Box::new(BufReader::new(
                File::open(p).with_context(|| format!("Failed to open queue {}", p.display()))?,
            )),
            None => Box::new(BufReader::new(io::stdin())),
        };
        info!("Listening on {}", plugin.queue_name());

        let mut num_done = 0;
        let mut num_failed = 0;
        for message in MessageReader::new(input) {
            let message = match message {
                Ok(message) => message,
                Err(e) if e.downcast_ref::<io::Error>().is_some() => {
                    return Err(e.context(format!("Stopped after {} analyses", num_done + num_failed)));
                }
                Err(e) => {
                    warn!("Skipping message: {:#}", e);
                    continue;
                }
            };
            match runner.start_analysis(&message) {
                Ok(report) => {
                    info!("rKey {} status {}", report.result_key, report.status);
                    num_done += 1;
                }
                Err(e) => {
                    error!("Analysis {} could not be completed: {:#}", message.analysis_id, e);
                    num_failed += 1;
                }
            }
        }

        info!(
            "Queue drained: {} analyses stored, {} could not be completed",
            num_done, num_failed
        );
        Ok(())
    }
}
