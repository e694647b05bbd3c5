use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use uuid::Uuid;

use super::ToolArgs;
use crate::job::{DispatcherMessage, JobRunner, JsonlResultStore};
use crate::runtime::PluginConfig;
use crate::utils::check_fastp;

pub const DEFAULT_PATH_RESULTS: &str = "results.jsonl";

#[derive(Args)]
pub struct RunCMD {
    /// Root that samples are downloaded to
    #[arg(long = "download-path", env = "DOWNLOAD_PATH", value_parser = clap::value_parser!(PathBuf))]
    pub path_download: PathBuf,

    /// Organization owning the sample
    #[arg(long = "organization")]
    pub organization_id: Uuid,

    /// Analysis to store the result under. A new id is generated if not given
    #[arg(long = "analysis")]
    pub analysis_id: Option<Uuid>,

    /// Sample identifier, the directory name under samples/
    #[arg(short = 's', long = "sample")]
    pub sample: String,

    /// Sequencing platform tag. "10x" swaps R1 and R2
    #[arg(short = 'p', long = "platform", default_value = "")]
    pub platform: String,

    /// JSON lines file the result record is appended to
    #[arg(short = 'o', value_parser = clap::value_parser!(PathBuf), default_value = DEFAULT_PATH_RESULTS)]
    pub path_out: PathBuf,

    /// Plugin config JSON; defaults to plugin name "fastp"
    #[arg(long = "plugin-config", value_parser = clap::value_parser!(PathBuf))]
    pub path_plugin_config: Option<PathBuf>,

    #[command(flatten)]
    pub tool: ToolArgs,
}

impl RunCMD {
    /// Run the commandline option
    pub fn try_execute(&mut self) -> Result<()> {
        let plugin = PluginConfig::load(self.path_plugin_config.as_deref())?;
        check_fastp(&self.tool.path_fastp)?;
        let store = JsonlResultStore::new(&self.path_out);
        let tool = self.tool.runner();

        let message = self.to_message(&plugin.name);
        let runner = JobRunner {
            download_path: self.path_download.clone(),
            plugin: plugin.name.clone(),
            threads: self.tool.threads,
            tool: &tool,
            store: &store,
        };
        let report = runner.start_analysis(&message)?;

        println!("{}\t{}", report.result_key, report.status);
        log::info!("Run has finished succesfully, result stored in {}", store.path().display());
        Ok(())
    }

    /// Describe this run as the dispatcher would have
    pub fn to_message(&self, plugin: &str) -> DispatcherMessage {
        let section = serde_json::json!({
            "sample": self.sample,
            "platform": self.platform,
        });
        DispatcherMessage {
            analysis_id: self.analysis_id.unwrap_or_else(Uuid::new_v4),
            organization_id: self.organization_id,
            config: HashMap::from([(plugin.to_string(), section)]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fastp::Platform;
    use crate::job::PluginJobConfig;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        run: RunCMD,
    }

    #[test]
    fn test_to_message() {
        let cli = TestCli::parse_from([
            "fastp-worker",
            "--download-path",
            "/private",
            "--organization",
            "bef81cdc-a99f-4856-bde5-7b2ee1968819",
            "-s",
            "f804b115",
            "-p",
            "10x",
        ]);
        assert_eq!(cli.run.path_out, PathBuf::from(DEFAULT_PATH_RESULTS));
        assert_eq!(cli.run.tool.threads, 8);

        let message = cli.run.to_message("fastp");
        let config = PluginJobConfig::from_message(&message, "fastp").unwrap();
        assert_eq!(config.sample, "f804b115");
        assert_eq!(config.platform, Platform::ReversedReadOrder);
        assert_eq!(message.organization_id.to_string(), "bef81cdc-a99f-4856-bde5-7b2ee1968819");
    }
}
