use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use log::info;
use uuid::Uuid;

use super::message::{DispatcherMessage, PluginJobConfig};
use super::store::{ResultRecord, ResultStore};
use crate::fastp::{Fastp, FastpParams, ToolRunner};
use crate::output::AnalysisStatus;
use crate::runtime::Error;

pub const SAMPLES_DIR: &str = "samples";

/// `{download_path}/{organization}/samples/{sample}`.
/// The sample must be a relative path of plain names, so the result stays below samples/
pub fn sample_dir(download_path: &Path, organization_id: &Uuid, sample: &str) -> Result<PathBuf, Error> {
    let sample_path = Path::new(sample);
    let mut components = sample_path.components().peekable();
    if components.peek().is_none() || !components.all(|c| matches!(c, Component::Normal(_))) {
        return Err(Error::invalid_sample(sample));
    }
    Ok(download_path
        .join(organization_id.to_string())
        .join(SAMPLES_DIR)
        .join(sample_path))
}

/// Outcome of one job as reported back to the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobReport {
    /// Id of the stored result record
    pub result_key: Uuid,
    pub status: AnalysisStatus,
}

/// Turns dispatcher messages into stored results
pub struct JobRunner<'a> {
    pub download_path: PathBuf,
    pub plugin: String,
    pub threads: usize,
    pub tool: &'a dyn ToolRunner,
    pub store: &'a dyn ResultStore,
}

impl<'a> JobRunner<'a> {
    /// Run the analysis a message asks for and store its result.
    ///
    /// Returns an error, and stores nothing, when the message lacks the plugin config or the
    /// sample cannot be read. A failed fastp run is stored and reported as a Failure status
    pub fn start_analysis(&self, message: &DispatcherMessage) -> anyhow::Result<JobReport> {
        let config = PluginJobConfig::from_message(message, &self.plugin)?;
        let sample = sample_dir(&self.download_path, &message.organization_id, &config.sample)
            .with_context(|| format!("Analysis {} rejected", message.analysis_id))?;
        info!(
            "Starting analysis {} on sample {}",
            message.analysis_id,
            sample.display()
        );

        let params = FastpParams {
            sample_dir: sample,
            platform: config.platform,
            threads: self.threads,
        };
        let output = Fastp::run(&params, self.tool)
            .with_context(|| format!("Analysis {} aborted", message.analysis_id))?;
        let status = output.analysis_info.status;

        let record = ResultRecord::new(message.analysis_id, &self.plugin, output);
        self.store
            .insert(&record)
            .context("error inserting result into database")?;

        info!(
            "Analysis {} finished with status {}, result {}",
            message.analysis_id, status, record.id
        );
        Ok(JobReport {
            result_key: record.id,
            status,
        })
    }
}
