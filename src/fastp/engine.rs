use std::fs;
use std::path::Path;
use std::path::{Component, PathBuf};

use anyhow::Context;
use log::{debug, info, warn};

use super::discovery::find_r1_files;
use super::pairing::{pair_reads, Platform};
use super::tool::{fastp_args, ToolRunner, DEFAULT_THREADS};
use crate::output::{generate_output, AnalysisError, AnalysisStart, AnalysisStatus, Output};
use crate::runtime::Error;

pub const NO_FASTQ_FILE: &str = "no fastq file";
pub const DONE: &str = "done";
pub const SCRIPT_FAILED: &str = "The script failed to execute";
pub const FASTP_OUTPUT_DIR: &str = "fastp";

#[derive(Clone, Debug)]
pub struct FastpParams {
    pub sample_dir: PathBuf,
    pub platform: Platform,
    /// Passed to fastp as -w
    pub threads: usize,
}

impl FastpParams {
    pub fn new(sample_dir: PathBuf, platform: Platform) -> Self {
        FastpParams {
            sample_dir,
            platform,
            threads: DEFAULT_THREADS,
        }
    }
}

/// fastp over every read pair of one sample
pub struct Fastp {}

impl Fastp {
    /// Run the analysis.
    ///
    /// Tool failures are part of the returned Output. An Err means the sample directory
    /// could not be listed or prepared, and no result should be recorded
    pub fn run(params: &FastpParams, runner: &dyn ToolRunner) -> anyhow::Result<Output> {
        let start = AnalysisStart::now();

        let files = find_r1_files(&params.sample_dir)?;
        if files.is_empty() {
            info!("No fastq files in {}", params.sample_dir.display());
            return Ok(generate_output(&start, Some(NO_FASTQ_FILE), AnalysisStatus::Success, Vec::new()));
        }

        let sample_dir = params
            .sample_dir
            .to_str()
            .ok_or_else(|| Error::non_utf8_path(&params.sample_dir))?;
        let output_path = params.sample_dir.join(FASTP_OUTPUT_DIR);
        fs::create_dir_all(&output_path)
            .with_context(|| format!("Failed to create output directory {}", output_path.display()))?;

        let pairs = pair_reads(&files, params.platform)?;
        info!(
            "Running fastp on {} read pairs in {} (platform {})",
            pairs.len(),
            sample_dir,
            params.platform
        );

        for pair in &pairs {
            let output_name = pair.output_name(sample_dir);
            let html = join_under(&output_path, &format!("{}.html", output_name));
            let json = join_under(&output_path, &format!("{}.json", output_name));
            if let Some(parent) = html.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
            }
            let html = path_string(&html)?;
            let json = path_string(&json)?;
            let args = fastp_args(pair, &html, &json, params.threads);

            match runner.run(&args) {
                Ok(output) => {
                    debug!("fastp finished for {}: {} bytes of output", output_name, output.len());
                }
                Err(e) => {
                    warn!("fastp failed for {}: {}", output_name, e);
                    let error = AnalysisError::generic(e.to_string(), SCRIPT_FAILED);
                    return Ok(generate_output(&start, None, AnalysisStatus::Failure, vec![error]));
                }
            }
        }

        Ok(generate_output(&start, Some(DONE), AnalysisStatus::Success, Vec::new()))
    }
}

/// Lexical join of `name` below `base`: root and `.` components are dropped and `..`
/// never climbs above `base`. A report name that still carries a directory part
/// (the first read path did not start with the sample directory) is nested, not escaped
fn join_under(base: &Path, name: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    let mut depth = 0;
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => {
                path.push(part);
                depth += 1;
            }
            Component::ParentDir if depth > 0 => {
                path.pop();
                depth -= 1;
            }
            _ => {}
        }
    }
    path
}

fn path_string(p: &Path) -> Result<String, Error> {
    p.to_str().map(str::to_string).ok_or_else(|| Error::non_utf8_path(p))
}
