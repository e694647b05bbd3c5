use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use anyhow::{bail, Context};
use log::debug;
use regex::Regex;
use walkdir::WalkDir;

/// File names picked up as first reads: the glob `*R1*.fastq.gz`
pub const R1_FILE_PATTERN: &str = r"(?s)^.*R1.*\.fastq\.gz$";

/// List the first-read files directly inside a sample directory, sorted by name.
/// Second-read files are derived from these, never discovered.
/// A sample directory that does not exist simply has no reads; one that cannot be
/// read, or is not a directory, is an error
pub fn find_r1_files(sample_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    match fs::metadata(sample_dir) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Sample directory {} does not exist", sample_dir.display());
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read sample directory {}", sample_dir.display()));
        }
        Ok(meta) if !meta.is_dir() => bail!("Sample path {} is not a directory", sample_dir.display()),
        Ok(_) => {}
    }

    let pattern = Regex::new(R1_FILE_PATTERN)?;
    let mut files = Vec::new();
    for entry in WalkDir::new(sample_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to list {}", sample_dir.display()))?;
        if let Some(name) = entry.file_name().to_str() {
            if pattern.is_match(name) {
                files.push(entry.into_path());
            }
        }
    }
    debug!("Found {} R1 files in {}", files.len(), sample_dir.display());
    Ok(files)
}
