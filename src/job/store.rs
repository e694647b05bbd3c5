use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::output::Output;

/// One row of the results table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultRecord {
    pub id: Uuid,
    pub analysis_id: Uuid,
    pub plugin: String,
    pub result: Output,
    pub created_on: DateTime<Utc>,
}

impl ResultRecord {
    pub fn new(analysis_id: Uuid, plugin: &str, result: Output) -> Self {
        ResultRecord {
            id: Uuid::new_v4(),
            analysis_id,
            plugin: plugin.to_string(),
            result,
            created_on: Utc::now(),
        }
    }
}

/// Where finished analyses are written. Each record is inserted exactly once
pub trait ResultStore {
    fn insert(&self, record: &ResultRecord) -> anyhow::Result<()>;
}

///////////////////////////////
/// Appends records as JSON lines to a file
pub struct JsonlResultStore {
    path: PathBuf,
}

impl JsonlResultStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonlResultStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record back, in insertion order
    pub fn read_all(&self) -> anyhow::Result<Vec<ResultRecord>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open results file {}", self.path.display()))?;
        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line)
                .with_context(|| format!("Invalid record on line {} of {}", index + 1, self.path.display()))?;
            records.push(record);
        }
        Ok(records)
    }
}

impl ResultStore for JsonlResultStore {
    fn insert(&self, record: &ResultRecord) -> anyhow::Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open results file {}", self.path.display()))?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

///////////////////////////////
/// Keeps records in memory. Useful when embedding the runner or testing it
#[derive(Default)]
pub struct MemoryResultStore {
    records: Mutex<Vec<ResultRecord>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ResultRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ResultStore for MemoryResultStore {
    fn insert(&self, record: &ResultRecord) -> anyhow::Result<()> {
        match self.records.lock() {
            Ok(mut records) => {
                records.push(record.clone());
                Ok(())
            }
            Err(_) => bail!("Result store lock poisoned"),
        }
    }
}
