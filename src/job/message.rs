use std::collections::HashMap;
use std::io::{self, BufRead};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fastp::Platform;
use crate::runtime::Error;

/// A job as published by the dispatcher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatcherMessage {
    pub analysis_id: Uuid,
    pub organization_id: Uuid,
    /// Analysis configuration, one entry per plugin
    #[serde(default)]
    pub config: HashMap<String, serde_json::Value>,
}

/// What the fastp plugin needs from its section of the analysis config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginJobConfig {
    pub sample: String,
    pub platform: Platform,
}

impl PluginJobConfig {
    pub fn from_message(message: &DispatcherMessage, plugin: &str) -> Result<Self, Error> {
        let section = message
            .config
            .get(plugin)
            .ok_or_else(|| Error::invalid_job_config(plugin, Some("no configuration section")))?;
        let sample = string_field(section, plugin, "sample")?;
        let platform = string_field(section, plugin, "platform")?;
        Ok(PluginJobConfig {
            sample: sample.to_string(),
            platform: Platform::from_tag(platform),
        })
    }
}

fn string_field<'a>(section: &'a serde_json::Value, plugin: &str, field: &str) -> Result<&'a str, Error> {
    section
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::invalid_job_config(plugin, Some(format!("missing string field '{}'", field))))
}

///////////////////////////////
/// Reads dispatcher messages, one JSON document per line. Blank lines are skipped;
/// a line that does not parse is returned as an error and reading continues with the next one.
/// A failed read is returned once and ends the stream; its error downcasts to `io::Error`
pub struct MessageReader<R> {
    reader: R,
    line_number: usize,
    failed: bool,
}

impl<R: BufRead> MessageReader<R> {
    pub fn new(reader: R) -> Self {
        MessageReader {
            reader,
            line_number: 0,
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for MessageReader<R> {
    type Item = anyhow::Result<DispatcherMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    if line.trim().is_empty() {
                        continue;
                    }
                    let line_number = self.line_number;
                    return Some(serde_json::from_str(line.trim()).map_err(|e| {
                        anyhow::anyhow!("Failed to parse message on line {}: {}", line_number, e)
                    }));
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(anyhow::Error::new(e).context("Failed to read from queue")));
                }
            }
        }
    }
}
