use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use clap::Args;
use serde::Deserialize;

pub const DEFAULT_PLUGIN_NAME: &str = "fastp";
pub const DEFAULT_DATABASE: &str = "results";

///////////////////////////////
/// Connection parameters for the results database. All of them come from the environment
/// in deployment; a missing value makes clap abort before any job is touched
#[derive(Args, Clone)]
pub struct DatabaseConfig {
    #[arg(long = "db-host", env = "PG_DB_HOST")]
    pub host: String,

    #[arg(long = "db-port", env = "PG_DB_PORT")]
    pub port: u16,

    #[arg(long = "db-user", env = "PG_DB_USER")]
    pub user: String,

    #[arg(long = "db-password", env = "PG_DB_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long = "db-name", env = "PG_DB_NAME", default_value = DEFAULT_DATABASE)]
    pub database: String,
}

impl DatabaseConfig {
    pub fn dsn(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode=disable",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

///////////////////////////////
/// Plugin identity. The name keys the per-plugin section of the analysis config
/// and is stored with every result
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PluginConfig {
    #[serde(default = "default_plugin_name")]
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_plugin_name() -> String {
    DEFAULT_PLUGIN_NAME.to_string()
}

impl Default for PluginConfig {
    fn default() -> Self {
        PluginConfig {
            name: default_plugin_name(),
            version: None,
            description: None,
        }
    }
}

impl PluginConfig {
    /// Read the plugin config JSON, or use the defaults when no file is given
    pub fn load(path: Option<&Path>) -> anyhow::Result<PluginConfig> {
        let Some(path) = path else {
            return Ok(PluginConfig::default());
        };
        let file = File::open(path)
            .with_context(|| format!("Failed to open plugin config {}", path.display()))?;
        let config: PluginConfig = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse plugin config {}", path.display()))?;
        Ok(config)
    }

    /// Queue the dispatcher publishes this plugin's jobs on
    pub fn queue_name(&self) -> String {
        format!("dispatcher_{}", self.name)
    }
}
