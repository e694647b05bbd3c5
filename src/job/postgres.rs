use std::time::Duration;

use anyhow::Context;
use log::info;
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::store::{ResultRecord, ResultStore};
use crate::runtime::DatabaseConfig;

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(50);

const INSERT_RESULT: &str =
    "INSERT INTO result (id, analysis_id, plugin, result, created_on) VALUES ($1, $2, $3, $4, $5)";

/// Results table in Postgres. The worker is synchronous, so the store owns a
/// single-threaded runtime to drive sqlx on
pub struct PgResultStore {
    runtime: tokio::runtime::Runtime,
    pool: PgPool,
}

impl PgResultStore {
    pub fn connect(config: &DatabaseConfig) -> anyhow::Result<PgResultStore> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to start database runtime")?;

        let pool = runtime
            .block_on(
                PgPoolOptions::new()
                    .max_connections(1)
                    .acquire_timeout(CONNECT_TIMEOUT)
                    .connect(&config.dsn()),
            )
            .with_context(|| {
                format!(
                    "Failed to connect to database {} at {}:{}",
                    config.database, config.host, config.port
                )
            })?;
        info!("Connected to database {} at {}:{}", config.database, config.host, config.port);

        Ok(PgResultStore { runtime, pool })
    }
}

impl ResultStore for PgResultStore {
    fn insert(&self, record: &ResultRecord) -> anyhow::Result<()> {
        let result = serde_json::to_value(&record.result)?;
        self.runtime
            .block_on(
                sqlx::query(INSERT_RESULT)
                    .bind(record.id)
                    .bind(record.analysis_id)
                    .bind(&record.plugin)
                    .bind(result)
                    .bind(record.created_on)
                    .execute(&self.pool),
            )
            .context("Failed to insert result row")?;
        Ok(())
    }
}

impl Drop for PgResultStore {
    fn drop(&mut self) {
        self.runtime.block_on(self.pool.close());
    }
}
