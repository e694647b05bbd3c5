pub mod message;
pub mod postgres;
pub mod runner;
pub mod store;

pub use message::{DispatcherMessage, MessageReader, PluginJobConfig};
pub use postgres::PgResultStore;
pub use runner::{sample_dir, JobReport, JobRunner};
pub use store::{JsonlResultStore, MemoryResultStore, ResultRecord, ResultStore};
