mod config;
mod error;
mod log;

pub use self::config::*;
pub use self::error::Error;
pub use self::log::*;
