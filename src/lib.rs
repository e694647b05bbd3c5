pub mod command;
pub mod fastp;
pub mod job;
pub mod output;
pub mod runtime;
pub mod utils;
