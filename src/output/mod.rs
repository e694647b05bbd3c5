pub mod generator;
pub mod types;

pub use generator::{generate_output, get_analysis_timing, AnalysisStart};
pub use types::{AnalysisError, AnalysisInfo, AnalysisStatus, ErrorContent, ErrorType, Output, ResultData, Time};
