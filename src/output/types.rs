use chrono::DateTime;
use chrono::Local;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Success,
    Failure,
}

impl AnalysisStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    GenericError,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorContent {
    pub description: String,
    #[serde(rename = "type")]
    pub error_type: ErrorType,
}

/// One reported failure. The private side carries diagnostics for operators,
/// the public side is what end users get to see
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisError {
    pub private: ErrorContent,
    pub public: ErrorContent,
}

impl AnalysisError {
    pub fn generic<P: Into<String>, Q: Into<String>>(private: P, public: Q) -> Self {
        AnalysisError {
            private: ErrorContent {
                description: private.into(),
                error_type: ErrorType::GenericError,
            },
            public: ErrorContent {
                description: public.into(),
                error_type: ErrorType::GenericError,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Time {
    #[serde(with = "local_time")]
    pub analysis_start_time: DateTime<Local>,
    #[serde(with = "local_time")]
    pub analysis_end_time: DateTime<Local>,
    pub analysis_delta_time: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisInfo {
    pub status: AnalysisStatus,
    pub errors: Vec<AnalysisError>,
    pub time: Time,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultData {
    pub data: Option<String>,
}

/// Result envelope of one analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Output {
    pub result: ResultData,
    pub analysis_info: AnalysisInfo,
}

/// Timestamps are stored as local wall-clock text, e.g. "2026-10-17 14:03:11.204518000 +0200"
pub mod local_time {
    use chrono::{DateTime, Local};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f %z";

    pub fn serialize<S: Serializer>(time: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Local>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_str(&s, FORMAT)
            .map(|t| t.with_timezone(&Local))
            .map_err(serde::de::Error::custom)
    }
}
