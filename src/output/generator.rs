use std::time::Instant;

use chrono::DateTime;
use chrono::Local;
use chrono::TimeDelta;

use super::types::{AnalysisError, AnalysisInfo, AnalysisStatus, Output, ResultData, Time};

/// Moment an analysis started. The wall clock is what gets reported,
/// the monotonic clock is what the elapsed time is measured with
#[derive(Debug, Clone, Copy)]
pub struct AnalysisStart {
    wall: DateTime<Local>,
    monotonic: Instant,
}

impl AnalysisStart {
    pub fn now() -> Self {
        AnalysisStart {
            wall: Local::now(),
            monotonic: Instant::now(),
        }
    }

    pub fn wall(&self) -> DateTime<Local> {
        self.wall
    }
}

/// Start time, end time and elapsed seconds as of now.
/// End is derived from the monotonic elapsed time so it never precedes the start,
/// even if the wall clock is stepped backwards during a run
pub fn get_analysis_timing(start: &AnalysisStart) -> Time {
    let elapsed = start.monotonic.elapsed();
    let end = start.wall + TimeDelta::from_std(elapsed).unwrap_or(TimeDelta::zero());
    Time {
        analysis_start_time: start.wall,
        analysis_end_time: end,
        analysis_delta_time: elapsed.as_secs_f64(),
    }
}

/// Wrap an outcome into the result envelope
pub fn generate_output(
    start: &AnalysisStart,
    data: Option<&str>,
    status: AnalysisStatus,
    errors: Vec<AnalysisError>,
) -> Output {
    Output {
        result: ResultData {
            data: data.map(str::to_string),
        },
        analysis_info: AnalysisInfo {
            status,
            errors,
            time: get_analysis_timing(start),
        },
    }
}
