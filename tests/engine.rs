use std::cell::RefCell;
use std::fs;
use std::path::Path;

use fastp_worker::fastp::{Fastp, FastpParams, Platform, ToolRunner, DONE, NO_FASTQ_FILE, SCRIPT_FAILED};
use fastp_worker::output::{AnalysisStatus, ErrorType};
use fastp_worker::runtime::Error;

/// Records every invocation; fails the ones whose index is listed
struct RecordingRunner {
    calls: RefCell<Vec<Vec<String>>>,
    fail_on: Vec<usize>,
}

impl RecordingRunner {
    fn new() -> Self {
        RecordingRunner { calls: RefCell::new(Vec::new()), fail_on: Vec::new() }
    }

    fn failing_on(fail_on: Vec<usize>) -> Self {
        RecordingRunner { calls: RefCell::new(Vec::new()), fail_on }
    }

    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }
}

impl ToolRunner for RecordingRunner {
    fn run(&self, args: &[String]) -> Result<String, Error> {
        let index = self.calls.borrow().len();
        self.calls.borrow_mut().push(args.to_vec());
        if self.fail_on.contains(&index) {
            Err(Error::utility_execution_error(
                "fastp",
                args.join(" "),
                Some("exit status: 255; output: ERROR: sequence and quality have different length"),
            ))
        } else {
            Ok(String::new())
        }
    }
}

/// Scratch sample directory. R2 paths are derived by replacing every "R1" in the
/// full path, so the random part of the name must not contain one
fn sample_dir() -> tempfile::TempDir {
    loop {
        let dir = tempfile::tempdir().unwrap();
        if !dir.path().to_str().unwrap().contains("R1") {
            return dir;
        }
    }
}

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"").unwrap();
}

fn p(dir: &Path, name: &str) -> String {
    dir.join(name).to_str().unwrap().to_string()
}

#[test]
fn test_no_input_is_success() {
    for platform in [Platform::Standard, Platform::ReversedReadOrder] {
        let dir = sample_dir();
        touch(dir.path(), "sample_R2.fastq.gz");
        touch(dir.path(), "readme.txt");
        let runner = RecordingRunner::new();

        let output = Fastp::run(&FastpParams::new(dir.path().to_path_buf(), platform), &runner).unwrap();

        assert_eq!(output.analysis_info.status, AnalysisStatus::Success);
        assert_eq!(output.result.data.as_deref(), Some(NO_FASTQ_FILE));
        assert!(output.analysis_info.errors.is_empty());
        assert!(runner.calls().is_empty());
        assert!(!dir.path().join("fastp").exists());
    }
}

#[test]
fn test_missing_sample_dir_is_no_input() {
    let dir = sample_dir();
    let runner = RecordingRunner::new();
    let params = FastpParams::new(dir.path().join("absent"), Platform::Standard);

    let output = Fastp::run(&params, &runner).unwrap();
    assert_eq!(output.result.data.as_deref(), Some(NO_FASTQ_FILE));
    assert_eq!(output.analysis_info.status, AnalysisStatus::Success);
}

#[test]
fn test_standard_platform_invocation() {
    let dir = sample_dir();
    touch(dir.path(), "sample_R1.fastq.gz");
    touch(dir.path(), "sample_R2.fastq.gz");
    let runner = RecordingRunner::new();

    let output = Fastp::run(&FastpParams::new(dir.path().to_path_buf(), Platform::Standard), &runner).unwrap();

    assert_eq!(output.analysis_info.status, AnalysisStatus::Success);
    assert_eq!(output.result.data.as_deref(), Some(DONE));
    assert!(dir.path().join("fastp").is_dir());

    let r1 = p(dir.path(), "sample_R1.fastq.gz");
    let r2 = p(dir.path(), "sample_R2.fastq.gz");
    let expected = vec![
        "-i".to_string(),
        r1.clone(),
        "-I".to_string(),
        r2.clone(),
        "-h".to_string(),
        p(dir.path(), "fastp/sample_R1.html"),
        "-j".to_string(),
        p(dir.path(), "fastp/sample_R1.json"),
        "-w".to_string(),
        "8".to_string(),
        r1,
        r2,
    ];
    assert_eq!(runner.calls(), vec![expected]);
}

#[test]
fn test_reversed_platform_invocation() {
    let dir = sample_dir();
    touch(dir.path(), "sample_R1.fastq.gz");
    let runner = RecordingRunner::new();

    let output =
        Fastp::run(&FastpParams::new(dir.path().to_path_buf(), Platform::ReversedReadOrder), &runner).unwrap();
    assert_eq!(output.analysis_info.status, AnalysisStatus::Success);

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    let args = &calls[0];
    assert_eq!(args[1], p(dir.path(), "sample_R2.fastq.gz"));
    assert_eq!(args[3], p(dir.path(), "sample_R1.fastq.gz"));
    // Reports are named after the first file handed over, which is R2 here
    assert_eq!(args[5], p(dir.path(), "fastp/sample_R2.html"));
    assert_eq!(args[7], p(dir.path(), "fastp/sample_R2.json"));
    assert_eq!(args[10], args[1]);
    assert_eq!(args[11], args[3]);
}

#[test]
fn test_threads_are_passed_on() {
    let dir = sample_dir();
    touch(dir.path(), "s_R1.fastq.gz");
    let runner = RecordingRunner::new();
    let mut params = FastpParams::new(dir.path().to_path_buf(), Platform::Standard);
    params.threads = 2;

    Fastp::run(&params, &runner).unwrap();
    assert_eq!(runner.calls()[0][9], "2");
}

#[test]
fn test_first_failure_stops_the_run() {
    let dir = sample_dir();
    touch(dir.path(), "a_R1.fastq.gz");
    touch(dir.path(), "b_R1.fastq.gz");
    let runner = RecordingRunner::failing_on(vec![0]);

    let output = Fastp::run(&FastpParams::new(dir.path().to_path_buf(), Platform::Standard), &runner).unwrap();

    assert_eq!(runner.calls().len(), 1);
    assert_eq!(runner.calls()[0][1], p(dir.path(), "a_R1.fastq.gz"));
    assert_eq!(output.analysis_info.status, AnalysisStatus::Failure);
    assert_eq!(output.result.data, None);
    assert_eq!(output.analysis_info.errors.len(), 1);

    let error = &output.analysis_info.errors[0];
    assert_eq!(error.public.description, SCRIPT_FAILED);
    assert_eq!(error.public.error_type, ErrorType::GenericError);
    assert_eq!(error.private.error_type, ErrorType::GenericError);
    assert!(error.private.description.contains("different length"));
}

#[test]
fn test_later_failure_after_successes() {
    let dir = sample_dir();
    touch(dir.path(), "a_R1.fastq.gz");
    touch(dir.path(), "b_R1.fastq.gz");
    touch(dir.path(), "c_R1.fastq.gz");
    let runner = RecordingRunner::failing_on(vec![1]);

    let output = Fastp::run(&FastpParams::new(dir.path().to_path_buf(), Platform::Standard), &runner).unwrap();

    assert_eq!(runner.calls().len(), 2);
    assert_eq!(output.analysis_info.status, AnalysisStatus::Failure);
    assert_eq!(output.analysis_info.errors.len(), 1);
}

#[test]
fn test_all_pairs_run_in_name_order() {
    let dir = sample_dir();
    for name in ["c_R1.fastq.gz", "a_R1.fastq.gz", "b_R1.fastq.gz"] {
        touch(dir.path(), name);
    }
    let runner = RecordingRunner::new();

    let output = Fastp::run(&FastpParams::new(dir.path().to_path_buf(), Platform::Standard), &runner).unwrap();
    assert_eq!(output.result.data.as_deref(), Some(DONE));

    let firsts: Vec<String> = runner.calls().iter().map(|args| args[1].clone()).collect();
    assert_eq!(
        firsts,
        vec![
            p(dir.path(), "a_R1.fastq.gz"),
            p(dir.path(), "b_R1.fastq.gz"),
            p(dir.path(), "c_R1.fastq.gz"),
        ]
    );
}

#[test]
fn test_timing_is_filled_in() {
    let dir = sample_dir();
    touch(dir.path(), "s_R1.fastq.gz");
    let runner = RecordingRunner::failing_on(vec![0]);

    let output = Fastp::run(&FastpParams::new(dir.path().to_path_buf(), Platform::Standard), &runner).unwrap();
    let time = &output.analysis_info.time;
    assert!(time.analysis_end_time >= time.analysis_start_time);
    assert!(time.analysis_delta_time >= 0.0);
}

#[test]
fn test_reports_stay_in_output_dir_when_sample_dir_has_designator() {
    let root = sample_dir();
    let sample = root.path().join("PR1");
    fs::create_dir(&sample).unwrap();
    touch(&sample, "s_R1.fastq.gz");
    let runner = RecordingRunner::new();

    let output = Fastp::run(&FastpParams::new(sample.clone(), Platform::ReversedReadOrder), &runner).unwrap();
    assert_eq!(output.result.data.as_deref(), Some(DONE));

    let args = &runner.calls()[0];
    // The designator in the directory part is rewritten as well
    assert_eq!(args[1], p(&root.path().join("PR2"), "s_R2.fastq.gz"));
    for report in [&args[5], &args[7]] {
        assert!(report.starts_with(&p(&sample, "fastp/")), "{} escaped the output directory", report);
        assert!(Path::new(report).parent().unwrap().is_dir());
    }
    assert!(args[5].ends_with("PR2/s_R2.html"));
    assert!(args[7].ends_with("PR2/s_R2.json"));
}

#[test]
fn test_unreadable_sample_dir_is_an_error() {
    let dir = sample_dir();
    touch(dir.path(), "S1");
    let runner = RecordingRunner::new();

    let result = Fastp::run(&FastpParams::new(dir.path().join("S1"), Platform::Standard), &runner);
    assert!(result.is_err());
    assert!(runner.calls().is_empty());
}

#[test]
fn test_output_dir_creation_failure_is_an_error() {
    let dir = sample_dir();
    touch(dir.path(), "s_R1.fastq.gz");
    touch(dir.path(), "fastp");
    let runner = RecordingRunner::new();

    let err = Fastp::run(&FastpParams::new(dir.path().to_path_buf(), Platform::Standard), &runner).unwrap_err();
    assert!(err.to_string().contains("output directory"));
    assert!(runner.calls().is_empty());
}
