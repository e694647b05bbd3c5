use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use log::debug;
use log::warn;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::pairing::ReadPair;
use crate::runtime::Error;
use crate::utils::command_to_string;

pub const DEFAULT_FASTP: &str = "fastp";
pub const DEFAULT_THREADS: usize = 8;

/// Something that can run the QC tool. Returns the combined output on success
pub trait ToolRunner {
    fn run(&self, args: &[String]) -> Result<String, Error>;
}

/// Arguments for one fastp invocation. The pair is repeated positionally at the end;
/// the deployed wrapper expects it there
pub fn fastp_args(pair: &ReadPair, html: &str, json: &str, threads: usize) -> Vec<String> {
    vec![
        "-i".to_string(),
        pair.first.clone(),
        "-I".to_string(),
        pair.second.clone(),
        "-h".to_string(),
        html.to_string(),
        "-j".to_string(),
        json.to_string(),
        "-w".to_string(),
        threads.to_string(),
        pair.first.clone(),
        pair.second.clone(),
    ]
}

/// Runs fastp as a child process
#[derive(Clone, Debug)]
pub struct FastpRunner {
    pub program: PathBuf,
    /// Kill the process if it runs longer than this. None waits forever
    pub timeout: Option<Duration>,
}

impl Default for FastpRunner {
    fn default() -> Self {
        FastpRunner {
            program: PathBuf::from(DEFAULT_FASTP),
            timeout: None,
        }
    }
}

impl FastpRunner {
    pub fn new(program: PathBuf, timeout: Option<Duration>) -> Self {
        FastpRunner { program, timeout }
    }

    fn utility(&self) -> String {
        self.program.display().to_string()
    }
}

impl ToolRunner for FastpRunner {
    fn run(&self, args: &[String]) -> Result<String, Error> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let cmd_string = command_to_string(cmd.as_std());
        debug!("Running {}", cmd_string);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                Error::utility_execution_error(
                    self.utility(),
                    cmd_string.as_str(),
                    Some(format!("failed to start process runtime: {}", e)),
                )
            })?;
        runtime.block_on(self.run_child(cmd, cmd_string))
    }
}

impl FastpRunner {
    async fn run_child(&self, mut cmd: Command, cmd_string: String) -> Result<String, Error> {
        let mut child = cmd
            .spawn()
            .map_err(|_| Error::utility_not_executable(self.utility()))?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        //Pipes are read alongside the wait, or a chatty process stalls on a full pipe.
        //The timeout covers the reads too: a grandchild may hold the pipes open
        let finished = async {
            let (status, stdout, stderr) = tokio::join!(child.wait(), read_pipe(stdout), read_pipe(stderr));
            status.map(|status| (status, stdout, stderr))
        };
        let finished = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, finished).await.ok(),
            None => Some(finished.await),
        };

        let Some(finished) = finished else {
            if let Err(e) = child.kill().await {
                warn!("Failed to kill {}: {}", self.utility(), e);
            }
            let timeout = self.timeout.unwrap_or_default();
            return Err(Error::utility_timeout(self.utility(), cmd_string, timeout));
        };
        let (status, mut output, stderr) = finished.map_err(|e| {
            Error::utility_execution_error(
                self.utility(),
                cmd_string.as_str(),
                Some(format!("failed waiting for process: {}", e)),
            )
        })?;

        //stdout followed by stderr
        output.extend(stderr);
        let output = String::from_utf8_lossy(&output).into_owned();
        if status.success() {
            Ok(output)
        } else {
            Err(Error::utility_execution_error(
                self.utility(),
                cmd_string,
                Some(format!("{}; output: {}", status, output.trim())),
            ))
        }
    }
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf).await;
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_fastp_args_order() {
        let pair = ReadPair {
            first: "d/s_R1.fastq.gz".to_string(),
            second: "d/s_R2.fastq.gz".to_string(),
        };
        let args = fastp_args(&pair, "d/fastp/s_R1.html", "d/fastp/s_R1.json", DEFAULT_THREADS);
        assert_eq!(
            args,
            vec![
                "-i", "d/s_R1.fastq.gz", "-I", "d/s_R2.fastq.gz", "-h", "d/fastp/s_R1.html", "-j",
                "d/fastp/s_R1.json", "-w", "8", "d/s_R1.fastq.gz", "d/s_R2.fastq.gz",
            ]
        );
    }

    #[test]
    fn test_not_executable() {
        let runner = FastpRunner::new(PathBuf::from("surely-not-an-installed-fastp-binary"), None);
        let err = runner.run(&[]).unwrap_err();
        assert!(matches!(err, Error::UtilityNotExecutable { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_success_returns_combined_output() {
        let runner = FastpRunner::new(PathBuf::from("sh"), None);
        let args = vec!["-c".to_string(), "echo out; echo err >&2".to_string()];
        let output = runner.run(&args).unwrap();
        assert_eq!(output, "out\nerr\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_carries_output() {
        let runner = FastpRunner::new(PathBuf::from("sh"), None);
        let args = vec!["-c".to_string(), "echo 'bad input' >&2; exit 3".to_string()];
        let err = runner.run(&args).unwrap_err();
        match err {
            Error::UtilityExecutionError { utility, msg, .. } => {
                assert_eq!(utility, "sh");
                let msg = msg.unwrap();
                assert!(msg.contains("bad input"));
                assert!(msg.contains('3'));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_process() {
        let runner = FastpRunner::new(PathBuf::from("sleep"), Some(Duration::from_millis(200)));
        let started = Instant::now();
        let err = runner.run(&["30".to_string()]).unwrap_err();
        assert!(matches!(err, Error::UtilityTimeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_does_not_wait_for_grandchildren() {
        //sh forks sleep, which keeps the output pipes open after sh is killed
        let runner = FastpRunner::new(PathBuf::from("sh"), Some(Duration::from_millis(200)));
        let started = Instant::now();
        let err = runner.run(&["-c".to_string(), "sleep 6; true".to_string()]).unwrap_err();
        assert!(matches!(err, Error::UtilityTimeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[cfg(unix)]
    #[test]
    fn test_finishing_within_timeout() {
        let runner = FastpRunner::new(PathBuf::from("sh"), Some(Duration::from_secs(20)));
        let output = runner.run(&["-c".to_string(), "echo done".to_string()]).unwrap();
        assert_eq!(output, "done\n");
    }
}
