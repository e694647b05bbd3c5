use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "Utility '{}' failed on execute \'{}\'{}",
        utility,
        cmd,
        Error::format_msg_as_detail(msg)
    )]
    UtilityExecutionError {
        utility: String,
        cmd: String,
        msg: Option<String>,
    },

    #[error(
        "Failed trying to execute utility '{utility}'. Make sure it is in your $PATH and you have execution permissions."
    )]
    UtilityNotExecutable { utility: String },

    #[error("Utility '{utility}' did not finish within {secs:.1}s and was killed while executing '{cmd}'")]
    UtilityTimeout {
        utility: String,
        cmd: String,
        secs: f64,
    },

    #[error("Job configuration for plugin '{}' is invalid{}", plugin, Error::format_msg_as_detail(msg))]
    InvalidJobConfig {
        plugin: String,
        msg: Option<String>,
    },

    #[error("Sample '{sample}' is not a directory name below samples/")]
    InvalidSample { sample: String },

    #[error("Path {:?} is not valid UTF-8", path)]
    NonUtf8Path { path: std::path::PathBuf },
}

impl Error {
    #[cold]
    pub fn utility_execution_error<U: Into<String>, C: Into<String>, M: Into<String>>(
        utility: U,
        cmd: C,
        msg: Option<M>,
    ) -> Self {
        Error::UtilityExecutionError {
            utility: utility.into(),
            cmd: cmd.into(),
            msg: msg.map(|m| m.into()),
        }
    }

    #[cold]
    pub fn utility_not_executable<U: Into<String>>(utility: U) -> Self {
        Error::UtilityNotExecutable {
            utility: utility.into(),
        }
    }

    #[cold]
    pub fn utility_timeout<U: Into<String>, C: Into<String>>(
        utility: U,
        cmd: C,
        timeout: std::time::Duration,
    ) -> Self {
        Error::UtilityTimeout {
            utility: utility.into(),
            cmd: cmd.into(),
            secs: timeout.as_secs_f64(),
        }
    }

    #[cold]
    pub fn invalid_job_config<P: Into<String>, M: Into<String>>(plugin: P, msg: Option<M>) -> Self {
        Error::InvalidJobConfig {
            plugin: plugin.into(),
            msg: msg.map(|m| m.into()),
        }
    }

    #[cold]
    pub fn invalid_sample<S: Into<String>>(sample: S) -> Self {
        Error::InvalidSample { sample: sample.into() }
    }

    #[cold]
    pub fn non_utf8_path<P: AsRef<std::path::Path>>(path: P) -> Self {
        Error::NonUtf8Path {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn format_msg_as_detail(msg: &Option<String>) -> String {
        match msg {
            Some(m) => format!(" ({})", m),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_is_appended_only_when_present() {
        let e = Error::invalid_job_config("fastp", Some("missing field 'sample'"));
        assert_eq!(
            e.to_string(),
            "Job configuration for plugin 'fastp' is invalid (missing field 'sample')"
        );

        let e = Error::invalid_job_config::<_, String>("fastp", None);
        assert_eq!(e.to_string(), "Job configuration for plugin 'fastp' is invalid");
    }

    #[test]
    fn test_timeout_message() {
        let e = Error::utility_timeout("fastp", "fastp -i a", std::time::Duration::from_millis(1500));
        assert_eq!(
            e.to_string(),
            "Utility 'fastp' did not finish within 1.5s and was killed while executing 'fastp -i a'"
        );
    }
}
