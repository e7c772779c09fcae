use thiserror::Error;

/// Failure of a runner.
///
/// `Scheduling` and `Build` are the two external failure classes: the
/// scheduler refused the job, or the build tool failed.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid job: {0}")]
    InvalidSpec(String),

    #[error("scheduler rejected the job: {0}")]
    Scheduling(String),

    #[error("build failed: {reason}")]
    /// `code` follows shell convention: the exit code, or `128 + N` for a
    /// tool killed by signal `N`.
    Build { code: Option<i32>, reason: String },

    #[error("canceled")]
    Canceled,

    #[error("io error: {0}")]
    Io(String),
}

impl RunnerError {
    /// Exit status a CLI should terminate with.
    ///
    /// A build's code passes through unchanged, the way a batch script ends
    /// with its last command's status. Without a code it maps to `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunnerError::Build { code: Some(c), .. } if *c != 0 => *c,
            RunnerError::Canceled => 130,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for RunnerError {
    fn from(e: std::io::Error) -> Self {
        RunnerError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::RunnerError;

    #[test]
    fn exit_codes() {
        let build = RunnerError::Build {
            code: Some(255),
            reason: "boom".into(),
        };
        assert_eq!(build.exit_code(), 255);

        let terminated = RunnerError::Build {
            code: Some(143),
            reason: "signal 15".into(),
        };
        assert_eq!(terminated.exit_code(), 143);

        let no_code = RunnerError::Build {
            code: None,
            reason: "killed".into(),
        };
        assert_eq!(no_code.exit_code(), 1);

        assert_eq!(RunnerError::Scheduling("no partition".into()).exit_code(), 1);
        assert_eq!(RunnerError::Canceled.exit_code(), 130);
    }
}
