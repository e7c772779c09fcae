use thiserror::Error;

use crate::{runner::RunnerError, script::ScriptError};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("no runner registered for launch mode: {0}")]
    NoRunner(String),

    #[error("invalid job: {0}")]
    InvalidJob(String),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error(transparent)]
    Runner(#[from] RunnerError),
}

impl CoreError {
    /// Process exit status for this error.
    ///
    /// A failed build reports the build tool's own exit code; anything else
    /// is a generic failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            CoreError::Runner(e) => e.exit_code(),
            _ => 1,
        }
    }
}
