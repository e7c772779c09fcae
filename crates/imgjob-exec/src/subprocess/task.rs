use std::{fmt, path::PathBuf};

use imgjob_model::Env;
use tracing::trace;

use crate::ExecError;

/// A fully resolved command, ready to spawn.
#[derive(Debug, Clone)]
pub struct SubprocessConfig {
    /// Correlates the log lines of one run.
    pub run_id: String,
    pub command: String,
    pub args: Vec<String>,
    /// Added on top of the inherited process environment.
    pub env: Env,
    /// Working directory; inherits the parent's when `None`.
    pub cwd: Option<PathBuf>,
    /// Written to the child's stdin, which is then closed.
    pub stdin: Option<String>,
}

impl SubprocessConfig {
    pub fn new(run_id: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            command: command.into(),
            args: Vec::new(),
            env: Env::default(),
            cwd: None,
            stdin: None,
        }
    }

    pub fn validate(&self) -> Result<(), ExecError> {
        if self.command.trim().is_empty() {
            return Err(ExecError::InvalidSpec("command is empty".into()));
        }
        Ok(())
    }

    pub(crate) fn command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.command);
        cmd.args(&self.args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        for kv in self.env.iter() {
            cmd.env(kv.key(), kv.value());
        }
        cmd.kill_on_drop(true);
        cmd
    }

    pub(crate) fn trace_state(&self) {
        trace!(
            task = %self.run_id,
            command = %self.command,
            args = ?self.args,
            cwd = ?self.cwd,
            env_len = self.env.len(),
            stdin_len = self.stdin.as_ref().map_or(0, String::len),
            "subprocess config resolved"
        );
    }
}

impl fmt::Display for SubprocessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
