use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("invalid subprocess configuration: {0}")]
    InvalidSpec(String),

    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("canceled")]
    Canceled,
}

impl ExecError {
    /// Status a POSIX shell reports when it cannot start a command:
    /// `127` when not found, `126` when not executable.
    pub fn shell_status(&self) -> Option<i32> {
        match self {
            ExecError::Spawn { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => Some(127),
                io::ErrorKind::PermissionDenied => Some(126),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_err(kind: io::ErrorKind) -> ExecError {
        ExecError::Spawn {
            command: "singularity".into(),
            source: io::Error::from(kind),
        }
    }

    #[test]
    fn shell_status_mirrors_posix_shell() {
        assert_eq!(spawn_err(io::ErrorKind::NotFound).shell_status(), Some(127));
        assert_eq!(
            spawn_err(io::ErrorKind::PermissionDenied).shell_status(),
            Some(126)
        );
        assert_eq!(spawn_err(io::ErrorKind::Other).shell_status(), None);
        assert_eq!(ExecError::Canceled.shell_status(), None);
    }
}
