use std::{fmt, path::PathBuf};

use imgjob_model::Env;

/// Shared settings handed to every runner by the router.
#[derive(Clone, Default)]
pub struct RunContext {
    env: Env,
    workdir: Option<PathBuf>,
}

impl RunContext {
    pub fn new(env: Env) -> Self {
        Self { env, workdir: None }
    }

    /// Base environment; a job's own build env is layered on top.
    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Directory relative job paths are resolved against. `None` means the
    /// current directory.
    pub fn workdir(&self) -> Option<&PathBuf> {
        self.workdir.as_ref()
    }

    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// Resolve `path` against [`RunContext::workdir`].
    pub fn resolve(&self, path: &std::path::Path) -> PathBuf {
        match &self.workdir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl fmt::Debug for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("env_len", &self.env.len())
            .field("workdir", &self.workdir)
            .finish()
    }
}
