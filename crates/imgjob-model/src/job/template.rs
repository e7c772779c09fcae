use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_OUTPUT, JobId, ModelError};

/// Scheduler log path template (`--output`).
///
/// Recognised replacement symbols follow the scheduler's filename patterns:
/// - `%j` job id
/// - `%x` job name
/// - `%%` a literal `%`
///
/// Any other `%` sequence is kept verbatim; the scheduler owns its meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OutputTemplate(String);

impl OutputTemplate {
    pub fn new(s: impl Into<String>) -> Result<Self, ModelError> {
        Self::try_from(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the template contains a `%j` token.
    pub fn has_job_id(&self) -> bool {
        let mut chars = self.0.chars();
        while let Some(c) = chars.next() {
            if c == '%' {
                match chars.next() {
                    Some('j') => return true,
                    _ => continue,
                }
            }
        }
        false
    }

    /// Substitute the job id and name into the template.
    pub fn resolve(&self, job_id: &JobId, job_name: &str) -> PathBuf {
        let mut out = String::with_capacity(self.0.len() + 8);
        let mut chars = self.0.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.peek() {
                Some('j') => {
                    chars.next();
                    out.push_str(job_id.as_str());
                }
                Some('x') => {
                    chars.next();
                    out.push_str(job_name);
                }
                Some('%') => {
                    chars.next();
                    out.push('%');
                }
                _ => out.push('%'),
            }
        }
        PathBuf::from(out)
    }

    /// Directory the log lands in, when it is known before submission.
    ///
    /// Returns `None` for bare file names and for directories that contain
    /// replacement symbols themselves.
    pub fn static_parent(&self) -> Option<&Path> {
        Path::new(&self.0)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .filter(|p| !p.to_string_lossy().contains('%'))
    }
}

impl Default for OutputTemplate {
    fn default() -> Self {
        Self(DEFAULT_OUTPUT.to_string())
    }
}

impl TryFrom<String> for OutputTemplate {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.trim().is_empty() || s.chars().any(|c| c.is_control()) {
            return Err(ModelError::InvalidOutput(s));
        }
        Ok(Self(s))
    }
}

impl FromStr for OutputTemplate {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl From<OutputTemplate> for String {
    fn from(t: OutputTemplate) -> Self {
        t.0
    }
}

impl fmt::Display for OutputTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
