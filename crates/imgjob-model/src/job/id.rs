use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Numeric job identifier assigned by the scheduler.
///
/// Kept as a string: array and heterogeneous job ids can outgrow integer
/// types and are never used arithmetically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the output of `sbatch --parsable`.
    ///
    /// The scheduler prints `<id>` or `<id>;<cluster>`, possibly preceded by
    /// warnings on earlier lines; the last non-empty line is used.
    pub fn from_parsable(output: &str) -> Result<Self, ModelError> {
        let line = output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .last()
            .ok_or_else(|| ModelError::InvalidJobId(output.to_string()))?;

        let id = line.split(';').next().unwrap_or(line);
        id.parse()
    }
}

impl FromStr for JobId {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(ModelError::InvalidJobId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for JobId {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
