use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_JOB_NAME, DEFAULT_PARTITION, ModelError};

/// Directive values must stay on their `#SBATCH` line as one word; quote
/// characters are fine, the script quotes them.
fn check_token(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c.is_control())
}

/// Scheduler job name (`--job-name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobName(String);

impl JobName {
    pub fn new(s: impl Into<String>) -> Result<Self, ModelError> {
        Self::try_from(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobName {
    fn default() -> Self {
        Self(DEFAULT_JOB_NAME.to_string())
    }
}

impl TryFrom<String> for JobName {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        if check_token(&s) {
            Ok(Self(s))
        } else {
            Err(ModelError::InvalidJobName(s))
        }
    }
}

impl FromStr for JobName {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl From<JobName> for String {
    fn from(n: JobName) -> Self {
        n.0
    }
}

impl fmt::Display for JobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scheduler partition (`--partition`), a named resource class.
///
/// Only the shape is checked; whether the partition exists is for the
/// scheduler to decide at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Partition(String);

impl Partition {
    pub fn new(s: impl Into<String>) -> Result<Self, ModelError> {
        Self::try_from(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Partition {
    fn default() -> Self {
        Self(DEFAULT_PARTITION.to_string())
    }
}

impl TryFrom<String> for Partition {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        if check_token(&s) {
            Ok(Self(s))
        } else {
            Err(ModelError::InvalidPartition(s))
        }
    }
}

impl FromStr for Partition {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl From<Partition> for String {
    fn from(p: Partition) -> Self {
        p.0
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(JobName::default().as_str(), "build_image");
        assert_eq!(Partition::default().as_str(), "cpu-2h");
    }

    #[test]
    fn rejects_values_that_would_break_a_directive_line() {
        let bad = ["", " ", "two words", "line\nbreak", "tab\there"];
        for input in bad {
            assert!(JobName::new(input).is_err(), "job name {input:?} accepted");
            assert!(Partition::new(input).is_err(), "partition {input:?} accepted");
        }
    }

    #[test]
    fn accepts_partition_lists() {
        let p: Partition = "cpu-2h,cpu-8h".parse().unwrap();
        assert_eq!(p.to_string(), "cpu-2h,cpu-8h");
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let ok: JobName = serde_json::from_str(r#""nightly""#).unwrap();
        assert_eq!(ok.as_str(), "nightly");
        assert!(serde_json::from_str::<Partition>(r#""a b""#).is_err());
    }
}
