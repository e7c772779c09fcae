use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Where the build command runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// Hand a batch script to the scheduler and return once it is queued.
    #[default]
    Submit,
    /// Run the build command in the current process tree, typically from
    /// inside an existing allocation.
    Local,
}

impl LaunchMode {
    pub fn kind(&self) -> &'static str {
        match self {
            LaunchMode::Submit => "submit",
            LaunchMode::Local => "local",
        }
    }
}

impl FromStr for LaunchMode {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "submit" | "sbatch" => Ok(Self::Submit),
            "local" => Ok(Self::Local),
            _ => Err(ModelError::UnknownLaunchMode(s.to_string())),
        }
    }
}

impl fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::LaunchMode;

    #[test]
    fn parse_and_display() {
        assert_eq!("Submit".parse::<LaunchMode>().unwrap(), LaunchMode::Submit);
        assert_eq!("sbatch".parse::<LaunchMode>().unwrap(), LaunchMode::Submit);
        assert_eq!("local".parse::<LaunchMode>().unwrap(), LaunchMode::Local);
        assert!("srun".parse::<LaunchMode>().is_err());
        assert_eq!(LaunchMode::Local.to_string(), "local");
    }
}
