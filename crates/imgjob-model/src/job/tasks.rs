use std::{fmt, num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_TASKS_PER_NODE, ModelError};

/// Number of tasks requested per node (`--ntasks-per-node`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TasksPerNode(NonZeroU32);

impl TasksPerNode {
    pub fn new(n: u32) -> Result<Self, ModelError> {
        Self::try_from(n)
    }

    #[inline]
    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl Default for TasksPerNode {
    fn default() -> Self {
        Self(NonZeroU32::new(DEFAULT_TASKS_PER_NODE).unwrap_or(NonZeroU32::MIN))
    }
}

impl TryFrom<u32> for TasksPerNode {
    type Error = ModelError;
    fn try_from(n: u32) -> Result<Self, Self::Error> {
        NonZeroU32::new(n)
            .map(Self)
            .ok_or_else(|| ModelError::InvalidTasksPerNode(n.to_string()))
    }
}

impl From<TasksPerNode> for u32 {
    fn from(t: TasksPerNode) -> Self {
        t.get()
    }
}

impl FromStr for TasksPerNode {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u32 = s
            .trim()
            .parse()
            .map_err(|_| ModelError::InvalidTasksPerNode(s.to_string()))?;
        Self::try_from(n)
    }
}

impl fmt::Display for TasksPerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
