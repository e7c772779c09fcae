use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid job name: {0}")]
    InvalidJobName(String),

    #[error("invalid partition: {0}")]
    InvalidPartition(String),

    #[error("tasks per node must be a positive integer, got {0}")]
    InvalidTasksPerNode(String),

    #[error("invalid output template: {0}")]
    InvalidOutput(String),

    #[error("invalid job id: {0:?}")]
    InvalidJobId(String),

    #[error("unknown launch mode: {0}")]
    UnknownLaunchMode(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
