mod domain;
pub use domain::{Env, Flag, KeyValue};
pub use domain::{
    DEFAULT_BUILD_SUBCOMMAND, DEFAULT_BUILD_TOOL, DEFAULT_DEFINITION, DEFAULT_IMAGE,
    DEFAULT_JOB_NAME, DEFAULT_OUTPUT, DEFAULT_PARTITION, DEFAULT_TASKS_PER_NODE,
};

mod error;
pub use error::{ModelError, ModelResult};

mod job;
pub use job::{JobDescriptor, JobId, JobName, OutputTemplate, Partition, TasksPerNode};

mod build;
pub use build::BuildSpec;

mod kind;
pub use kind::LaunchMode;

mod spec;
pub use spec::JobSpec;
