//! Defaults for an image build job.
//!
//! These are the values the batch job has always been submitted with;
//! config files and CLI flags may override any of them.

/// Scheduler job name.
pub const DEFAULT_JOB_NAME: &str = "build_image";

/// Partition (resource class) the job is queued on.
pub const DEFAULT_PARTITION: &str = "cpu-2h";

/// Tasks requested on the single node.
pub const DEFAULT_TASKS_PER_NODE: u32 = 2;

/// Scheduler log path; `%j` is replaced with the job id.
pub const DEFAULT_OUTPUT: &str = "logs/job-%j.out";

/// Image definition consumed by the build tool.
pub const DEFAULT_DEFINITION: &str = "images/image.def";

/// Image artifact produced by the build tool.
pub const DEFAULT_IMAGE: &str = "images/image.sif";

/// Container build tool executable.
pub const DEFAULT_BUILD_TOOL: &str = "singularity";

/// Build tool subcommand placed before the positional arguments.
pub const DEFAULT_BUILD_SUBCOMMAND: &str = "build";
