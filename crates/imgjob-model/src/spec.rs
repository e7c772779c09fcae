use serde::{Deserialize, Serialize};

use crate::{BuildSpec, Flag, JobDescriptor, LaunchMode, ModelResult};

/// Everything needed to get one image built.
///
/// - `job` is the resource request handed to the scheduler
/// - `build` is the single command executed inside the allocation
/// - `launch` picks whether to submit or run in place
/// - `prepare_dirs` creates the image and log directories first; off by
///   default, the directories are an environment precondition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct JobSpec {
    pub job: JobDescriptor,
    pub build: BuildSpec,
    pub launch: LaunchMode,
    pub prepare_dirs: Flag,
}

impl JobSpec {
    pub fn validate(&self) -> ModelResult<()> {
        self.build.validate()
    }
}
