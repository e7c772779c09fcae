use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use imgjob_exec::{slurm::SlurmConfig, subprocess::LogConfig};
use imgjob_model::{BuildSpec, Flag, JobDescriptor, JobSpec, LaunchMode};
use imgjob_observe::LoggerConfig;

/// Config file picked up from the working directory when `--config` is not
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "imgjob.toml";

/// Contents of `imgjob.toml`. Every table is optional; an empty file
/// describes the stock build job.
///
/// ```toml
/// prepare-dirs = true
///
/// [job]
/// partition = "cpu-8h"
///
/// [build]
/// tool = "apptainer"
/// env = [{ key = "APPTAINER_CACHEDIR", value = "/scratch/cache" }]
///
/// [slurm]
/// args = ["--account=imaging"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AppConfig {
    pub log: LoggerConfig,
    pub job: JobDescriptor,
    pub build: BuildSpec,
    pub prepare_dirs: Flag,
    /// Directory relative paths are resolved against; the process's
    /// working directory when unset.
    pub workdir: Option<PathBuf>,
    /// Handling of the build tool's output in `build` mode.
    pub output: LogConfig,
    pub slurm: SlurmConfig,
}

impl AppConfig {
    /// Load the config file.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`]
    /// is read if present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// The job to run in `launch` mode.
    pub fn job_spec(&self, launch: LaunchMode) -> JobSpec {
        JobSpec {
            job: self.job.clone(),
            build: self.build.clone(),
            launch,
            prepare_dirs: self.prepare_dirs,
        }
    }
}
