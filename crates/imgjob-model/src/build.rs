use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_BUILD_SUBCOMMAND, DEFAULT_BUILD_TOOL, DEFAULT_DEFINITION, DEFAULT_IMAGE, Env,
    ModelError, ModelResult,
};

/// Invocation of the container build tool.
///
/// The tool receives exactly two positional arguments, the output image
/// first and the definition file second:
/// `<tool> <subcommand> [options...] <image> <definition>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildSpec {
    /// Build tool executable (e.g. `singularity`, `apptainer`).
    pub tool: String,
    /// Subcommand placed before everything else.
    pub subcommand: String,
    /// Definition file read by the tool.
    pub definition: PathBuf,
    /// Image file written (or overwritten) by the tool.
    pub image: PathBuf,
    /// Extra flags inserted between the subcommand and the positionals.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Extra environment for the tool, e.g. cache or tmp directories.
    #[serde(skip_serializing_if = "Env::is_empty")]
    pub env: Env,
}

impl Default for BuildSpec {
    fn default() -> Self {
        Self {
            tool: DEFAULT_BUILD_TOOL.to_string(),
            subcommand: DEFAULT_BUILD_SUBCOMMAND.to_string(),
            definition: PathBuf::from(DEFAULT_DEFINITION),
            image: PathBuf::from(DEFAULT_IMAGE),
            options: Vec::new(),
            env: Env::default(),
        }
    }
}

impl BuildSpec {
    /// Arguments passed to [`BuildSpec::tool`].
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.options.len() + 3);
        if !self.subcommand.is_empty() {
            argv.push(self.subcommand.clone());
        }
        argv.extend(self.options.iter().cloned());
        argv.push(self.image.to_string_lossy().into_owned());
        argv.push(self.definition.to_string_lossy().into_owned());
        argv
    }

    /// Directory the image is written to, if the path has one.
    pub fn image_parent(&self) -> Option<&Path> {
        self.image.parent().filter(|p| !p.as_os_str().is_empty())
    }

    /// Structural checks only; the definition file is not looked up.
    pub fn validate(&self) -> ModelResult<()> {
        if self.tool.trim().is_empty() {
            return Err(ModelError::Invalid("build tool is empty".into()));
        }
        if self.image.as_os_str().is_empty() {
            return Err(ModelError::Invalid("image path is empty".into()));
        }
        if self.definition.as_os_str().is_empty() {
            return Err(ModelError::Invalid("definition path is empty".into()));
        }
        Ok(())
    }
}
