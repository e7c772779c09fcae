//! Batch script for the image build job.
//!
//! The script is four `#SBATCH` directives and one command:
//!
//! ```text
//! #!/bin/bash
//! #SBATCH --job-name=build_image
//! #SBATCH --partition=cpu-2h
//! #SBATCH --ntasks-per-node=2
//! #SBATCH --output=logs/job-%j.out
//!
//! singularity build images/image.sif images/image.def
//! ```
//!
//! The job's exit status is the build command's exit status.
mod error;
pub use error::ScriptError;

mod quote;
pub use quote::shell_quote;

mod render;
pub use render::{DIRECTIVE_PREFIX, SHEBANG, command_line, render};

mod directives;
pub use directives::{Directive, Directives, executable_statements, parse_directives};
