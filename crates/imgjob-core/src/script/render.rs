use std::fmt::Write;

use imgjob_model::{BuildSpec, JobSpec};

use crate::script::shell_quote;

pub const SHEBANG: &str = "#!/bin/bash";

/// Prefix the scheduler scans for in the script header.
pub const DIRECTIVE_PREFIX: &str = "#SBATCH";

/// Render the batch script for `spec`.
///
/// Environment entries of the build are not written into the script: the
/// scheduler exports the submitting environment into the job.
pub fn render(spec: &JobSpec) -> String {
    let job = &spec.job;
    let mut out = String::with_capacity(256);

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{SHEBANG}");
    let _ = writeln!(out, "{DIRECTIVE_PREFIX} --job-name={}", shell_quote(job.name.as_str()));
    let _ = writeln!(out, "{DIRECTIVE_PREFIX} --partition={}", shell_quote(job.partition.as_str()));
    let _ = writeln!(out, "{DIRECTIVE_PREFIX} --ntasks-per-node={}", job.tasks_per_node);
    let _ = writeln!(out, "{DIRECTIVE_PREFIX} --output={}", shell_quote(job.output.as_str()));
    out.push('\n');
    out.push_str(&command_line(&spec.build));
    out.push('\n');
    out
}

/// The build invocation as a single shell command line.
pub fn command_line(build: &BuildSpec) -> String {
    std::iter::once(build.tool.clone())
        .chain(build.argv())
        .map(|w| shell_quote(&w).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
