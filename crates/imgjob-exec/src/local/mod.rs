//! Runs the build command in place, the way the batch job body does once
//! the scheduler has started it.
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use imgjob_core::prelude::{JobOutcome, RunContext, Runner, RunnerError, RunnerRouter};
use imgjob_core::runner::make_run_id;
use imgjob_model::{JobSpec, LaunchMode};

use crate::{
    ExecError,
    prepare::ensure_dirs,
    subprocess::{LogConfig, SubprocessConfig, describe_status, run_streamed, status_code},
};

/// Runner for [`LaunchMode::Local`].
///
/// The build tool's exit status decides the outcome; nothing is checked
/// beforehand, a missing definition file is reported by the tool itself.
pub struct LocalRunner {
    name: &'static str,
    log: LogConfig,
}

impl LocalRunner {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            log: LogConfig::default(),
        }
    }

    pub fn with_log(name: &'static str, log: LogConfig) -> Self {
        Self { name, log }
    }

    fn build_config(&self, spec: &JobSpec, ctx: &RunContext) -> SubprocessConfig {
        let build = &spec.build;
        SubprocessConfig {
            run_id: make_run_id(self.name, spec.job.name.as_str()),
            command: build.tool.clone(),
            args: build.argv(),
            env: ctx.env().merged(&build.env),
            cwd: ctx.workdir().cloned(),
            stdin: None,
        }
    }
}

#[async_trait]
impl Runner for LocalRunner {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports(&self, spec: &JobSpec) -> bool {
        spec.launch == LaunchMode::Local
    }

    #[instrument(level = "debug", skip_all, fields(runner = self.name))]
    async fn run(
        &self,
        spec: &JobSpec,
        ctx: &RunContext,
        cancel: CancellationToken,
    ) -> Result<JobOutcome, RunnerError> {
        let image = ctx.resolve(&spec.build.image);

        if spec.prepare_dirs.is_enabled() {
            if let Some(parent) = spec.build.image_parent() {
                ensure_dirs([ctx.resolve(parent).as_path()])?;
            }
        }

        let cfg = self.build_config(spec, ctx);
        info!(task = %cfg.run_id, command = %cfg, "starting image build");

        let status = run_streamed(&cfg, &self.log, cancel)
            .await
            .map_err(|e| build_error(&cfg, e))?;

        if !status.success() {
            return Err(RunnerError::Build {
                code: status_code(&status),
                reason: format!("{} exited with {}", cfg.command, describe_status(&status)),
            });
        }

        info!(task = %cfg.run_id, image = %image.display(), "image built");
        Ok(JobOutcome::Built { image })
    }
}

fn build_error(cfg: &SubprocessConfig, e: ExecError) -> RunnerError {
    match e {
        ExecError::Canceled => RunnerError::Canceled,
        ExecError::InvalidSpec(msg) => RunnerError::InvalidSpec(msg),
        other => RunnerError::Build {
            code: other.shell_status(),
            reason: format!("{}: {other}", cfg.command),
        },
    }
}

/// Register a [`LocalRunner`] named `name` in `router`.
pub fn register_local_runner(router: &mut RunnerRouter, name: &'static str, log: LogConfig) {
    router.register(Arc::new(LocalRunner::with_log(name, log)));
}
