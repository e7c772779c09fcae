//! Router that hands a [`JobSpec`] to the first runner that supports it.
use std::sync::Arc;

use imgjob_model::JobSpec;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};

use crate::{
    error::CoreError,
    runner::{JobOutcome, RunContext, Runner},
};

/// Runners are checked in registration order.
#[derive(Default)]
pub struct RunnerRouter {
    runners: Vec<Arc<dyn Runner>>,
    ctx: RunContext,
}

impl RunnerRouter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context shared by every runner of this router.
    #[inline]
    pub fn with_context(mut self, ctx: RunContext) -> Self {
        self.ctx = ctx;
        self
    }

    #[inline]
    pub fn register(&mut self, runner: Arc<dyn Runner>) {
        self.runners.push(runner);
    }

    pub fn pick(&self, spec: &JobSpec) -> Option<&Arc<dyn Runner>> {
        self.runners.iter().find(|r| r.supports(spec))
    }

    /// Validate `spec`, pick a runner and run it.
    #[instrument(level = "debug", skip_all, fields(job = %spec.job.name, mode = %spec.launch))]
    pub async fn run(
        &self,
        spec: &JobSpec,
        cancel: CancellationToken,
    ) -> Result<JobOutcome, CoreError> {
        trace!(spec = ?spec, "router received job");
        spec.validate()
            .map_err(|e| CoreError::InvalidJob(e.to_string()))?;

        let runner = self
            .pick(spec)
            .ok_or_else(|| CoreError::NoRunner(spec.launch.to_string()))?;

        debug!(runner = runner.name(), "dispatching job");
        let outcome = runner.run(spec, &self.ctx, cancel).await?;
        debug!(runner = runner.name(), outcome = ?outcome, "runner finished");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RunnerError;

    use async_trait::async_trait;
    use imgjob_model::{Env, LaunchMode};

    struct LocalDummy;

    #[async_trait]
    impl Runner for LocalDummy {
        fn name(&self) -> &'static str {
            "local-dummy"
        }

        fn supports(&self, spec: &JobSpec) -> bool {
            spec.launch == LaunchMode::Local
        }

        async fn run(
            &self,
            spec: &JobSpec,
            ctx: &RunContext,
            _cancel: CancellationToken,
        ) -> Result<JobOutcome, RunnerError> {
            Ok(JobOutcome::Built {
                image: ctx.resolve(&spec.build.image),
            })
        }
    }

    struct FailingBuild;

    #[async_trait]
    impl Runner for FailingBuild {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn supports(&self, _spec: &JobSpec) -> bool {
            true
        }

        async fn run(
            &self,
            _spec: &JobSpec,
            _ctx: &RunContext,
            _cancel: CancellationToken,
        ) -> Result<JobOutcome, RunnerError> {
            Err(RunnerError::Build {
                code: Some(3),
                reason: "definition not found".into(),
            })
        }
    }

    fn local_spec() -> JobSpec {
        JobSpec {
            launch: LaunchMode::Local,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn no_runner_for_mode() {
        let mut router = RunnerRouter::new();
        router.register(Arc::new(LocalDummy));

        let res = router.run(&JobSpec::default(), CancellationToken::new()).await;
        match res {
            Err(CoreError::NoRunner(mode)) => assert_eq!(mode, "submit"),
            other => panic!("expected NoRunner, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dispatches_to_supporting_runner_with_context() {
        let mut router =
            RunnerRouter::new().with_context(RunContext::new(Env::new()).with_workdir("/work"));
        router.register(Arc::new(LocalDummy));

        let outcome = router
            .run(&local_spec(), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            JobOutcome::Built {
                image: "/work/images/image.sif".into()
            }
        );
    }

    #[tokio::test]
    async fn first_registered_wins() {
        let mut router = RunnerRouter::new();
        router.register(Arc::new(FailingBuild));
        router.register(Arc::new(LocalDummy));

        assert_eq!(router.pick(&local_spec()).unwrap().name(), "failing");

        let err = router
            .run(&local_spec(), CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn invalid_spec_is_rejected_before_dispatch() {
        let mut router = RunnerRouter::new();
        router.register(Arc::new(LocalDummy));

        let mut spec = local_spec();
        spec.build.tool.clear();

        let res = router.run(&spec, CancellationToken::new()).await;
        assert!(matches!(res, Err(CoreError::InvalidJob(_))));
    }
}
