//! Submits the rendered batch script to Slurm with `sbatch`.
use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use imgjob_core::prelude::{JobOutcome, RunContext, Runner, RunnerError, RunnerRouter, render};
use imgjob_core::runner::make_run_id;
use imgjob_model::{JobId, JobSpec, LaunchMode};

use crate::{
    ExecError,
    prepare::ensure_dirs,
    subprocess::{SubprocessConfig, describe_status, run_captured},
};

/// How the scheduler is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SlurmConfig {
    /// Submission command.
    pub sbatch: String,
    /// Extra arguments placed before `--parsable`, e.g. `--account=...`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl Default for SlurmConfig {
    fn default() -> Self {
        Self {
            sbatch: "sbatch".to_string(),
            args: Vec::new(),
        }
    }
}

/// Runner for [`LaunchMode::Submit`].
///
/// The script goes to `sbatch` on stdin; the job id comes back from
/// `--parsable` output. Whatever the scheduler says about partitions or
/// resources is passed on as [`RunnerError::Scheduling`].
pub struct SlurmRunner {
    name: &'static str,
    config: SlurmConfig,
}

impl SlurmRunner {
    pub fn new(name: &'static str) -> Self {
        Self::with_config(name, SlurmConfig::default())
    }

    pub fn with_config(name: &'static str, config: SlurmConfig) -> Self {
        Self { name, config }
    }

    fn submit_config(&self, spec: &JobSpec, ctx: &RunContext) -> SubprocessConfig {
        let mut args = self.config.args.clone();
        args.push("--parsable".to_string());

        SubprocessConfig {
            run_id: make_run_id(self.name, spec.job.name.as_str()),
            command: self.config.sbatch.clone(),
            args,
            // sbatch exports the submitting environment into the job.
            env: ctx.env().merged(&spec.build.env),
            cwd: ctx.workdir().cloned(),
            stdin: Some(render(spec)),
        }
    }

    fn dirs_to_prepare(spec: &JobSpec, ctx: &RunContext) -> Vec<PathBuf> {
        spec.job
            .output
            .static_parent()
            .into_iter()
            .chain(spec.build.image_parent())
            .map(|p| ctx.resolve(p))
            .collect()
    }
}

#[async_trait]
impl Runner for SlurmRunner {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports(&self, spec: &JobSpec) -> bool {
        spec.launch == LaunchMode::Submit
    }

    #[instrument(level = "debug", skip_all, fields(runner = self.name))]
    async fn run(
        &self,
        spec: &JobSpec,
        ctx: &RunContext,
        cancel: CancellationToken,
    ) -> Result<JobOutcome, RunnerError> {
        if spec.prepare_dirs.is_enabled() {
            let dirs = Self::dirs_to_prepare(spec, ctx);
            ensure_dirs(dirs.iter().map(PathBuf::as_path))?;
        }

        if !spec.job.output.has_job_id() {
            warn!(output = %spec.job.output, "log template has no %j, runs share one log file");
        }

        let cfg = self.submit_config(spec, ctx);
        info!(
            task = %cfg.run_id,
            job = %spec.job.name,
            partition = %spec.job.partition,
            tasks_per_node = spec.job.tasks_per_node.get(),
            "submitting build job",
        );

        let out = run_captured(&cfg, cancel)
            .await
            .map_err(|e| submit_error(&cfg, e))?;

        if !out.status.success() {
            let stderr = out.stderr.trim();
            let reason = if stderr.is_empty() {
                format!("{} exited with {}", cfg.command, describe_status(&out.status))
            } else {
                stderr.to_string()
            };
            return Err(RunnerError::Scheduling(reason));
        }
        if !out.stderr.trim().is_empty() {
            warn!(task = %cfg.run_id, "{}", out.stderr.trim());
        }

        let job_id = JobId::from_parsable(&out.stdout).map_err(|e| {
            RunnerError::Scheduling(format!("unexpected {} output: {e}", cfg.command))
        })?;
        let log = ctx.resolve(&spec.job.output.resolve(&job_id, spec.job.name.as_str()));

        info!(task = %cfg.run_id, job_id = %job_id, log = %log.display(), "job submitted");
        Ok(JobOutcome::Submitted { job_id, log })
    }
}

fn submit_error(cfg: &SubprocessConfig, e: ExecError) -> RunnerError {
    match e {
        ExecError::Canceled => RunnerError::Canceled,
        ExecError::InvalidSpec(msg) => RunnerError::InvalidSpec(msg),
        other => RunnerError::Scheduling(format!("{}: {other}", cfg.command)),
    }
}

/// Register a [`SlurmRunner`] named `name` in `router`.
pub fn register_slurm_runner(router: &mut RunnerRouter, name: &'static str, config: SlurmConfig) {
    router.register(Arc::new(SlurmRunner::with_config(name, config)));
}

#[cfg(all(test, unix))]
mod tests {
    use std::{fs, path::Path};

    use imgjob_core::script::parse_directives;

    use super::*;

    /// Stand-in for `sbatch`: stores the script and its arguments next to
    /// itself and answers like `--parsable`.
    const FAKE_SBATCH: &str = r#"
dir=$(dirname "$0")
cat > "$dir/submitted.sh"
printf '%s\n' "$@" > "$dir/args"
printf '%s' "$IMGJOB_CACHE" > "$dir/env"
echo "4711;cluster-a"
"#;

    const REJECTING_SBATCH: &str = r#"
cat > /dev/null
echo "sbatch: error: invalid partition specified: cpu-2h" >&2
exit 1
"#;

    struct Fixture {
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
            }
        }

        /// The fake is run through `sh` so no freshly written file is
        /// executed directly (ETXTBSY while other tests fork).
        fn runner(&self, body: &str) -> SlurmRunner {
            let script = self.dir.path().join("fake-sbatch");
            fs::write(&script, body).unwrap();
            SlurmRunner::with_config(
                "slurm",
                SlurmConfig {
                    sbatch: "sh".into(),
                    args: vec![script.to_string_lossy().into_owned(), "--account=imaging".into()],
                },
            )
        }

        fn ctx(&self) -> RunContext {
            RunContext::default().with_workdir(self.dir.path())
        }

        fn path(&self, rel: &str) -> PathBuf {
            self.dir.path().join(rel)
        }
    }

    #[tokio::test]
    async fn submits_rendered_script() {
        let fx = Fixture::new();
        let spec = JobSpec::default();

        let outcome = fx
            .runner(FAKE_SBATCH)
            .run(&spec, &fx.ctx(), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            JobOutcome::Submitted {
                job_id: "4711".parse().unwrap(),
                log: fx.path("logs/job-4711.out"),
            }
        );

        let submitted = fs::read_to_string(fx.path("submitted.sh")).unwrap();
        assert_eq!(submitted, render(&spec));
        let d = parse_directives(&submitted).unwrap().descriptor().unwrap();
        assert_eq!(d, spec.job);

        let args = fs::read_to_string(fx.path("args")).unwrap();
        assert_eq!(args, "--account=imaging\n--parsable\n");
    }

    #[tokio::test]
    async fn build_env_is_exported_to_sbatch() {
        let fx = Fixture::new();
        let mut spec = JobSpec::default();
        spec.build.env.push("IMGJOB_CACHE", "/scratch/cache");

        fx.runner(FAKE_SBATCH)
            .run(&spec, &fx.ctx(), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(fs::read_to_string(fx.path("env")).unwrap(), "/scratch/cache");
    }

    #[tokio::test]
    async fn scheduler_rejection_is_a_scheduling_error() {
        let fx = Fixture::new();

        let err = fx
            .runner(REJECTING_SBATCH)
            .run(&JobSpec::default(), &fx.ctx(), CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            RunnerError::Scheduling(reason) => assert!(reason.contains("invalid partition")),
            other => panic!("expected Scheduling, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejection_without_reading_script_keeps_diagnostic() {
        let fx = Fixture::new();
        let runner = fx.runner("exec 0<&-\necho 'sbatch: error: invalid partition specified' >&2\nexit 1\n");

        let mut spec = JobSpec::default();
        // Long enough that the script cannot fit in the pipe before sbatch exits.
        spec.build.options = vec!["--fakeroot".to_string(); 32 * 1024];

        let err = runner
            .run(&spec, &fx.ctx(), CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            RunnerError::Scheduling(reason) => {
                assert_eq!(reason, "sbatch: error: invalid partition specified")
            }
            other => panic!("expected Scheduling, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fixed_log_path_is_kept_as_is() {
        let fx = Fixture::new();
        let mut spec = JobSpec::default();
        spec.job.output = "logs/build.out".parse().unwrap();

        let outcome = fx
            .runner(FAKE_SBATCH)
            .run(&spec, &fx.ctx(), CancellationToken::new())
            .await
            .unwrap();
        assert!(matches!(outcome, JobOutcome::Submitted { log, .. } if log == fx.path("logs/build.out")));
    }

    #[tokio::test]
    async fn unparsable_answer_is_a_scheduling_error() {
        let fx = Fixture::new();
        let runner = fx.runner("cat > /dev/null\necho 'Submitted batch job'\n");

        let err = runner
            .run(&JobSpec::default(), &fx.ctx(), CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RunnerError::Scheduling(_)));
    }

    #[tokio::test]
    async fn missing_sbatch_is_a_scheduling_error() {
        let fx = Fixture::new();
        let runner = SlurmRunner::with_config(
            "slurm",
            SlurmConfig {
                sbatch: "imgjob-no-such-sbatch".into(),
                args: Vec::new(),
            },
        );

        let err = runner
            .run(&JobSpec::default(), &fx.ctx(), CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RunnerError::Scheduling(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn directories_are_prepared_on_request() {
        let fx = Fixture::new();
        let runner = fx.runner(FAKE_SBATCH);

        let mut spec = JobSpec::default();
        runner
            .run(&spec, &fx.ctx(), CancellationToken::new())
            .await
            .unwrap();
        assert!(!fx.path("logs").exists());
        assert!(!fx.path("images").exists());

        spec.prepare_dirs = true.into();
        runner
            .run(&spec, &fx.ctx(), CancellationToken::new())
            .await
            .unwrap();
        assert!(fx.path("logs").is_dir());
        assert!(fx.path("images").is_dir());
    }

    #[test]
    fn templated_log_directory_is_not_prepared() {
        let mut spec = JobSpec::default();
        spec.job.output = "logs/%j/out.txt".parse().unwrap();
        let ctx = RunContext::default();

        let dirs = SlurmRunner::dirs_to_prepare(&spec, &ctx);
        assert_eq!(dirs, vec![Path::new("images").to_path_buf()]);
    }

    #[test]
    fn supports_only_submit_mode() {
        let runner = SlurmRunner::new("slurm");
        assert!(runner.supports(&JobSpec::default()));
        assert!(!runner.supports(&JobSpec {
            launch: LaunchMode::Local,
            ..Default::default()
        }));
    }
}
