use std::{fs, path::Path, process::ExitCode};

use anyhow::Context;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use imgjob_core::{
    error::CoreError,
    prelude::{Directives, JobOutcome, RunContext, RunnerRouter, parse_directives, render},
    script::executable_statements,
};
use imgjob_exec::{local::register_local_runner, slurm::register_slurm_runner};
use imgjob_model::{JobDescriptor, LaunchMode};

use crate::{cli::Command, config::AppConfig};

pub fn dispatch(command: Command, mut cfg: AppConfig) -> anyhow::Result<ExitCode> {
    match command {
        Command::Submit {
            job,
            run,
            sbatch,
            sbatch_args,
        } => {
            job.apply(&mut cfg);
            run.apply(&mut cfg);
            if let Some(sbatch) = sbatch {
                cfg.slurm.sbatch = sbatch;
            }
            cfg.slurm.args.extend(sbatch_args);
            run_job(&cfg, LaunchMode::Submit)
        }
        Command::Build {
            job,
            run,
            capture_output,
        } => {
            job.apply(&mut cfg);
            run.apply(&mut cfg);
            if capture_output {
                cfg.output.capture = true;
            }
            run_job(&cfg, LaunchMode::Local)
        }
        Command::Script { job, out } => {
            job.apply(&mut cfg);
            write_script(&cfg, out.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Inspect { file, json } => inspect(&file, json),
    }
}

fn router(cfg: &AppConfig) -> RunnerRouter {
    let mut ctx = RunContext::default();
    if let Some(dir) = &cfg.workdir {
        ctx = ctx.with_workdir(dir.clone());
    }

    let mut router = RunnerRouter::new().with_context(ctx);
    register_slurm_runner(&mut router, "slurm", cfg.slurm.clone());
    register_local_runner(&mut router, "local", cfg.output);
    router
}

fn run_job(cfg: &AppConfig, launch: LaunchMode) -> anyhow::Result<ExitCode> {
    let spec = cfg.job_spec(launch);
    let router = router(cfg);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let result = rt.block_on(async move {
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, stopping");
                on_interrupt.cancel();
            }
        });

        router.run(&spec, cancel).await
    });
    Ok(report(result))
}

fn report(result: Result<JobOutcome, CoreError>) -> ExitCode {
    match result {
        Ok(JobOutcome::Submitted { job_id, log }) => {
            println!("{job_id}");
            println!("{}", log.display());
            ExitCode::SUCCESS
        }
        Ok(JobOutcome::Built { image }) => {
            info!(image = %image.display(), "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(status_byte(e.exit_code()))
        }
    }
}

/// Codes outside `1..=255` collapse to 1.
fn status_byte(code: i32) -> u8 {
    match u8::try_from(code) {
        Ok(0) | Err(_) => 1,
        Ok(b) => b,
    }
}

fn write_script(cfg: &AppConfig, out: Option<&Path>) -> anyhow::Result<()> {
    let script = render(&cfg.job_spec(LaunchMode::Submit));
    match out {
        Some(path) => {
            fs::write(path, &script)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "script written");
        }
        None => print!("{script}"),
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct DirectiveView<'a> {
    line: usize,
    key: &'a str,
    value: &'a str,
}

/// What `inspect` reports about a batch script.
#[derive(Debug, Serialize)]
struct Inspection<'a> {
    directives: Vec<DirectiveView<'a>>,
    /// Resource request, if the header declares all of it.
    job: Option<JobDescriptor>,
    problem: Option<String>,
    statements: Vec<&'a str>,
}

impl<'a> Inspection<'a> {
    fn new(script: &'a str, directives: &'a Directives) -> Self {
        let (job, problem) = match directives.descriptor() {
            Ok(job) => (Some(job), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            directives: directives
                .iter()
                .map(|d| DirectiveView {
                    line: d.line,
                    key: &d.key,
                    value: &d.value,
                })
                .collect(),
            job,
            problem,
            statements: executable_statements(script),
        }
    }

    fn is_complete(&self) -> bool {
        self.job.is_some()
    }
}

fn inspect(file: &Path, json: bool) -> anyhow::Result<ExitCode> {
    let script = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let directives = parse_directives(&script)
        .with_context(|| format!("malformed header in {}", file.display()))?;

    let inspection = Inspection::new(&script, &directives);

    if json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
    } else {
        print_inspection(&inspection);
    }

    if inspection.is_complete() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn print_inspection(inspection: &Inspection<'_>) {
    for d in &inspection.directives {
        if d.value.is_empty() {
            println!("{:>4}  --{}", d.line, d.key);
        } else {
            println!("{:>4}  --{}={}", d.line, d.key, d.value);
        }
    }
    if let Some(problem) = &inspection.problem {
        println!("incomplete: {problem}");
    }
    println!("{} executable statement(s)", inspection.statements.len());
    for stmt in &inspection.statements {
        println!("      {stmt}");
    }
}
