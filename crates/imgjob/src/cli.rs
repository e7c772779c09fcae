use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use imgjob_model::{JobName, KeyValue, OutputTemplate, Partition, TasksPerNode};
use imgjob_observe::{LoggerFormat, LoggerLevel};

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "imgjob", version)]
#[command(about = "Builds a container image from a definition file as a Slurm batch job.")]
#[command(
    long_about = "Builds a container image from a definition file as a Slurm batch job.\n\n\
    `submit` hands the batch script to sbatch, `build` runs the build command in place \
    (e.g. inside an allocation), `script` prints the batch script and `inspect` reads the \
    #SBATCH header of an existing one.\n\n\
    Settings come from defaults, then the config file, then flags."
)]
pub struct Cli {
    /// Config file; `imgjob.toml` in the working directory is used if present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `imgjob_exec=trace,info`. Overrides IMGJOB_LOG.
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<LoggerLevel>,

    /// Log format: text, compact, json or journald.
    #[arg(long, global = true, value_name = "FORMAT")]
    pub log_format: Option<LoggerFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit the build job to the scheduler and print its job id and log path.
    Submit {
        #[command(flatten)]
        job: JobArgs,

        #[command(flatten)]
        run: RunArgs,

        /// Submission command.
        #[arg(long, value_name = "PATH")]
        sbatch: Option<String>,

        /// Extra argument for the submission command (repeatable).
        #[arg(long = "sbatch-arg", value_name = "ARG", allow_hyphen_values = true)]
        sbatch_args: Vec<String>,
    },

    /// Run the build command here and exit with its status.
    Build {
        #[command(flatten)]
        job: JobArgs,

        #[command(flatten)]
        run: RunArgs,

        /// Forward the build tool's output through the logger.
        #[arg(long)]
        capture_output: bool,
    },

    /// Print the batch script.
    Script {
        #[command(flatten)]
        job: JobArgs,

        /// Write the script to a file instead of stdout.
        #[arg(short = 'O', long = "out", value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Show the #SBATCH directives and statements of a batch script.
    Inspect {
        /// Script to read.
        file: PathBuf,

        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Per-field overrides of the job and build settings.
#[derive(Debug, Default, Args)]
pub struct JobArgs {
    /// Job name (`--job-name`).
    #[arg(short = 'J', long, value_name = "NAME")]
    pub job_name: Option<JobName>,

    /// Partition (`--partition`).
    #[arg(short = 'p', long, value_name = "PARTITION")]
    pub partition: Option<Partition>,

    /// Tasks per node (`--ntasks-per-node`).
    #[arg(long, value_name = "N")]
    pub ntasks_per_node: Option<TasksPerNode>,

    /// Log path template (`--output`); `%j` is the job id, `%x` the job name.
    #[arg(short = 'o', long, value_name = "TEMPLATE")]
    pub output: Option<OutputTemplate>,

    /// Build tool executable.
    #[arg(long, value_name = "TOOL")]
    pub tool: Option<String>,

    /// Definition file read by the build.
    #[arg(long, value_name = "PATH")]
    pub definition: Option<PathBuf>,

    /// Image file written by the build.
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Extra build tool option placed before the image path (repeatable).
    #[arg(long = "build-option", value_name = "OPT", allow_hyphen_values = true)]
    pub build_options: Vec<String>,

    /// Extra environment for the build tool (repeatable).
    #[arg(long = "build-env", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub build_env: Vec<KeyValue>,
}

/// Flags that only matter when something is actually run.
#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Create the image and log directories before running.
    #[arg(long)]
    pub prepare_dirs: bool,

    /// Resolve relative paths against this directory.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,
}

impl JobArgs {
    /// Layer the flags that were given on top of `cfg`.
    pub fn apply(&self, cfg: &mut AppConfig) {
        if let Some(name) = &self.job_name {
            cfg.job.name = name.clone();
        }
        if let Some(partition) = &self.partition {
            cfg.job.partition = partition.clone();
        }
        if let Some(n) = self.ntasks_per_node {
            cfg.job.tasks_per_node = n;
        }
        if let Some(output) = &self.output {
            cfg.job.output = output.clone();
        }
        if let Some(tool) = &self.tool {
            cfg.build.tool = tool.clone();
        }
        if let Some(definition) = &self.definition {
            cfg.build.definition = definition.clone();
        }
        if let Some(image) = &self.image {
            cfg.build.image = image.clone();
        }
        cfg.build.options.extend(self.build_options.iter().cloned());
        for kv in &self.build_env {
            cfg.build.env.push(kv.key(), kv.value());
        }
    }
}

impl RunArgs {
    pub fn apply(&self, cfg: &mut AppConfig) {
        if self.prepare_dirs {
            cfg.prepare_dirs = true.into();
        }
        if let Some(dir) = &self.workdir {
            cfg.workdir = Some(dir.clone());
        }
    }
}

fn parse_assignment(s: &str) -> Result<KeyValue, String> {
    KeyValue::parse_assignment(s).ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use std::path::Path;

    use super::*;

    fn job_args(argv: &[&str]) -> JobArgs {
        let mut full = vec!["imgjob", "script"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Script { job, .. } => job,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "imgjob",
            "submit",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--config",
            "site.toml",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_ref().map(LoggerLevel::as_str), Some("debug"));
        assert_eq!(cli.log_format, Some(LoggerFormat::Json));
        assert_eq!(cli.config.as_deref(), Some(Path::new("site.toml")));
        assert!(matches!(cli.command, Command::Submit { .. }));
    }

    #[test]
    fn flags_override_config() {
        let mut cfg = AppConfig::from_toml("[job]\npartition = \"cpu-8h\"\nname = \"nightly\"\n").unwrap();
        job_args(&[
            "-p",
            "gpu-1h",
            "--ntasks-per-node",
            "4",
            "--image",
            "out/app.sif",
            "--build-option",
            "--force",
            "--build-env",
            "TMPDIR=/scratch/tmp",
        ])
        .apply(&mut cfg);

        assert_eq!(cfg.job.partition.as_str(), "gpu-1h");
        assert_eq!(cfg.job.name.as_str(), "nightly");
        assert_eq!(cfg.job.tasks_per_node.get(), 4);
        assert_eq!(cfg.build.argv(), ["build", "--force", "out/app.sif", "images/image.def"]);
        assert_eq!(cfg.build.env.get("TMPDIR"), Some("/scratch/tmp"));
        assert!(!cfg.prepare_dirs.is_enabled());
    }

    #[test]
    fn run_flags_apply_to_build_and_submit() {
        for sub in ["build", "submit"] {
            let cli = Cli::try_parse_from(["imgjob", sub, "--prepare-dirs", "-C", "/scratch/project"])
                .unwrap();
            let run = match cli.command {
                Command::Build { run, .. } | Command::Submit { run, .. } => run,
                other => panic!("unexpected command {other:?}"),
            };

            let mut cfg = AppConfig::default();
            run.apply(&mut cfg);
            assert!(cfg.prepare_dirs.is_enabled());
            assert_eq!(cfg.workdir.as_deref(), Some(Path::new("/scratch/project")));
        }
    }

    #[test]
    fn script_rejects_run_flags() {
        assert!(Cli::try_parse_from(["imgjob", "script", "--prepare-dirs"]).is_err());
        assert!(Cli::try_parse_from(["imgjob", "script", "--workdir", "/tmp"]).is_err());
    }

    #[test]
    fn no_flags_keep_config() {
        let mut cfg = AppConfig::from_toml("prepare-dirs = true\n[build]\ntool = \"apptainer\"\n").unwrap();
        job_args(&[]).apply(&mut cfg);

        assert_eq!(cfg.build.tool, "apptainer");
        assert!(cfg.prepare_dirs.is_enabled());
        assert_eq!(cfg.job.partition.as_str(), "cpu-2h");
    }

    #[test]
    fn invalid_values_are_rejected_at_parse_time() {
        assert!(Cli::try_parse_from(["imgjob", "build", "--ntasks-per-node", "0"]).is_err());
        assert!(Cli::try_parse_from(["imgjob", "build", "-J", "two words"]).is_err());
        assert!(Cli::try_parse_from(["imgjob", "build", "--build-env", "NOVALUE"]).is_err());
        assert!(Cli::try_parse_from(["imgjob", "build", "--log-format", "xml"]).is_err());
        assert!(Cli::try_parse_from(["imgjob", "build", "--log-level", "imgjob=shout"]).is_err());
    }

    #[test]
    fn inspect_takes_a_file() {
        let cli = Cli::try_parse_from(["imgjob", "inspect", "job.sh", "--json"]).unwrap();
        match cli.command {
            Command::Inspect { file, json } => {
                assert_eq!(file, Path::new("job.sh"));
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
