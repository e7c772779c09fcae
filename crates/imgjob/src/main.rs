mod cli;
mod commands;
mod config;

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};

use imgjob_observe::{LoggerTimeZone, init_local_offset, init_logger};

use crate::{cli::Cli, config::AppConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // 1) config: defaults < file < flags
    let mut cfg = match AppConfig::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("imgjob: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // 2) logger; the local offset must be read while single-threaded
    cfg.log = cfg.log.with_env_override();
    if let Some(level) = cli.log_level {
        cfg.log.level = level;
    }
    if let Some(format) = cli.log_format {
        cfg.log.format = format;
    }
    if cfg.log.tz == LoggerTimeZone::Local {
        init_local_offset();
    }
    if let Err(e) = init_logger(&cfg.log) {
        eprintln!("imgjob: {e}");
        return ExitCode::FAILURE;
    }
    debug!(config = ?cfg, "configuration loaded");

    // 3) command
    match commands::dispatch(cli.command, cfg) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
