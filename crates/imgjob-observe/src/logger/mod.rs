mod config;
mod error;
mod log;
mod object;

pub use config::{LOG_ENV_VAR, LoggerConfig};
pub use error::{LoggerError, LoggerResult};
pub use object::LoggerFormat;
pub use object::LoggerLevel;
pub use object::{LoggerTimeZone, init_local_offset};

/// Installs the global tracing subscriber described by `cfg`.
///
/// All output goes to stderr; stdout is left to the command's own results
/// (job ids, rendered scripts) so it can be piped.
///
/// With [`LoggerTimeZone::Local`], call [`init_local_offset`] first, before
/// any runtime threads exist.
///
/// # Examples
/// ```rust
/// use imgjob_observe::{LoggerConfig, init_logger};
///
/// let config = LoggerConfig::default();
/// init_logger(&config).expect("logger");
/// tracing::info!("logger initialized");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    match cfg.format {
        LoggerFormat::Text => log::logger_text(cfg),
        LoggerFormat::Compact => log::logger_compact(cfg),
        LoggerFormat::Json => log::logger_json(cfg),
        LoggerFormat::Journald => log::logger_journald(cfg),
    }
}
