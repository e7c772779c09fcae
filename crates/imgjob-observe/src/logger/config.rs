use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use crate::logger::object::{LoggerFormat, LoggerLevel, LoggerTimeZone};

/// Environment variable holding a filter expression that overrides the
/// configured level.
pub const LOG_ENV_VAR: &str = "IMGJOB_LOG";

/// Logger configuration, usually the `[log]` table of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// Filter expression (e.g. `"info"`, `"imgjob_exec=debug,info"`).
    pub level: LoggerLevel,
    /// Timezone for timestamps.
    pub tz: LoggerTimeZone,
    /// Include module targets in each line.
    pub with_targets: bool,
    /// Colour text output when stderr is a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: false,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Whether ANSI colours should be emitted.
    ///
    /// Batch jobs write stderr into the scheduler log, so colour is only
    /// used on an interactive terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stderr().is_terminal()
    }

    /// Replace the level with `value` when it is set and valid.
    ///
    /// An invalid expression is ignored and the configured level is kept.
    pub fn with_level_override(mut self, value: Option<&str>) -> Self {
        if let Some(level) = value.and_then(|v| v.parse::<LoggerLevel>().ok()) {
            self.level = level;
        }
        self
    }

    /// [`LoggerConfig::with_level_override`] fed from [`LOG_ENV_VAR`].
    pub fn with_env_override(self) -> Self {
        let value = std::env::var(LOG_ENV_VAR).ok();
        self.with_level_override(value.as_deref())
    }
}
