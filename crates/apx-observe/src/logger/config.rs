use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use super::{LoggerFormat, LoggerLevel, LoggerTimeZone};

/// Logger section of the daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// Filter expression, e.g. `"info"` or `"apx_core=debug,info"`.
    pub level: LoggerLevel,
    /// Zone of the timestamps of text and json output.
    pub tz: LoggerTimeZone,
    /// Print the event target (module path).
    pub with_targets: bool,
    /// Colorize text output; ignored when stdout is not a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// `true` when colors are enabled and stdout is a terminal.
    pub fn ansi(&self) -> bool {
        self.use_color && self.format == LoggerFormat::Text && std::io::stdout().is_terminal()
    }
}
