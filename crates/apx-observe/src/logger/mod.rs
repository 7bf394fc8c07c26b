mod config;
mod error;
mod format;
mod install;
mod level;
mod timestamp;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use format::LoggerFormat;
pub use level::LoggerLevel;
pub use timestamp::{LoggerTimeZone, LoggerTimestamp};

/// Install the global tracing subscriber described by `cfg`.
///
/// With [`LoggerTimeZone::Local`] the offset is detected here, once. Call this before the
/// async runtime spawns worker threads, otherwise detection fails and UTC is used.
///
/// Fails with [`LoggerError::AlreadyInitialized`] on a second call.
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    let timer = LoggerTimestamp::for_zone(cfg.tz);
    match cfg.format {
        LoggerFormat::Text => install::text(cfg, timer),
        LoggerFormat::Json => install::json(cfg, timer),
        LoggerFormat::Journald => install::journald(cfg),
    }
}
