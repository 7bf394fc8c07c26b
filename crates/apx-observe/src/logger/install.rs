use tracing::Subscriber;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use super::{LoggerConfig, LoggerError, LoggerResult, LoggerTimestamp};

pub(super) fn text(cfg: &LoggerConfig, timer: LoggerTimestamp) -> LoggerResult<()> {
    let layer = fmt::layer()
        .with_ansi(cfg.ansi())
        .with_target(cfg.with_targets)
        .with_timer(timer);

    install(
        tracing_subscriber::registry()
            .with(cfg.level.to_env_filter())
            .with(layer),
    )
}

pub(super) fn json(cfg: &LoggerConfig, timer: LoggerTimestamp) -> LoggerResult<()> {
    let layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(cfg.with_targets)
        .with_current_span(false)
        .with_timer(timer);

    install(
        tracing_subscriber::registry()
            .with(cfg.level.to_env_filter())
            .with(layer),
    )
}

#[cfg(target_os = "linux")]
pub(super) fn journald(cfg: &LoggerConfig) -> LoggerResult<()> {
    let layer = tracing_journald::layer()
        .map_err(|e| LoggerError::JournaldInitFailed(e.to_string()))?
        .with_syslog_identifier("apx-exporterd".to_string());

    install(
        tracing_subscriber::registry()
            .with(cfg.level.to_env_filter())
            .with(layer),
    )
}

#[cfg(not(target_os = "linux"))]
pub(super) fn journald(_cfg: &LoggerConfig) -> LoggerResult<()> {
    Err(LoggerError::JournaldNotSupported)
}

fn install<S>(subscriber: S) -> LoggerResult<()>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::init_logger;

    #[test]
    fn second_install_is_rejected() {
        let cfg = LoggerConfig {
            use_color: false,
            ..Default::default()
        };

        // Whichever test installs first wins; afterwards every install must fail.
        let _ = init_logger(&cfg);
        assert!(matches!(
            init_logger(&cfg),
            Err(LoggerError::AlreadyInitialized)
        ));
        assert!(matches!(
            json(&cfg, LoggerTimestamp::for_zone(cfg.tz)),
            Err(LoggerError::AlreadyInitialized)
        ));
    }
}
