use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use super::LoggerError;

/// Validated `EnvFilter` directive string.
///
/// Kept as text so it can round-trip through configuration files; validity is checked once
/// on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoggerLevel(String);

impl LoggerLevel {
    pub fn new(s: impl Into<String>) -> Result<Self, LoggerError> {
        Self::try_from(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the filter for the subscriber.
    pub fn to_env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.0).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

impl Default for LoggerLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl FromStr for LoggerLevel {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl TryFrom<String> for LoggerLevel {
    type Error = LoggerError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        let s = s.trim().to_string();
        if s.is_empty() {
            return Err(LoggerError::InvalidLevel("empty filter".into()));
        }
        match EnvFilter::try_new(&s) {
            Ok(_) => Ok(Self(s)),
            Err(e) => Err(LoggerError::InvalidLevel(format!("{s}: {e}"))),
        }
    }
}

impl From<LoggerLevel> for String {
    fn from(l: LoggerLevel) -> Self {
        l.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_levels_and_directives() {
        for lvl in ["info", "warn", "trace", "apx_store=debug,apx_core=trace,info"] {
            assert!(lvl.parse::<LoggerLevel>().is_ok(), "{lvl} must be accepted");
        }
    }

    #[test]
    fn rejects_invalid_directives() {
        for lvl in ["", "   ", "apx_core=chatty", "sqlx=warn,apx_store=loud"] {
            assert!(
                matches!(lvl.parse::<LoggerLevel>(), Err(LoggerError::InvalidLevel(_))),
                "{lvl:?} must be rejected"
            );
        }
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(LoggerLevel::new(" debug ").unwrap().as_str(), "debug");
    }

    #[test]
    fn serde_roundtrip_keeps_directive() {
        let level: LoggerLevel = "sqlx=warn,info".parse().unwrap();
        let json = serde_json::to_string(&level).unwrap();
        assert_eq!(json, r#""sqlx=warn,info""#);
        assert_eq!(serde_json::from_str::<LoggerLevel>(&json).unwrap(), level);
    }

    #[test]
    fn default_is_info() {
        let level = LoggerLevel::default();
        assert_eq!(level.as_str(), "info");
        let _ = level.to_env_filter();
    }
}
