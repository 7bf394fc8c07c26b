use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

use super::LoggerError;

/// Zone used for log timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LoggerTimeZone {
    #[default]
    Utc,
    /// System zone, detected once when the logger is installed.
    Local,
}

impl LoggerTimeZone {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggerTimeZone::Utc => "utc",
            LoggerTimeZone::Local => "local",
        }
    }

    /// Offset for this zone; UTC when the local offset cannot be determined.
    pub fn offset(&self) -> UtcOffset {
        match self {
            LoggerTimeZone::Utc => UtcOffset::UTC,
            LoggerTimeZone::Local => UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        }
    }
}

impl FromStr for LoggerTimeZone {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(LoggerError::InvalidTimeZone(s.to_string())),
        }
    }
}

impl TryFrom<String> for LoggerTimeZone {
    type Error = LoggerError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LoggerTimeZone> for String {
    fn from(tz: LoggerTimeZone) -> Self {
        tz.as_str().to_string()
    }
}

impl fmt::Display for LoggerTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RFC 3339 event timestamps at a fixed offset.
#[derive(Debug, Clone, Copy)]
pub struct LoggerTimestamp {
    offset: UtcOffset,
}

impl LoggerTimestamp {
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    pub fn for_zone(tz: LoggerTimeZone) -> Self {
        Self::new(tz.offset())
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    fn render(&self, at: OffsetDateTime) -> String {
        at.to_offset(self.offset)
            .format(&Rfc3339)
            .unwrap_or_else(|_| "<invalid-time>".to_string())
    }
}

impl FormatTime for LoggerTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{} ", self.render(OffsetDateTime::now_utc()))
    }
}
