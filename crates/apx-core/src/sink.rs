use std::sync::Arc;

use thiserror::Error;

use crate::snapshot::MetricSnapshot;

/// Rendered snapshot, ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exposition {
    /// Value of the `Content-Type` header.
    pub content_type: String,
    pub body: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("invalid metric '{family}': {reason}")]
    InvalidMetric { family: String, reason: String },

    #[error("failed to encode snapshot: {0}")]
    Encode(String),
}

/// Consumer of metric snapshots.
///
/// The sink owns the wire format: the core hands over a finished snapshot and never formats
/// exposition output itself. Implementations must not keep state between calls, since
/// concurrent scrapes render their snapshots in parallel.
pub trait MetricSink: Send + Sync + 'static {
    /// Render `snapshot` into its exposition form.
    fn render(&self, snapshot: &MetricSnapshot) -> Result<Exposition, SinkError>;
}

/// Shared handle to a metric sink.
pub type SinkHandle = Arc<dyn MetricSink>;
