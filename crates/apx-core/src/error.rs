use std::time::Duration;

use thiserror::Error;

/// Failure of a single metadata store query.
///
/// An empty result is not a failure: queries that match no rows return `Ok(vec![])`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("metadata store unreachable: {0}")]
    Unreachable(String),

    #[error("metadata query timed out after {0:?}")]
    Timeout(Duration),

    #[error("metadata query failed: {0}")]
    Query(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Reason a data source contributed nothing (or only part) to a snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("canary dag '{dag_id}' has no usable scheduler data: {reason}")]
    MissingCanaryData { dag_id: String, reason: String },
}
