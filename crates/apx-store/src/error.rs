use apx_core::StoreError;

/// Classify a driver error.
///
/// Transport failures and pool exhaustion mean the store could not be reached at all;
/// everything else is reported as a failed query.
pub fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Unreachable(err.to_string()),
        other => StoreError::Query(other.to_string()),
    }
}
