use std::time::Duration;

use async_trait::async_trait;
use sqlx::{
    PgPool,
    postgres::{PgPoolOptions, PgRow},
};
use tracing::{debug, warn};

use apx_core::{MetadataStore, StoreResult};
use apx_model::{
    DagRunRecord, ModelResult, SchedulerTimingRecord, SideChannelRecord, TaskFailureRecord,
    TaskInstanceRecord,
};

use crate::error::store_error;
use crate::queries;
use crate::rows::{
    DagRunRow, SchedulerTimingRow, SideChannelRow, TaskFailureRow, TaskInstanceRow,
};

/// Connection pool sizing.
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Upper bound of concurrently open connections.
    pub max_connections: u32,
    /// How long a query waits for a free connection before the store counts as unreachable.
    pub acquire_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// [`MetadataStore`] backed by a PostgreSQL connection pool.
///
/// Connections are borrowed for a single `fetch_all` and returned to the pool right after,
/// so concurrent scrapes share the pool without holding each other up.
#[derive(Debug, Clone)]
pub struct PgMetadataStore {
    pool: PgPool,
}

impl PgMetadataStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a store whose connections are opened on first use.
    ///
    /// Fails only if `url` is malformed; an unreachable database surfaces later as
    /// per-query [`apx_core::StoreError::Unreachable`] failures.
    pub fn connect_lazy(url: &str, opts: &PoolOptions) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(opts.max_connections)
            .acquire_timeout(opts.acquire_timeout)
            .connect_lazy(url)
            .map_err(store_error)?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip a trivial query to verify the database is reachable.
    pub async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(store_error)
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn fetch<T>(&self, sql: &str) -> StoreResult<Vec<T>>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        sqlx::query_as::<_, T>(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)
    }
}

#[async_trait]
impl MetadataStore for PgMetadataStore {
    async fn task_instances(&self) -> StoreResult<Vec<TaskInstanceRecord>> {
        let rows: Vec<TaskInstanceRow> = self.fetch(queries::TASK_INSTANCES).await?;
        Ok(keep_known("task_instance", rows, TaskInstanceRow::into_record))
    }

    async fn dag_runs(&self) -> StoreResult<Vec<DagRunRecord>> {
        let rows: Vec<DagRunRow> = self.fetch(queries::DAG_RUNS).await?;
        Ok(keep_known("dag_run", rows, DagRunRow::into_record))
    }

    async fn task_failures(&self) -> StoreResult<Vec<TaskFailureRecord>> {
        let rows: Vec<TaskFailureRow> = self.fetch(queries::TASK_FAILURES).await?;
        Ok(rows.into_iter().map(TaskFailureRow::into_record).collect())
    }

    async fn side_channel_records(&self) -> StoreResult<Vec<SideChannelRecord>> {
        let rows: Vec<SideChannelRow> = self.fetch(queries::SIDE_CHANNEL).await?;
        Ok(rows.into_iter().map(SideChannelRow::into_record).collect())
    }

    async fn scheduler_timings(
        &self,
        canary_dag_id: &str,
    ) -> StoreResult<Vec<SchedulerTimingRecord>> {
        let rows = sqlx::query_as::<_, SchedulerTimingRow>(queries::SCHEDULER_TIMINGS)
            .bind(canary_dag_id)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;
        debug!(canary_dag_id, rows = rows.len(), "scheduler timings fetched");
        Ok(rows.into_iter().map(SchedulerTimingRow::into_record).collect())
    }
}

/// Convert rows, dropping the ones whose state the model does not know.
fn keep_known<R, T>(table: &'static str, rows: Vec<R>, convert: fn(R) -> ModelResult<T>) -> Vec<T> {
    let total = rows.len();
    let records: Vec<T> = rows
        .into_iter()
        .filter_map(|row| match convert(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(table, error = %e, "skipping row");
                None
            }
        })
        .collect();
    debug!(table, rows = total, kept = records.len(), "rows fetched");
    records
}
