use std::collections::BTreeMap;

use async_trait::async_trait;

use apx_model::{
    DagRunRecord, SchedulerTimingRecord, SideChannelRecord, TaskFailureRecord, TaskInstanceRecord,
};

use crate::error::{StoreError, StoreResult};
use crate::store::{DataSource, MetadataStore};

/// In-memory [`MetadataStore`] holding fixed rows.
///
/// Used by tests and local demos. Any data source can be switched to fail with a given error.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    task_instances: Vec<TaskInstanceRecord>,
    dag_runs: Vec<DagRunRecord>,
    task_failures: Vec<TaskFailureRecord>,
    side_channel: Vec<SideChannelRecord>,
    timings: Vec<SchedulerTimingRecord>,
    failures: BTreeMap<DataSource, StoreError>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_task_instances(mut self, rows: Vec<TaskInstanceRecord>) -> Self {
        self.task_instances = rows;
        self
    }

    pub fn with_dag_runs(mut self, rows: Vec<DagRunRecord>) -> Self {
        self.dag_runs = rows;
        self
    }

    pub fn with_task_failures(mut self, rows: Vec<TaskFailureRecord>) -> Self {
        self.task_failures = rows;
        self
    }

    pub fn with_side_channel(mut self, rows: Vec<SideChannelRecord>) -> Self {
        self.side_channel = rows;
        self
    }

    pub fn with_timings(mut self, rows: Vec<SchedulerTimingRecord>) -> Self {
        self.timings = rows;
        self
    }

    /// Make every query of `source` fail with `err`.
    pub fn failing(mut self, source: DataSource, err: StoreError) -> Self {
        self.failures.insert(source, err);
        self
    }

    fn read<T: Clone>(&self, source: DataSource, rows: &[T]) -> StoreResult<Vec<T>> {
        match self.failures.get(&source) {
            Some(err) => Err(err.clone()),
            None => Ok(rows.to_vec()),
        }
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn task_instances(&self) -> StoreResult<Vec<TaskInstanceRecord>> {
        self.read(DataSource::TaskInstances, &self.task_instances)
    }

    async fn dag_runs(&self) -> StoreResult<Vec<DagRunRecord>> {
        self.read(DataSource::DagRuns, &self.dag_runs)
    }

    async fn task_failures(&self) -> StoreResult<Vec<TaskFailureRecord>> {
        self.read(DataSource::TaskFailures, &self.task_failures)
    }

    async fn side_channel_records(&self) -> StoreResult<Vec<SideChannelRecord>> {
        self.read(DataSource::SideChannel, &self.side_channel)
    }

    async fn scheduler_timings(
        &self,
        canary_dag_id: &str,
    ) -> StoreResult<Vec<SchedulerTimingRecord>> {
        let rows = self.read(DataSource::SchedulerTimings, &self.timings)?;
        Ok(rows
            .into_iter()
            .filter(|r| r.dag_id == canary_dag_id)
            .collect())
    }
}
