//! Read-only query façade over the orchestrator's metadata store.

use std::fmt;

use async_trait::async_trait;

use apx_model::{
    DagRunRecord, SchedulerTimingRecord, SideChannelRecord, TaskFailureRecord, TaskInstanceRecord,
};

use crate::error::StoreResult;

mod memory;
pub use memory::MemoryStore;

/// Entity classes the snapshot is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataSource {
    TaskInstances,
    DagRuns,
    TaskFailures,
    SideChannel,
    SchedulerTimings,
}

impl DataSource {
    /// Return label value for logs and metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            DataSource::TaskInstances => "task_instances",
            DataSource::DagRuns => "dag_runs",
            DataSource::TaskFailures => "task_failures",
            DataSource::SideChannel => "side_channel",
            DataSource::SchedulerTimings => "scheduler_timings",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Metadata store query interface.
///
/// One operation per entity class. Implementations return raw rows and never interpret them:
/// filtering by DAG activity, grouping and time arithmetic happen in the snapshot assembler.
///
/// Every call is an independent read. Implementations must not keep a connection or a
/// transaction open once the returned future completes or is dropped.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// All task instances, joined with the owning DAG's owners and activity flag.
    async fn task_instances(&self) -> StoreResult<Vec<TaskInstanceRecord>>;

    /// All DAG runs, joined with the owning DAG's owners and activity flag.
    async fn dag_runs(&self) -> StoreResult<Vec<DagRunRecord>>;

    /// Failure counters per task definition.
    async fn task_failures(&self) -> StoreResult<Vec<TaskFailureRecord>>;

    /// Side-channel records published by the latest run of each DAG.
    async fn side_channel_records(&self) -> StoreResult<Vec<SideChannelRecord>>;

    /// Scheduling events (runs and task instances) of the canary DAG.
    async fn scheduler_timings(
        &self,
        canary_dag_id: &str,
    ) -> StoreResult<Vec<SchedulerTimingRecord>>;
}
