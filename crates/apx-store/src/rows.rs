//! Raw result rows and their conversion into model records.

use apx_model::{
    DagRunRecord, DagState, ModelResult, SchedulerTimingRecord, SideChannelRecord,
    TaskFailureRecord, TaskInstanceRecord, TaskState,
};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::payload::decode_payload;

#[derive(Debug, Clone, FromRow)]
pub(crate) struct TaskInstanceRow {
    pub dag_id: String,
    pub task_id: String,
    pub run_id: String,
    pub state: Option<String>,
    pub execution_date: OffsetDateTime,
    pub start_date: Option<OffsetDateTime>,
    pub end_date: Option<OffsetDateTime>,
    pub duration: Option<f64>,
    pub owners: String,
    pub dag_active: bool,
}

impl TaskInstanceRow {
    pub fn into_record(self) -> ModelResult<TaskInstanceRecord> {
        Ok(TaskInstanceRecord {
            state: TaskState::from_column(self.state.as_deref())?,
            dag_id: self.dag_id,
            task_id: self.task_id,
            run_id: self.run_id,
            execution_date: self.execution_date,
            start_date: self.start_date,
            end_date: self.end_date,
            duration: self.duration,
            owners: self.owners,
            dag_active: self.dag_active,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct DagRunRow {
    pub dag_id: String,
    pub run_id: String,
    pub state: Option<String>,
    pub execution_date: OffsetDateTime,
    pub start_date: Option<OffsetDateTime>,
    pub end_date: Option<OffsetDateTime>,
    pub owners: String,
    pub dag_active: bool,
}

impl DagRunRow {
    pub fn into_record(self) -> ModelResult<DagRunRecord> {
        let state: DagState = self.state.as_deref().unwrap_or_default().parse()?;
        Ok(DagRunRecord {
            dag_id: self.dag_id,
            run_id: self.run_id,
            state,
            execution_date: self.execution_date,
            start_date: self.start_date,
            end_date: self.end_date,
            owners: self.owners,
            dag_active: self.dag_active,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct TaskFailureRow {
    pub dag_id: String,
    pub task_id: String,
    pub failures: i64,
    pub dag_active: bool,
}

impl TaskFailureRow {
    pub fn into_record(self) -> TaskFailureRecord {
        TaskFailureRecord {
            dag_id: self.dag_id,
            task_id: self.task_id,
            count: u64::try_from(self.failures).unwrap_or_default(),
            dag_active: self.dag_active,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct SideChannelRow {
    pub dag_id: String,
    pub task_id: String,
    pub key: String,
    pub value: Option<Vec<u8>>,
}

impl SideChannelRow {
    pub fn into_record(self) -> SideChannelRecord {
        let value = decode_payload(&self.dag_id, &self.task_id, self.value.as_deref());
        SideChannelRecord::new(self.dag_id, self.task_id, self.key, value)
    }
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct SchedulerTimingRow {
    pub dag_id: String,
    pub run_id: String,
    pub task_id: Option<String>,
    pub queue: Option<String>,
    pub logical_date: OffsetDateTime,
    pub scheduled_at: Option<OffsetDateTime>,
    pub started_at: Option<OffsetDateTime>,
}

impl SchedulerTimingRow {
    pub fn into_record(self) -> SchedulerTimingRecord {
        SchedulerTimingRecord {
            dag_id: self.dag_id,
            run_id: self.run_id,
            task_id: self.task_id,
            queue: self.queue,
            logical_date: self.logical_date,
            scheduled_at: self.scheduled_at,
            started_at: self.started_at,
        }
    }
}
