use time::OffsetDateTime;

use crate::{DagId, TaskId};

/// Scheduling event of the canary DAG.
///
/// A row either describes a DAG run (`task_id` is `None`) or one of its task instances.
/// For runs `scheduled_at` is the logical date; for task instances it is the time the
/// instance was queued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchedulerTimingRecord {
    pub dag_id: DagId,
    pub run_id: String,
    pub task_id: Option<TaskId>,
    pub queue: Option<String>,
    /// Ordering key: logical date of the run.
    pub logical_date: OffsetDateTime,
    pub scheduled_at: Option<OffsetDateTime>,
    pub started_at: Option<OffsetDateTime>,
}

impl SchedulerTimingRecord {
    /// Timing row of a DAG run.
    pub fn dag_run(
        dag_id: impl Into<DagId>,
        run_id: impl Into<String>,
        logical_date: OffsetDateTime,
        started_at: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            dag_id: dag_id.into(),
            run_id: run_id.into(),
            task_id: None,
            queue: None,
            logical_date,
            scheduled_at: Some(logical_date),
            started_at,
        }
    }

    /// Timing row of a task instance queued on `queue`.
    pub fn task(
        dag_id: impl Into<DagId>,
        run_id: impl Into<String>,
        task_id: impl Into<TaskId>,
        queue: impl Into<String>,
        logical_date: OffsetDateTime,
        queued_at: Option<OffsetDateTime>,
        started_at: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            dag_id: dag_id.into(),
            run_id: run_id.into(),
            task_id: Some(task_id.into()),
            queue: Some(queue.into()),
            logical_date,
            scheduled_at: queued_at,
            started_at,
        }
    }

    /// `true` when the row describes a DAG run rather than a task instance.
    #[inline]
    pub fn is_dag_run(&self) -> bool {
        self.task_id.is_none()
    }
}
