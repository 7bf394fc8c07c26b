use time::OffsetDateTime;

use crate::{DagId, TaskId, TaskState};

/// One execution attempt of a task within a DAG run.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskInstanceRecord {
    pub dag_id: DagId,
    pub task_id: TaskId,
    pub run_id: String,
    pub state: TaskState,
    /// Logical date of the DAG run this instance belongs to.
    pub execution_date: OffsetDateTime,
    pub start_date: Option<OffsetDateTime>,
    pub end_date: Option<OffsetDateTime>,
    /// Seconds; only set once the instance reached a terminal state.
    pub duration: Option<f64>,
    /// Owners of the DAG, as stored on the DAG definition.
    pub owners: String,
    /// `true` when the owning DAG is active and not paused.
    pub dag_active: bool,
}

impl TaskInstanceRecord {
    /// Create a record for an active DAG with no timing information.
    pub fn new(
        dag_id: impl Into<DagId>,
        task_id: impl Into<TaskId>,
        run_id: impl Into<String>,
        state: TaskState,
        execution_date: OffsetDateTime,
    ) -> Self {
        Self {
            dag_id: dag_id.into(),
            task_id: task_id.into(),
            run_id: run_id.into(),
            state,
            execution_date,
            start_date: None,
            end_date: None,
            duration: None,
            owners: String::new(),
            dag_active: true,
        }
    }

    /// Set start and (optional) end timestamps.
    pub fn with_times(mut self, start: OffsetDateTime, end: Option<OffsetDateTime>) -> Self {
        self.start_date = Some(start);
        self.end_date = end;
        self.duration = end.map(|e| (e - start).as_seconds_f64());
        self
    }

    /// Set the owners string of the owning DAG.
    pub fn with_owners(mut self, owners: impl Into<String>) -> Self {
        self.owners = owners.into();
        self
    }

    /// Mark the owning DAG as inactive or paused.
    pub fn inactive(mut self) -> Self {
        self.dag_active = false;
        self
    }
}

/// Stored failure counter of one task definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskFailureRecord {
    pub dag_id: DagId,
    pub task_id: TaskId,
    pub count: u64,
    pub dag_active: bool,
}

impl TaskFailureRecord {
    pub fn new(dag_id: impl Into<DagId>, task_id: impl Into<TaskId>, count: u64) -> Self {
        Self {
            dag_id: dag_id.into(),
            task_id: task_id.into(),
            count,
            dag_active: true,
        }
    }
}
