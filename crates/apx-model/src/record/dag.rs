use time::OffsetDateTime;

use crate::{DagId, DagState};

/// One run of a DAG.
#[derive(Clone, Debug, PartialEq)]
pub struct DagRunRecord {
    pub dag_id: DagId,
    pub run_id: String,
    pub state: DagState,
    /// Logical date the run was scheduled for.
    pub execution_date: OffsetDateTime,
    pub start_date: Option<OffsetDateTime>,
    pub end_date: Option<OffsetDateTime>,
    pub owners: String,
    pub dag_active: bool,
}

impl DagRunRecord {
    /// Create a run of an active DAG with no start or end timestamps.
    pub fn new(
        dag_id: impl Into<DagId>,
        run_id: impl Into<String>,
        state: DagState,
        execution_date: OffsetDateTime,
    ) -> Self {
        Self {
            dag_id: dag_id.into(),
            run_id: run_id.into(),
            state,
            execution_date,
            start_date: None,
            end_date: None,
            owners: String::new(),
            dag_active: true,
        }
    }

    pub fn with_times(mut self, start: OffsetDateTime, end: Option<OffsetDateTime>) -> Self {
        self.start_date = Some(start);
        self.end_date = end;
        self
    }

    pub fn with_owners(mut self, owners: impl Into<String>) -> Self {
        self.owners = owners.into();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.dag_active = false;
        self
    }
}
