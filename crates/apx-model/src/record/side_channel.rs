use serde_json::{Map, Value};

use crate::{DagId, TaskId};

/// Key/value payload a task published on a side channel.
///
/// The payload is authored by arbitrary task code. It is expected to be a flat JSON object
/// of numeric fields but nothing guarantees that; consumers must check every field.
#[derive(Clone, Debug, PartialEq)]
pub struct SideChannelRecord {
    pub dag_id: DagId,
    pub task_id: TaskId,
    pub channel_key: String,
    pub value: Value,
}

impl SideChannelRecord {
    pub fn new(
        dag_id: impl Into<DagId>,
        task_id: impl Into<TaskId>,
        channel_key: impl Into<String>,
        value: Value,
    ) -> Self {
        Self {
            dag_id: dag_id.into(),
            task_id: task_id.into(),
            channel_key: channel_key.into(),
            value,
        }
    }

    /// Payload as a field mapping, or `None` when it is not a JSON object.
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.value.as_object()
    }

    /// Numeric value of `field`, if present and numeric.
    pub fn numeric_field(&self, field: &str) -> Option<f64> {
        self.fields()?.get(field)?.as_f64()
    }
}
