mod labels;
pub use labels::Labels;

mod constants;
pub use constants::{CANARY_DAG_ID, DEFAULT_CHANNEL_KEY, NO_STATUS_LABEL, WILDCARD};

/// Identifier of a workflow definition (DAG).
pub type DagId = String;

/// Identifier of a task inside a DAG.
///
/// Task ids are only unique within their DAG.
pub type TaskId = String;
