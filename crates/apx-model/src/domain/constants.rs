//! Well-known identifiers shared by the model, the core and the daemon config.

/// Selector value that matches every task id or every payload field.
pub const WILDCARD: &str = "all";

/// Side-channel key used when an extraction rule does not name one.
///
/// Matches the key under which the orchestrator stores a task's return value.
pub const DEFAULT_CHANNEL_KEY: &str = "return_value";

/// Default id of the canary DAG used for scheduler delay metrics.
pub const CANARY_DAG_ID: &str = "canary_dag";

/// Label value reported for task instances that have no state yet.
pub const NO_STATUS_LABEL: &str = "none";
