use std::{fmt, str::FromStr};

use crate::domain::NO_STATUS_LABEL;
use crate::error::{ModelError, ModelResult};

/// State of a single task instance as stored by the orchestrator.
///
/// `NoStatus` stands for the `NULL` state of an instance that was created but never scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskState {
    NoStatus,
    Removed,
    Scheduled,
    Queued,
    Running,
    Success,
    Shutdown,
    Restarting,
    Failed,
    UpForRetry,
    UpForReschedule,
    UpstreamFailed,
    Skipped,
    Deferred,
}

impl TaskState {
    /// Every state the orchestrator can assign to a task instance.
    pub const ALL: [TaskState; 14] = [
        TaskState::NoStatus,
        TaskState::Removed,
        TaskState::Scheduled,
        TaskState::Queued,
        TaskState::Running,
        TaskState::Success,
        TaskState::Shutdown,
        TaskState::Restarting,
        TaskState::Failed,
        TaskState::UpForRetry,
        TaskState::UpForReschedule,
        TaskState::UpstreamFailed,
        TaskState::Skipped,
        TaskState::Deferred,
    ];

    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskState::NoStatus => NO_STATUS_LABEL,
            TaskState::Removed => "removed",
            TaskState::Scheduled => "scheduled",
            TaskState::Queued => "queued",
            TaskState::Running => "running",
            TaskState::Success => "success",
            TaskState::Shutdown => "shutdown",
            TaskState::Restarting => "restarting",
            TaskState::Failed => "failed",
            TaskState::UpForRetry => "up_for_retry",
            TaskState::UpForReschedule => "up_for_reschedule",
            TaskState::UpstreamFailed => "upstream_failed",
            TaskState::Skipped => "skipped",
            TaskState::Deferred => "deferred",
        }
    }

    /// Parse a nullable state column.
    pub fn from_column(value: Option<&str>) -> ModelResult<Self> {
        match value {
            None => Ok(TaskState::NoStatus),
            Some(s) => s.parse(),
        }
    }
}

impl FromStr for TaskState {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        let norm = s.trim().to_ascii_lowercase();
        TaskState::ALL
            .iter()
            .copied()
            .find(|state| state.as_label() == norm)
            .ok_or_else(|| ModelError::UnknownTaskState(s.to_string()))
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
