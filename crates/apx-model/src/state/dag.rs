use std::{fmt, str::FromStr};

use crate::error::{ModelError, ModelResult};

/// State of a DAG run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DagState {
    Queued,
    Running,
    Success,
    Failed,
}

impl DagState {
    /// Every state the orchestrator can assign to a DAG run.
    pub const ALL: [DagState; 4] = [
        DagState::Queued,
        DagState::Running,
        DagState::Success,
        DagState::Failed,
    ];

    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            DagState::Queued => "queued",
            DagState::Running => "running",
            DagState::Success => "success",
            DagState::Failed => "failed",
        }
    }
}

impl FromStr for DagState {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queued" => Ok(DagState::Queued),
            "running" => Ok(DagState::Running),
            "success" => Ok(DagState::Success),
            "failed" => Ok(DagState::Failed),
            _ => Err(ModelError::UnknownDagState(s.to_string())),
        }
    }
}

impl fmt::Display for DagState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
