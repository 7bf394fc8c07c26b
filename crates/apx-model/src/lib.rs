mod domain;
pub use domain::{CANARY_DAG_ID, DEFAULT_CHANNEL_KEY, NO_STATUS_LABEL, WILDCARD};
pub use domain::{DagId, Labels, TaskId};

mod error;
pub use error::{ModelError, ModelResult};

mod state;
pub use state::{DagState, TaskState};

mod record;
pub use record::{
    DagRunRecord, SchedulerTimingRecord, SideChannelRecord, TaskFailureRecord, TaskInstanceRecord,
};

mod rule;
pub use rule::{ExtractionRule, Selector};
