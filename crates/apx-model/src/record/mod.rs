//! Read-only rows of the orchestrator's metadata store.
//!
//! Records are plain snapshots of what the store returned; nothing in this crate writes them back.

mod task;
pub use task::{TaskFailureRecord, TaskInstanceRecord};

mod dag;
pub use dag::DagRunRecord;

mod timing;
pub use timing::SchedulerTimingRecord;

mod side_channel;
pub use side_channel::SideChannelRecord;
