mod task;
pub use task::TaskState;

mod dag;
pub use dag::DagState;
