use std::fmt;

/// Metric families a snapshot can contain.
///
/// Names are unprefixed; sinks add their own namespace.
///
/// ## Labels
/// - `task_status{dag_id, task_id, owner, status}`
/// - `task_duration{dag_id, task_id, execution_date}`
/// - `last_task_success_time{dag_id, task_id, execution_date}`
/// - `task_fail_count{dag_id, task_id}`
/// - `side_channel_parameter{dag_id, task_id, channel_key, field_name}`
/// - `dag_status{dag_id, owner, status}`
/// - `dag_run_duration{dag_id}`
/// - `last_dag_success_time{dag_id}`
/// - `dag_scheduler_delay{dag_id}`
/// - `task_scheduler_delay{queue}`
/// - `num_queued_tasks{}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricFamily {
    TaskStatus,
    TaskDuration,
    LastTaskSuccessTime,
    TaskFailCount,
    SideChannelParameter,
    DagStatus,
    DagRunDuration,
    LastDagSuccessTime,
    DagSchedulerDelay,
    TaskSchedulerDelay,
    NumQueuedTasks,
}

pub(crate) const LABEL_DAG_ID: &str = "dag_id";
pub(crate) const LABEL_TASK_ID: &str = "task_id";
pub(crate) const LABEL_OWNER: &str = "owner";
pub(crate) const LABEL_STATUS: &str = "status";
pub(crate) const LABEL_EXECUTION_DATE: &str = "execution_date";
pub(crate) const LABEL_CHANNEL_KEY: &str = "channel_key";
pub(crate) const LABEL_FIELD_NAME: &str = "field_name";
pub(crate) const LABEL_QUEUE: &str = "queue";

impl MetricFamily {
    pub const ALL: [MetricFamily; 11] = [
        MetricFamily::TaskStatus,
        MetricFamily::TaskDuration,
        MetricFamily::LastTaskSuccessTime,
        MetricFamily::TaskFailCount,
        MetricFamily::SideChannelParameter,
        MetricFamily::DagStatus,
        MetricFamily::DagRunDuration,
        MetricFamily::LastDagSuccessTime,
        MetricFamily::DagSchedulerDelay,
        MetricFamily::TaskSchedulerDelay,
        MetricFamily::NumQueuedTasks,
    ];

    /// Metric name without namespace.
    pub fn name(&self) -> &'static str {
        match self {
            MetricFamily::TaskStatus => "task_status",
            MetricFamily::TaskDuration => "task_duration",
            MetricFamily::LastTaskSuccessTime => "last_task_success_time",
            MetricFamily::TaskFailCount => "task_fail_count",
            MetricFamily::SideChannelParameter => "side_channel_parameter",
            MetricFamily::DagStatus => "dag_status",
            MetricFamily::DagRunDuration => "dag_run_duration",
            MetricFamily::LastDagSuccessTime => "last_dag_success_time",
            MetricFamily::DagSchedulerDelay => "dag_scheduler_delay",
            MetricFamily::TaskSchedulerDelay => "task_scheduler_delay",
            MetricFamily::NumQueuedTasks => "num_queued_tasks",
        }
    }

    /// Help text for exposition.
    pub fn help(&self) -> &'static str {
        match self {
            MetricFamily::TaskStatus => "Number of task instances with a particular status",
            MetricFamily::TaskDuration => "Duration of running tasks in seconds",
            MetricFamily::LastTaskSuccessTime => "Elapsed time in seconds since last task success",
            MetricFamily::TaskFailCount => "Count of failed tasks",
            MetricFamily::SideChannelParameter => "Numeric field published by a task on a side channel",
            MetricFamily::DagStatus => "Number of DAG runs with a particular status",
            MetricFamily::DagRunDuration => "Duration of running DAG runs in seconds",
            MetricFamily::LastDagSuccessTime => "Elapsed time in seconds since last DAG success",
            MetricFamily::DagSchedulerDelay => "Canary DAG scheduling delay in seconds",
            MetricFamily::TaskSchedulerDelay => "Canary task scheduling delay in seconds",
            MetricFamily::NumQueuedTasks => "Number of queued task instances",
        }
    }

    /// Ordered label names every sample of this family carries.
    pub fn label_names(&self) -> &'static [&'static str] {
        match self {
            MetricFamily::TaskStatus => &[LABEL_DAG_ID, LABEL_TASK_ID, LABEL_OWNER, LABEL_STATUS],
            MetricFamily::TaskDuration | MetricFamily::LastTaskSuccessTime => {
                &[LABEL_DAG_ID, LABEL_TASK_ID, LABEL_EXECUTION_DATE]
            }
            MetricFamily::TaskFailCount => &[LABEL_DAG_ID, LABEL_TASK_ID],
            MetricFamily::SideChannelParameter => {
                &[LABEL_DAG_ID, LABEL_TASK_ID, LABEL_CHANNEL_KEY, LABEL_FIELD_NAME]
            }
            MetricFamily::DagStatus => &[LABEL_DAG_ID, LABEL_OWNER, LABEL_STATUS],
            MetricFamily::DagRunDuration
            | MetricFamily::LastDagSuccessTime
            | MetricFamily::DagSchedulerDelay => &[LABEL_DAG_ID],
            MetricFamily::TaskSchedulerDelay => &[LABEL_QUEUE],
            MetricFamily::NumQueuedTasks => &[],
        }
    }
}

impl fmt::Display for MetricFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
