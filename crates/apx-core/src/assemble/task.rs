//! Task-level families derived from task instance and task failure rows.

use std::collections::BTreeMap;

use apx_model::{Labels, TaskFailureRecord, TaskInstanceRecord, TaskState};
use time::OffsetDateTime;

use crate::snapshot::family::{
    LABEL_DAG_ID, LABEL_EXECUTION_DATE, LABEL_OWNER, LABEL_STATUS, LABEL_TASK_ID,
};
use crate::snapshot::{MetricFamily, MetricSample};

/// `task_status`: number of instances per (task, state).
///
/// With `fill_known_states` every known state is reported for each observed task,
/// unseen ones with value 0.
pub(crate) fn status(rows: &[TaskInstanceRecord], fill_known_states: bool) -> Vec<MetricSample> {
    let mut by_task: BTreeMap<(&str, &str), (&str, BTreeMap<TaskState, u64>)> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.dag_active) {
        let (_, counts) = by_task
            .entry((row.dag_id.as_str(), row.task_id.as_str()))
            .or_insert_with(|| (row.owners.as_str(), BTreeMap::new()));
        *counts.entry(row.state).or_default() += 1;
    }

    let mut samples = Vec::new();
    for ((dag_id, task_id), (owner, counts)) in by_task {
        let labels = Labels::new()
            .with(LABEL_DAG_ID, dag_id)
            .with(LABEL_TASK_ID, task_id)
            .with(LABEL_OWNER, owner);

        let states: Vec<(TaskState, u64)> = if fill_known_states {
            TaskState::ALL
                .iter()
                .map(|s| (*s, counts.get(s).copied().unwrap_or(0)))
                .collect()
        } else {
            counts.into_iter().collect()
        };

        for (state, count) in states {
            samples.push(MetricSample::new(
                MetricFamily::TaskStatus,
                labels.clone().with(LABEL_STATUS, state.as_label()),
                count as f64,
            ));
        }
    }
    samples
}

/// `task_duration`: seconds each running instance has been running at `now`.
pub(crate) fn duration(rows: &[TaskInstanceRecord], now: OffsetDateTime) -> Vec<MetricSample> {
    rows.iter()
        .filter(|r| r.dag_active && r.state == TaskState::Running)
        .filter_map(|r| {
            let start = r.start_date?;
            Some(MetricSample::new(
                MetricFamily::TaskDuration,
                instance_labels(r),
                (now - start).as_seconds_f64(),
            ))
        })
        .collect()
}

/// `last_task_success_time`: seconds since each task last finished successfully.
pub(crate) fn last_success(rows: &[TaskInstanceRecord], now: OffsetDateTime) -> Vec<MetricSample> {
    let mut latest: BTreeMap<(&str, &str), (&TaskInstanceRecord, OffsetDateTime)> =
        BTreeMap::new();
    for row in rows
        .iter()
        .filter(|r| r.dag_active && r.state == TaskState::Success)
    {
        let Some(end) = row.end_date else {
            continue;
        };
        let key = (row.dag_id.as_str(), row.task_id.as_str());
        if latest.get(&key).is_none_or(|(_, cur)| end > *cur) {
            latest.insert(key, (row, end));
        }
    }

    latest
        .into_values()
        .map(|(row, end)| {
            MetricSample::new(
                MetricFamily::LastTaskSuccessTime,
                instance_labels(row),
                (now - end).as_seconds_f64(),
            )
        })
        .collect()
}

/// `num_queued_tasks`: queued instances across every DAG, paused or not.
pub(crate) fn queued(rows: &[TaskInstanceRecord]) -> Vec<MetricSample> {
    let count = rows.iter().filter(|r| r.state == TaskState::Queued).count();
    vec![MetricSample::new(
        MetricFamily::NumQueuedTasks,
        Labels::new(),
        count as f64,
    )]
}

/// `task_fail_count`: stored failure counter per task.
pub(crate) fn fail_count(rows: &[TaskFailureRecord]) -> Vec<MetricSample> {
    rows.iter()
        .filter(|r| r.dag_active)
        .map(|r| {
            MetricSample::new(
                MetricFamily::TaskFailCount,
                Labels::new()
                    .with(LABEL_DAG_ID, r.dag_id.as_str())
                    .with(LABEL_TASK_ID, r.task_id.as_str()),
                r.count as f64,
            )
        })
        .collect()
}

fn instance_labels(row: &TaskInstanceRecord) -> Labels {
    Labels::new()
        .with(LABEL_DAG_ID, row.dag_id.as_str())
        .with(LABEL_TASK_ID, row.task_id.as_str())
        .with(LABEL_EXECUTION_DATE, row.execution_date.date().to_string())
}
