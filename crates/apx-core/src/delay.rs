//! Scheduler delay of the canary DAG.
//!
//! The canary is a trivial DAG whose only purpose is to be scheduled often; how late its runs
//! and task instances start compared to when they became eligible is the scheduler's delay.

use std::collections::BTreeMap;

use apx_model::{Labels, SchedulerTimingRecord};
use time::OffsetDateTime;

use crate::error::SnapshotError;
use crate::snapshot::family::{LABEL_DAG_ID, LABEL_QUEUE};
use crate::snapshot::{MetricFamily, MetricSample};

/// Result of pairing a scheduled timestamp with a start timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DelayOutcome {
    /// Seconds between scheduling and start.
    Delay(f64),
    /// Not started yet; nothing to report this cycle.
    NotStarted,
    /// Started but never scheduled, which the canary must never be.
    Unscheduled,
}

/// Delay between `scheduled` and `started`.
pub fn scheduler_delay(
    scheduled: Option<OffsetDateTime>,
    started: Option<OffsetDateTime>,
) -> DelayOutcome {
    match (scheduled, started) {
        (_, None) => DelayOutcome::NotStarted,
        (None, Some(_)) => DelayOutcome::Unscheduled,
        (Some(scheduled), Some(started)) => {
            DelayOutcome::Delay((started - scheduled).as_seconds_f64())
        }
    }
}

/// Delay samples derived from the canary's timing rows.
#[derive(Debug, Default)]
pub struct CanaryDelays {
    /// `dag_scheduler_delay` samples (at most one).
    pub dag: Vec<MetricSample>,
    /// `task_scheduler_delay` samples, one per queue.
    pub task: Vec<MetricSample>,
    /// Rows that could not be turned into a delay.
    pub problems: Vec<SnapshotError>,
}

/// Compute delay samples for `canary_dag_id`.
///
/// - DAG delay: the run with the latest logical date.
/// - Task delay: per queue, the queued task instance that started last. Instances that
///   never passed through the queue are ignored.
///
/// Fails with [`SnapshotError::MissingCanaryData`] when the canary has no rows at all.
pub fn canary_delays(
    canary_dag_id: &str,
    rows: &[SchedulerTimingRecord],
) -> Result<CanaryDelays, SnapshotError> {
    let rows: Vec<_> = rows.iter().filter(|r| r.dag_id == canary_dag_id).collect();
    if rows.is_empty() {
        return Err(missing(canary_dag_id, "canary dag has no runs"));
    }

    let mut out = CanaryDelays::default();

    let latest_run = rows
        .iter()
        .filter(|r| r.is_dag_run())
        .max_by_key(|r| r.logical_date);
    match latest_run {
        Some(run) => match scheduler_delay(run.scheduled_at, run.started_at) {
            DelayOutcome::Delay(secs) => out.dag.push(MetricSample::new(
                MetricFamily::DagSchedulerDelay,
                Labels::new().with(LABEL_DAG_ID, canary_dag_id),
                secs,
            )),
            DelayOutcome::NotStarted => {}
            DelayOutcome::Unscheduled => out.problems.push(missing(
                canary_dag_id,
                &format!("run '{}' has no scheduled timestamp", run.run_id),
            )),
        },
        None => out
            .problems
            .push(missing(canary_dag_id, "canary dag has task instances but no runs")),
    }

    let mut latest_by_queue: BTreeMap<&str, (OffsetDateTime, OffsetDateTime)> = BTreeMap::new();
    for row in rows.iter().filter(|r| !r.is_dag_run()) {
        let (Some(queued), Some(started)) = (row.scheduled_at, row.started_at) else {
            continue;
        };
        let queue = row.queue.as_deref().unwrap_or_default();
        let newer = latest_by_queue
            .get(queue)
            .is_none_or(|&(_, cur_started)| started >= cur_started);
        if newer {
            latest_by_queue.insert(queue, (queued, started));
        }
    }

    for (queue, (queued, started)) in latest_by_queue {
        out.task.push(MetricSample::new(
            MetricFamily::TaskSchedulerDelay,
            Labels::new().with(LABEL_QUEUE, queue),
            (started - queued).as_seconds_f64(),
        ));
    }

    Ok(out)
}

fn missing(dag_id: &str, reason: &str) -> SnapshotError {
    SnapshotError::MissingCanaryData {
        dag_id: dag_id.to_string(),
        reason: reason.to_string(),
    }
}
