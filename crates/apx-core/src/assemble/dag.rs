//! DAG-level families derived from DAG run rows.

use std::collections::BTreeMap;

use apx_model::{DagRunRecord, DagState, Labels};
use time::OffsetDateTime;

use crate::snapshot::family::{LABEL_DAG_ID, LABEL_OWNER, LABEL_STATUS};
use crate::snapshot::{MetricFamily, MetricSample};

/// `dag_status`: number of runs per (DAG, state).
pub(crate) fn status(rows: &[DagRunRecord], fill_known_states: bool) -> Vec<MetricSample> {
    let mut by_dag: BTreeMap<&str, (&str, BTreeMap<DagState, u64>)> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.dag_active) {
        let (_, counts) = by_dag
            .entry(row.dag_id.as_str())
            .or_insert_with(|| (row.owners.as_str(), BTreeMap::new()));
        *counts.entry(row.state).or_default() += 1;
    }

    let mut samples = Vec::new();
    for (dag_id, (owner, counts)) in by_dag {
        let labels = Labels::new()
            .with(LABEL_DAG_ID, dag_id)
            .with(LABEL_OWNER, owner);

        let states: Vec<(DagState, u64)> = if fill_known_states {
            DagState::ALL
                .iter()
                .map(|s| (*s, counts.get(s).copied().unwrap_or(0)))
                .collect()
        } else {
            counts.into_iter().collect()
        };

        for (state, count) in states {
            samples.push(MetricSample::new(
                MetricFamily::DagStatus,
                labels.clone().with(LABEL_STATUS, state.as_label()),
                count as f64,
            ));
        }
    }
    samples
}

/// `dag_run_duration`: seconds the most recent running run of each DAG has been running.
pub(crate) fn run_duration(rows: &[DagRunRecord], now: OffsetDateTime) -> Vec<MetricSample> {
    let mut latest: BTreeMap<&str, &DagRunRecord> = BTreeMap::new();
    for row in rows
        .iter()
        .filter(|r| r.dag_active && r.state == DagState::Running && r.start_date.is_some())
    {
        if latest
            .get(row.dag_id.as_str())
            .is_none_or(|cur| row.execution_date > cur.execution_date)
        {
            latest.insert(row.dag_id.as_str(), row);
        }
    }

    latest
        .into_iter()
        .filter_map(|(dag_id, row)| {
            let start = row.start_date?;
            Some(MetricSample::new(
                MetricFamily::DagRunDuration,
                Labels::new().with(LABEL_DAG_ID, dag_id),
                (now - start).as_seconds_f64(),
            ))
        })
        .collect()
}

/// `last_dag_success_time`: seconds since each DAG's latest successful run ended.
pub(crate) fn last_success(rows: &[DagRunRecord], now: OffsetDateTime) -> Vec<MetricSample> {
    let mut latest: BTreeMap<&str, OffsetDateTime> = BTreeMap::new();
    for row in rows
        .iter()
        .filter(|r| r.dag_active && r.state == DagState::Success)
    {
        let Some(end) = row.end_date else {
            continue;
        };
        let cur = latest.entry(row.dag_id.as_str()).or_insert(end);
        if end > *cur {
            *cur = end;
        }
    }

    latest
        .into_iter()
        .map(|(dag_id, end)| {
            MetricSample::new(
                MetricFamily::LastDagSuccessTime,
                Labels::new().with(LABEL_DAG_ID, dag_id),
                (now - end).as_seconds_f64(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::{Duration, macros::datetime};

    use super::*;

    const NOW: OffsetDateTime = datetime!(2024-03-01 12:00 UTC);

    fn run(dag: &str, run_id: &str, state: DagState, hours_ago: i64) -> DagRunRecord {
        DagRunRecord::new(dag, run_id, state, NOW - Duration::hours(hours_ago)).with_owners("ops")
    }

    #[test]
    fn status_counts_runs_per_state() {
        let rows = vec![
            run("etl", "r1", DagState::Success, 3),
            run("etl", "r2", DagState::Success, 2),
            run("etl", "r3", DagState::Running, 1),
            run("report", "r1", DagState::Failed, 1),
        ];

        let samples = status(&rows, false);
        assert_eq!(samples.len(), 3);
        let etl_success = samples
            .iter()
            .find(|s| s.label("dag_id") == Some("etl") && s.label("status") == Some("success"))
            .unwrap();
        assert_eq!(etl_success.value(), 2.0);
        assert_eq!(etl_success.label("owner"), Some("ops"));
    }

    #[test]
    fn status_fill_reports_all_dag_states() {
        let samples = status(&[run("etl", "r1", DagState::Queued, 1)], true);
        assert_eq!(samples.len(), DagState::ALL.len());
        let total: f64 = samples.iter().map(|s| s.value()).sum();
        assert_eq!(total, 1.0);
    }

    #[test]
    fn run_duration_tracks_latest_running_run() {
        let older = run("etl", "r1", DagState::Running, 5).with_times(NOW - Duration::hours(5), None);
        let newer = run("etl", "r2", DagState::Running, 1).with_times(NOW - Duration::minutes(20), None);
        let not_started = run("etl", "r3", DagState::Running, 0);

        let samples = run_duration(&[older, newer, not_started], NOW);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value(), 1200.0);
    }

    #[test]
    fn last_success_ignores_unfinished_and_paused() {
        let done = run("etl", "r1", DagState::Success, 2)
            .with_times(NOW - Duration::hours(2), Some(NOW - Duration::seconds(90)));
        let unfinished = run("etl", "r2", DagState::Success, 1);
        let paused = run("old", "r1", DagState::Success, 1)
            .with_times(NOW - Duration::hours(1), Some(NOW))
            .inactive();

        let samples = last_success(&[done, unfinished, paused], NOW);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value(), 90.0);
    }
}
