use std::{future::Future, sync::Arc, time::Duration};

use apx_model::{CANARY_DAG_ID, ExtractionRule};
use time::OffsetDateTime;
use tracing::debug;

use crate::delay::canary_delays;
use crate::error::{SnapshotError, StoreError, StoreResult};
use crate::extract::extract;
use crate::snapshot::{MetricFamily, MetricSnapshot, SnapshotBuilder};
use crate::store::{DataSource, MetadataStore};

mod dag;
mod task;

/// Default deadline for a single metadata query.
const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Tunables of the snapshot assembler.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// DAG whose runs measure scheduler delay.
    pub canary_dag_id: String,
    /// Deadline for each metadata query; exceeding it fails that source only.
    pub query_timeout: Duration,
    /// Report every known state (0 for unseen ones) for each observed task and DAG.
    pub fill_known_states: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            canary_dag_id: CANARY_DAG_ID.to_string(),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            fill_known_states: false,
        }
    }
}

/// Builds one [`MetricSnapshot`] per scrape.
///
/// Holds only the immutable extraction rules and config; the store handle is passed to
/// every call, so nothing is shared between scrapes.
#[derive(Debug, Clone)]
pub struct SnapshotAssembler {
    rules: Arc<[ExtractionRule]>,
    config: SnapshotConfig,
}

impl SnapshotAssembler {
    pub fn new(rules: Vec<ExtractionRule>, config: SnapshotConfig) -> Self {
        Self {
            rules: rules.into(),
            config,
        }
    }

    /// Scrape `store` using the current time as the snapshot timestamp.
    pub async fn scrape<S>(&self, store: &S) -> MetricSnapshot
    where
        S: MetadataStore + ?Sized,
    {
        self.assemble(store, OffsetDateTime::now_utc()).await
    }

    /// Scrape `store`, computing every time delta against `now`.
    ///
    /// All queries run concurrently and the snapshot is built only after each of them has
    /// completed, failed or timed out. Dropping the returned future cancels the queries
    /// still in flight.
    pub async fn assemble<S>(&self, store: &S, now: OffsetDateTime) -> MetricSnapshot
    where
        S: MetadataStore + ?Sized,
    {
        let limit = self.config.query_timeout;
        let (task_instances, dag_runs, task_failures, side_channel, timings) = tokio::join!(
            bounded(limit, store.task_instances()),
            bounded(limit, store.dag_runs()),
            bounded(limit, store.task_failures()),
            bounded(limit, store.side_channel_records()),
            bounded(limit, store.scheduler_timings(&self.config.canary_dag_id)),
        );

        let fill = self.config.fill_known_states;
        let mut snapshot = SnapshotBuilder::new(now);

        match task_instances {
            Ok(rows) => {
                snapshot
                    .family(MetricFamily::TaskStatus, task::status(&rows, fill))
                    .family(MetricFamily::TaskDuration, task::duration(&rows, now))
                    .family(
                        MetricFamily::LastTaskSuccessTime,
                        task::last_success(&rows, now),
                    )
                    .family(MetricFamily::NumQueuedTasks, task::queued(&rows));
            }
            Err(e) => {
                snapshot.fail(DataSource::TaskInstances, e.into());
            }
        }

        match dag_runs {
            Ok(rows) => {
                snapshot
                    .family(MetricFamily::DagStatus, dag::status(&rows, fill))
                    .family(MetricFamily::DagRunDuration, dag::run_duration(&rows, now))
                    .family(
                        MetricFamily::LastDagSuccessTime,
                        dag::last_success(&rows, now),
                    );
            }
            Err(e) => {
                snapshot.fail(DataSource::DagRuns, e.into());
            }
        }

        match task_failures {
            Ok(rows) => {
                snapshot.family(MetricFamily::TaskFailCount, task::fail_count(&rows));
            }
            Err(e) => {
                snapshot.fail(DataSource::TaskFailures, e.into());
            }
        }

        match side_channel {
            Ok(rows) => {
                snapshot.family(
                    MetricFamily::SideChannelParameter,
                    extract(&self.rules, &rows),
                );
            }
            Err(e) => {
                snapshot.fail(DataSource::SideChannel, e.into());
            }
        }

        let delays = timings
            .map_err(SnapshotError::from)
            .and_then(|rows| canary_delays(&self.config.canary_dag_id, &rows));
        match delays {
            Ok(delays) => {
                snapshot
                    .family(MetricFamily::DagSchedulerDelay, delays.dag)
                    .family(MetricFamily::TaskSchedulerDelay, delays.task);
                for problem in delays.problems {
                    snapshot.fail(DataSource::SchedulerTimings, problem);
                }
            }
            Err(e) => {
                snapshot.fail(DataSource::SchedulerTimings, e);
            }
        }

        let snapshot = snapshot.build();
        debug!(
            samples = snapshot.len(),
            failures = snapshot.failures().len(),
            "snapshot assembled"
        );
        snapshot
    }
}

/// Run a store query under a deadline.
async fn bounded<T, F>(limit: Duration, query: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(limit, query).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use apx_model::{
        DagRunRecord, DagState, ExtractionRule, SchedulerTimingRecord, SideChannelRecord,
        TaskFailureRecord, TaskInstanceRecord, TaskState,
    };
    use async_trait::async_trait;
    use serde_json::json;
    use time::{OffsetDateTime, macros::datetime};

    use super::*;
    use crate::store::MemoryStore;

    const NOW: OffsetDateTime = datetime!(2024-03-01 12:00 UTC);

    fn populated_store() -> MemoryStore {
        let day = datetime!(2024-03-01 00:00 UTC);
        MemoryStore::new()
            .with_task_instances(vec![
                TaskInstanceRecord::new("etl", "extract", "r1", TaskState::Success, day)
                    .with_times(NOW - time::Duration::hours(1), Some(NOW - time::Duration::minutes(50))),
                TaskInstanceRecord::new("etl", "load", "r1", TaskState::Running, day)
                    .with_times(NOW - time::Duration::minutes(5), None),
                TaskInstanceRecord::new("etl", "load", "r0", TaskState::Failed, day),
                TaskInstanceRecord::new("etl", "report", "r1", TaskState::Queued, day),
            ])
            .with_dag_runs(vec![
                DagRunRecord::new("etl", "r1", DagState::Running, day)
                    .with_times(NOW - time::Duration::hours(1), None),
                DagRunRecord::new("etl", "r0", DagState::Success, day - time::Duration::days(1))
                    .with_times(
                        day - time::Duration::days(1),
                        Some(NOW - time::Duration::hours(10)),
                    ),
            ])
            .with_task_failures(vec![TaskFailureRecord::new("etl", "load", 3)])
            .with_side_channel(vec![SideChannelRecord::new(
                "etl",
                "abc",
                "return_value",
                json!({"record_count": 123}),
            )])
            .with_timings(vec![SchedulerTimingRecord::dag_run(
                "canary_dag",
                "c1",
                NOW - time::Duration::minutes(1),
                Some(NOW - time::Duration::minutes(1) + time::Duration::seconds(45)),
            )])
    }

    fn assembler() -> SnapshotAssembler {
        SnapshotAssembler::new(
            vec![ExtractionRule::new("abc", None, "record_count").unwrap()],
            SnapshotConfig::default(),
        )
    }

    #[tokio::test]
    async fn healthy_store_produces_every_family() {
        let snapshot = assembler().assemble(&populated_store(), NOW).await;

        assert!(snapshot.failures().is_empty(), "{:?}", snapshot.failures());
        for family in MetricFamily::ALL {
            assert!(snapshot.contains(family), "missing family {family}");
        }
        assert_eq!(snapshot.taken_at(), NOW);
    }

    #[tokio::test]
    async fn side_channel_value_is_published() {
        let snapshot = assembler().assemble(&populated_store(), NOW).await;

        let samples: Vec<_> = snapshot
            .samples(MetricFamily::SideChannelParameter)
            .collect();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].name(), "side_channel_parameter");
        assert_eq!(samples[0].label("task_id"), Some("abc"));
        assert_eq!(samples[0].value(), 123.0);
    }

    #[tokio::test]
    async fn derived_values_use_the_snapshot_timestamp() {
        let snapshot = assembler().assemble(&populated_store(), NOW).await;

        let duration: Vec<_> = snapshot.samples(MetricFamily::TaskDuration).collect();
        assert_eq!(duration.len(), 1);
        assert_eq!(duration[0].value(), 300.0);

        let last_success: Vec<_> = snapshot
            .samples(MetricFamily::LastTaskSuccessTime)
            .collect();
        assert_eq!(last_success[0].value(), 3000.0);

        let dag_success: Vec<_> = snapshot
            .samples(MetricFamily::LastDagSuccessTime)
            .collect();
        assert_eq!(dag_success[0].value(), 36_000.0);

        let delay: Vec<_> = snapshot.samples(MetricFamily::DagSchedulerDelay).collect();
        assert_eq!(delay.len(), 1);
        assert_eq!(delay[0].value(), 45.0);

        let queued: Vec<_> = snapshot.samples(MetricFamily::NumQueuedTasks).collect();
        assert_eq!(queued[0].value(), 1.0);

        let fails: Vec<_> = snapshot.samples(MetricFamily::TaskFailCount).collect();
        assert_eq!(fails[0].value(), 3.0);
    }

    #[tokio::test]
    async fn failed_side_channel_does_not_affect_task_metrics() {
        let store = populated_store().failing(
            DataSource::SideChannel,
            StoreError::Unreachable("connection refused".into()),
        );
        let snapshot = assembler().assemble(&store, NOW).await;

        assert!(snapshot.samples(MetricFamily::TaskStatus).count() > 0);
        assert_eq!(snapshot.samples(MetricFamily::SideChannelParameter).count(), 0);
        assert!(!snapshot.contains(MetricFamily::SideChannelParameter));

        assert_eq!(snapshot.failures().len(), 1);
        assert_eq!(snapshot.failures()[0].source, DataSource::SideChannel);
    }

    #[tokio::test]
    async fn failed_task_instances_remove_only_their_families() {
        let store = populated_store().failing(
            DataSource::TaskInstances,
            StoreError::Query("relation does not exist".into()),
        );
        let snapshot = assembler().assemble(&store, NOW).await;

        for family in [
            MetricFamily::TaskStatus,
            MetricFamily::TaskDuration,
            MetricFamily::LastTaskSuccessTime,
            MetricFamily::NumQueuedTasks,
        ] {
            assert!(!snapshot.contains(family), "{family} should be absent");
        }
        assert!(snapshot.contains(MetricFamily::DagStatus));
        assert!(snapshot.contains(MetricFamily::TaskFailCount));
        assert!(snapshot.contains(MetricFamily::SideChannelParameter));
    }

    #[tokio::test]
    async fn every_source_failing_still_yields_a_snapshot() {
        let err = StoreError::Unreachable("down".into());
        let store = MemoryStore::new()
            .failing(DataSource::TaskInstances, err.clone())
            .failing(DataSource::DagRuns, err.clone())
            .failing(DataSource::TaskFailures, err.clone())
            .failing(DataSource::SideChannel, err.clone())
            .failing(DataSource::SchedulerTimings, err);
        let snapshot = assembler().assemble(&store, NOW).await;

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.families().count(), 0);
        assert_eq!(snapshot.failures().len(), 5);
    }

    #[tokio::test]
    async fn missing_canary_only_removes_delay_families() {
        let store = populated_store().with_timings(vec![]);
        let snapshot = assembler().assemble(&store, NOW).await;

        assert!(!snapshot.contains(MetricFamily::DagSchedulerDelay));
        assert!(!snapshot.contains(MetricFamily::TaskSchedulerDelay));
        assert!(snapshot.contains(MetricFamily::TaskStatus));

        assert_eq!(snapshot.failures().len(), 1);
        assert!(matches!(
            snapshot.failures()[0].error,
            SnapshotError::MissingCanaryData { .. }
        ));
    }

    #[tokio::test]
    async fn unstarted_canary_emits_no_delay_sample() {
        let store = populated_store().with_timings(vec![SchedulerTimingRecord::dag_run(
            "canary_dag",
            "c2",
            NOW,
            None,
        )]);
        let snapshot = assembler().assemble(&store, NOW).await;

        assert_eq!(snapshot.samples(MetricFamily::DagSchedulerDelay).count(), 0);
        assert!(snapshot.failures().is_empty());
    }

    #[tokio::test]
    async fn custom_canary_id_is_queried() {
        let store = populated_store().with_timings(vec![SchedulerTimingRecord::dag_run(
            "heartbeat",
            "h1",
            NOW - time::Duration::seconds(20),
            Some(NOW - time::Duration::seconds(8)),
        )]);
        let config = SnapshotConfig {
            canary_dag_id: "heartbeat".into(),
            ..SnapshotConfig::default()
        };
        let snapshot = SnapshotAssembler::new(vec![], config)
            .assemble(&store, NOW)
            .await;

        let delay: Vec<_> = snapshot.samples(MetricFamily::DagSchedulerDelay).collect();
        assert_eq!(delay[0].value(), 12.0);
        assert_eq!(delay[0].label("dag_id"), Some("heartbeat"));
    }

    #[tokio::test]
    async fn back_to_back_scrapes_are_identical() {
        let store = populated_store();
        let assembler = assembler();

        let first = assembler.assemble(&store, NOW).await;
        let second = assembler.assemble(&store, NOW).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn fill_known_states_keeps_counts_conserved() {
        let config = SnapshotConfig {
            fill_known_states: true,
            ..SnapshotConfig::default()
        };
        let snapshot = SnapshotAssembler::new(vec![], config)
            .assemble(&populated_store(), NOW)
            .await;

        let load_total: f64 = snapshot
            .samples(MetricFamily::TaskStatus)
            .filter(|s| s.label("task_id") == Some("load"))
            .map(|s| s.value())
            .sum();
        assert_eq!(load_total, 2.0);
        assert_eq!(
            snapshot
                .samples(MetricFamily::TaskStatus)
                .filter(|s| s.label("task_id") == Some("load"))
                .count(),
            TaskState::ALL.len()
        );
    }

    /// Store whose task instance query never answers in time.
    struct StalledStore(MemoryStore);

    #[async_trait]
    impl MetadataStore for StalledStore {
        async fn task_instances(&self) -> StoreResult<Vec<TaskInstanceRecord>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            self.0.task_instances().await
        }

        async fn dag_runs(&self) -> StoreResult<Vec<DagRunRecord>> {
            self.0.dag_runs().await
        }

        async fn task_failures(&self) -> StoreResult<Vec<TaskFailureRecord>> {
            self.0.task_failures().await
        }

        async fn side_channel_records(&self) -> StoreResult<Vec<SideChannelRecord>> {
            self.0.side_channel_records().await
        }

        async fn scheduler_timings(
            &self,
            canary_dag_id: &str,
        ) -> StoreResult<Vec<SchedulerTimingRecord>> {
            self.0.scheduler_timings(canary_dag_id).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_query_times_out_without_blocking_others() {
        let config = SnapshotConfig {
            query_timeout: Duration::from_secs(2),
            ..SnapshotConfig::default()
        };
        let store = StalledStore(populated_store());
        let snapshot = SnapshotAssembler::new(vec![], config)
            .assemble(&store, NOW)
            .await;

        assert!(!snapshot.contains(MetricFamily::TaskStatus));
        assert!(snapshot.contains(MetricFamily::DagStatus));
        assert_eq!(
            snapshot.failures()[0].error,
            SnapshotError::Store(StoreError::Timeout(Duration::from_secs(2)))
        );
    }
}
