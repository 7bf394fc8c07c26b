use std::collections::BTreeMap;

use time::OffsetDateTime;
use tracing::warn;

use crate::error::SnapshotError;
use crate::snapshot::{MetricFamily, MetricSample};
use crate::store::DataSource;

/// Data source that failed during a scrape, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFailure {
    pub source: DataSource,
    pub error: SnapshotError,
}

/// Point-in-time set of metric samples produced by one scrape.
///
/// A family is present only if its source data was fetched successfully during the scrape
/// (possibly with zero samples). An absent family means "unknown", never "zero".
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSnapshot {
    taken_at: OffsetDateTime,
    families: BTreeMap<MetricFamily, Vec<MetricSample>>,
    failures: Vec<SourceFailure>,
}

impl MetricSnapshot {
    /// Timestamp every sample of the snapshot was computed against.
    pub fn taken_at(&self) -> OffsetDateTime {
        self.taken_at
    }

    /// Samples of `family`, or `None` if the family is absent.
    pub fn family(&self, family: MetricFamily) -> Option<&[MetricSample]> {
        self.families.get(&family).map(Vec::as_slice)
    }

    /// Returns `true` if `family` is present (even with no samples).
    pub fn contains(&self, family: MetricFamily) -> bool {
        self.families.contains_key(&family)
    }

    /// Samples of `family`; empty when the family is absent.
    pub fn samples(&self, family: MetricFamily) -> impl Iterator<Item = &MetricSample> {
        self.family(family).unwrap_or_default().iter()
    }

    /// Present families in a stable order.
    pub fn families(&self) -> impl Iterator<Item = (MetricFamily, &[MetricSample])> {
        self.families.iter().map(|(f, s)| (*f, s.as_slice()))
    }

    /// Sources that failed during the scrape.
    pub fn failures(&self) -> &[SourceFailure] {
        &self.failures
    }

    /// Total number of samples across all families.
    pub fn len(&self) -> usize {
        self.families.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Accumulates families and failures of one scrape.
///
/// The snapshot only becomes visible through [`SnapshotBuilder::build`], once every
/// source has been processed.
#[derive(Debug)]
pub struct SnapshotBuilder {
    taken_at: OffsetDateTime,
    families: BTreeMap<MetricFamily, Vec<MetricSample>>,
    failures: Vec<SourceFailure>,
}

impl SnapshotBuilder {
    pub fn new(taken_at: OffsetDateTime) -> Self {
        Self {
            taken_at,
            families: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    /// Mark `family` present and append `samples` to it.
    ///
    /// Samples are expected to belong to `family`; mismatching ones are dropped.
    pub fn family(&mut self, family: MetricFamily, samples: Vec<MetricSample>) -> &mut Self {
        let entry = self.families.entry(family).or_default();
        entry.extend(samples.into_iter().filter(|s| s.family() == family));
        self
    }

    /// Record that `source` contributed no data.
    pub fn fail(&mut self, source: DataSource, error: SnapshotError) -> &mut Self {
        warn!(source = source.as_label(), error = %error, "metric source unavailable for this scrape");
        self.failures.push(SourceFailure { source, error });
        self
    }

    pub fn build(self) -> MetricSnapshot {
        MetricSnapshot {
            taken_at: self.taken_at,
            families: self.families,
            failures: self.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use apx_model::Labels;
    use time::macros::datetime;

    use super::*;
    use crate::error::StoreError;

    fn sample(family: MetricFamily, value: f64) -> MetricSample {
        MetricSample::new(family, Labels::new(), value)
    }

    #[test]
    fn empty_family_is_present_but_has_no_samples() {
        let mut builder = SnapshotBuilder::new(datetime!(2024-03-01 12:00 UTC));
        builder.family(MetricFamily::TaskDuration, vec![]);
        let snapshot = builder.build();

        assert!(snapshot.contains(MetricFamily::TaskDuration));
        assert_eq!(snapshot.samples(MetricFamily::TaskDuration).count(), 0);
        assert!(!snapshot.contains(MetricFamily::TaskStatus));
        assert!(snapshot.family(MetricFamily::TaskStatus).is_none());
    }

    #[test]
    fn mismatching_samples_are_dropped() {
        let mut builder = SnapshotBuilder::new(datetime!(2024-03-01 12:00 UTC));
        builder.family(
            MetricFamily::NumQueuedTasks,
            vec![
                sample(MetricFamily::NumQueuedTasks, 3.0),
                sample(MetricFamily::TaskStatus, 1.0),
            ],
        );
        let snapshot = builder.build();

        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot.contains(MetricFamily::TaskStatus));
    }

    #[test]
    fn failures_are_kept_in_order() {
        let mut builder = SnapshotBuilder::new(datetime!(2024-03-01 12:00 UTC));
        builder
            .fail(
                DataSource::SideChannel,
                StoreError::Unreachable("refused".into()).into(),
            )
            .fail(DataSource::DagRuns, StoreError::Query("bad".into()).into());
        let snapshot = builder.build();

        let sources: Vec<_> = snapshot.failures().iter().map(|f| f.source).collect();
        assert_eq!(sources, vec![DataSource::SideChannel, DataSource::DagRuns]);
        assert!(snapshot.is_empty());
    }
}
