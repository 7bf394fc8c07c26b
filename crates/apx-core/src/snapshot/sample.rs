use apx_model::Labels;

use crate::snapshot::MetricFamily;

/// One labeled value of a metric family.
///
/// The point in time a sample describes is the timestamp of the snapshot holding it.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    family: MetricFamily,
    labels: Labels,
    value: f64,
}

impl MetricSample {
    pub fn new(family: MetricFamily, labels: Labels, value: f64) -> Self {
        Self {
            family,
            labels,
            value,
        }
    }

    pub fn family(&self) -> MetricFamily {
        self.family
    }

    /// Metric name without namespace.
    pub fn name(&self) -> &'static str {
        self.family.name()
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Shortcut for `labels().get(key)`.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key)
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}
