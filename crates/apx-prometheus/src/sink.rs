use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder, proto::MetricFamily};
use tracing::debug;

use apx_core::{
    Exposition, MetricFamily as Family, MetricSample, MetricSink, MetricSnapshot, SinkError,
};

/// Default metric namespace, matching the orchestrator's own metric prefix.
pub const DEFAULT_NAMESPACE: &str = "airflow";

/// Prometheus sink for apx snapshots.
///
/// Implements [`MetricSink`] by building a fresh [`Registry`] for every snapshot, so
/// concurrent scrapes never share gauges and series of vanished tasks disappear on the
/// next scrape.
///
/// ## Label cardinality
/// Labels follow [`Family::label_names`]. `dag_id` and `task_id` are bounded by the
/// number of deployed DAGs; `field_name` by the extraction rules and the payloads they match.
#[derive(Debug, Clone)]
pub struct PrometheusSink {
    namespace: String,
}

impl PrometheusSink {
    /// Create a sink prefixing every metric with `namespace` (may be empty).
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Register every present family of `snapshot` into a new registry.
    ///
    /// Samples sharing a label set overwrite each other; the last one wins.
    pub fn registry(&self, snapshot: &MetricSnapshot) -> Result<Registry, SinkError> {
        let registry = Registry::new();
        for (family, samples) in snapshot.families() {
            if samples.is_empty() {
                continue;
            }
            self.register_family(&registry, family, samples)
                .map_err(|e| SinkError::InvalidMetric {
                    family: family.name().to_string(),
                    reason: e.to_string(),
                })?;
        }
        Ok(registry)
    }

    /// Gather `snapshot` into prometheus metric families.
    pub fn gather(&self, snapshot: &MetricSnapshot) -> Result<Vec<MetricFamily>, SinkError> {
        Ok(self.registry(snapshot)?.gather())
    }

    fn register_family(
        &self,
        registry: &Registry,
        family: Family,
        samples: &[MetricSample],
    ) -> Result<(), prometheus::Error> {
        let mut opts = Opts::new(family.name(), family.help());
        if !self.namespace.is_empty() {
            opts = opts.namespace(self.namespace.as_str());
        }

        let names = family.label_names();
        if names.is_empty() {
            let gauge = Gauge::with_opts(opts)?;
            for sample in samples {
                gauge.set(sample.value());
            }
            return registry.register(Box::new(gauge));
        }

        let gauge = GaugeVec::new(opts, names)?;
        for sample in samples {
            let values = sample.labels().values_for(names);
            gauge.get_metric_with_label_values(&values)?.set(sample.value());
        }
        registry.register(Box::new(gauge))
    }
}

impl Default for PrometheusSink {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl MetricSink for PrometheusSink {
    fn render(&self, snapshot: &MetricSnapshot) -> Result<Exposition, SinkError> {
        let families = self.gather(snapshot)?;
        let encoder = TextEncoder::new();
        let mut body = Vec::new();
        encoder
            .encode(&families, &mut body)
            .map_err(|e| SinkError::Encode(e.to_string()))?;

        debug!(
            families = families.len(),
            bytes = body.len(),
            "snapshot rendered"
        );
        Ok(Exposition {
            content_type: encoder.format_type().to_string(),
            body,
        })
    }
}
