//! Side-channel extraction rules.
//!
//! Every [`ExtractionRule`] selects records by task id and channel key, then fields of the
//! selected payloads. Each selected field holding a number becomes one
//! `side_channel_parameter` sample. Payloads are written by task code and are not trusted:
//! anything that is not a JSON object of numbers is skipped field by field.

use apx_model::{ExtractionRule, Labels, Selector, SideChannelRecord};
use tracing::debug;

use crate::snapshot::family::{LABEL_CHANNEL_KEY, LABEL_DAG_ID, LABEL_FIELD_NAME, LABEL_TASK_ID};
use crate::snapshot::{MetricFamily, MetricSample};

/// Apply `rules` to `records`.
///
/// Rules are evaluated independently and in order. Two rules selecting the same field both
/// emit a sample; resolving such duplicates is left to the sink.
pub fn extract(rules: &[ExtractionRule], records: &[SideChannelRecord]) -> Vec<MetricSample> {
    let mut samples = Vec::new();
    for rule in rules {
        for record in records.iter().filter(|r| selects(rule, r)) {
            extract_fields(rule.field(), record, &mut samples);
        }
    }
    samples
}

/// Returns `true` if `rule` selects `record`.
#[inline]
pub fn selects(rule: &ExtractionRule, record: &SideChannelRecord) -> bool {
    record.channel_key == rule.channel_key() && rule.task().matches(&record.task_id)
}

fn extract_fields(field: &Selector, record: &SideChannelRecord, out: &mut Vec<MetricSample>) {
    let Some(fields) = record.fields() else {
        debug!(
            dag_id = %record.dag_id,
            task_id = %record.task_id,
            channel_key = %record.channel_key,
            "side-channel payload is not an object, skipping"
        );
        return;
    };

    match field {
        Selector::Exact(name) => match record.numeric_field(name) {
            Some(value) => out.push(sample(record, name, value)),
            None => debug!(
                task_id = %record.task_id,
                field = %name,
                "side-channel field missing or not numeric, skipping"
            ),
        },
        Selector::Any => {
            for (name, value) in fields {
                match value.as_f64() {
                    Some(value) => out.push(sample(record, name, value)),
                    None => debug!(
                        task_id = %record.task_id,
                        field = %name,
                        "side-channel field not numeric, skipping"
                    ),
                }
            }
        }
    }
}

fn sample(record: &SideChannelRecord, field: &str, value: f64) -> MetricSample {
    let labels = Labels::new()
        .with(LABEL_DAG_ID, record.dag_id.as_str())
        .with(LABEL_TASK_ID, record.task_id.as_str())
        .with(LABEL_CHANNEL_KEY, record.channel_key.as_str())
        .with(LABEL_FIELD_NAME, field);
    MetricSample::new(MetricFamily::SideChannelParameter, labels, value)
}
