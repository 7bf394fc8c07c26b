use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_CHANNEL_KEY;
use crate::error::{ModelError, ModelResult};
use crate::rule::Selector;

/// User rule selecting side-channel fields to publish as gauges.
///
/// Configured as `{task_id, xcom_key?, key}`:
/// - `task_id`: a task id, or `"all"` for every task;
/// - `xcom_key`: side-channel key to read, defaults to [`DEFAULT_CHANNEL_KEY`];
/// - `key`: payload field to publish, or `"all"` for every field of the payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub struct ExtractionRule {
    task: Selector,
    channel_key: String,
    field: Selector,
}

impl ExtractionRule {
    /// Build a rule from configured values, rejecting empty ones.
    pub fn new(
        task_id: impl Into<String>,
        channel_key: Option<String>,
        key: impl Into<String>,
    ) -> ModelResult<Self> {
        RawRule {
            task_id: task_id.into(),
            xcom_key: channel_key.unwrap_or_else(default_channel_key),
            key: key.into(),
        }
        .try_into()
    }

    /// Task selector.
    pub fn task(&self) -> &Selector {
        &self.task
    }

    /// Side-channel key the rule reads.
    pub fn channel_key(&self) -> &str {
        &self.channel_key
    }

    /// Payload field selector.
    pub fn field(&self) -> &Selector {
        &self.field
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    task_id: String,
    #[serde(default = "default_channel_key")]
    xcom_key: String,
    key: String,
}

fn default_channel_key() -> String {
    DEFAULT_CHANNEL_KEY.to_string()
}

impl TryFrom<RawRule> for ExtractionRule {
    type Error = ModelError;
    fn try_from(raw: RawRule) -> ModelResult<Self> {
        if raw.task_id.trim().is_empty() {
            return Err(ModelError::EmptyRuleField("task_id"));
        }
        if raw.xcom_key.trim().is_empty() {
            return Err(ModelError::EmptyRuleField("xcom_key"));
        }
        if raw.key.trim().is_empty() {
            return Err(ModelError::EmptyRuleField("key"));
        }

        Ok(Self {
            task: Selector::parse(&raw.task_id),
            channel_key: raw.xcom_key,
            field: Selector::parse(&raw.key),
        })
    }
}

impl From<ExtractionRule> for RawRule {
    fn from(rule: ExtractionRule) -> Self {
        Self {
            task_id: rule.task.to_string(),
            xcom_key: rule.channel_key,
            key: rule.field.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_key_defaults_to_return_value() {
        let rule: ExtractionRule =
            serde_json::from_str(r#"{"task_id": "abc", "key": "record_count"}"#).unwrap();

        assert_eq!(rule.task(), &Selector::Exact("abc".into()));
        assert_eq!(rule.channel_key(), "return_value");
        assert_eq!(rule.field(), &Selector::Exact("record_count".into()));
    }

    #[test]
    fn wildcards_parse_to_any() {
        let rule: ExtractionRule =
            serde_json::from_str(r#"{"task_id": "all", "xcom_key": "stats", "key": "all"}"#)
                .unwrap();

        assert_eq!(rule.task(), &Selector::Any);
        assert_eq!(rule.channel_key(), "stats");
        assert_eq!(rule.field(), &Selector::Any);
    }

    #[test]
    fn rejects_empty_fields() {
        let cases = [
            r#"{"task_id": "", "key": "x"}"#,
            r#"{"task_id": "abc", "key": " "}"#,
            r#"{"task_id": "abc", "xcom_key": "", "key": "x"}"#,
        ];

        for input in cases {
            assert!(
                serde_json::from_str::<ExtractionRule>(input).is_err(),
                "expected error for {input}"
            );
        }
    }

    #[test]
    fn rejects_missing_and_unknown_fields() {
        assert!(serde_json::from_str::<ExtractionRule>(r#"{"task_id": "abc"}"#).is_err());
        assert!(
            serde_json::from_str::<ExtractionRule>(r#"{"task_id": "a", "key": "b", "extra": 1}"#)
                .is_err()
        );
    }

    #[test]
    fn new_matches_deserialized_rule() {
        let built = ExtractionRule::new("abc", None, "record_count").unwrap();
        let parsed: ExtractionRule =
            serde_json::from_str(r#"{"task_id": "abc", "key": "record_count"}"#).unwrap();
        assert_eq!(built, parsed);
    }

    #[test]
    fn serializes_back_to_config_shape() {
        let rule = ExtractionRule::new("all", Some("stats".into()), "errors").unwrap();
        let json = serde_json::to_value(&rule).unwrap();

        assert_eq!(json["task_id"], "all");
        assert_eq!(json["xcom_key"], "stats");
        assert_eq!(json["key"], "errors");
    }
}
