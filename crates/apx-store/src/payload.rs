use serde_json::Value;
use tracing::warn;

/// Decode a raw side-channel payload.
///
/// Payloads are stored as serialized JSON. Missing or undecodable payloads become
/// [`Value::Null`], which extraction skips.
pub fn decode_payload(dag_id: &str, task_id: &str, raw: Option<&[u8]>) -> Value {
    let Some(raw) = raw else {
        return Value::Null;
    };
    match serde_json::from_slice(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                dag_id,
                task_id,
                bytes = raw.len(),
                error = %e,
                "side-channel payload is not json, ignoring"
            );
            Value::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_json_objects() {
        let value = decode_payload("etl", "abc", Some(br#"{"record_count": 123}"#));
        assert_eq!(value, json!({"record_count": 123}));
    }

    #[test]
    fn keeps_non_object_json() {
        assert_eq!(decode_payload("etl", "abc", Some(b"42")), json!(42));
    }

    #[test]
    fn undecodable_payload_is_null() {
        // pickle protocol header
        let pickled = [0x80, 0x04, 0x95, 0x10, 0x00];
        assert_eq!(decode_payload("etl", "abc", Some(&pickled)), Value::Null);
        assert_eq!(decode_payload("etl", "abc", None), Value::Null);
    }
}
