//! Plain-text rendering of loosely-typed backend records.

use serde_json::Value;

/// Placeholder shown for absent values.
pub const EMPTY_PLACEHOLDER: &str = "—";

/// Render a single JSON value for a key/value listing.
///
/// Scalars print bare, arrays of scalars are comma-joined, everything
/// else falls back to compact JSON.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => EMPTY_PLACEHOLDER.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Array(items) if items.iter().all(is_scalar) => items
            .iter()
            .map(format_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Flatten a JSON object into `(key, rendered value)` rows.
///
/// Non-object values render as a single row keyed `value`.
pub fn field_rows(value: &Value) -> Vec<(String, String)> {
    match value {
        Value::Object(fields) => fields
            .iter()
            .map(|(k, v)| (k.clone(), format_value(v)))
            .collect(),
        other => vec![("value".to_string(), format_value(other))],
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars() {
        assert_eq!(format_value(&json!(null)), EMPTY_PLACEHOLDER);
        assert_eq!(format_value(&json!("KA09AB1234")), "KA09AB1234");
        assert_eq!(format_value(&json!(4)), "4");
        assert_eq!(format_value(&json!(false)), "false");
    }

    #[test]
    fn arrays_and_objects() {
        assert_eq!(format_value(&json!([])), "[]");
        assert_eq!(format_value(&json!(["A", "B", 3])), "A, B, 3");
        assert_eq!(format_value(&json!([{ "a": 1 }])), r#"[{"a":1}]"#);
        assert_eq!(format_value(&json!({ "lat": 1 })), r#"{"lat":1}"#);
    }

    #[test]
    fn rows_for_object() {
        let rows = field_rows(&json!({ "driver_id": "D1", "status": "confirmed" }));
        assert_eq!(
            rows,
            vec![
                ("driver_id".to_string(), "D1".to_string()),
                ("status".to_string(), "confirmed".to_string()),
            ]
        );
    }
}
