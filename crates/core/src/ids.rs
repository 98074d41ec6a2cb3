//! Lenient identifier and list extraction.
//!
//! The backend services do not agree on a response shape: identifiers
//! come back under several keys and lists are sometimes wrapped in an
//! envelope object. Every lookup here walks a fixed key order and takes
//! the first usable value.

use serde_json::Value;

use crate::error::CoreError;
use crate::types::JsonObject;

pub const TRIP_ID_KEYS: &[&str] = &["trip_id", "id", "_id", "tripId"];
pub const CONFIRMATION_ID_KEYS: &[&str] = &["confirmation_id", "id", "_id", "confirmationId"];
pub const VEHICLE_ID_KEYS: &[&str] = &["vehicle_id", "id", "_id"];

/// Return the first non-empty identifier found under `keys`.
///
/// Numeric identifiers are rendered as strings.
pub fn first_id(value: &Value, keys: &[&str]) -> Option<String> {
    first_id_in(value.as_object()?, keys)
}

/// [`first_id`] over an already-destructured object.
pub fn first_id_in(obj: &JsonObject, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Like [`first_id`], but a missing identifier is an error.
pub fn require_id(value: &Value, keys: &[&str], entity: &'static str) -> Result<String, CoreError> {
    first_id(value, keys).ok_or(CoreError::MissingId { entity })
}

/// Normalise a list response.
///
/// Accepts a bare array, or an object carrying an array under one of
/// `envelope_keys` (checked in order). Anything else yields an empty
/// list.
pub fn extract_list(value: Value, envelope_keys: &[&str]) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => envelope_keys
            .iter()
            .find_map(|key| match obj.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Read a number that may have been sent as a JSON string.
pub fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_number(s),
        _ => None,
    }
}

/// Parse the numeric prefix of a string such as `"12.5 km"`.
pub fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '-' || *c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn takes_first_key_in_order() {
        let body = json!({ "id": "b", "trip_id": "a" });
        assert_eq!(first_id(&body, TRIP_ID_KEYS).as_deref(), Some("a"));
    }

    #[test]
    fn skips_empty_strings() {
        let body = json!({ "confirmation_id": "", "_id": "c-9" });
        assert_eq!(first_id(&body, CONFIRMATION_ID_KEYS).as_deref(), Some("c-9"));
    }

    #[test]
    fn numeric_ids_become_strings() {
        let body = json!({ "id": 42 });
        assert_eq!(first_id(&body, VEHICLE_ID_KEYS).as_deref(), Some("42"));
    }

    #[test]
    fn missing_id_is_an_error() {
        let body = json!({ "status": "ok" });
        assert_matches!(
            require_id(&body, TRIP_ID_KEYS, "Trip"),
            Err(CoreError::MissingId { entity: "Trip" })
        );
    }

    #[test]
    fn list_shapes() {
        assert_eq!(extract_list(json!([1, 2]), &["data"]).len(), 2);
        assert_eq!(extract_list(json!({ "data": [1] }), &["data"]).len(), 1);
        assert_eq!(extract_list(json!({ "trips": [1, 2, 3] }), &["data", "trips"]).len(), 3);
        assert!(extract_list(json!({ "data": "nope" }), &["data"]).is_empty());
        assert!(extract_list(json!(null), &["data"]).is_empty());
    }

    #[test]
    fn leading_numbers() {
        assert_eq!(leading_number("12.5 km"), Some(12.5));
        assert_eq!(leading_number("  7km"), Some(7.0));
        assert_eq!(leading_number("-3.25"), Some(-3.25));
        assert_eq!(leading_number("km 12"), None);
        assert_eq!(lenient_f64(&json!("28.61")), Some(28.61));
        assert_eq!(lenient_f64(&json!(77.2)), Some(77.2));
        assert_eq!(lenient_f64(&json!(true)), None);
    }
}
