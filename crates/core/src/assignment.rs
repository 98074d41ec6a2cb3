//! Driver assignments: the record a driver creates when accepting a
//! confirmation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Driver confirmation body for `POST /api/assignments/confirm`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignmentConfirm {
    #[validate(length(min = 1, message = "Confirmation ID is required"))]
    pub confirmation_id: String,
    #[validate(length(min = 1, message = "Driver ID is required"))]
    pub driver_id: String,
    #[validate(length(min = 1, message = "Vehicle number is required"))]
    pub vehicle_no: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Vehicle type is required"))]
    pub vehicle_type: String,
    #[validate(length(min = 1, message = "Driver name is required"))]
    pub driver_name: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub ph_no: String,
}

/// Admin request asking the dispatch service to assign a driver.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentRequest {
    pub confirmation_id: String,
}

/// An assignment exactly as the dispatch service returned it.
///
/// The payload is not validated beyond being non-empty; field accessors
/// are best-effort.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AssignmentPayload(Value);

impl AssignmentPayload {
    /// Wrap `value` unless it is empty.
    pub fn from_value(value: Value) -> Option<Self> {
        is_present(&value).then_some(Self(value))
    }

    /// Driver identifier, looked up under the shapes the dispatch
    /// service has been seen to use.
    pub fn driver_id(&self) -> Option<String> {
        let candidates = [
            self.0.get("driver_id"),
            self.0.get("driverId"),
            self.0.get("data").and_then(|d| d.get("driver_id")),
            self.0.get("assignment").and_then(|a| a.get("driver_id")),
        ];
        candidates.into_iter().flatten().find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn vehicle_no(&self) -> Option<&str> {
        self.0.get("vehicle_no").and_then(Value::as_str)
    }

    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Whether a response body counts as "something came back".
///
/// `null`, empty strings, empty arrays and empty objects do not.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}
