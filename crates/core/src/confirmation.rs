//! Confirmations: a passenger's request for a specific trip/vehicle
//! combination, awaiting a driver.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::ids::{extract_list, first_id_in, lenient_f64, CONFIRMATION_ID_KEYS};
use crate::trip::Trip;
use crate::types::JsonObject;
use crate::vehicle::Vehicle;

/// Vehicle type sent when the passenger never picked one.
pub const FALLBACK_VEHICLE_TYPE: &str = "VEHICLE";

/// Request body for `POST /api/confirmations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewConfirmation {
    pub pickup: String,
    pub destination: String,
    pub stops: Vec<String>,
    pub persons: u32,
    pub trip_price: f64,
    #[serde(rename = "type")]
    pub vehicle_type: String,
}

impl NewConfirmation {
    /// Build a confirmation for `trip` with the selected `vehicle`.
    pub fn from_trip(trip: &Trip, vehicle: Option<&Vehicle>) -> Self {
        Self {
            pickup: trip.pickup.clone(),
            destination: trip.destination.clone(),
            stops: trip.stops.clone(),
            persons: trip.persons.unwrap_or(1),
            trip_price: trip.confirmation_price(vehicle),
            vehicle_type: vehicle
                .and_then(|v| v.vehicle_type.clone())
                .unwrap_or_else(|| FALLBACK_VEHICLE_TYPE.to_string()),
        }
    }
}

/// A confirmation as listed by the dispatch service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Confirmation {
    #[serde(flatten)]
    pub fields: JsonObject,
}

impl Confirmation {
    pub fn id(&self) -> Option<String> {
        first_id_in(&self.fields, CONFIRMATION_ID_KEYS)
    }

    pub fn status(&self) -> Option<&str> {
        self.fields.get("status").and_then(Value::as_str)
    }

    pub fn trip_price(&self) -> Option<f64> {
        self.fields.get("trip_price").and_then(lenient_f64)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            Value::String(id) if !id.is_empty() => Some(Self::from_id(id)),
            _ => None,
        }
    }

    fn from_id(id: String) -> Self {
        let mut fields = JsonObject::new();
        fields.insert("confirmation_id".into(), json!(id));
        Self { fields }
    }
}

/// Normalise the confirmation list endpoint.
///
/// Accepts a bare array, `{data: [...]}`, or `{confirmation_ids: [...]}`
/// where the latter holds bare identifiers.
pub fn parse_confirmation_list(body: Value) -> Vec<Confirmation> {
    extract_list(body, &["data", "confirmation_ids"])
        .into_iter()
        .filter_map(Confirmation::from_value)
        .collect()
}
