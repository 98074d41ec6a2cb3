//! Driver location readings.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::ids::lenient_f64;
use crate::types::Timestamp;

/// A driver position as shared with, and returned by, the location
/// service. Coordinates may arrive as numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverLocation {
    #[serde(default)]
    pub driver_id: String,
    #[serde(deserialize_with = "coordinate")]
    pub latitude: f64,
    #[serde(deserialize_with = "coordinate")]
    pub longitude: f64,
}

impl DriverLocation {
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A location reading stamped with the time the client received it.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFix {
    pub location: DriverLocation,
    pub received_at: Timestamp,
}

fn coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    lenient_f64(&value).ok_or_else(|| serde::de::Error::custom(format!("invalid coordinate: {value}")))
}
