//! Vehicle catalogue records.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::ids::{first_id_in, lenient_f64, VEHICLE_ID_KEYS};
use crate::types::JsonObject;

/// A vehicle as listed by the vehicle service.
///
/// Only the fields the client reasons about are typed; everything else
/// is kept in `extra` for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl Vehicle {
    pub fn id(&self) -> Option<String> {
        first_id_in(&self.extra, VEHICLE_ID_KEYS)
    }

    /// Display title: name, then model, then type.
    pub fn title(&self) -> &str {
        self.name
            .as_deref()
            .or(self.model.as_deref())
            .or(self.vehicle_type.as_deref())
            .unwrap_or("Vehicle")
    }

    pub fn seats(&self) -> Option<u64> {
        ["seats", "capacity"]
            .iter()
            .find_map(|key| self.extra.get(*key).and_then(Value::as_u64))
    }

    pub fn base_fare(&self) -> Option<f64> {
        self.extra.get("baseFare").and_then(lenient_f64)
    }

    pub fn price_per_km(&self) -> Option<f64> {
        self.extra.get("pricePerKm").and_then(lenient_f64)
    }

    /// Estimated fare for a trip of `distance_km`, rounded to cents.
    ///
    /// `None` when the distance is unknown or the vehicle carries no
    /// pricing at all.
    pub fn estimate_fare(&self, distance_km: Option<f64>) -> Option<f64> {
        let distance_km = distance_km?;
        let base = self.base_fare().unwrap_or(0.0);
        let per_km = self.price_per_km().unwrap_or(0.0);
        if base == 0.0 && per_km == 0.0 {
            return None;
        }
        Some(((base + per_km * distance_km) * 100.0).round() / 100.0)
    }
}

/// Admin request to add `quantity` vehicles of one type.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewVehicles {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Vehicle type is required"))]
    pub vehicle_type: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
}

impl NewVehicles {
    pub fn new(vehicle_type: &str, quantity: u32) -> Self {
        Self {
            vehicle_type: vehicle_type.trim().to_string(),
            quantity,
        }
    }
}
