//! Driver route planning records exchanged with the routing service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::lenient_f64;
use crate::types::JsonObject;

/// `[longitude, latitude]`, the order the routing service expects.
pub type Coordinate = [f64; 2];

/// Body of the route-planning `POST /api/trips` call.
#[derive(Debug, Clone, Serialize)]
pub struct RouteRequest {
    pub pickup: String,
    pub destination: String,
    pub stops: Vec<String>,
    pub pickup_coord: Coordinate,
    pub destination_coord: Coordinate,
    pub stops_coords: Vec<Coordinate>,
    pub persons: u32,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub price: f64,
}

/// Route computed by the routing service for a planned trip.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteInfo {
    #[serde(default)]
    pub geometry: Value,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl RouteInfo {
    /// Route length in metres, if reported.
    pub fn distance_m(&self) -> Option<f64> {
        self.extra.get("distance").and_then(lenient_f64)
    }

    /// Travel time in seconds, if reported.
    pub fn duration_s(&self) -> Option<f64> {
        self.extra.get("duration").and_then(lenient_f64)
    }
}
