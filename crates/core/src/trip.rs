//! Passenger trips and the trip summary handed to the dispatch flow.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::ids::{first_id_in, leading_number, lenient_f64, TRIP_ID_KEYS};
use crate::types::JsonObject;
use crate::vehicle::Vehicle;

/// Keys the trip service may use for the trip price, in priority order.
const PRICE_KEYS: &[&str] = &["price", "fare", "total", "amount"];

/// Distances above this are taken to be metres rather than kilometres.
const METRES_THRESHOLD: f64 = 1000.0;

pub const DEFAULT_TRIP_TYPE: &str = "One-way";

/// Request body for `POST /api/trips` on the trip service.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewTrip {
    #[validate(length(min = 1, message = "Pickup is required"))]
    pub pickup: String,
    #[validate(length(min = 1, message = "Destination is required"))]
    pub destination: String,
    pub stops: Vec<String>,
    #[validate(range(min = 1, message = "At least one passenger is required"))]
    pub persons: u32,
}

impl NewTrip {
    /// Build a trip request, trimming free-text fields and dropping
    /// blank stops.
    pub fn new(pickup: &str, destination: &str, stops: &[String], persons: u32) -> Self {
        Self {
            pickup: pickup.trim().to_string(),
            destination: destination.trim().to_string(),
            stops: stops
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            persons,
        }
    }
}

/// A trip as returned by `GET /api/trips/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trip {
    #[serde(default)]
    pub pickup: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default, deserialize_with = "lenient_stops")]
    pub stops: Vec<String>,
    #[serde(default, deserialize_with = "lenient_persons")]
    pub persons: Option<u32>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl Trip {
    pub fn id(&self) -> Option<String> {
        first_id_in(&self.extra, TRIP_ID_KEYS)
    }

    /// Price quoted by the trip service, if any.
    ///
    /// The first present key among `price`, `fare`, `total`, `amount`
    /// decides; numeric strings are accepted.
    pub fn price(&self) -> Option<f64> {
        PRICE_KEYS
            .iter()
            .find_map(|key| self.extra.get(*key).filter(|v| !v.is_null()))
            .and_then(lenient_f64)
    }

    /// Trip distance in kilometres.
    pub fn distance_km(&self) -> Option<f64> {
        if let Some(Value::String(text)) = self.extra.get("distanceText") {
            return leading_number(text);
        }
        let distance = self.extra.get("distance")?.as_f64()?;
        if distance > METRES_THRESHOLD {
            Some(distance / 1000.0)
        } else {
            Some(distance)
        }
    }

    /// Price to submit with a confirmation: the quoted trip price, else
    /// the vehicle estimate, else zero.
    pub fn confirmation_price(&self, vehicle: Option<&Vehicle>) -> f64 {
        self.price()
            .or_else(|| vehicle.and_then(|v| v.estimate_fare(self.distance_km())))
            .unwrap_or(0.0)
    }
}

/// Trip details kept client-side between the summary screen and the
/// "send trip details" step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    #[serde(default)]
    pub pickup: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default, deserialize_with = "lenient_stops")]
    pub stops: Vec<String>,
    #[serde(default = "one")]
    pub persons: u32,
    #[serde(default)]
    pub trip_price: f64,
    #[serde(default = "default_trip_type")]
    pub trip_type: String,
}

/// Request body for `POST /api/trips` on the routing service: a trip
/// summary plus the passenger's and a family member's e-mail.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct TripDispatch {
    pub pickup: String,
    pub destination: String,
    /// Stops joined with `", "`; the routing service takes a flat string.
    pub stops: String,
    pub persons: u32,
    pub trip_price: f64,
    pub trip_type: String,
    #[validate(email(message = "A valid passenger e-mail is required"))]
    pub user_email: String,
    #[validate(email(message = "A valid family e-mail is required"))]
    pub family_email: String,
}

impl TripDispatch {
    pub fn from_summary(summary: &TripSummary, user_email: &str, family_email: &str) -> Self {
        Self {
            pickup: summary.pickup.clone(),
            destination: summary.destination.clone(),
            stops: summary.stops.join(", "),
            persons: summary.persons,
            trip_price: summary.trip_price,
            trip_type: summary.trip_type.clone(),
            user_email: user_email.trim().to_string(),
            family_email: family_email.trim().to_string(),
        }
    }
}

fn one() -> u32 {
    1
}

fn default_trip_type() -> String {
    DEFAULT_TRIP_TYPE.to_string()
}

/// Stops arrive as an array, a single string, or not at all.
fn lenient_stops<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(s) if !s.is_empty() => vec![s],
        _ => Vec::new(),
    })
}

fn lenient_persons<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_f64(&value)
        .filter(|n| *n >= 0.0)
        .map(|n| n as u32))
}
