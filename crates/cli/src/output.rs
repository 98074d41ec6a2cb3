//! Plain-text rendering for terminal output.

use std::fmt::Write;

use rideline_core::display::{field_rows, format_value, EMPTY_PLACEHOLDER};
use rideline_core::location::LocationFix;
use rideline_core::vehicle::Vehicle;
use serde_json::Value;

/// Render an object as aligned `key: value` lines.
pub fn rows(value: &Value) -> String {
    let rows = field_rows(value);
    let width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for (key, value) in rows {
        let _ = writeln!(out, "  {key:<width$}  {value}");
    }
    out
}

/// Render a list response: one block of rows per item.
pub fn list(items: &[Value]) -> String {
    if items.is_empty() {
        return "  (none)\n".to_string();
    }
    items.iter().map(rows).collect::<Vec<_>>().join("\n")
}

/// One catalogue line per vehicle, with the fare estimate when a trip
/// distance is known.
pub fn vehicle_line(vehicle: &Vehicle, distance_km: Option<f64>) -> String {
    let id = vehicle.id().unwrap_or_else(|| EMPTY_PLACEHOLDER.to_string());
    let vehicle_type = vehicle.vehicle_type.as_deref().unwrap_or(EMPTY_PLACEHOLDER);
    let seats = vehicle
        .seats()
        .map(|s| s.to_string())
        .unwrap_or_else(|| EMPTY_PLACEHOLDER.to_string());

    let mut line = format!("{id}  {}  [{vehicle_type}]  seats: {seats}", vehicle.title());
    if let Some(fare) = vehicle.estimate_fare(distance_km) {
        let _ = write!(line, "  est. fare: {fare:.2}");
    }
    line
}

pub fn location_line(fix: &LocationFix) -> String {
    format!(
        "[{}] {}: {:.6}, {:.6}",
        fix.received_at.format("%H:%M:%S"),
        fix.location.driver_id,
        fix.location.latitude,
        fix.location.longitude,
    )
}

/// Single-value rendering, for headline fields.
pub fn value(value: Option<&Value>) -> String {
    value.map(format_value).unwrap_or_else(|| EMPTY_PLACEHOLDER.to_string())
}
