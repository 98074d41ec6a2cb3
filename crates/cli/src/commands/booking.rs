//! Passenger flow: trip request, vehicle choice, confirmation.

use std::io::Write;

use rideline_core::confirmation::NewConfirmation;
use rideline_core::trip::{NewTrip, TripSummary, DEFAULT_TRIP_TYPE};
use rideline_core::vehicle::{NewVehicles, Vehicle};

use super::{App, CliError};
use crate::output;

pub(super) async fn create_trip(
    app: &App,
    pickup: &str,
    destination: &str,
    stops: &[String],
    persons: u32,
    out: &mut (dyn Write + Send),
) -> Result<(), CliError> {
    let trip = NewTrip::new(pickup, destination, stops, persons);
    let trip_id = app.services.trips.create(&trip).await?;

    writeln!(out, "Trip created: {trip_id}")?;
    writeln!(out, "Next: rideline vehicles list --trip {trip_id}")?;
    Ok(())
}

pub(super) async fn show_trip(app: &App, trip_id: &str, out: &mut (dyn Write + Send)) -> Result<(), CliError> {
    let trip = app.services.trips.get(trip_id).await?;

    write!(out, "{}", output::rows(&serde_json::to_value(&trip).unwrap_or_default()))?;
    if let Some(km) = trip.distance_km() {
        writeln!(out, "Distance: {km:.1} km")?;
    }
    Ok(())
}

pub(super) async fn list_vehicles(
    app: &App,
    trip_id: Option<&str>,
    out: &mut (dyn Write + Send),
) -> Result<(), CliError> {
    let distance_km = match trip_id {
        Some(id) => app.services.trips.get(id).await?.distance_km(),
        None => None,
    };
    let vehicles = app.services.vehicles.list().await?;

    if vehicles.is_empty() {
        writeln!(out, "No vehicles available.")?;
    }
    for vehicle in &vehicles {
        writeln!(out, "{}", output::vehicle_line(vehicle, distance_km))?;
    }
    Ok(())
}

pub(super) async fn add_vehicles(
    app: &App,
    vehicle_type: &str,
    quantity: u32,
    out: &mut (dyn Write + Send),
) -> Result<(), CliError> {
    let request = NewVehicles::new(vehicle_type, quantity);
    app.services.vehicles.add(&request).await?;

    writeln!(out, "Added {} x {}", request.quantity, request.vehicle_type)?;
    Ok(())
}

/// Confirm `trip_id` with a vehicle and remember the confirmation for
/// `rideline status`.
pub(super) async fn confirm(
    app: &App,
    trip_id: &str,
    vehicle_id: Option<&str>,
    out: &mut (dyn Write + Send),
) -> Result<(), CliError> {
    let trip = app.services.trips.get(trip_id).await?;

    let vehicle = match vehicle_id {
        Some(id) => {
            let vehicle = find_vehicle(app, id).await?;
            app.session.set_selected_vehicle(&vehicle)?;
            Some(vehicle)
        }
        None => app.session.selected_vehicle()?,
    };

    let body = NewConfirmation::from_trip(&trip, vehicle.as_ref());
    let confirmation_id = app.services.dispatch.create_confirmation(&body).await?;

    app.session.set_last_confirmation_id(&confirmation_id)?;
    app.session.set_trip_summary(&TripSummary {
        pickup: body.pickup.clone(),
        destination: body.destination.clone(),
        stops: body.stops.clone(),
        persons: body.persons,
        trip_price: body.trip_price,
        trip_type: DEFAULT_TRIP_TYPE.to_string(),
    })?;

    writeln!(out, "Confirmation created: {confirmation_id}")?;
    writeln!(out, "Vehicle: {}  Fare: {:.2}", body.vehicle_type, body.trip_price)?;
    writeln!(out, "Next: rideline status")?;
    Ok(())
}

async fn find_vehicle(app: &App, vehicle_id: &str) -> Result<Vehicle, CliError> {
    app.services
        .vehicles
        .list()
        .await?
        .into_iter()
        .find(|v| v.id().as_deref() == Some(vehicle_id))
        .ok_or_else(|| CliError::VehicleNotFound(vehicle_id.to_string()))
}

pub(super) async fn list_confirmations(app: &App, out: &mut (dyn Write + Send)) -> Result<(), CliError> {
    let confirmations = app.services.dispatch.list_confirmations().await?;
    if confirmations.is_empty() {
        writeln!(out, "No confirmations.")?;
    }
    for confirmation in &confirmations {
        writeln!(
            out,
            "{}  {}  {}",
            confirmation.id().unwrap_or_default(),
            confirmation.status().unwrap_or("pending"),
            confirmation
                .trip_price()
                .map(|p| format!("{p:.2}"))
                .unwrap_or_default(),
        )?;
    }
    Ok(())
}

pub(super) async fn show_confirmation(
    app: &App,
    confirmation_id: &str,
    out: &mut (dyn Write + Send),
) -> Result<(), CliError> {
    let details = app.services.dispatch.get_confirmation(confirmation_id).await?;
    write!(out, "{}", output::rows(&details))?;
    Ok(())
}

pub(super) async fn delete_confirmation(
    app: &App,
    confirmation_id: &str,
    out: &mut (dyn Write + Send),
) -> Result<(), CliError> {
    app.services.dispatch.delete_confirmation(confirmation_id).await?;
    writeln!(out, "Deleted confirmation {confirmation_id}")?;
    Ok(())
}
