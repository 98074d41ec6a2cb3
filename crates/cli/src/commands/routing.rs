//! Routing service commands: trip dispatch records and route planning.

use std::io::Write;

use rideline_core::route::RouteRequest;
use rideline_core::trip::TripDispatch;

use super::{App, CliError};
use crate::args::RoutePlanArgs;
use crate::output;

pub(super) async fn send_trip(
    app: &App,
    user_email: &str,
    family_email: &str,
    out: &mut (dyn Write + Send),
) -> Result<(), CliError> {
    let summary = app.session.trip_summary()?.ok_or(CliError::NoTripSummary)?;
    let dispatch = TripDispatch::from_summary(&summary, user_email, family_email);
    app.services.routing.send_trip_details(&dispatch).await?;

    writeln!(
        out,
        "Trip details sent to {} and {}",
        dispatch.user_email, dispatch.family_email
    )?;
    Ok(())
}

pub(super) async fn list_trips(app: &App, out: &mut (dyn Write + Send)) -> Result<(), CliError> {
    let trips = app.services.routing.list_trips().await?;
    write!(out, "{}", output::list(&trips))?;
    Ok(())
}

pub(super) async fn plan(app: &App, args: RoutePlanArgs, out: &mut (dyn Write + Send)) -> Result<(), CliError> {
    let (stops, stops_coords) = args.stops.into_iter().unzip();
    let request = RouteRequest {
        pickup: args.pickup,
        destination: args.destination,
        stops,
        pickup_coord: args.pickup_coord,
        destination_coord: args.destination_coord,
        stops_coords,
        persons: args.persons,
        vehicle_type: args.vehicle_type,
        price: args.price,
    };
    let trip_id = app.services.routing.plan(&request).await?;

    writeln!(out, "Route trip created: {trip_id}")?;
    Ok(())
}

pub(super) async fn show(app: &App, trip_id: &str, out: &mut (dyn Write + Send)) -> Result<(), CliError> {
    let route = app.services.routing.route(trip_id).await?;

    match route.distance_m() {
        Some(m) => writeln!(out, "Distance: {:.2} km", m / 1000.0)?,
        None => writeln!(out, "Distance: {}", output::value(None))?,
    }
    match route.duration_s() {
        Some(s) => writeln!(out, "Duration: {:.0} min", s / 60.0)?,
        None => writeln!(out, "Duration: {}", output::value(None))?,
    }
    let points = route
        .geometry
        .get("coordinates")
        .and_then(|c| c.as_array())
        .map_or(0, Vec::len);
    writeln!(out, "Points:   {points}")?;
    Ok(())
}
