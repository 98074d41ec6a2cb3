//! Driver and admin actions: assignments and location.

use std::io::Write;
use std::sync::Arc;

use rideline_core::assignment::AssignmentConfirm;
use rideline_core::ids::extract_list;
use rideline_core::location::DriverLocation;
use rideline_tracking::{spawn_tracker, LOCATION_REFRESH_INTERVAL};

use super::{App, CliError};
use crate::output;

pub(super) async fn request_assignment(
    app: &App,
    confirmation_id: &str,
    out: &mut (dyn Write + Send),
) -> Result<(), CliError> {
    app.services.dispatch.request_assignment(confirmation_id).await?;
    writeln!(out, "Assignment requested for {confirmation_id}")?;
    Ok(())
}

pub(super) async fn confirm_assignment(
    app: &App,
    confirm: &AssignmentConfirm,
    out: &mut (dyn Write + Send),
) -> Result<(), CliError> {
    let result = app.services.dispatch.confirm_assignment(confirm).await?;

    writeln!(out, "Trip {} confirmed for driver {}", confirm.confirmation_id, confirm.driver_id)?;
    if result.is_object() {
        write!(out, "{}", output::rows(&result))?;
    }
    Ok(())
}

pub(super) async fn assignments(app: &App, driver_id: &str, out: &mut (dyn Write + Send)) -> Result<(), CliError> {
    let body = app.services.dispatch.assignments_for_driver(driver_id).await?;

    let items = extract_list(body.clone(), &["data", "assignments"]);
    if items.is_empty() && body.is_object() {
        write!(out, "{}", output::rows(&body))?;
    } else {
        write!(out, "{}", output::list(&items))?;
    }
    Ok(())
}

pub(super) async fn share_location(
    app: &App,
    driver_id: String,
    latitude: f64,
    longitude: f64,
    out: &mut (dyn Write + Send),
) -> Result<(), CliError> {
    let location = DriverLocation {
        driver_id,
        latitude,
        longitude,
    };
    if !location.is_valid() {
        return Err(CliError::InvalidLocation { latitude, longitude });
    }

    app.services.location.share(&location).await?;
    writeln!(out, "Location shared for {}", location.driver_id)?;
    Ok(())
}

/// Follow a driver's position until Ctrl-C.
pub(super) async fn track_location(app: &App, driver_id: &str, out: &mut (dyn Write + Send)) -> Result<(), CliError> {
    let tracker = spawn_tracker(Arc::new(app.services.location.clone()), driver_id, LOCATION_REFRESH_INTERVAL);
    let mut updates = tracker.subscribe();

    writeln!(out, "Tracking {driver_id}. Press Ctrl-C to stop.")?;
    out.flush()?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let changed = tokio::select! {
            changed = updates.changed() => changed.is_ok(),
            _ = &mut ctrl_c => false,
        };
        if !changed {
            break;
        }

        let fix = updates.borrow_and_update().clone();
        if let Some(fix) = fix {
            writeln!(out, "{}", output::location_line(&fix))?;
            out.flush()?;
        }
    }

    tracker.stop().await;
    Ok(())
}
