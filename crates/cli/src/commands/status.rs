//! Waiting for and looking up driver assignments.

use std::io::Write;
use std::sync::Arc;

use rideline_tracking::{PollState, StatusWatcher, MISSING_CONFIRMATION_ID_NOTICE};

use super::{App, CliError};
use crate::output;

/// Poll the dispatch service until a driver is assigned, the policy
/// gives up, or the user presses Ctrl-C.
pub(super) async fn watch(
    app: &App,
    explicit_id: Option<&str>,
    out: &mut (dyn Write + Send),
) -> Result<(), CliError> {
    let confirmation_id = app.session.resolve_confirmation_id(explicit_id);

    let mut watcher = StatusWatcher::new(Arc::new(app.services.dispatch.clone()), app.poll_policy.clone());
    watcher.watch(confirmation_id.as_deref());

    let Some(confirmation_id) = confirmation_id else {
        writeln!(out, "{MISSING_CONFIRMATION_ID_NOTICE}")?;
        return Ok(());
    };
    writeln!(out, "Waiting for a driver to be assigned to {confirmation_id}...")?;
    out.flush()?;

    let settled = tokio::select! {
        state = watcher.settled() => Some(state),
        _ = tokio::signal::ctrl_c() => None,
    };

    let Some(state) = settled else {
        watcher.stop();
        writeln!(out, "Stopped waiting.")?;
        return Ok(());
    };

    match state {
        PollState::Resolved { payload, .. } => {
            writeln!(out, "Driver assigned:")?;
            write!(out, "{}", output::rows(payload.as_value()))?;
            Ok(())
        }
        PollState::GaveUp { reason, .. } => Err(CliError::GaveUp(reason)),
        PollState::Cancelled { .. } => {
            writeln!(out, "Stopped waiting.")?;
            Ok(())
        }
        PollState::Idle | PollState::MissingId | PollState::Polling { .. } => Ok(()),
    }
}

/// Single lookup of the driver assigned to a confirmation.
pub(super) async fn driver_id(
    app: &App,
    confirmation_id: &str,
    out: &mut (dyn Write + Send),
) -> Result<(), CliError> {
    let assignment = match app.services.dispatch.assignment_for_confirmation(confirmation_id).await {
        Ok(assignment) => assignment,
        Err(e) if e.status() == Some(404) => None,
        Err(e) => return Err(e.into()),
    };

    match assignment.as_ref().and_then(|a| a.driver_id()) {
        Some(driver_id) => writeln!(out, "{driver_id}")?,
        None => writeln!(out, "No driver assigned yet.")?,
    }
    Ok(())
}
