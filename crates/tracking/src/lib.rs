//! `rideline-tracking` -- client-side polling of dispatch state.
//!
//! The dispatch service has no push channel, so the client discovers a
//! driver assignment by re-querying it:
//!
//! - [`poller`] runs one poll loop for one confirmation and hands back a
//!   [`poller::PollHandle`] that cancels the loop when dropped.
//! - [`watcher::StatusWatcher`] owns at most one loop and restarts it when
//!   the confirmation id changes.
//! - [`tracker`] periodically refreshes a driver's location.

pub mod policy;
pub mod poller;
pub mod source;
pub mod state;
pub mod tracker;
pub mod watcher;

#[cfg(test)]
mod testing;

pub use policy::{Backoff, RetryPolicy};
pub use poller::{spawn_poll, PollError, PollHandle};
pub use source::{AssignmentSource, Attempt};
pub use state::{PollState, MISSING_CONFIRMATION_ID_NOTICE};
pub use tracker::{spawn_tracker, LocationSource, TrackerHandle, LOCATION_REFRESH_INTERVAL};
pub use watcher::StatusWatcher;
