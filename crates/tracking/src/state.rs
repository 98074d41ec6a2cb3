//! Observable state of a confirmation watch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rideline_core::assignment::AssignmentPayload;
use tokio::sync::watch;

/// Notice shown when there is no confirmation to watch.
pub const MISSING_CONFIRMATION_ID_NOTICE: &str = "No confirmation ID provided.";

/// What a view should currently display.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PollState {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    /// No confirmation id was available; nothing is polled.
    MissingId,
    /// Waiting for an assignment. `attempt` counts lookups issued so far.
    Polling { confirmation_id: String, attempt: u32 },
    Resolved {
        confirmation_id: String,
        payload: AssignmentPayload,
    },
    Cancelled { confirmation_id: String },
    /// The retry policy ran out before an assignment appeared.
    GaveUp {
        confirmation_id: String,
        reason: String,
    },
}

impl PollState {
    pub fn confirmation_id(&self) -> Option<&str> {
        match self {
            PollState::Idle | PollState::MissingId => None,
            PollState::Polling { confirmation_id, .. }
            | PollState::Resolved { confirmation_id, .. }
            | PollState::Cancelled { confirmation_id }
            | PollState::GaveUp { confirmation_id, .. } => Some(confirmation_id),
        }
    }

    /// Whether no further change will happen without a new watch.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Idle | PollState::Polling { .. })
    }

    pub fn payload(&self) -> Option<&AssignmentPayload> {
        match self {
            PollState::Resolved { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

/// Writes [`PollState`] on behalf of one poll loop.
///
/// Several loops may share a channel over time (one per confirmation
/// id). Each publisher carries the generation it was created for and
/// its writes are dropped once the owner has moved on to a newer one,
/// so a cancelled loop can never overwrite the state of its successor.
#[derive(Debug, Clone)]
pub(crate) struct StatePublisher {
    tx: Arc<watch::Sender<PollState>>,
    current: Arc<AtomicU64>,
    generation: u64,
}

impl StatePublisher {
    /// A publisher with a channel of its own.
    pub(crate) fn standalone() -> (Self, watch::Receiver<PollState>) {
        let (tx, rx) = watch::channel(PollState::Idle);
        let publisher = Self {
            tx: Arc::new(tx),
            current: Arc::new(AtomicU64::new(0)),
            generation: 0,
        };
        (publisher, rx)
    }

    pub(crate) fn new(
        tx: Arc<watch::Sender<PollState>>,
        current: Arc<AtomicU64>,
        generation: u64,
    ) -> Self {
        Self {
            tx,
            current,
            generation,
        }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<PollState> {
        self.tx.subscribe()
    }

    /// Publish `state` unless this publisher has been superseded.
    pub(crate) fn publish(&self, state: PollState) -> bool {
        self.tx.send_if_modified(|slot| {
            if self.current.load(Ordering::SeqCst) != self.generation {
                return false;
            }
            *slot = state;
            true
        })
    }
}
