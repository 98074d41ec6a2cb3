//! A single-slot owner of the confirmation poll loop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::policy::RetryPolicy;
use crate::poller::{self, PollHandle};
use crate::source::AssignmentSource;
use crate::state::{PollState, StatePublisher, MISSING_CONFIRMATION_ID_NOTICE};

/// Watches one confirmation at a time.
///
/// Starting a watch on a new id cancels the running loop before the new
/// one is spawned. State is published on one channel for the lifetime of
/// the watcher; writes from a superseded loop are discarded. Dropping
/// the watcher cancels whatever is running.
pub struct StatusWatcher<S: AssignmentSource> {
    source: Arc<S>,
    policy: RetryPolicy,
    tx: Arc<watch::Sender<PollState>>,
    generation: Arc<AtomicU64>,
    current: Option<PollHandle>,
}

impl<S: AssignmentSource> StatusWatcher<S> {
    pub fn new(source: Arc<S>, policy: RetryPolicy) -> Self {
        let (tx, _) = watch::channel(PollState::Idle);
        Self {
            source,
            policy,
            tx: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            current: None,
        }
    }

    /// Point the watcher at `confirmation_id`.
    ///
    /// `None` (or a blank id) stops polling and publishes
    /// [`PollState::MissingId`] without touching the network. Watching
    /// the id that is already being polled, or has already resolved, is
    /// a no-op.
    pub fn watch(&mut self, confirmation_id: Option<&str>) {
        let confirmation_id = confirmation_id.map(str::trim).filter(|id| !id.is_empty());

        if let Some(id) = confirmation_id {
            if self.is_watching(id) {
                tracing::debug!(confirmation_id = id, "Already watching confirmation");
                return;
            }
        }

        if let Some(previous) = self.current.take() {
            previous.cancel();
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let publisher = StatePublisher::new(self.tx.clone(), self.generation.clone(), generation);

        match confirmation_id {
            None => {
                tracing::info!("{MISSING_CONFIRMATION_ID_NOTICE}");
                publisher.publish(PollState::MissingId);
            }
            Some(id) => {
                self.current = Some(poller::spawn_with_publisher(
                    self.source.clone(),
                    id.to_string(),
                    self.policy.clone(),
                    publisher,
                ));
            }
        }
    }

    /// Cancel the running loop, if any. The last state becomes
    /// [`PollState::Cancelled`] unless the loop had already finished.
    pub fn stop(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.cancel();
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.tx.subscribe()
    }

    pub fn state(&self) -> PollState {
        self.tx.borrow().clone()
    }

    /// The id of the running (or last resolved) loop.
    pub fn current_id(&self) -> Option<&str> {
        self.current.as_ref().map(PollHandle::confirmation_id)
    }

    /// Wait until the published state is terminal and return it.
    ///
    /// Never returns while the watcher is idle.
    pub async fn settled(&self) -> PollState {
        let mut rx = self.subscribe();
        let settled = match rx.wait_for(PollState::is_terminal).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }

    fn is_watching(&self, confirmation_id: &str) -> bool {
        if self.current_id() != Some(confirmation_id) {
            return false;
        }
        matches!(
            &*self.tx.borrow(),
            PollState::Polling { .. } | PollState::Resolved { .. }
        )
    }
}
