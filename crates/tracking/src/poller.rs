//! Confirmation status poll loop.
//!
//! [`spawn_poll`] starts a task that looks up the assignment for one
//! confirmation until a non-empty payload comes back. Lookups never
//! overlap: the next one is scheduled only after the previous one has
//! settled. The returned [`PollHandle`] owns the loop's
//! [`CancellationToken`] through a drop guard, so the loop stops on
//! every exit path of its owner.

use std::sync::Arc;
use std::time::Duration;

use rideline_core::assignment::AssignmentPayload;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::policy::RetryPolicy;
use crate::source::{AssignmentSource, Attempt};
use crate::state::{PollState, StatePublisher};

/// Why a poll loop ended without an assignment.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("Polling was cancelled")]
    Cancelled,

    #[error("No assignment after {attempts} attempts")]
    Exhausted { attempts: u32 },

    #[error("Assignment lookup failed {failures} times in a row: {last_error}")]
    Failed { failures: u32, last_error: String },

    #[error("Poll task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Owner of a running poll loop.
///
/// Dropping the handle cancels the loop.
pub struct PollHandle {
    confirmation_id: String,
    cancel: CancellationToken,
    state: watch::Receiver<PollState>,
    task: JoinHandle<Result<AssignmentPayload, PollError>>,
    _guard: DropGuard,
}

impl PollHandle {
    pub fn confirmation_id(&self) -> &str {
        &self.confirmation_id
    }

    /// Subscribe to state changes of this loop.
    pub fn state(&self) -> watch::Receiver<PollState> {
        self.state.clone()
    }

    /// Stop polling. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the loop to end and return the assignment it found.
    ///
    /// Dropping the returned future before it completes cancels the loop.
    pub async fn wait(self) -> Result<AssignmentPayload, PollError> {
        let PollHandle {
            task, _guard: guard, ..
        } = self;
        let result = task.await?;
        drop(guard);
        result
    }
}

/// Start polling `source` for the assignment of `confirmation_id`.
pub fn spawn_poll<S: AssignmentSource>(
    source: Arc<S>,
    confirmation_id: impl Into<String>,
    policy: RetryPolicy,
) -> PollHandle {
    let (publisher, _) = StatePublisher::standalone();
    spawn_with_publisher(source, confirmation_id.into(), policy, publisher)
}

pub(crate) fn spawn_with_publisher<S: AssignmentSource>(
    source: Arc<S>,
    confirmation_id: String,
    policy: RetryPolicy,
    publisher: StatePublisher,
) -> PollHandle {
    let cancel = CancellationToken::new();
    let state = publisher.subscribe();

    let task = {
        let cancel = cancel.clone();
        let confirmation_id = confirmation_id.clone();
        tokio::spawn(async move {
            let result = run(&*source, &confirmation_id, &policy, &cancel, &publisher).await;
            publisher.publish(final_state(&confirmation_id, &result));
            result
        })
    };

    PollHandle {
        confirmation_id,
        _guard: cancel.clone().drop_guard(),
        cancel,
        state,
        task,
    }
}

/// Drive the lookup loop until an assignment appears, the policy gives
/// up, or `cancel` fires.
async fn run<S: AssignmentSource + ?Sized>(
    source: &S,
    confirmation_id: &str,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    publisher: &StatePublisher,
) -> Result<AssignmentPayload, PollError> {
    let mut delay = policy.interval;
    let mut attempt = 0u32;
    let mut consecutive_failures = 0u32;

    tracing::info!(confirmation_id, "Waiting for driver assignment");

    loop {
        if cancel.is_cancelled() {
            return Err(PollError::Cancelled);
        }

        attempt += 1;
        publisher.publish(PollState::Polling {
            confirmation_id: confirmation_id.to_string(),
            attempt,
        });

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PollError::Cancelled),
            outcome = source.lookup(confirmation_id) => outcome,
        };

        match outcome {
            Attempt::Ready(payload) => {
                tracing::info!(
                    confirmation_id,
                    attempt,
                    driver_id = payload.driver_id().as_deref().unwrap_or("-"),
                    "Driver assignment found",
                );
                return Ok(payload);
            }
            Attempt::Pending { status } => {
                consecutive_failures = 0;
                tracing::debug!(confirmation_id, attempt, ?status, "Assignment not available yet");
            }
            Attempt::Failed { status, reason } => {
                consecutive_failures += 1;
                tracing::warn!(
                    confirmation_id,
                    attempt,
                    ?status,
                    error = %reason,
                    "Assignment lookup failed",
                );
                if policy.failures_exhausted(consecutive_failures) {
                    return Err(PollError::Failed {
                        failures: consecutive_failures,
                        last_error: reason,
                    });
                }
            }
        }

        if policy.attempts_exhausted(attempt) {
            return Err(PollError::Exhausted { attempts: attempt });
        }

        // Wait before the next attempt, respecting cancellation.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PollError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }

        delay = policy.next_delay(delay);
    }
}

fn final_state(confirmation_id: &str, result: &Result<AssignmentPayload, PollError>) -> PollState {
    let confirmation_id = confirmation_id.to_string();
    match result {
        Ok(payload) => PollState::Resolved {
            confirmation_id,
            payload: payload.clone(),
        },
        Err(PollError::Cancelled) => {
            tracing::info!(%confirmation_id, "Stopped waiting for assignment");
            PollState::Cancelled { confirmation_id }
        }
        Err(e) => {
            tracing::warn!(%confirmation_id, error = %e, "Gave up waiting for assignment");
            PollState::GaveUp {
                confirmation_id,
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{payload, ScriptedSource};
    use assert_matches::assert_matches;
    use serde_json::json;

    const INTERVAL: Duration = Duration::from_secs(2);

    fn pending_404() -> Attempt {
        Attempt::Pending { status: Some(404) }
    }

    fn server_error() -> Attempt {
        Attempt::Failed {
            status: Some(503),
            reason: "Service Unavailable".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_immediately_without_further_requests() {
        let body = json!({ "driver_id": "D1", "status": "confirmed" });
        let (source, mut calls) = ScriptedSource::new(vec![Attempt::Ready(payload(body.clone()))], pending_404());

        let handle = spawn_poll(source, "conf-1", RetryPolicy::default());
        let assignment = handle.wait().await.unwrap();
        assert_eq!(assignment.as_value(), &body);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(calls.drain().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_once_after_interval_then_resolves() {
        let body = json!({ "driver_id": "D1", "vehicle_no": "KA09AB1234", "status": "confirmed" });
        let (source, mut calls) =
            ScriptedSource::new(vec![pending_404(), Attempt::Ready(payload(body.clone()))], pending_404());

        let handle = spawn_poll(source, "conf-123", RetryPolicy::default());
        let assignment = handle.wait().await.unwrap();
        assert_eq!(assignment.as_value(), &body);

        tokio::time::sleep(Duration::from_secs(30)).await;
        let seen = calls.drain();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|c| c.confirmation_id == "conf-123"));

        let gap = seen[1].at - seen[0].at;
        assert!(gap >= INTERVAL && gap < INTERVAL + Duration::from_millis(100), "gap was {gap:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn failures_count_as_pending_by_default() {
        let (source, mut calls) = ScriptedSource::new(
            vec![
                server_error(),
                server_error(),
                Attempt::Pending { status: None },
                Attempt::Ready(payload(json!({ "driver_id": "D2" }))),
            ],
            pending_404(),
        );

        let assignment = spawn_poll(source, "conf-2", RetryPolicy::default()).wait().await.unwrap();
        assert_eq!(assignment.driver_id().as_deref(), Some("D2"));
        assert_eq!(calls.drain().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn requests_never_overlap() {
        let latency = Duration::from_millis(1500);
        let (source, mut calls) = ScriptedSource::new(vec![], pending_404());
        let source = source.with_latency(latency);

        let policy = RetryPolicy::default().with_max_attempts(5);
        let result = spawn_poll(source.clone(), "conf-3", policy).wait().await;
        assert_matches!(result, Err(PollError::Exhausted { attempts: 5 }));

        assert_eq!(source.max_in_flight(), 1);

        let seen = calls.drain();
        assert_eq!(seen.len(), 5);
        for pair in seen.windows(2) {
            assert!(pair[1].at - pair[0].at >= latency + INTERVAL);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_requests() {
        let (source, mut calls) = ScriptedSource::new(vec![], pending_404());

        let handle = spawn_poll(source, "conf-4", RetryPolicy::default());
        let first = calls.recv().await.unwrap();
        assert_eq!(first.confirmation_id, "conf-4");

        drop(handle);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(calls.drain().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_request_ends_with_cancelled_state() {
        let (source, mut calls) = ScriptedSource::new(vec![], pending_404());
        let source = source.with_latency(Duration::from_secs(5));

        let handle = spawn_poll(source, "conf-5", RetryPolicy::default());
        let mut state = handle.state();
        calls.recv().await.unwrap();

        handle.cancel();
        assert_matches!(handle.wait().await, Err(PollError::Cancelled));

        state.changed().await.ok();
        assert_matches!(&*state.borrow(), PollState::Cancelled { confirmation_id } if confirmation_id == "conf-5");
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_consecutive_failures() {
        let (source, mut calls) = ScriptedSource::new(vec![], server_error());

        let policy = RetryPolicy::default().with_max_consecutive_failures(3);
        let handle = spawn_poll(source, "conf-6", policy);
        let state = handle.state();

        let result = handle.wait().await;
        assert_matches!(result, Err(PollError::Failed { failures: 3, .. }));
        assert_eq!(calls.drain().len(), 3);
        assert_matches!(&*state.borrow(), PollState::GaveUp { .. });
    }

    #[tokio::test(start_paused = true)]
    async fn pending_answers_reset_the_failure_budget() {
        let (source, _calls) = ScriptedSource::new(
            vec![
                server_error(),
                server_error(),
                pending_404(),
                server_error(),
                server_error(),
                Attempt::Ready(payload(json!({ "driver_id": "D7" }))),
            ],
            pending_404(),
        );

        let policy = RetryPolicy::default().with_max_consecutive_failures(3);
        let assignment = spawn_poll(source, "conf-7", policy).wait().await.unwrap();
        assert_eq!(assignment.driver_id().as_deref(), Some("D7"));
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_spaces_out_attempts() {
        let (source, mut calls) = ScriptedSource::new(vec![], pending_404());
        let policy = RetryPolicy::fixed(Duration::from_secs(1))
            .with_backoff(crate::policy::Backoff::default())
            .with_max_attempts(4);

        let result = spawn_poll(source, "conf-8", policy).wait().await;
        assert_matches!(result, Err(PollError::Exhausted { attempts: 4 }));

        let seen = calls.drain();
        let gaps: Vec<u64> = seen.windows(2).map(|p| (p[1].at - p[0].at).as_secs()).collect();
        assert_eq!(gaps, vec![1, 2, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn resolved_state_carries_the_payload() {
        let body = json!({ "driver_id": "D9" });
        let (source, _calls) = ScriptedSource::new(vec![Attempt::Ready(payload(body.clone()))], pending_404());

        let handle = spawn_poll(source, "conf-9", RetryPolicy::default());
        let state = handle.state();
        handle.wait().await.unwrap();

        let current = state.borrow().clone();
        assert_eq!(current.confirmation_id(), Some("conf-9"));
        assert_eq!(current.payload().map(|p| p.as_value()), Some(&body));
    }
}
