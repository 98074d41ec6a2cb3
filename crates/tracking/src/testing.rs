//! Scripted fakes shared by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rideline_core::assignment::AssignmentPayload;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::source::{AssignmentSource, Attempt};

pub(crate) fn payload(value: Value) -> AssignmentPayload {
    AssignmentPayload::from_value(value).expect("non-empty payload")
}

/// One lookup seen by a [`ScriptedSource`].
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub confirmation_id: String,
    pub at: Instant,
}

pub(crate) struct Calls(mpsc::UnboundedReceiver<Call>);

impl Calls {
    pub async fn recv(&mut self) -> Option<Call> {
        self.0.recv().await
    }

    /// Everything recorded so far, without waiting.
    pub fn drain(&mut self) -> Vec<Call> {
        let mut seen = Vec::new();
        while let Ok(call) = self.0.try_recv() {
            seen.push(call);
        }
        seen
    }
}

/// Answers lookups from a script, then repeats `fallback` forever.
pub(crate) struct ScriptedSource {
    script: Mutex<VecDeque<Attempt>>,
    fallback: Attempt,
    latency: Duration,
    calls: mpsc::UnboundedSender<Call>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Attempt>, fallback: Attempt) -> (Arc<Self>, Calls) {
        let (tx, rx) = mpsc::unbounded_channel();
        let source = Self {
            script: Mutex::new(script.into()),
            fallback,
            latency: Duration::ZERO,
            calls: tx,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        };
        (Arc::new(source), Calls(rx))
    }

    /// Make every lookup take `latency` before answering.
    pub fn with_latency(self: Arc<Self>, latency: Duration) -> Arc<Self> {
        let mut source = Arc::try_unwrap(self).unwrap_or_else(|_| panic!("source already shared"));
        source.latency = latency;
        Arc::new(source)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssignmentSource for ScriptedSource {
    async fn lookup(&self, confirmation_id: &str) -> Attempt {
        let _ = self.calls.send(Call {
            confirmation_id: confirmation_id.to_string(),
            at: Instant::now(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}
