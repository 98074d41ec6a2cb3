//! The seam between the poll loop and the dispatch service.

use async_trait::async_trait;
use rideline_core::assignment::AssignmentPayload;
use rideline_services::dispatch::DispatchApi;

/// Result of a single assignment lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt {
    /// A non-empty assignment came back.
    Ready(AssignmentPayload),
    /// Nothing yet: empty 2xx body, 404, or another 4xx.
    Pending { status: Option<u16> },
    /// The service failed or could not be reached.
    Failed { status: Option<u16>, reason: String },
}

/// Something that can look up the assignment for a confirmation.
#[async_trait]
pub trait AssignmentSource: Send + Sync + 'static {
    async fn lookup(&self, confirmation_id: &str) -> Attempt;
}

#[async_trait]
impl AssignmentSource for DispatchApi {
    async fn lookup(&self, confirmation_id: &str) -> Attempt {
        match self.assignment_for_confirmation(confirmation_id).await {
            Ok(Some(payload)) => Attempt::Ready(payload),
            Ok(None) => Attempt::Pending { status: None },
            Err(e) if e.is_server_side() => Attempt::Failed {
                status: e.status(),
                reason: e.to_string(),
            },
            Err(e) => Attempt::Pending { status: e.status() },
        }
    }
}
