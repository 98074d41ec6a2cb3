//! Dispatch service client: confirmations and driver assignments.

use rideline_core::assignment::{AssignmentConfirm, AssignmentPayload, AssignmentRequest};
use rideline_core::confirmation::{parse_confirmation_list, Confirmation, NewConfirmation};
use rideline_core::ids::{require_id, CONFIRMATION_ID_KEYS};
use serde_json::Value;
use validator::Validate;

use crate::error::ServiceError;
use crate::http::{self, ServiceClient};

#[derive(Debug, Clone)]
pub struct DispatchApi {
    http: ServiceClient,
}

impl DispatchApi {
    pub fn new(http: ServiceClient) -> Self {
        Self { http }
    }

    // ---- confirmations ----

    /// Create a confirmation and return its identifier.
    pub async fn create_confirmation(&self, body: &NewConfirmation) -> Result<String, ServiceError> {
        let response = self
            .http
            .post(&["api", "confirmations"])?
            .json(body)
            .send()
            .await?;

        let created = http::json_or_null(response, "Failed to create confirmation").await?;
        let id = require_id(&created, CONFIRMATION_ID_KEYS, "Confirmation")?;

        tracing::info!(confirmation_id = %id, vehicle_type = %body.vehicle_type, "Confirmation created");
        Ok(id)
    }

    pub async fn list_confirmations(&self) -> Result<Vec<Confirmation>, ServiceError> {
        let response = self.http.get(&["api", "confirmations"])?.send().await?;
        let body = http::json_or_null(response, "Failed to fetch confirmations").await?;
        Ok(parse_confirmation_list(body))
    }

    /// Full trip details behind a confirmation.
    pub async fn get_confirmation(&self, confirmation_id: &str) -> Result<Value, ServiceError> {
        let response = self
            .http
            .get(&["api", "confirmations", confirmation_id])?
            .send()
            .await?;
        http::parse_json(response, "Failed to fetch trip details").await
    }

    pub async fn delete_confirmation(&self, confirmation_id: &str) -> Result<(), ServiceError> {
        let response = self
            .http
            .delete(&["api", "confirmations", confirmation_id])?
            .send()
            .await?;
        http::ensure_success(response, "Failed to delete confirmation").await?;

        tracing::info!(confirmation_id, "Confirmation deleted");
        Ok(())
    }

    // ---- assignments ----

    /// A driver accepts a confirmation.
    pub async fn confirm_assignment(&self, body: &AssignmentConfirm) -> Result<Value, ServiceError> {
        body.validate()?;

        let response = self
            .http
            .post(&["api", "assignments", "confirm"])?
            .json(body)
            .send()
            .await?;
        let result = http::json_or_null(response, "Failed to confirm trip").await?;

        tracing::info!(
            confirmation_id = %body.confirmation_id,
            driver_id = %body.driver_id,
            "Assignment confirmed",
        );
        Ok(result)
    }

    /// An admin asks the dispatch service to assign a driver.
    pub async fn request_assignment(&self, confirmation_id: &str) -> Result<(), ServiceError> {
        let body = AssignmentRequest {
            confirmation_id: confirmation_id.to_string(),
        };
        let response = self
            .http
            .post(&["api", "assignments"])?
            .json(&body)
            .send()
            .await?;
        http::ensure_success(response, "Failed to confirm assignment").await?;

        tracing::info!(confirmation_id, "Assignment requested");
        Ok(())
    }

    /// Look up the assignment for a confirmation.
    ///
    /// `Ok(None)` means the service answered 2xx with an empty body.
    /// Non-2xx answers are errors; the caller decides whether a 404
    /// means "not yet".
    pub async fn assignment_for_confirmation(
        &self,
        confirmation_id: &str,
    ) -> Result<Option<AssignmentPayload>, ServiceError> {
        let response = self
            .http
            .get(&["api", "assignments", "confirmation", confirmation_id])?
            .send()
            .await?;
        let body = http::json_or_null(response, "Failed to fetch assignment").await?;
        Ok(AssignmentPayload::from_value(body))
    }

    /// All assignments of one driver, as returned by the service.
    pub async fn assignments_for_driver(&self, driver_id: &str) -> Result<Value, ServiceError> {
        let response = self
            .http
            .get(&["api", "assignments", "driver", driver_id])?
            .send()
            .await?;
        http::parse_json(response, "Failed to fetch assignments").await
    }
}
