//! Routing service client: dispatched trip records and computed routes.

use rideline_core::ids::{extract_list, require_id, TRIP_ID_KEYS};
use rideline_core::route::{RouteInfo, RouteRequest};
use rideline_core::trip::TripDispatch;
use serde_json::Value;
use validator::Validate;

use crate::error::ServiceError;
use crate::http::{self, ServiceClient};

#[derive(Debug, Clone)]
pub struct RoutingApi {
    http: ServiceClient,
}

impl RoutingApi {
    pub fn new(http: ServiceClient) -> Self {
        Self { http }
    }

    /// Send the final trip details, including who to notify.
    pub async fn send_trip_details(&self, dispatch: &TripDispatch) -> Result<(), ServiceError> {
        dispatch.validate()?;

        let response = self.http.post(&["api", "trips"])?.json(dispatch).send().await?;
        http::ensure_success(response, "Failed to send trip details").await?;

        tracing::info!(pickup = %dispatch.pickup, destination = %dispatch.destination, "Trip details sent");
        Ok(())
    }

    /// Confirmed trips known to the routing service.
    pub async fn list_trips(&self) -> Result<Vec<Value>, ServiceError> {
        let response = self.http.get(&["api", "trips"])?.send().await?;
        let body = http::json_or_null(response, "Failed to load trips").await?;
        Ok(extract_list(body, &["data", "trips"]))
    }

    /// Register a trip with coordinates; returns the routing trip id.
    pub async fn plan(&self, request: &RouteRequest) -> Result<String, ServiceError> {
        let response = self.http.post(&["api", "trips"])?.json(request).send().await?;
        let body = http::json_or_null(response, "Failed to create route trip").await?;
        Ok(require_id(&body, TRIP_ID_KEYS, "Trip")?)
    }

    pub async fn route(&self, trip_id: &str) -> Result<RouteInfo, ServiceError> {
        let response = self
            .http
            .get(&["api", "trips", trip_id, "route"])?
            .send()
            .await?;
        http::parse_json(response, "Failed to fetch route").await
    }
}
