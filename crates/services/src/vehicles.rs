//! Vehicle service client.

use rideline_core::ids::extract_list;
use rideline_core::vehicle::{NewVehicles, Vehicle};
use validator::Validate;

use crate::error::ServiceError;
use crate::http::{self, ServiceClient};

#[derive(Debug, Clone)]
pub struct VehicleApi {
    http: ServiceClient,
}

impl VehicleApi {
    pub fn new(http: ServiceClient) -> Self {
        Self { http }
    }

    /// List available vehicles. Entries that are not objects are skipped.
    pub async fn list(&self) -> Result<Vec<Vehicle>, ServiceError> {
        let response = self.http.get(&["api", "vehicles"])?.send().await?;
        let body = http::json_or_null(response, "Failed to fetch vehicles").await?;

        Ok(extract_list(body, &["data"])
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect())
    }

    pub async fn add(&self, request: &NewVehicles) -> Result<(), ServiceError> {
        request.validate()?;

        let response = self.http.post(&["api", "vehicles"])?.json(request).send().await?;
        http::ensure_success(response, "Failed to add vehicles").await?;

        tracing::info!(vehicle_type = %request.vehicle_type, quantity = request.quantity, "Vehicles added");
        Ok(())
    }
}
