//! Location service client: drivers share positions, passengers read
//! them.

use rideline_core::location::DriverLocation;

use crate::error::ServiceError;
use crate::http::{self, ServiceClient};

#[derive(Debug, Clone)]
pub struct LocationApi {
    http: ServiceClient,
}

impl LocationApi {
    pub fn new(http: ServiceClient) -> Self {
        Self { http }
    }

    pub async fn share(&self, location: &DriverLocation) -> Result<(), ServiceError> {
        let response = self.http.post(&["api", "location"])?.json(location).send().await?;
        http::ensure_success(response, "Failed to share location").await?;

        tracing::debug!(driver_id = %location.driver_id, "Location shared");
        Ok(())
    }

    pub async fn get(&self, driver_id: &str) -> Result<DriverLocation, ServiceError> {
        let response = self.http.get(&["api", "location", driver_id])?.send().await?;
        http::parse_json(response, "Failed to fetch location").await
    }
}
