//! Trip service client: passenger trip planning.

use rideline_core::ids::{require_id, TRIP_ID_KEYS};
use rideline_core::trip::{NewTrip, Trip};
use validator::Validate;

use crate::error::ServiceError;
use crate::http::{self, ServiceClient};

#[derive(Debug, Clone)]
pub struct TripApi {
    http: ServiceClient,
}

impl TripApi {
    pub fn new(http: ServiceClient) -> Self {
        Self { http }
    }

    /// Create a trip and return its identifier.
    pub async fn create(&self, trip: &NewTrip) -> Result<String, ServiceError> {
        trip.validate()?;

        let response = self.http.post(&["api", "trips"])?.json(trip).send().await?;
        let body = http::json_or_null(response, "Failed to create trip").await?;
        let id = require_id(&body, TRIP_ID_KEYS, "Trip")?;

        tracing::info!(trip_id = %id, persons = trip.persons, "Trip created");
        Ok(id)
    }

    pub async fn get(&self, trip_id: &str) -> Result<Trip, ServiceError> {
        let response = self.http.get(&["api", "trips", trip_id])?.send().await?;
        http::parse_json(response, "Failed to fetch trip").await
    }
}
