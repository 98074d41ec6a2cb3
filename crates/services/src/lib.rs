//! `rideline-services` -- typed HTTP clients for the backend services.
//!
//! One client per service, all sharing a single pooled
//! [`reqwest::Client`]. Non-2xx responses become
//! [`ServiceError::Api`] carrying the backend's own message when it sent
//! one, else an operation-specific fallback.

pub mod auth;
pub mod dispatch;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod location;
pub mod routing;
pub mod trips;
pub mod vehicles;

use std::time::Duration;

pub use endpoints::ServiceEndpoints;
pub use error::ServiceError;

use auth::AuthApi;
use dispatch::DispatchApi;
use http::ServiceClient;
use location::LocationApi;
use routing::RoutingApi;
use trips::TripApi;
use vehicles::VehicleApi;

/// Every service client, wired to one connection pool.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthApi,
    pub trips: TripApi,
    pub vehicles: VehicleApi,
    pub dispatch: DispatchApi,
    pub location: LocationApi,
    pub routing: RoutingApi,
}

impl Services {
    /// Build all clients with a shared per-request `timeout`.
    pub fn new(endpoints: &ServiceEndpoints, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(client, endpoints)
    }

    /// Build all clients reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        endpoints: &ServiceEndpoints,
    ) -> Result<Self, ServiceError> {
        let at = |base: &str| ServiceClient::new(client.clone(), base);
        Ok(Self {
            auth: AuthApi::new(at(&endpoints.auth)?),
            trips: TripApi::new(at(&endpoints.trips)?),
            vehicles: VehicleApi::new(at(&endpoints.vehicles)?),
            dispatch: DispatchApi::new(at(&endpoints.dispatch)?),
            location: LocationApi::new(at(&endpoints.location)?),
            routing: RoutingApi::new(at(&endpoints.routing)?),
        })
    }
}
