//! Base URLs of the backend services.

pub const DEFAULT_AUTH_URL: &str = "http://localhost:5000";
pub const DEFAULT_TRIPS_URL: &str = "http://localhost:5001";
pub const DEFAULT_VEHICLES_URL: &str = "http://localhost:5002";
pub const DEFAULT_DISPATCH_URL: &str = "http://localhost:5003";
pub const DEFAULT_LOCATION_URL: &str = "http://localhost:5004";
pub const DEFAULT_ROUTING_URL: &str = "http://localhost:5005";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    pub auth: String,
    pub trips: String,
    pub vehicles: String,
    /// Confirmations and assignments.
    pub dispatch: String,
    pub location: String,
    /// Trip dispatch records and computed routes.
    pub routing: String,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            auth: DEFAULT_AUTH_URL.into(),
            trips: DEFAULT_TRIPS_URL.into(),
            vehicles: DEFAULT_VEHICLES_URL.into(),
            dispatch: DEFAULT_DISPATCH_URL.into(),
            location: DEFAULT_LOCATION_URL.into(),
            routing: DEFAULT_ROUTING_URL.into(),
        }
    }
}

impl ServiceEndpoints {
    /// Point every service at the same base URL. Handy when a gateway or
    /// a single mock server fronts all of them.
    pub fn all_at(base: &str) -> Self {
        Self {
            auth: base.into(),
            trips: base.into(),
            vehicles: base.into(),
            dispatch: base.into(),
            location: base.into(),
            routing: base.into(),
        }
    }
}
