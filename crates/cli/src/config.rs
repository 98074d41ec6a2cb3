use std::path::PathBuf;
use std::time::Duration;

use rideline_services::endpoints::{
    DEFAULT_AUTH_URL, DEFAULT_DISPATCH_URL, DEFAULT_LOCATION_URL, DEFAULT_ROUTING_URL,
    DEFAULT_TRIPS_URL, DEFAULT_VEHICLES_URL,
};
use rideline_services::ServiceEndpoints;
use rideline_tracking::RetryPolicy;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
const DEFAULT_SESSION_FILE: &str = ".rideline-session.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoints: ServiceEndpoints,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Policy for `rideline status`.
    pub poll_policy: RetryPolicy,
    /// JSON file backing the client session.
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `AUTH_SERVICE_URL`      | `http://localhost:5000`  |
    /// | `TRIP_SERVICE_URL`      | `http://localhost:5001`  |
    /// | `VEHICLE_SERVICE_URL`   | `http://localhost:5002`  |
    /// | `DISPATCH_SERVICE_URL`  | `http://localhost:5003`  |
    /// | `LOCATION_SERVICE_URL`  | `http://localhost:5004`  |
    /// | `ROUTING_SERVICE_URL`   | `http://localhost:5005`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `10`                     |
    /// | `POLL_INTERVAL_MS`      | `2000`                   |
    /// | `POLL_MAX_ATTEMPTS`     | unset (poll until Ctrl-C)|
    /// | `RIDELINE_SESSION_FILE` | `.rideline-session.json` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let url = |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());

        let endpoints = ServiceEndpoints {
            auth: url("AUTH_SERVICE_URL", DEFAULT_AUTH_URL),
            trips: url("TRIP_SERVICE_URL", DEFAULT_TRIPS_URL),
            vehicles: url("VEHICLE_SERVICE_URL", DEFAULT_VEHICLES_URL),
            dispatch: url("DISPATCH_SERVICE_URL", DEFAULT_DISPATCH_URL),
            location: url("LOCATION_SERVICE_URL", DEFAULT_LOCATION_URL),
            routing: url("ROUTING_SERVICE_URL", DEFAULT_ROUTING_URL),
        };

        let request_timeout_secs =
            parse_positive("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS"))?
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        let poll_interval_ms = parse_positive("POLL_INTERVAL_MS", var("POLL_INTERVAL_MS"))?
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);

        let mut poll_policy = RetryPolicy::fixed(Duration::from_millis(poll_interval_ms));
        if let Some(max) = parse_positive("POLL_MAX_ATTEMPTS", var("POLL_MAX_ATTEMPTS"))? {
            let max = u32::try_from(max).map_err(|_| ConfigError::Invalid {
                var: "POLL_MAX_ATTEMPTS",
                value: max.to_string(),
                expected: "a positive 32-bit integer",
            })?;
            poll_policy = poll_policy.with_max_attempts(max);
        }

        let session_file = var("RIDELINE_SESSION_FILE")
            .unwrap_or_else(|| DEFAULT_SESSION_FILE.to_string())
            .into();

        Ok(Self {
            endpoints,
            request_timeout: Duration::from_secs(request_timeout_secs),
            poll_policy,
            session_file,
        })
    }
}

fn parse_positive(var: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ConfigError::Invalid {
            var,
            value,
            expected: "a positive integer",
        }),
    }
}
