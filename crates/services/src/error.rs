use rideline_core::error::CoreError;

/// Errors from the service client layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The HTTP request itself failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    ///
    /// `message` is the backend's own message when it sent one.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid service URL '{url}'")]
    InvalidUrl { url: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ServiceError {
    /// HTTP status of an [`ServiceError::Api`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the service itself failed (5xx) or could not be reached,
    /// as opposed to rejecting or not knowing the request (4xx).
    pub fn is_server_side(&self) -> bool {
        match self {
            ServiceError::Request(_) => true,
            ServiceError::Api { status, .. } => *status >= 500,
            ServiceError::InvalidUrl { .. } | ServiceError::Core(_) => false,
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::Core(errors.into())
    }
}
