#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} id missing in response")]
    MissingId { entity: &'static str },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of the client-side persistence port.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Session file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Session store lock poisoned")]
    Poisoned,
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}
