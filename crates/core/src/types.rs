/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Loosely-typed JSON object as returned by the backend services.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;
