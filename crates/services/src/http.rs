//! Shared request plumbing for the service clients.

use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ServiceError;

/// A base URL plus the shared HTTP client.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: reqwest::Client,
    base: Url,
}

impl ServiceClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, ServiceError> {
        let invalid = || ServiceError::InvalidUrl {
            url: base_url.to_string(),
        };
        let base = Url::parse(base_url).map_err(|_| invalid())?;
        if base.cannot_be_a_base() {
            return Err(invalid());
        }
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Append path segments to the base URL. Each segment is
    /// percent-encoded, so identifiers can be passed as-is.
    pub fn url(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::InvalidUrl {
                url: self.base.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn get(&self, segments: &[&str]) -> Result<reqwest::RequestBuilder, ServiceError> {
        Ok(self.client.get(self.url(segments)?))
    }

    pub fn post(&self, segments: &[&str]) -> Result<reqwest::RequestBuilder, ServiceError> {
        Ok(self.client.post(self.url(segments)?))
    }

    pub fn delete(&self, segments: &[&str]) -> Result<reqwest::RequestBuilder, ServiceError> {
        Ok(self.client.delete(self.url(segments)?))
    }
}

/// Ensure the response has a success status code.
///
/// On failure the body is read for a `message` (or `error`) string and
/// that is surfaced verbatim; otherwise `fallback` is used.
pub async fn ensure_success(response: Response, fallback: &str) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = backend_message(&body).unwrap_or_else(|| fallback.to_string());
    tracing::debug!(status = status.as_u16(), message = %message, "Service returned an error");

    Err(ServiceError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Parse a successful JSON response body into the expected type.
pub async fn parse_json<T: DeserializeOwned>(
    response: Response,
    fallback: &str,
) -> Result<T, ServiceError> {
    let response = ensure_success(response, fallback).await?;
    Ok(response.json::<T>().await?)
}

/// Read a successful response body as JSON, treating an empty or
/// unparseable body as `null`.
pub async fn json_or_null(response: Response, fallback: &str) -> Result<Value, ServiceError> {
    let response = ensure_success(response, fallback).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Extract a human-readable message from an error body.
fn backend_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"].iter().find_map(|key| {
        value
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    })
}
