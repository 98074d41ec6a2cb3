//! Auth service client: login and registration.

use rideline_core::roles::Role;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ServiceError;
use crate::http::{self, ServiceClient};

#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub role: Role,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
}

#[derive(Debug, Default, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthApi {
    http: ServiceClient,
}

impl AuthApi {
    pub fn new(http: ServiceClient) -> Self {
        Self { http }
    }

    /// Log in and return the effective role.
    ///
    /// The service's role wins; when it does not send a recognisable
    /// one, the requested role is assumed.
    pub async fn login(&self, request: &LoginRequest) -> Result<Role, ServiceError> {
        request.validate()?;

        let response = self
            .http
            .post(&["api", "auth", "login"])?
            .json(request)
            .send()
            .await?;

        let body = http::json_or_null(response, "Login failed").await?;
        let parsed: LoginResponse = serde_json::from_value(body).unwrap_or_default();
        let role = parsed
            .role
            .and_then(|name| Role::from_name(&name).ok())
            .unwrap_or(request.role);

        tracing::info!(role = %role, "Logged in");
        Ok(role)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ServiceError> {
        request.validate()?;

        let response = self
            .http
            .post(&["api", "auth", "register"])?
            .json(request)
            .send()
            .await?;

        http::ensure_success(response, "Registration failed").await?;
        tracing::info!(email = %request.email, role = %request.role, "Registered account");
        Ok(())
    }
}
