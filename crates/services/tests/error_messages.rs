//! Non-2xx responses surface the backend's own message when it sends
//! one, and an operation-specific fallback otherwise.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use rideline_core::error::CoreError;
use rideline_core::roles::Role;
use rideline_core::trip::NewTrip;
use rideline_services::auth::LoginRequest;
use rideline_services::ServiceError;
use serde_json::json;

use common::services_for;

fn login(email: &str) -> LoginRequest {
    LoginRequest {
        email: email.into(),
        password: "secret".into(),
        role: Role::Passenger,
    }
}

// ---------------------------------------------------------------------------
// Test: backend `message` is surfaced verbatim
// ---------------------------------------------------------------------------

#[tokio::test]
async fn backend_message_is_used_verbatim() {
    let router = Router::new().route(
        "/api/auth/login",
        post(|| async { (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid credentials" }))) }),
    );
    let services = services_for(router).await;

    let err = services.auth.login(&login("a@example.com")).await.unwrap_err();

    assert_matches!(&err, ServiceError::Api { status: 401, .. });
    assert_eq!(err.to_string(), "Invalid credentials");
}

// ---------------------------------------------------------------------------
// Test: `error` key is accepted when `message` is absent
// ---------------------------------------------------------------------------

#[tokio::test]
async fn error_key_is_used_when_message_is_absent() {
    let router = Router::new().route(
        "/api/trips/{id}",
        get(|| async { (StatusCode::NOT_FOUND, Json(json!({ "error": "Trip not found" }))) }),
    );
    let services = services_for(router).await;

    let err = services.trips.get("t-404").await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Trip not found");
}

// ---------------------------------------------------------------------------
// Test: non-JSON error bodies fall back to the operation message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreadable_error_body_uses_fallback() {
    let router = Router::new().route(
        "/api/trips",
        post(|| async { (StatusCode::BAD_GATEWAY, "<html>upstream down</html>") }),
    );
    let services = services_for(router).await;

    let trip = NewTrip::new("Airport", "Station", &[], 2);
    let err = services.trips.create(&trip).await.unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert!(err.is_server_side());
    assert_eq!(err.to_string(), "Failed to create trip");
}

#[tokio::test]
async fn empty_error_body_uses_fallback() {
    let router = Router::new().route("/api/vehicles", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let services = services_for(router).await;

    let err = services.vehicles.list().await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch vehicles");
}

// ---------------------------------------------------------------------------
// Test: invalid forms are rejected before any request is made
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_fails_without_a_request() {
    // Any request reaching this router would be answered 404 and surface
    // as an Api error instead of a validation error.
    let services = services_for(Router::new()).await;

    let err = services.auth.login(&login("")).await.unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::Validation(_)));

    let err = services.trips.create(&NewTrip::new("A", "B", &[], 0)).await.unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Test: unreachable service is a transport error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_service_is_a_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let services = rideline_services::Services::with_client(
        reqwest::Client::new(),
        &rideline_services::ServiceEndpoints::all_at(&base),
    )
    .unwrap();

    let err = services.vehicles.list().await.unwrap_err();
    assert_matches!(err, ServiceError::Request(_));
    assert!(err.is_server_side());
}
