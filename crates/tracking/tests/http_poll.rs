//! End-to-end polling against a mock dispatch service.
//!
//! These run on the real clock with a short interval, since the mock
//! backend needs real sockets.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rideline_services::{ServiceEndpoints, Services};
use rideline_tracking::{spawn_poll, PollError, PollState, RetryPolicy, StatusWatcher};
use serde_json::{json, Value};

const INTERVAL: Duration = Duration::from_millis(50);

#[derive(Clone, Default)]
struct Backend {
    hits: Arc<AtomicUsize>,
}

impl Backend {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// 404 on the first lookup, the assignment afterwards.
async fn assign_on_second_lookup(
    State(backend): State<Backend>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    let hit = backend.hits.fetch_add(1, Ordering::SeqCst);
    if id != "conf-123" || hit == 0 {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Assignment not found" })));
    }
    (
        StatusCode::OK,
        Json(json!({ "driver_id": "D1", "vehicle_no": "KA09AB1234", "status": "confirmed" })),
    )
}

async fn always_unavailable(State(backend): State<Backend>) -> StatusCode {
    backend.hits.fetch_add(1, Ordering::SeqCst);
    StatusCode::SERVICE_UNAVAILABLE
}

async fn always_empty(State(backend): State<Backend>) -> Json<Value> {
    backend.hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({}))
}

async fn start(router: Router) -> Services {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Services::new(&ServiceEndpoints::all_at(&format!("http://{addr}")), Duration::from_secs(5)).unwrap()
}

const LOOKUP: &str = "/api/assignments/confirmation/{id}";

// ---------------------------------------------------------------------------
// Test: 404 then payload resolves with the payload and stops
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_then_assigned_resolves() {
    let backend = Backend::default();
    let router = Router::new()
        .route(LOOKUP, get(assign_on_second_lookup))
        .with_state(backend.clone());
    let services = start(router).await;

    let handle = spawn_poll(Arc::new(services.dispatch), "conf-123", RetryPolicy::fixed(INTERVAL));
    let assignment = handle.wait().await.unwrap();

    assert_eq!(
        assignment.as_value(),
        &json!({ "driver_id": "D1", "vehicle_no": "KA09AB1234", "status": "confirmed" })
    );
    assert_eq!(backend.hits(), 2);

    tokio::time::sleep(INTERVAL * 4).await;
    assert_eq!(backend.hits(), 2);
}

// ---------------------------------------------------------------------------
// Test: empty objects count as "not yet"
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_bodies_keep_polling() {
    let backend = Backend::default();
    let router = Router::new()
        .route(LOOKUP, get(always_empty))
        .with_state(backend.clone());
    let services = start(router).await;

    let policy = RetryPolicy::fixed(INTERVAL).with_max_attempts(3);
    let result = spawn_poll(Arc::new(services.dispatch), "conf-1", policy).wait().await;

    assert_matches!(result, Err(PollError::Exhausted { attempts: 3 }));
    assert_eq!(backend.hits(), 3);
}

// ---------------------------------------------------------------------------
// Test: server errors exhaust an opt-in failure budget
// ---------------------------------------------------------------------------

#[tokio::test]
async fn server_errors_exhaust_failure_budget() {
    let backend = Backend::default();
    let router = Router::new()
        .route(LOOKUP, get(always_unavailable))
        .with_state(backend.clone());
    let services = start(router).await;

    let policy = RetryPolicy::fixed(INTERVAL).with_max_consecutive_failures(2);
    let result = spawn_poll(Arc::new(services.dispatch), "conf-1", policy).wait().await;

    assert_matches!(result, Err(PollError::Failed { failures: 2, .. }));
    assert_eq!(backend.hits(), 2);
}

// ---------------------------------------------------------------------------
// Test: watcher publishes the resolved state
// ---------------------------------------------------------------------------

#[tokio::test]
async fn watcher_resolves_over_http() {
    let backend = Backend::default();
    let router = Router::new()
        .route(LOOKUP, get(assign_on_second_lookup))
        .with_state(backend.clone());
    let services = start(router).await;

    let mut watcher = StatusWatcher::new(Arc::new(services.dispatch), RetryPolicy::fixed(INTERVAL));
    watcher.watch(Some("conf-123"));

    let state = tokio::time::timeout(Duration::from_secs(5), watcher.settled())
        .await
        .unwrap();
    assert_matches!(&state, PollState::Resolved { confirmation_id, .. } if confirmation_id == "conf-123");
    assert_eq!(state.payload().and_then(|p| p.driver_id()).as_deref(), Some("D1"));
}
