//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use twotruths_core::clock::Clock;
use twotruths_core::rng::GameRng;
use twotruths_core::store::TableStore;
use twotruths_game::repository::GameRepository;
use twotruths_table_store::MemoryTableStore;
use twotruths_test_support::{FixedClock, SequenceRng};

use twotruths_api::routes;
use twotruths_api::state::AppState;

/// Fixed timestamp used across all integration tests.
pub fn fixed_clock() -> Arc<dyn Clock + Send + Sync> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router over a fresh in-memory store. The router
/// is `Clone`; reuse one instance across requests to share state.
pub fn build_test_app() -> Router {
    build_test_app_with_rng(SequenceRng::new(vec![]))
}

/// Build the full app router with a custom `SequenceRng` for tests
/// that need deterministic shuffles.
pub fn build_test_app_with_rng(rng: SequenceRng) -> Router {
    build_app_over(Arc::new(MemoryTableStore::new()), rng)
}

/// Build the full app router over an explicit store implementation.
/// Uses the same route structure as `main.rs`.
pub fn build_app_over(store: Arc<dyn TableStore>, rng: SequenceRng) -> Router {
    let rng: Arc<Mutex<dyn GameRng + Send>> = Arc::new(Mutex::new(rng));
    let repo = GameRepository::new(store);
    let app_state = AppState::new(repo, fixed_clock(), rng);

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/users", routes::users::router())
        .nest("/api/v1/sessions", routes::sessions::router())
        .with_state(app_state)
}

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(body)).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "PUT", uri, Some(body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None).await
}

/// Send a DELETE request and return the response.
pub async fn delete_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "DELETE", uri, None).await
}
