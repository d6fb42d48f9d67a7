//! Shared test fixtures: an in-process mock of the Aha! REST API.

// Each test binary exercises a different slice of the fixture.
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};
use tokio::net::TcpListener;

use ahaclient::{ApiClient, ClientConfig};

#[derive(Clone, Default)]
pub struct MockState {
    /// Hits on the feature-list endpoint, one per page requested.
    pub feature_page_hits: Arc<AtomicU64>,
    /// Hits on the single-feature GET endpoint.
    pub feature_get_hits: Arc<AtomicU64>,
    /// Hits on the product-list endpoint.
    pub product_hits: Arc<AtomicU64>,
    /// Hits on the feature PUT endpoint.
    pub put_hits: Arc<AtomicU64>,
    /// Headers observed on the most recent request.
    pub last_headers: Arc<Mutex<Option<HashMap<String, String>>>>,
    /// Body observed on the most recent PUT.
    pub last_put_body: Arc<Mutex<Option<Value>>>,
    /// Mutable score behind the feature endpoints, bumped by PUT.
    pub feature_score: Arc<Mutex<f64>>,
}

fn record_headers(state: &MockState, headers: &HeaderMap) {
    let map: HashMap<String, String> = headers
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
        .collect();
    *state.last_headers.lock().unwrap() = Some(map);
}

async fn list_features(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.feature_page_hits.fetch_add(1, Ordering::SeqCst);
    record_headers(&state, &headers);

    let page: u64 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let envelope = match page {
        1 => json!({
            "features": [{"id": "f1", "name": "First", "reference_num": "PRJ-1"}],
            "pagination": {"total_pages": 2, "current_page": 1},
        }),
        _ => json!({
            "features": [{"id": "f2", "name": "Second", "reference_num": "PRJ-2"}],
            "pagination": {"total_pages": 2, "current_page": 2},
        }),
    };
    Json(envelope)
}

async fn list_products(State(state): State<MockState>, headers: HeaderMap) -> Json<Value> {
    state.product_hits.fetch_add(1, Ordering::SeqCst);
    record_headers(&state, &headers);

    // Single page, no pagination block on purpose.
    Json(json!({
        "products": [
            {"id": "p1", "name": "Dashboard", "reference_prefix": "DSH"},
            {"id": "p2", "name": "Mobile", "reference_prefix": "MOB"},
        ],
    }))
}

async fn get_feature(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> Json<Value> {
    state.feature_get_hits.fetch_add(1, Ordering::SeqCst);
    let score = *state.feature_score.lock().unwrap();
    Json(json!({
        "feature": {"id": id, "name": "Scored feature", "score": score},
    }))
}

async fn put_feature(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.put_hits.fetch_add(1, Ordering::SeqCst);
    *state.last_put_body.lock().unwrap() = Some(body.clone());

    if let Some(score) = body
        .get("feature")
        .and_then(|f| f.get("score"))
        .and_then(Value::as_f64)
    {
        *state.feature_score.lock().unwrap() = score;
    }

    let score = *state.feature_score.lock().unwrap();
    Json(json!({
        "feature": {"id": id, "name": "Scored feature", "score": score},
    }))
}

async fn me() -> Json<Value> {
    Json(json!({"user": {"id": "u1", "name": "Ada", "email": "ada@example.com"}}))
}

async fn error_html() -> impl IntoResponse {
    let page = format!("<html><body>{}</body></html>", "x".repeat(2048));
    (StatusCode::INTERNAL_SERVER_ERROR, page)
}

async fn error_empty() -> impl IntoResponse {
    (StatusCode::SERVICE_UNAVAILABLE, String::new())
}

/// Binds the mock API on an ephemeral port and serves it in the background.
/// Returns the base URL (ending in `/api/v1`) and the shared state.
pub async fn spawn_mock_api() -> (String, MockState) {
    let state = MockState::default();

    let app = Router::new()
        .route("/api/v1/releases/{id}/features", get(list_features))
        .route("/api/v1/products", get(list_products))
        .route(
            "/api/v1/features/{id}",
            get(get_feature).put(put_feature),
        )
        .route("/api/v1/me", get(me))
        .route("/api/v1/error/html", get(error_html))
        .route("/api/v1/error/empty", get(error_empty))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/api/v1"), state)
}

/// Client pointed at the mock server with test credentials.
pub fn test_client(base_url: &str) -> ApiClient {
    let config = ClientConfig::new("testco", "test-token").with_base_url(base_url);
    ApiClient::new(config).expect("test config is valid")
}
