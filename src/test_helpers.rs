//! Mock state builders and HTTP helpers for handler tests

use crate::neo4j::mock::MockGraphStore;
use crate::{AppState, Config};
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use std::sync::Arc;
use tower::ServiceExt; // oneshot

/// Config pointing at nothing, with a cheap bcrypt cost.
pub fn test_config() -> Config {
    Config {
        neo4j_uri: "bolt://mock:7687".to_string(),
        neo4j_user: "neo4j".to_string(),
        neo4j_password: "mock".to_string(),
        neo4j_max_connections: 1,
        neo4j_fetch_size: 200,
        server_port: 0,
        like_mode: Default::default(),
        seed_demo_users: false,
        bcrypt_cost: 4,
    }
}

/// Create a mock AppState over the given store
pub fn mock_app_state_with(store: Arc<MockGraphStore>) -> AppState {
    AppState::new(store, test_config())
}

/// Router over an empty in-memory store, plus a handle to inspect or seed it
pub fn mock_app() -> (Router, Arc<MockGraphStore>) {
    let store = Arc::new(MockGraphStore::new());
    let app = crate::api::create_router(mock_app_state_with(store.clone()));
    (app, store)
}

/// Send one request through the router, with an optional JSON body
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(req).await.unwrap()
}

/// Read a response body as JSON
pub async fn read_json(resp: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
