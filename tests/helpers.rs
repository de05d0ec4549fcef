#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::Request,
    response::Response,
};
use serde_json::Value;
use wiremock::MockServer;

use replanta::{
    app_state::AppState,
    config::{Config, Credentials, Endpoints},
    router::router,
};

/// Config with fake credentials and every upstream pointed at `server`.
pub fn test_config(server: &MockServer) -> Config {
    Config::new(Credentials {
        openai_api_key: "sk-test".into(),
        medium_token: "medium-test".into(),
        imgur_client_id: "imgur-test".into(),
        devto_token: "devto-test".into(),
    })
    .with_endpoints(Endpoints::all(server.uri()))
}

pub fn test_app(server: &MockServer) -> Router {
    let state = AppState::new(&test_config(server)).expect("Failed to build app state");
    router(state)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
