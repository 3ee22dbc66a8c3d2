use super::mocks::MockInferenceClient;
use agrilens::{
    config::{AnalysisMode, VertexConfig},
    server::{handlers::AppState, router},
};
use axum::{
    Router,
    body::Body,
    http::Response,
};
use http_body_util::BodyExt;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::sync::Arc;

pub const TEST_BODY_LIMIT: usize = 8 * 1024 * 1024;

/// Build the full router around a mock client
pub fn create_test_app(mock: MockInferenceClient, mode: AnalysisMode) -> (Router, Arc<MockInferenceClient>) {
    let mock = Arc::new(mock);
    let state = AppState::new(mock.clone(), mode);
    (router(state, TEST_BODY_LIMIT), mock)
}

/// Vertex settings pointing at a local mock server
pub fn create_vertex_config(base_url: &str) -> VertexConfig {
    VertexConfig {
        project_id: "test-project".to_string(),
        location: "us-central1".to_string(),
        model: "gemini-2.0-flash-001".to_string(),
        credentials_path: "does-not-exist.json".to_string(),
        base_url: Some(base_url.to_string()),
    }
}

/// Serves the router on an ephemeral local port and returns its base URL
pub async fn spawn_test_app(
    mock: MockInferenceClient,
    mode: AnalysisMode,
    max_body_bytes: usize,
) -> (String, Arc<MockInferenceClient>) {
    let mock = Arc::new(mock);
    let app = router(AppState::new(mock.clone(), mode), max_body_bytes);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", address), mock)
}

/// File part as a browser would send it; `None` leaves out the content type
pub fn image_part(file_name: &str, content_type: Option<&str>, data: &[u8]) -> Part {
    let part = Part::bytes(data.to_vec()).file_name(file_name.to_string());
    match content_type {
        Some(content_type) => part.mime_str(content_type).unwrap(),
        None => part,
    }
}

pub async fn post_form(base_url: &str, path: &str, form: Form) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}{}", base_url, path))
        .multipart(form)
        .send()
        .await
        .unwrap()
}

/// Fake JPEG payload
pub fn jpeg_bytes() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46]
}

pub async fn read_body(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn read_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&read_body(response).await).unwrap()
}
