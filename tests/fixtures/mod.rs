//! Test Fixtures Module
//!
//! Shared helpers for the integration tests:
//! - Configuration fixtures
//! - Multipart body builders
//! - Response readers

// Not every test binary uses every helper
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use functions_gateway::{
    AppState, FunctionRegistry, ServerConfig, config::GroqConfig, create_router,
};

pub const TEST_API_KEY: &str = "gsk_integration";
pub const BOUNDARY: &str = "----gateway-test-boundary";

/// Configuration pointing every provider call at `provider_url`.
pub fn test_config(provider_url: &str, static_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        static_root: static_root.to_path_buf(),
        max_body_bytes: 25 * 1024 * 1024,
        groq: GroqConfig {
            api_key: TEST_API_KEY.to_string(),
            base_url: provider_url.to_string(),
            completion_url: provider_url.to_string(),
            completion_model: "llama-3.3-70b-versatile".to_string(),
            timeout_seconds: 5,
        },
    }
}

/// Router with the built-in functions.
pub fn app_with_builtins(config: ServerConfig) -> Router {
    create_router(AppState::new(config))
}

/// Router around a custom registry.
pub fn app_with_registry(
    config: ServerConfig,
    build: impl FnOnce(&mut FunctionRegistry),
) -> Router {
    let config = Arc::new(config);
    let mut registry = FunctionRegistry::new(config.clone());
    build(&mut registry);
    create_router(AppState::with_registry(config, registry))
}

/// A single-part multipart body.
///
/// `file_name: None` sends a plain form field instead of a file.
pub fn multipart_body(field: &str, file_name: Option<&str>, content: &[u8]) -> Vec<u8> {
    let disposition = match file_name {
        Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
        None => format!("form-data; name=\"{field}\""),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {disposition}\r\n").as_bytes());
    if file_name.is_some() {
        body.extend_from_slice(b"Content-Type: audio/wav\r\n");
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Assert the permissive CORS headers of the function route.
pub fn assert_cors_headers(response: &Response<Body>) {
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
}
