use axum::{
    Router,
    http::{HeaderName, HeaderValue, header},
    routing::{any, get},
};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::handlers::{api, functions};
use crate::state::AppState;
use std::sync::Arc;

pub const ALLOWED_ORIGIN: &str = "*";
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type";

fn cors_header(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

/// Create the API router
///
/// The function route carries the permissive CORS headers on every response,
/// including rejections produced before a handler runs.
pub fn create_api_router() -> Router<Arc<AppState>> {
    let function_routes = Router::new()
        .route("/api/functions/{*name}", any(functions::dispatch_function))
        .layer(
            ServiceBuilder::new()
                .layer(cors_header(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    ALLOWED_ORIGIN,
                ))
                .layer(cors_header(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    ALLOWED_METHODS,
                ))
                .layer(cors_header(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    ALLOWED_HEADERS,
                )),
        );

    Router::new()
        .route("/api", get(api::hello))
        .merge(function_routes)
}
