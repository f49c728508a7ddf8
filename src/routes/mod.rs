//! Router assembly.

pub mod api;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, header},
};
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::handlers::assets;
use crate::state::AppState;

/// Build the complete application router.
///
/// API routes take precedence; every other path falls through to the static
/// bundle.
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_root = state.config.static_root.clone();
    let max_body_bytes = state.config.max_body_bytes;

    // Security headers
    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    api::create_api_router()
        .merge(assets::static_router(&static_root))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(security_headers)
}
