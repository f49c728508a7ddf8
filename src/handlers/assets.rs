//! Static bundle serving.
//!
//! Files come from a fixed document root. Directory paths get `index.html`
//! appended; anything unmatched, a missing root, or a method other than
//! GET/HEAD answers `404 Not Found`.

use std::path::Path;

use axum::{Router, handler::HandlerWithoutStateExt, http::StatusCode};
use tower_http::services::ServeDir;

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// Router whose fallback serves the bundle under `root`.
///
/// `ServeDir` resolves paths inside `root` only; `..` components are refused.
pub fn static_router<S>(root: &Path) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let serve_dir = ServeDir::new(root)
        .append_index_html_on_directories(true)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());

    Router::new().fallback_service(serve_dir)
}
