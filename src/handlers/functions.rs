//! Dispatch of `/api/functions/{name}`.
//!
//! Order of checks: name validation, `OPTIONS` preflight, registry
//! resolution, handler invocation. CORS headers are added by the router layer
//! so every outcome carries them.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{Extensions, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, info, warn};

use crate::errors::{FunctionError, INTERNAL_ERROR_MESSAGE};
use crate::functions::isolation::invoke_handler;
use crate::functions::{ExecutionContext, FunctionName, FunctionRequest, ResolveError};
use crate::state::AppState;

pub const INVALID_NAME_MESSAGE: &str = "Invalid function name";
pub const NOT_FOUND_MESSAGE: &str = "Function not found";

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Resolve and run the named function.
pub async fn dispatch_function(
    State(state): State<Arc<AppState>>,
    Path(raw_name): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    extensions: Extensions,
    body: Bytes,
) -> Response {
    let Ok(name) = FunctionName::parse(&raw_name) else {
        warn!(function = %raw_name.escape_debug(), "Rejected invalid function name");
        return error_response(StatusCode::BAD_REQUEST, INVALID_NAME_MESSAGE);
    };

    if method == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }

    let handler = match state.registry.resolve(&name).await {
        Ok(handler) => handler,
        Err(ResolveError::NotFound(_)) => {
            info!(function = %name, "Function not found");
            return error_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE);
        }
        Err(e @ ResolveError::LoadFailed { .. }) => {
            error!(function = %name, error = %e, "Failed to load function");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE);
        }
    };

    let request =
        FunctionRequest::new(name.clone(), method, uri, headers, body).with_extensions(extensions);
    let request_id = request.request_id;
    let mut ctx = ExecutionContext::new(request);

    info!(function = %name, %request_id, "Dispatching function");

    match invoke_handler(handler.as_ref(), &mut ctx).await {
        Ok(()) => ctx.into_response().into_response(),
        Err(err) => {
            match &err {
                FunctionError::Validation(message) => {
                    warn!(function = %name, %request_id, message = %message, "Function rejected request");
                }
                FunctionError::Upstream(upstream) => {
                    error!(function = %name, %request_id, error = %upstream, "Provider call failed");
                }
                FunctionError::Internal(detail) => {
                    error!(function = %name, %request_id, error = %detail, "Function failed");
                }
            }
            err.into_response()
        }
    }
}
