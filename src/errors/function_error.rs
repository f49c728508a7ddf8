//! Errors raised while executing a function handler.
//!
//! Every handler failure is normalized here before it reaches the wire:
//!
//! | Variant      | Status | Body                                   |
//! |--------------|--------|----------------------------------------|
//! | `Validation` | 400    | `{"error": <message>}`                 |
//! | `Upstream`   | 500    | `{"error": "Internal server error"}`   |
//! | `Internal`   | 500    | `{"error": "Internal server error"}`   |
//!
//! Upstream and internal details are only ever logged.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Generic body text for every 5xx answer of the functions route.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Failure while talking to an external provider.
///
/// The variants are kept apart for observability; callers only ever see a
/// generic 500.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    /// Provider answered with a non-success status.
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection or transport level failure.
    #[error("provider request failed: {0}")]
    Transport(String),

    /// The bounded request timeout elapsed.
    #[error("provider request timed out")]
    Timeout,

    /// Provider answered 2xx with a body we could not understand.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl UpstreamError {
    /// Classify a reqwest error into a transport or timeout failure.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Error returned by a function handler.
#[derive(Debug, thiserror::Error)]
pub enum FunctionError {
    /// Caller sent something we refuse; message is safe to echo.
    #[error("{0}")]
    Validation(String),

    /// Provider failure.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Anything else that went wrong inside the handler.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FunctionError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that may be shown to the caller.
    pub fn public_message(&self) -> &str {
        match self {
            Self::Validation(message) => message,
            Self::Upstream(_) | Self::Internal(_) => INTERNAL_ERROR_MESSAGE,
        }
    }
}

impl IntoResponse for FunctionError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({ "error": self.public_message() })),
        )
            .into_response()
    }
}
