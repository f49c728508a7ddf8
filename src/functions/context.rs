//! Per-request execution context handed to function handlers.
//!
//! A handler only sees the inbound request through [`FunctionRequest`] and only
//! answers through [`FunctionResponse`]. The gateway owns both and commits the
//! response once the handler returns.

use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{FromRequest, Multipart},
    http::{
        Extensions, HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode, Uri,
        header::CONTENT_TYPE,
    },
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use super::name::FunctionName;
use crate::errors::FunctionError;

pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Inbound request as seen by a function handler.
#[derive(Debug, Clone)]
pub struct FunctionRequest {
    pub function_name: FunctionName,
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Path parameters; always contains `functionName`.
    pub params: HashMap<String, String>,
    pub request_id: Uuid,
    extensions: Extensions,
}

impl FunctionRequest {
    pub fn new(
        function_name: FunctionName,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> Self {
        let mut params = HashMap::new();
        params.insert("functionName".to_string(), function_name.to_string());

        Self {
            function_name,
            method,
            uri,
            headers,
            body,
            params,
            request_id: Uuid::new_v4(),
            extensions: Extensions::new(),
        }
    }

    /// Carry request extensions (body limit settings among them) over to
    /// extractors run by the handler.
    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Media type of the body without parameters, lowercased.
    pub fn content_type(&self) -> Option<String> {
        let raw = self.headers.get(CONTENT_TYPE)?.to_str().ok()?;
        let essence = raw.split(';').next().unwrap_or(raw).trim();
        Some(essence.to_ascii_lowercase())
    }

    pub fn is_multipart(&self) -> bool {
        self.content_type().as_deref() == Some("multipart/form-data")
    }

    /// Deserialize the body as JSON.
    ///
    /// Any parse failure is a validation error with a generic message.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FunctionError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            tracing::debug!(error = %e, "Request body is not valid JSON");
            FunctionError::validation(INVALID_BODY_MESSAGE)
        })
    }

    /// Open the body as a `multipart/form-data` stream.
    pub async fn multipart(&self) -> Result<Multipart, FunctionError> {
        let mut builder = Request::builder()
            .method(self.method.clone())
            .uri(self.uri.clone());
        if let Some(headers) = builder.headers_mut() {
            headers.extend(self.headers.clone());
        }
        let mut request = builder
            .body(Body::from(self.body.clone()))
            .map_err(|e| FunctionError::Internal(format!("failed to rebuild request: {e}")))?;
        *request.extensions_mut() = self.extensions.clone();

        Multipart::from_request(request, &()).await.map_err(|rejection| {
            tracing::debug!(error = %rejection, "Multipart body rejected");
            FunctionError::validation(INVALID_BODY_MESSAGE)
        })
    }
}

/// Body of a [`FunctionResponse`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResponseBody {
    #[default]
    Empty,
    Text(String),
    Json(serde_json::Value),
    Binary(Bytes),
}

/// Response assembled by a function handler.
#[derive(Debug, Clone)]
pub struct FunctionResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: ResponseBody,
}

impl Default for FunctionResponse {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: ResponseBody::Empty,
        }
    }
}

impl FunctionResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn set_status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.body = ResponseBody::Text(text.into());
        self
    }

    pub fn json<T: Serialize>(&mut self, value: &T) -> Result<&mut Self, FunctionError> {
        let value = serde_json::to_value(value)
            .map_err(|e| FunctionError::Internal(format!("failed to serialize response: {e}")))?;
        self.body = ResponseBody::Json(value);
        Ok(self)
    }

    pub fn binary(&mut self, bytes: impl Into<Bytes>) -> &mut Self {
        self.body = ResponseBody::Binary(bytes.into());
        self
    }
}

impl IntoResponse for FunctionResponse {
    fn into_response(self) -> Response {
        let (default_type, body) = match self.body {
            ResponseBody::Empty => (None, Body::empty()),
            ResponseBody::Text(text) => (Some("text/plain; charset=utf-8"), Body::from(text)),
            ResponseBody::Json(value) => (Some("application/json"), Body::from(value.to_string())),
            ResponseBody::Binary(bytes) => (Some("application/octet-stream"), Body::from(bytes)),
        };

        let mut response = Response::new(body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        if let Some(content_type) = default_type {
            response
                .headers_mut()
                .entry(CONTENT_TYPE)
                .or_insert(HeaderValue::from_static(content_type));
        }
        response
    }
}

/// Everything a handler may touch during one invocation.
#[derive(Debug)]
pub struct ExecutionContext {
    request: FunctionRequest,
    response: FunctionResponse,
}

impl ExecutionContext {
    pub fn new(request: FunctionRequest) -> Self {
        Self {
            request,
            response: FunctionResponse::default(),
        }
    }

    pub fn request(&self) -> &FunctionRequest {
        &self.request
    }

    pub fn response(&mut self) -> &mut FunctionResponse {
        &mut self.response
    }

    pub fn into_response(self) -> FunctionResponse {
        self.response
    }
}
