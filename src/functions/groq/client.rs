//! HTTP client for the Groq OpenAI-compatible endpoints.
//!
//! One [`GroqClient`] is built per function at instantiation time and reused
//! for every request; `reqwest::Client` pools connections internally.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use reqwest::{
    Client, Response,
    multipart::{Form, Part},
};
use tracing::debug;

use super::messages::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, GroqErrorResponse};
use crate::config::GroqConfig;
use crate::errors::{FunctionError, UpstreamError};

// =============================================================================
// Constants
// =============================================================================

pub const TRANSCRIPTION_MODEL: &str = "whisper-large-v3-turbo";
pub const TRANSCRIPTION_RESPONSE_FORMAT: &str = "verbose_json";
pub const COMPLETION_TEMPERATURE: f32 = 0.7;
pub const COMPLETION_MAX_TOKENS: u32 = 100;

const TRANSCRIPTION_PATH: &str = "/openai/v1/audio/transcriptions";
const COMPLETION_PATH: &str = "/openai/v1/chat/completions";

/// Default connect timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Longest provider error body kept for logs.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// User-Agent header value for API requests.
const USER_AGENT: &str = concat!("Functions-Gateway/", env!("CARGO_PKG_VERSION"));

/// Audio file forwarded to the transcription endpoint.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub bytes: Bytes,
    pub file_name: String,
    pub content_type: String,
}

/// Client for transcription and chat completion calls.
#[derive(Clone)]
pub struct GroqClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    completion_url: String,
    completion_model: String,
}

impl fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("completion_url", &self.completion_url)
            .field("completion_model", &self.completion_model)
            .finish()
    }
}

impl Drop for GroqClient {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.api_key.zeroize();
    }
}

impl GroqClient {
    pub fn new(config: &GroqConfig) -> Result<Self, FunctionError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(
                DEFAULT_CONNECT_TIMEOUT_SECS.min(config.timeout_seconds),
            ))
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FunctionError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            completion_url: config.completion_url.trim_end_matches('/').to_string(),
            completion_model: config.completion_model.clone(),
        })
    }

    pub fn transcription_endpoint(&self) -> String {
        format!("{}{}", self.base_url, TRANSCRIPTION_PATH)
    }

    pub fn completion_endpoint(&self) -> String {
        format!("{}{}", self.completion_url, COMPLETION_PATH)
    }

    pub fn completion_model(&self) -> &str {
        &self.completion_model
    }

    /// Transcribe an audio file.
    ///
    /// Takes ownership of the upload so the audio buffer is released as soon
    /// as the request body has been sent. Returns the provider JSON unchanged;
    /// it is guaranteed to be an object with a string `text` field.
    pub async fn transcribe(&self, upload: AudioUpload) -> Result<serde_json::Value, UpstreamError> {
        let size = upload.bytes.len();
        let part = Part::stream_with_length(upload.bytes, size as u64).file_name(upload.file_name);
        let part = match part.mime_str(&upload.content_type) {
            Ok(part) => part,
            Err(e) => {
                return Err(UpstreamError::Transport(format!(
                    "invalid content type '{}': {e}",
                    upload.content_type
                )));
            }
        };

        let form = Form::new()
            .part("file", part)
            .text("model", TRANSCRIPTION_MODEL)
            .text("response_format", TRANSCRIPTION_RESPONSE_FORMAT);

        debug!(bytes = size, "Sending transcription request");

        let response = self
            .http_client
            .post(self.transcription_endpoint())
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(&e))?;

        let body = Self::read_success(response).await?;
        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| UpstreamError::InvalidResponse(format!("transcription is not JSON: {e}")))?;

        if !value.get("text").is_some_and(serde_json::Value::is_string) {
            return Err(UpstreamError::InvalidResponse(
                "transcription response has no text field".to_string(),
            ));
        }

        Ok(value)
    }

    /// Request a chat completion and return the first choice's content.
    pub async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, UpstreamError> {
        let request = ChatCompletionRequest {
            model: &self.completion_model,
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)],
            temperature: COMPLETION_TEMPERATURE,
            max_tokens: COMPLETION_MAX_TOKENS,
        };

        debug!(model = %self.completion_model, "Sending completion request");

        let response = self
            .http_client
            .post(self.completion_endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(&e))?;

        let body = Self::read_success(response).await?;
        let completion: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| UpstreamError::InvalidResponse(format!("completion is not JSON: {e}")))?;

        completion
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| UpstreamError::InvalidResponse("completion has no choices".to_string()))
    }

    /// Read the body of a successful response, or classify a failed one.
    async fn read_success(response: Response) -> Result<String, UpstreamError> {
        let status = response.status();
        if let Some(request_id) = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
        {
            debug!(request_id = %request_id, status = %status, "Groq response");
        }

        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::from_reqwest(&e))?;

        if status.is_success() {
            return Ok(text);
        }

        let body = match serde_json::from_str::<GroqErrorResponse>(&text) {
            Ok(error_response) => match error_response.error.error_type {
                Some(error_type) => format!("{} ({error_type})", error_response.error.message),
                None => error_response.error.message,
            },
            Err(_) => text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        };

        Err(UpstreamError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
