//! `groqTranscription`: speech-to-text proxy.
//!
//! Accepts a `multipart/form-data` upload with a single file field named
//! `file` and answers with the provider's verbose JSON transcript.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use super::client::{AudioUpload, GroqClient};
use crate::config::ServerConfig;
use crate::errors::{FunctionError, FunctionResult};
use crate::functions::context::INVALID_BODY_MESSAGE;
use crate::functions::{ExecutionContext, FunctionHandler};

pub const FUNCTION_NAME: &str = "groqTranscription";

const FILE_FIELD: &str = "file";
const DEFAULT_FILE_NAME: &str = "audio.wav";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub const EXPECTED_MULTIPART_MESSAGE: &str = "Expected multipart/form-data";
pub const NO_FILE_MESSAGE: &str = "No valid file provided";

#[derive(Debug)]
pub struct TranscriptionFunction {
    client: GroqClient,
}

impl TranscriptionFunction {
    pub fn new(client: GroqClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ServerConfig) -> Result<Arc<dyn FunctionHandler>, FunctionError> {
        Ok(Arc::new(Self::new(GroqClient::new(&config.groq)?)))
    }

    /// Pull the `file` field out of the multipart body.
    async fn read_upload(ctx: &ExecutionContext) -> Result<AudioUpload, FunctionError> {
        let mut multipart = ctx.request().multipart().await?;

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            tracing::debug!(error = %e, "Failed to read multipart field");
            FunctionError::validation(INVALID_BODY_MESSAGE)
        })? {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }

            // A field without a filename is a plain form value, not a file
            let Some(file_name) = field.file_name().map(str::to_string) else {
                return Err(FunctionError::validation(NO_FILE_MESSAGE));
            };
            let file_name = if file_name.is_empty() {
                DEFAULT_FILE_NAME.to_string()
            } else {
                file_name
            };
            let content_type = field
                .content_type()
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_string();

            let bytes: Bytes = field.bytes().await.map_err(|e| {
                tracing::debug!(error = %e, "Failed to read uploaded file");
                FunctionError::validation(INVALID_BODY_MESSAGE)
            })?;

            return Ok(AudioUpload {
                bytes,
                file_name,
                content_type,
            });
        }

        Err(FunctionError::validation(NO_FILE_MESSAGE))
    }
}

#[async_trait]
impl FunctionHandler for TranscriptionFunction {
    async fn call(&self, ctx: &mut ExecutionContext) -> FunctionResult {
        if !ctx.request().is_multipart() {
            return Err(FunctionError::validation(EXPECTED_MULTIPART_MESSAGE));
        }

        let upload = Self::read_upload(ctx).await?;
        tracing::info!(
            file_name = %upload.file_name,
            content_type = %upload.content_type,
            bytes = upload.bytes.len(),
            "Transcribing upload"
        );

        let transcript = self.client.transcribe(upload).await?;
        ctx.response().json(&transcript)?;
        Ok(())
    }
}
