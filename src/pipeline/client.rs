//! Two-stage inference against a running gateway.
//!
//! Stage one uploads audio to `groqTranscription`, stage two sends the
//! templated transcript to `groqCompletion` and interprets the answer.

use std::path::Path;
use std::time::Duration;

use reqwest::{
    Client, Response,
    multipart::{Form, Part},
};
use serde_json::json;
use tracing::{debug, info};

use super::selection::{ModuleSelection, transcript_text};
use super::template::PromptTemplate;
use crate::functions::groq::AudioUpload;

const TRANSCRIPTION_ROUTE: &str = "/api/functions/groqTranscription";
const COMPLETION_ROUTE: &str = "/api/functions/groqCompletion";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

const USER_AGENT: &str = concat!("Functions-Gateway-Pipeline/", env!("CARGO_PKG_VERSION"));

/// Failure of one pipeline stage.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Reading or transcribing the recording failed.
    #[error("Error during recording: {0}")]
    Transcription(String),

    /// Turning the transcript into a module selection failed.
    #[error("Error during processing: {0}")]
    Completion(String),
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceOutcome {
    pub transcript: String,
    pub selection: ModuleSelection,
}

/// Client composing the transcription and completion functions.
#[derive(Debug, Clone)]
pub struct InferencePipeline {
    http_client: Client,
    gateway_url: String,
    template: PromptTemplate,
}

impl InferencePipeline {
    pub fn new(gateway_url: &str, template: PromptTemplate) -> Result<Self, PipelineError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PipelineError::Transcription(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            template,
        })
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Run both stages for one recording.
    pub async fn run(&self, audio: AudioUpload) -> Result<InferenceOutcome, PipelineError> {
        let transcript = self.transcribe(audio).await?;
        info!(transcript = %transcript, "Recording transcribed");

        let selection = self.select_module(&transcript).await?;
        info!(selection = ?selection, "Module selected");

        Ok(InferenceOutcome {
            transcript,
            selection,
        })
    }

    /// Upload a recording and return its transcript.
    ///
    /// The audio buffer is moved into the request and freed once it is sent.
    pub async fn transcribe(&self, audio: AudioUpload) -> Result<String, PipelineError> {
        let size = audio.bytes.len();
        let part = Part::stream_with_length(audio.bytes, size as u64)
            .file_name(audio.file_name)
            .mime_str(&audio.content_type)
            .map_err(|e| PipelineError::Transcription(format!("invalid content type: {e}")))?;
        let form = Form::new().part("file", part);

        debug!(bytes = size, "Uploading recording");

        let response = self
            .http_client
            .post(format!("{}{}", self.gateway_url, TRANSCRIPTION_ROUTE))
            .multipart(form)
            .send()
            .await
            .map_err(|e| PipelineError::Transcription(e.to_string()))?;

        let body = read_success(response)
            .await
            .map_err(PipelineError::Transcription)?;
        Ok(transcript_text(&body))
    }

    /// Ask the completion function which module the transcript refers to.
    pub async fn select_module(&self, transcript: &str) -> Result<ModuleSelection, PipelineError> {
        let body = json!({
            "systemPrompt": self.template.system_prompt(),
            "prompt": self.template.prompt(transcript),
        });

        let response = self
            .http_client
            .post(format!("{}{}", self.gateway_url, COMPLETION_ROUTE))
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::Completion(e.to_string()))?;

        let completion = read_success(response)
            .await
            .map_err(PipelineError::Completion)?;
        debug!(completion = %completion, "Completion received");

        Ok(ModuleSelection::parse(&completion))
    }
}

/// Load a recording from disk, guessing its content type from the extension.
pub async fn load_audio(path: &Path) -> Result<AudioUpload, PipelineError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        PipelineError::Transcription(format!("failed to read {}: {e}", path.display()))
    })?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("recording.wav")
        .to_string();

    Ok(AudioUpload {
        bytes: bytes.into(),
        content_type: audio_content_type(path).to_string(),
        file_name,
    })
}

fn audio_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3" | "mpeg" | "mpga") => "audio/mpeg",
        Some("m4a" | "mp4") => "audio/mp4",
        Some("ogg" | "opus") => "audio/ogg",
        Some("webm") => "audio/webm",
        Some("flac") => "audio/flac",
        _ => "application/octet-stream",
    }
}

async fn read_success(response: Response) -> Result<String, String> {
    let status = response.status();
    let body = response.text().await.map_err(|e| e.to_string())?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(format!("gateway returned {status}: {body}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_audio_content_type() {
        assert_eq!(audio_content_type(Path::new("a.WAV")), "audio/wav");
        assert_eq!(audio_content_type(Path::new("clip.webm")), "audio/webm");
        assert_eq!(audio_content_type(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_load_audio() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("voice.mp3");
        std::fs::write(&path, b"ID3fake").unwrap();

        let audio = load_audio(&path).await.unwrap();
        assert_eq!(audio.file_name, "voice.mp3");
        assert_eq!(audio.content_type, "audio/mpeg");
        assert_eq!(audio.bytes.as_ref(), b"ID3fake");
    }

    #[tokio::test]
    async fn test_load_missing_audio_is_transcription_error() {
        let result = load_audio(&PathBuf::from("/no/such/recording.wav")).await;
        assert!(matches!(result, Err(PipelineError::Transcription(_))));
    }

    #[test]
    fn test_gateway_url_trailing_slash() {
        let pipeline =
            InferencePipeline::new("http://localhost:3000/", PromptTemplate::default()).unwrap();
        assert_eq!(pipeline.gateway_url, "http://localhost:3000");
    }
}
