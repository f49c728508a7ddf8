//! `groqCompletion`: chat completion proxy returning plain text.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::client::GroqClient;
use crate::config::ServerConfig;
use crate::errors::{FunctionError, FunctionResult};
use crate::functions::{ExecutionContext, FunctionHandler};

pub const FUNCTION_NAME: &str = "groqCompletion";

pub const PROMPT_REQUIRED_MESSAGE: &str = "Prompt is required";

/// JSON body accepted by the completion function.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug)]
pub struct CompletionFunction {
    client: GroqClient,
}

impl CompletionFunction {
    pub fn new(client: GroqClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ServerConfig) -> Result<Arc<dyn FunctionHandler>, FunctionError> {
        Ok(Arc::new(Self::new(GroqClient::new(&config.groq)?)))
    }
}

#[async_trait]
impl FunctionHandler for CompletionFunction {
    async fn call(&self, ctx: &mut ExecutionContext) -> FunctionResult {
        let request: CompletionRequest = ctx.request().json()?;

        let prompt = match request.prompt.as_deref() {
            Some(prompt) if !prompt.is_empty() => prompt,
            _ => return Err(FunctionError::validation(PROMPT_REQUIRED_MESSAGE)),
        };
        let system_prompt = request.system_prompt.as_deref().unwrap_or_default();

        tracing::info!(
            model = %self.client.completion_model(),
            prompt_chars = prompt.chars().count(),
            "Requesting completion"
        );

        let content = self.client.complete(system_prompt, prompt).await?;
        ctx.response().text(content);
        Ok(())
    }
}
