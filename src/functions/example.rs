//! `exampleFunction`: demo handler echoing its parameters.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use super::{ExecutionContext, FunctionHandler};
use crate::config::ServerConfig;
use crate::errors::{FunctionError, FunctionResult};

pub const FUNCTION_NAME: &str = "exampleFunction";

#[derive(Debug, Serialize)]
struct Greeting {
    message: String,
    timestamp: String,
    params: serde_json::Value,
}

#[derive(Debug, Default)]
pub struct ExampleFunction;

impl ExampleFunction {
    pub fn from_config(_config: &ServerConfig) -> Result<Arc<dyn FunctionHandler>, FunctionError> {
        Ok(Arc::new(Self))
    }
}

#[async_trait]
impl FunctionHandler for ExampleFunction {
    async fn call(&self, ctx: &mut ExecutionContext) -> FunctionResult {
        let name = ctx.request().function_name.to_string();
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| FunctionError::Internal(format!("failed to format timestamp: {e}")))?;

        let greeting = Greeting {
            message: format!("Hello from {name} !"),
            timestamp,
            params: json!({ "functionName": name }),
        };
        ctx.response().json(&greeting)?;
        Ok(())
    }
}
