//! Named functions served under `/api/functions/{name}`.
//!
//! Each function implements [`FunctionHandler`] and is declared once with a
//! [`FunctionConstructor`] submitted through `inventory`. The
//! [`FunctionRegistry`] builds handlers lazily from the shared configuration.

use async_trait::async_trait;

pub mod builtin;
pub mod context;
pub mod example;
pub mod groq;
pub mod isolation;
pub mod name;
pub mod registry;

pub use context::{ExecutionContext, FunctionRequest, FunctionResponse, ResponseBody};
pub use name::{FunctionName, InvalidFunctionName};
pub use registry::{FunctionConstructor, FunctionRegistry, ResolveError};

use crate::errors::FunctionResult;

/// A unit of logic invoked by name.
///
/// Handlers read input from the context request and write their answer into
/// the context response. Returning an error discards whatever was written.
#[async_trait]
pub trait FunctionHandler: Send + Sync + 'static {
    async fn call(&self, ctx: &mut ExecutionContext) -> FunctionResult;
}
