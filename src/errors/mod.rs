//! Error types shared across the gateway.

pub mod function_error;

pub use function_error::{FunctionError, INTERNAL_ERROR_MESSAGE, UpstreamError};

/// Result type returned by function handlers.
pub type FunctionResult<T = ()> = Result<T, FunctionError>;
