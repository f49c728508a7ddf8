//! Panic isolation for function constructors and handlers.
//!
//! Panics raised while building or running a handler are caught and turned
//! into errors so a faulty function cannot take the gateway down.
//!
//! `catch_unwind` only catches unwinding panics; the release profile must not
//! set `panic = "abort"`.

use std::any::Any;
use std::panic::{AssertUnwindSafe, UnwindSafe, catch_unwind};

use futures::FutureExt;

use super::FunctionHandler;
use super::context::ExecutionContext;
use crate::errors::{FunctionError, FunctionResult};

/// Call a constructor, preserving its error type and converting a panic with
/// `panic_to_error`.
pub fn call_preserving_error<F, T, E, PC>(constructor: F, panic_to_error: PC) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + UnwindSafe,
    PC: FnOnce(String) -> E,
{
    match catch_unwind(constructor) {
        Ok(result) => result,
        Err(panic_info) => {
            let msg = extract_panic_message(&panic_info);
            tracing::error!(message = %msg, "Function constructor panicked");
            Err(panic_to_error(msg))
        }
    }
}

/// Run a handler, converting a panic into [`FunctionError::Internal`].
///
/// Panics in tasks spawned by the handler are not caught here.
pub async fn invoke_handler(
    handler: &dyn FunctionHandler,
    ctx: &mut ExecutionContext,
) -> FunctionResult {
    match AssertUnwindSafe(handler.call(ctx)).catch_unwind().await {
        Ok(result) => result,
        Err(panic_info) => {
            let msg = extract_panic_message(&panic_info);
            Err(FunctionError::Internal(format!("handler panicked: {msg}")))
        }
    }
}

/// Extract a readable message from a panic payload
pub fn extract_panic_message(panic_info: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
