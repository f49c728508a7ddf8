pub mod config;
pub mod errors;
pub mod functions;
pub mod handlers;
pub mod pipeline;
pub mod routes;
pub mod state;

// Re-export commonly used items for convenience
pub use config::ServerConfig;
pub use errors::{FunctionError, FunctionResult, UpstreamError};
pub use functions::{ExecutionContext, FunctionHandler, FunctionRegistry};
pub use routes::create_router;
pub use state::AppState;
