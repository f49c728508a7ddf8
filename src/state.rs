//! Shared application state.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::functions::FunctionRegistry;

/// State shared by every request handler.
///
/// Read-only after startup; the registry only fills its per-function cells.
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub registry: Arc<FunctionRegistry>,
}

impl AppState {
    /// Build state with every built-in function registered.
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let config = Arc::new(config);
        let registry = FunctionRegistry::with_builtins(config.clone());
        Self::with_registry(config, registry)
    }

    /// Build state around a custom registry.
    pub fn with_registry(config: Arc<ServerConfig>, registry: FunctionRegistry) -> Arc<Self> {
        Arc::new(Self {
            config,
            registry: Arc::new(registry),
        })
    }
}
