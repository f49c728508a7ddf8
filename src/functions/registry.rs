//! Function Registry
//!
//! Built-in functions are declared at compile time with
//! `inventory::submit!` and indexed by exact name when the registry is built.
//! Handlers are instantiated on first use from the shared [`ServerConfig`] and
//! cached for the lifetime of the process.
//!
//! # Usage
//!
//! ```ignore
//! use functions_gateway::functions::{FunctionName, FunctionRegistry};
//!
//! let registry = FunctionRegistry::with_builtins(config);
//! let handler = registry.resolve(&FunctionName::parse("groqCompletion")?).await?;
//! ```

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use tokio::sync::OnceCell;

use super::FunctionHandler;
use super::isolation::call_preserving_error;
use super::name::FunctionName;
use crate::config::ServerConfig;
use crate::errors::FunctionError;

/// Factory function type for handlers registered at runtime
pub type FunctionFactoryFn =
    Arc<dyn Fn(&ServerConfig) -> Result<Arc<dyn FunctionHandler>, FunctionError> + Send + Sync>;

/// Factory function pointer type for compile-time registration
pub type FunctionFactoryPtr = fn(&ServerConfig) -> Result<Arc<dyn FunctionHandler>, FunctionError>;

/// Function constructor for inventory-based registration
pub struct FunctionConstructor {
    /// Exact name the function is served under
    pub name: &'static str,
    pub description: &'static str,
    pub factory: FunctionFactoryPtr,
}

impl FunctionConstructor {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        factory: FunctionFactoryPtr,
    ) -> Self {
        Self {
            name,
            description,
            factory,
        }
    }
}

// Collect all built-in functions at link time
inventory::collect!(FunctionConstructor);

/// Why a name could not be turned into a handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("function not found: {0}")]
    NotFound(String),

    /// The handler exists but its constructor failed or panicked.
    #[error("function '{name}' failed to load: {reason}")]
    LoadFailed { name: String, reason: String },
}

struct RegistryEntry {
    factory: FunctionFactoryFn,
    instance: OnceCell<Arc<dyn FunctionHandler>>,
}

/// Name to handler index.
///
/// Registration happens before the registry is shared; afterwards only the
/// per-entry cells change, and only once.
pub struct FunctionRegistry {
    config: Arc<ServerConfig>,
    entries: HashMap<String, RegistryEntry>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self {
            config,
            entries: HashMap::new(),
        }
    }

    /// Create a registry holding every function submitted via `inventory`
    pub fn with_builtins(config: Arc<ServerConfig>) -> Self {
        let mut registry = Self::new(config);

        for constructor in inventory::iter::<FunctionConstructor> {
            match FunctionName::parse(constructor.name) {
                Ok(name) => {
                    registry.register(name, Arc::new(constructor.factory));
                    tracing::debug!(
                        function = %constructor.name,
                        description = %constructor.description,
                        "Registered built-in function"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping built-in function with invalid name");
                }
            }
        }

        registry
    }

    /// Register a handler factory, replacing any previous entry of that name
    pub fn register(&mut self, name: FunctionName, factory: FunctionFactoryFn) {
        self.entries.insert(
            name.as_str().to_string(),
            RegistryEntry {
                factory,
                instance: OnceCell::new(),
            },
        );
    }

    /// Register an already built handler
    pub fn register_handler(&mut self, name: FunctionName, handler: Arc<dyn FunctionHandler>) {
        self.register(
            name,
            Arc::new(move |_: &ServerConfig| Ok::<_, FunctionError>(handler.clone())),
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered function names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a name to its handler, building it on first use.
    ///
    /// A failed construction is not cached; the next call retries.
    pub async fn resolve(
        &self,
        name: &FunctionName,
    ) -> Result<Arc<dyn FunctionHandler>, ResolveError> {
        let entry = self
            .entries
            .get(name.as_str())
            .ok_or_else(|| ResolveError::NotFound(name.to_string()))?;

        let handler = entry
            .instance
            .get_or_try_init(|| async {
                let factory = entry.factory.clone();
                let config = self.config.as_ref();
                let handler = call_preserving_error(AssertUnwindSafe(|| factory(config)), |msg| {
                    FunctionError::Internal(format!("constructor panicked: {msg}"))
                })?;
                tracing::debug!(function = %name, "Instantiated function handler");
                Ok::<_, FunctionError>(handler)
            })
            .await
            .map_err(|e| ResolveError::LoadFailed {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        Ok(handler.clone())
    }

    /// Instantiate every registered handler.
    ///
    /// Returns the number of handlers loaded, or the first load failure.
    pub async fn preload(&self) -> Result<usize, ResolveError> {
        for name in self.names() {
            let name = FunctionName::parse(&name).map_err(|e| ResolveError::NotFound(e.0))?;
            self.resolve(&name).await?;
        }
        Ok(self.entries.len())
    }
}
