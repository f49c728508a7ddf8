//! Configuration module for the functions gateway
//!
//! Server configuration is assembled from several sources: .env files, environment
//! variables and an optional YAML file. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//!
//! # Example
//! ```rust,no_run
//! use functions_gateway::config::ServerConfig;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config = ServerConfig::from_file(Path::new("config.yaml"))?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

mod env;
mod merge;
mod yaml;

pub use env::EnvConfig;
pub use yaml::{GroqYaml, ServerYaml, YamlConfig};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_STATIC_ROOT: &str = "frontend-dist";
/// 25 MiB, the provider's upload ceiling for audio files.
pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;
pub const DEFAULT_COMPLETION_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Errors raised while building a [`ServerConfig`].
///
/// All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required configuration value: {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Settings for the Groq provider shared by the built-in AI functions.
#[derive(Clone, PartialEq, Eq)]
pub struct GroqConfig {
    pub api_key: String,
    /// Base URL for audio transcription, without trailing slash
    pub base_url: String,
    /// Base URL for chat completions, without trailing slash
    pub completion_url: String,
    pub completion_model: String,
    pub timeout_seconds: u64,
}

impl fmt::Debug for GroqConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("completion_url", &self.completion_url)
            .field("completion_model", &self.completion_model)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Implement Drop to zeroize the API key when the provider config is dropped.
impl Drop for GroqConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.api_key.zeroize();
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Document root of the prebuilt frontend bundle
    pub static_root: PathBuf,
    pub max_body_bytes: usize,
    pub groq: GroqConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables only
    ///
    /// The .env file is loaded by `main` before this runs, so its values are
    /// visible here as regular environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        merge::merge_config(EnvConfig::from_env()?, None)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if the YAML file cannot be read or is malformed, an
    /// environment variable has an invalid format, or a required value is
    /// missing from every source.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let yaml_config = YamlConfig::from_file(path)?;
        merge::merge_config(EnvConfig::from_env()?, Some(yaml_config))
    }

    /// Build a configuration from already loaded sources.
    pub fn from_sources(env: EnvConfig, yaml: Option<YamlConfig>) -> Result<Self, ConfigError> {
        merge::merge_config(env, yaml)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
