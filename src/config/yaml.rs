use serde::Deserialize;
use std::path::Path;

use super::ConfigError;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present in
/// the file override environment variables.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 3000
///   static_root: "frontend-dist"
///   max_body_bytes: 26214400
///
/// groq:
///   api_key: "gsk_..."
///   base_url: "https://api.groq.com"
///   completion_url: "https://api.groq.com"
///   completion_model: "llama-3.3-70b-versatile"
///   timeout_seconds: 30
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub groq: Option<GroqYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Directory holding the prebuilt frontend bundle
    pub static_root: Option<String>,
    /// Upper bound for inbound request bodies
    pub max_body_bytes: Option<usize>,
}

/// Groq provider settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GroqYaml {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Distinct host for chat completions (defaults to `base_url`)
    pub completion_url: Option<String>,
    pub completion_model: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the YAML is malformed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_full_document() {
        let yaml = r#"
server:
  host: "127.0.0.1"
  port: 8080
  static_root: "/srv/bundle"
groq:
  api_key: "gsk_test"
  base_url: "https://api.groq.com"
  completion_model: "llama-3.1-8b-instant"
  timeout_seconds: 10
"#;

        let config = YamlConfig::parse(yaml).unwrap();

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host, Some("127.0.0.1".to_string()));
        assert_eq!(server.port, Some(8080));
        assert_eq!(server.static_root, Some("/srv/bundle".to_string()));
        assert_eq!(server.max_body_bytes, None);

        let groq = config.groq.as_ref().unwrap();
        assert_eq!(groq.api_key, Some("gsk_test".to_string()));
        assert_eq!(groq.completion_url, None);
        assert_eq!(
            groq.completion_model,
            Some("llama-3.1-8b-instant".to_string())
        );
        assert_eq!(groq.timeout_seconds, Some(10));
    }

    #[test]
    fn test_yaml_empty_document() {
        let config = YamlConfig::parse("{}").unwrap();
        assert!(config.server.is_none());
        assert!(config.groq.is_none());
    }

    #[test]
    fn test_yaml_invalid_type() {
        let yaml = "server:\n  port: \"not-a-port\"\n";
        assert!(matches!(
            YamlConfig::parse(yaml),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_yaml_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "server:\n  port: 4000\n").unwrap();

        let config = YamlConfig::from_file(&path).unwrap();
        assert_eq!(config.server.unwrap().port, Some(4000));
    }

    #[test]
    fn test_yaml_missing_file() {
        let result = YamlConfig::from_file(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
