//! Merging of environment and YAML sources into a validated [`ServerConfig`].

use std::path::PathBuf;

use url::Url;

use super::{
    ConfigError, DEFAULT_COMPLETION_MODEL, DEFAULT_HOST, DEFAULT_MAX_BODY_BYTES,
    DEFAULT_STATIC_ROOT, DEFAULT_TIMEOUT_SECONDS, EnvConfig, GroqConfig, ServerConfig, YamlConfig,
};

/// Merge environment values with optional YAML overrides.
///
/// YAML wins wherever it sets a value.
pub(super) fn merge_config(
    env: EnvConfig,
    yaml: Option<YamlConfig>,
) -> Result<ServerConfig, ConfigError> {
    let yaml = yaml.unwrap_or_default();
    let server = yaml.server.unwrap_or_default();
    let groq = yaml.groq.unwrap_or_default();

    let host = server
        .host
        .or(env.host)
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = server.port.or(env.port).ok_or(ConfigError::Missing("PORT"))?;
    let static_root = server
        .static_root
        .or(env.static_root)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_ROOT));
    let max_body_bytes = server
        .max_body_bytes
        .or(env.max_body_bytes)
        .unwrap_or(DEFAULT_MAX_BODY_BYTES);

    let api_key = groq
        .api_key
        .or(env.groq_api_key)
        .filter(|key| !key.trim().is_empty())
        .ok_or(ConfigError::Missing("GROQ_API_KEY"))?;
    let base_url = groq
        .base_url
        .or(env.groq_base_url)
        .ok_or(ConfigError::Missing("GROQ_BASE_URL"))?;
    let base_url = validate_http_url("GROQ_BASE_URL", &base_url)?;
    let completion_url = match groq.completion_url.or(env.groq_completion_url) {
        Some(url) => validate_http_url("GROQ_COMPLETION_URL", &url)?,
        None => base_url.clone(),
    };
    let completion_model = groq
        .completion_model
        .or(env.groq_completion_model)
        .unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string());
    let timeout_seconds = groq
        .timeout_seconds
        .or(env.groq_timeout_seconds)
        .unwrap_or(DEFAULT_TIMEOUT_SECONDS);

    if timeout_seconds == 0 {
        return Err(ConfigError::Invalid {
            key: "GROQ_TIMEOUT_SECONDS",
            message: "must be greater than zero".to_string(),
        });
    }
    if max_body_bytes == 0 {
        return Err(ConfigError::Invalid {
            key: "MAX_BODY_BYTES",
            message: "must be greater than zero".to_string(),
        });
    }

    Ok(ServerConfig {
        host,
        port,
        static_root,
        max_body_bytes,
        groq: GroqConfig {
            api_key,
            base_url,
            completion_url,
            completion_model,
            timeout_seconds,
        },
    })
}

/// Check that `raw` is an absolute http(s) URL and return it without a
/// trailing slash.
fn validate_http_url(key: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|e| ConfigError::Invalid {
        key,
        message: format!("'{trimmed}' is not a valid URL: {e}"),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.trim_end_matches('/').to_string()),
        scheme => Err(ConfigError::Invalid {
            key,
            message: format!("unsupported scheme '{scheme}', expected http or https"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GroqYaml, ServerYaml};

    fn base_env() -> EnvConfig {
        EnvConfig {
            port: Some(3000),
            groq_api_key: Some("gsk_env".to_string()),
            groq_base_url: Some("https://api.groq.com/".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_applied() {
        let config = merge_config(base_env(), None).unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, 3000);
        assert_eq!(config.static_root, PathBuf::from(DEFAULT_STATIC_ROOT));
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert_eq!(config.groq.completion_model, DEFAULT_COMPLETION_MODEL);
        assert_eq!(config.groq.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    }

    #[test]
    fn test_completion_url_defaults_to_base_url() {
        let config = merge_config(base_env(), None).unwrap();
        assert_eq!(config.groq.base_url, "https://api.groq.com");
        assert_eq!(config.groq.completion_url, config.groq.base_url);
    }

    #[test]
    fn test_yaml_overrides_env() {
        let yaml = YamlConfig {
            server: Some(ServerYaml {
                port: Some(8080),
                static_root: Some("/srv/www".to_string()),
                ..Default::default()
            }),
            groq: Some(GroqYaml {
                api_key: Some("gsk_yaml".to_string()),
                completion_url: Some("http://localhost:9000".to_string()),
                ..Default::default()
            }),
        };

        let config = merge_config(base_env(), Some(yaml)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.static_root, PathBuf::from("/srv/www"));
        assert_eq!(config.groq.api_key, "gsk_yaml");
        assert_eq!(config.groq.base_url, "https://api.groq.com");
        assert_eq!(config.groq.completion_url, "http://localhost:9000");
    }

    #[test]
    fn test_missing_port() {
        let env = EnvConfig {
            port: None,
            ..base_env()
        };
        assert!(matches!(
            merge_config(env, None),
            Err(ConfigError::Missing("PORT"))
        ));
    }

    #[test]
    fn test_missing_api_key() {
        let env = EnvConfig {
            groq_api_key: None,
            ..base_env()
        };
        assert!(matches!(
            merge_config(env, None),
            Err(ConfigError::Missing("GROQ_API_KEY"))
        ));
    }

    #[test]
    fn test_missing_base_url() {
        let env = EnvConfig {
            groq_base_url: None,
            ..base_env()
        };
        assert!(matches!(
            merge_config(env, None),
            Err(ConfigError::Missing("GROQ_BASE_URL"))
        ));
    }

    #[test]
    fn test_base_url_must_be_http() {
        let env = EnvConfig {
            groq_base_url: Some("ftp://files.example.com".to_string()),
            ..base_env()
        };
        assert!(matches!(
            merge_config(env, None),
            Err(ConfigError::Invalid {
                key: "GROQ_BASE_URL",
                ..
            })
        ));

        let env = EnvConfig {
            groq_base_url: Some("not a url".to_string()),
            ..base_env()
        };
        assert!(matches!(
            merge_config(env, None),
            Err(ConfigError::Invalid {
                key: "GROQ_BASE_URL",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let env = EnvConfig {
            groq_timeout_seconds: Some(0),
            ..base_env()
        };
        assert!(matches!(
            merge_config(env, None),
            Err(ConfigError::Invalid {
                key: "GROQ_TIMEOUT_SECONDS",
                ..
            })
        ));
    }
}
