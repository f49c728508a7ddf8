//! Environment variable loading.
//!
//! Values are read through a lookup function so the parsing rules can be
//! exercised without touching the process environment.

use super::ConfigError;

/// Raw configuration values read from the environment.
///
/// Empty strings are treated as unset.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub static_root: Option<String>,
    pub max_body_bytes: Option<usize>,
    pub groq_api_key: Option<String>,
    pub groq_base_url: Option<String>,
    pub groq_completion_url: Option<String>,
    pub groq_completion_model: Option<String>,
    pub groq_timeout_seconds: Option<u64>,
}

impl EnvConfig {
    /// Read all known keys from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read all known keys through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            host: get("HOST"),
            port: parse_number(&get, "PORT")?,
            static_root: get("STATIC_ROOT"),
            max_body_bytes: parse_number(&get, "MAX_BODY_BYTES")?,
            groq_api_key: get("GROQ_API_KEY"),
            groq_base_url: get("GROQ_BASE_URL"),
            groq_completion_url: get("GROQ_COMPLETION_URL"),
            groq_completion_model: get("GROQ_COMPLETION_MODEL"),
            groq_timeout_seconds: parse_number(&get, "GROQ_TIMEOUT_SECONDS")?,
        })
    }
}

fn parse_number<T, F>(get: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                key,
                message: format!("'{raw}' is not a valid number: {e}"),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_reads_all_keys() {
        let env = EnvConfig::from_lookup(lookup_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("STATIC_ROOT", "dist"),
            ("MAX_BODY_BYTES", "1024"),
            ("GROQ_API_KEY", "gsk_abc"),
            ("GROQ_BASE_URL", "https://api.groq.com"),
            ("GROQ_COMPLETION_URL", "https://completions.example.com"),
            ("GROQ_COMPLETION_MODEL", "llama-3.1-8b-instant"),
            ("GROQ_TIMEOUT_SECONDS", "5"),
        ]))
        .unwrap();

        assert_eq!(env.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(env.port, Some(3000));
        assert_eq!(env.static_root.as_deref(), Some("dist"));
        assert_eq!(env.max_body_bytes, Some(1024));
        assert_eq!(env.groq_api_key.as_deref(), Some("gsk_abc"));
        assert_eq!(env.groq_base_url.as_deref(), Some("https://api.groq.com"));
        assert_eq!(
            env.groq_completion_url.as_deref(),
            Some("https://completions.example.com")
        );
        assert_eq!(
            env.groq_completion_model.as_deref(),
            Some("llama-3.1-8b-instant")
        );
        assert_eq!(env.groq_timeout_seconds, Some(5));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let env = EnvConfig::from_lookup(lookup_from(&[("PORT", ""), ("GROQ_API_KEY", "  ")]))
            .unwrap();
        assert_eq!(env.port, None);
        assert_eq!(env.groq_api_key, None);
    }

    #[test]
    fn test_invalid_port() {
        let result = EnvConfig::from_lookup(lookup_from(&[("PORT", "eighty")]));
        match result {
            Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, "PORT"),
            other => panic!("Expected invalid PORT, got {other:?}"),
        }
    }

    #[test]
    fn test_port_out_of_range() {
        let result = EnvConfig::from_lookup(lookup_from(&[("PORT", "70000")]));
        assert!(matches!(result, Err(ConfigError::Invalid { key: "PORT", .. })));
    }
}
