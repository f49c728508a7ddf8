//! Interpretation of completion output and transcription bodies.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Matches a bare identifier used as an object key, e.g. `{moduleName:` or `, name :`.
static BARE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)\s*:").expect("valid bare key pattern")
});

const MODULE_NAME_KEY: &str = "moduleName";

/// Module chosen by the completion step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleSelection {
    /// The completion was an object carrying a `moduleName`.
    Structured(String),
    /// Anything else, kept verbatim.
    Raw(String),
}

impl ModuleSelection {
    pub fn parse(completion: &str) -> Self {
        parse_object(completion)
            .and_then(|object| {
                object
                    .get(MODULE_NAME_KEY)
                    .and_then(Value::as_str)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
            })
            .map(Self::Structured)
            .unwrap_or_else(|| Self::Raw(completion.to_string()))
    }

    pub fn module_name(&self) -> Option<&str> {
        match self {
            Self::Structured(name) => Some(name),
            Self::Raw(_) => None,
        }
    }

    /// Text shown to a user: the module name, or the raw completion.
    pub fn display_text(&self) -> &str {
        match self {
            Self::Structured(text) | Self::Raw(text) => text,
        }
    }
}

/// Parse `text` as a JSON object, accepting unquoted identifier keys.
fn parse_object(text: &str) -> Option<serde_json::Map<String, Value>> {
    let trimmed = text.trim();
    let value = serde_json::from_str::<Value>(trimmed).ok().or_else(|| {
        let quoted = BARE_KEY.replace_all(trimmed, r#"$1"$2":"#);
        serde_json::from_str::<Value>(&quoted).ok()
    })?;

    match value {
        Value::Object(object) => Some(object),
        _ => None,
    }
}

/// Transcript carried by a transcription response body.
///
/// The `text` field of a JSON object, otherwise the whole body.
pub fn transcript_text(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(object)) => match object.get("text") {
            Some(Value::String(text)) if !text.is_empty() => text.clone(),
            _ => body.to_string(),
        },
        Ok(Value::String(text)) => text,
        _ => body.to_string(),
    }
}
