use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid function name pattern"));

/// A function name that has passed validation.
///
/// Only ASCII letters, digits, `_` and `-` are accepted, so a name can never
/// carry path separators, dots or whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionName(String);

/// Rejected function name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid function name: {0:?}")]
pub struct InvalidFunctionName(pub String);

impl FunctionName {
    pub fn parse(raw: &str) -> Result<Self, InvalidFunctionName> {
        if NAME_PATTERN.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidFunctionName(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FunctionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_names() {
        for name in ["groqTranscription", "exampleFunction", "a", "with-dash_and_123"] {
            let parsed = FunctionName::parse(name).unwrap();
            assert_eq!(parsed.as_str(), name);
        }
    }

    #[test]
    fn test_rejects_invalid_names() {
        for name in [
            "",
            "bad.name",
            "../etc/passwd",
            "foo/bar",
            "has space",
            "semi;colon",
            "naïve",
            "trailing\n",
        ] {
            assert!(
                FunctionName::parse(name).is_err(),
                "expected {name:?} to be rejected"
            );
        }
    }
}
