//! Prompt templating for the module selection step.

pub const QUERY_PLACEHOLDER: &str = "$QUERY";

pub const DEFAULT_MODULES: &str = "location,events,diagnostics";

pub const DEFAULT_SYSTEM_PROMPT: &str = r#"Respond with parseable JSON (valid for JSON.parse)

BAD:
Based on the user query 'Event', the module name to redirect to would be 'Events' or 'EventManagement'. However, a more specific and commonly used module name would be 'Calendar'.

GOOD:
{moduleName:"events"}"#;

pub const DEFAULT_PROMPT_TEMPLATE: &str =
    "Return the module name to redirect to based on the user query: $QUERY";

/// Prompts used to turn a transcript into a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub system_prompt: String,
    /// User prompt; the first `$QUERY` is replaced by the transcript.
    pub prompt_template: String,
    pub modules: Vec<String>,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            modules: parse_modules(DEFAULT_MODULES),
        }
    }
}

impl PromptTemplate {
    /// System prompt with the candidate module list appended.
    pub fn system_prompt(&self) -> String {
        format!(
            "{}\n\nPossible modules names: {}\n",
            self.system_prompt,
            self.modules.join(",")
        )
    }

    /// User prompt with the transcript substituted for the first placeholder.
    ///
    /// Without a placeholder the template is sent unchanged.
    pub fn prompt(&self, transcript: &str) -> String {
        self.prompt_template.replacen(QUERY_PLACEHOLDER, transcript, 1)
    }
}

/// Split a comma separated module list, dropping blanks.
pub fn parse_modules(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|module| !module.is_empty())
        .map(str::to_string)
        .collect()
}
