//! Parser configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Prefix that marks a chat message as a command unless configured otherwise.
pub const DEFAULT_COMMAND_PREFIX: &str = "!";

/// What to do with a backslash form that is not a known escape (`\q`, `\u0`).
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidEscapePolicy {
    /// Fail the whole command.
    #[default]
    Reject,
    /// Keep the escape's raw text in the argument and attach a warning.
    Passthrough,
}

/// Settings for [`parse_line_with`](crate::parse_line_with) and
/// [`parse_message`](crate::parse_message).
///
/// Deserializes from JSON with every field optional:
///
/// ```json
/// { "command_prefix": "/", "invalid_escape": "passthrough" }
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseConfig {
    /// Prefix a chat message must start with to be treated as a command.
    pub command_prefix: String,
    /// Handling of invalid escapes.
    pub invalid_escape: InvalidEscapePolicy,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            command_prefix: DEFAULT_COMMAND_PREFIX.to_owned(),
            invalid_escape: InvalidEscapePolicy::Reject,
        }
    }
}

impl ParseConfig {
    /// Replace the command prefix.
    pub fn with_command_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.command_prefix = prefix.into();
        self
    }

    /// Replace the invalid-escape policy.
    pub fn with_invalid_escape(mut self, policy: InvalidEscapePolicy) -> Self {
        self.invalid_escape = policy;
        self
    }

    /// Check that the prefix is usable: non-empty, no whitespace, no `"`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = &self.command_prefix;
        if prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        if let Some(c) = prefix.chars().find(|c| c.is_whitespace() || *c == '"') {
            return Err(ConfigError::InvalidPrefix {
                prefix: prefix.clone(),
                offending: c,
            });
        }
        Ok(())
    }
}
