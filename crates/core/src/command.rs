//! Line-level entry points: from raw text to a decoded command.

use serde::{Deserialize, Serialize};

use crate::config::ParseConfig;
use crate::error::ParseError;
use crate::grammar::builder::build_command;
use crate::grammar::diag::Diagnostic;
use crate::grammar::emit::emit_command_line;
use crate::grammar::parser::parse_tree;

/// A decoded command: its name and argument strings in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCommand {
    /// The command name.
    pub name: String,
    /// Decoded arguments.
    pub arguments: Vec<String>,
}

impl ParsedCommand {
    /// Create a command from a name and its arguments.
    pub fn new<I, S>(name: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    /// A command line that parses back to this command.
    pub fn to_command_line(&self) -> String {
        emit_command_line(&self.name, &self.arguments)
    }
}

/// A successful parse together with any warnings it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseOutput {
    /// The decoded command.
    pub command: ParsedCommand,
    /// Non-fatal diagnostics (only produced by lenient escape handling).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Diagnostic>,
}

impl ParseOutput {
    fn shifted(mut self, offset: usize) -> Self {
        self.warnings = self
            .warnings
            .into_iter()
            .map(|w| w.shifted(offset))
            .collect();
        self
    }
}

/// Parse one line with the default configuration.
///
/// Invalid escapes fail the whole line.
///
/// ```
/// let cmd = argline_core::parse_line(r#"echo "hello \u0041"  world"#).unwrap();
/// assert_eq!(cmd.name, "echo");
/// assert_eq!(cmd.arguments, ["hello A", "world"]);
/// ```
pub fn parse_line(line: &str) -> Result<ParsedCommand, ParseError> {
    parse_line_with(line, &ParseConfig::default()).map(|out| out.command)
}

/// Parse one line with an explicit configuration.
///
/// The command prefix is not consulted; see [`parse_message`].
pub fn parse_line_with(line: &str, config: &ParseConfig) -> Result<ParseOutput, ParseError> {
    let tree = parse_tree(line)?;
    let out = build_command(&tree, config)?;
    log::debug!(
        "parsed {:?} -> {:?} {:?}",
        line,
        out.command.name,
        out.command.arguments
    );
    Ok(out)
}

/// Parse a chat message that may or may not be a command.
///
/// Messages that do not start with `config.command_prefix` are not commands
/// and yield `Ok(None)`. Otherwise the prefix is removed and the rest is
/// parsed as a line. Spans in errors and warnings stay relative to `message`.
pub fn parse_message(message: &str, config: &ParseConfig) -> Result<Option<ParseOutput>, ParseError> {
    let Some(line) = strip_command_prefix(message, &config.command_prefix) else {
        log::trace!("message does not start with {:?}", config.command_prefix);
        return Ok(None);
    };
    let offset = message.len() - line.len();
    parse_line_with(line, config)
        .map(|out| Some(out.shifted(offset)))
        .map_err(|e| e.shifted(offset))
}

/// The rest of `message` after `prefix`, or `None` when it does not start
/// with it. An empty prefix never matches.
pub fn strip_command_prefix<'a>(message: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    message.strip_prefix(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InvalidEscapePolicy;
    use crate::grammar::diag::Span;

    #[test]
    fn end_to_end() {
        let cmd = parse_line("echo \"hello \\u0041\"  world").unwrap();
        assert_eq!(cmd, ParsedCommand::new("echo", ["hello A", "world"]));
    }

    #[test]
    fn message_without_prefix_is_not_a_command() {
        let config = ParseConfig::default();
        assert_eq!(parse_message("hello there", &config), Ok(None));
        assert_eq!(parse_message("", &config), Ok(None));
    }

    #[test]
    fn message_with_prefix() {
        let config = ParseConfig::default();
        let out = parse_message("!roll 2d6", &config).unwrap().unwrap();
        assert_eq!(out.command, ParsedCommand::new("roll", ["2d6"]));

        let config = config.with_command_prefix("bot:");
        let out = parse_message("bot:ping", &config).unwrap().unwrap();
        assert_eq!(out.command.name, "ping");
    }

    #[test]
    fn message_errors_are_relative_to_message() {
        let config = ParseConfig::default();
        let err = parse_message("!say \"oops", &config).unwrap_err();
        assert_eq!(err.span(), Some(Span::empty(10)));

        let err = parse_message("!say \\q", &config).unwrap_err();
        assert_eq!(err.span(), Some(Span::new(5, 7)));
    }

    #[test]
    fn message_warnings_are_relative_to_message() {
        let config = ParseConfig::default().with_invalid_escape(InvalidEscapePolicy::Passthrough);
        let out = parse_message("!say \\q", &config).unwrap().unwrap();
        assert_eq!(out.command.arguments, vec!["\\q"]);
        assert_eq!(out.warnings[0].span, Some(Span::new(5, 7)));
    }

    #[test]
    fn bare_prefix_is_missing_command_name() {
        let err = parse_message("!", &ParseConfig::default()).unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
        assert_eq!(err.span(), Some(Span::empty(1)));
    }

    #[test]
    fn strip_prefix_rules() {
        assert_eq!(strip_command_prefix("!a", "!"), Some("a"));
        assert_eq!(strip_command_prefix("a", "!"), None);
        assert_eq!(strip_command_prefix("a", ""), None);
    }

    #[test]
    fn to_command_line_round_trips() {
        let cmd = ParsedCommand::new("say", ["a b", "", "x\\y", "\"q\""]);
        assert_eq!(parse_line(&cmd.to_command_line()).unwrap(), cmd);
    }

    #[test]
    fn output_serializes_without_empty_warnings() {
        let out = parse_line_with("go north", &ParseConfig::default()).unwrap();
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["command"]["arguments"][0], "north");
        assert!(json.get("warnings").is_none());
    }
}
