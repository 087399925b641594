//! Diagnostics for the argline command parser.
//!
//! Provides [`Diagnostic`], [`Severity`], and [`Span`] types used to report
//! syntax errors, escape decoding failures, and warnings from the parser.
//! Diagnostic codes are defined in the [`codes`] module.

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error: the line is not a valid command.
    Error,
    /// Warning: the line parsed, but not exactly as written.
    Warn,
    /// Informational note.
    Info,
}

/// Byte span in the source line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Span {
    /// Byte offset of the first character (0-based).
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Create a zero-width span at the given position.
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(self, other: Span) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Shift both ends right by `offset` bytes.
    ///
    /// Used when the parsed text is a suffix of a larger message
    /// (e.g. after the command prefix has been stripped).
    pub fn shifted(self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span is zero-width.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A diagnostic message produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"CMD1004"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Optional byte span in the source line that this diagnostic relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Machine-readable context for tooling. Keys and values are free-form strings.
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Error, message, span)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Warn, message, span)
    }

    /// Shorthand for an `Info` diagnostic.
    pub fn info(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Info, message, span)
    }

    /// Attach machine-readable context metadata (builder pattern).
    ///
    /// Keys are short descriptors like `"expected"`, `"found"`, `"escape"`.
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Move the span right by `offset` bytes, if there is one.
    pub fn shifted(mut self, offset: usize) -> Self {
        self.span = self.span.map(|s| s.shifted(offset));
        self
    }

    /// Whether this diagnostic is an error.
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    let text = match id {
        codes::UNEXPECTED_TOKEN => {
            "A token appeared where the command grammar does not allow it. \
             A command line is a name followed by whitespace-separated arguments."
        }
        codes::MISSING_COMMAND_NAME => {
            "The line must begin with a command name made of letters and digits. \
             Empty lines and lines starting with whitespace, quotes, or symbols are rejected."
        }
        codes::INVALID_COMMAND_NAME => {
            "Command names contain only letters and digits and must be followed by \
             whitespace or the end of the line."
        }
        codes::UNTERMINATED_QUOTE => {
            "A quoted argument was opened with '\"' but the line ended before the \
             closing quote. Add the closing '\"' or escape the quote as \\\"."
        }
        codes::MISSING_SEPARATOR => {
            "Arguments must be separated by at least one whitespace character. \
             Adjacent quoted segments such as \"a\"\"b\" are not joined."
        }
        codes::INVALID_ESCAPE => {
            "A backslash must be followed by one of b t n f r ' \" \\, by u and four \
             hex digits, or by one to three octal digits. Write \\\\ for a literal backslash."
        }
        codes::OCTAL_OUT_OF_RANGE => {
            "Octal escapes encode a single byte, so their value must be at most \\377 (255)."
        }
        codes::LONE_SURROGATE => {
            "A \\uXXXX escape named a UTF-16 surrogate half (D800-DFFF) that is not part \
             of a high/low pair, so it does not encode a character."
        }
        codes::MALFORMED_ESCAPE_DIGITS => "The digits of a numeric escape could not be read.",
        codes::ESCAPE_PASSED_THROUGH => {
            "An invalid escape was kept as literal text because the lenient escape \
             policy is active. The argument differs from what strict parsing accepts."
        }
        codes::NOT_A_COMMAND => {
            "The message does not start with the configured command prefix, so it is \
             not treated as a command."
        }
        _ => return None,
    };
    Some(text)
}
