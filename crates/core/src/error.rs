//! Typed error types for command-line parsing.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::grammar::diag::{Diagnostic, Span};
use crate::grammar::escape::EscapeDecodeError;
use crate::grammar::parser::{SyntaxError, describe_expected};

/// Why a command line could not be turned into a command.
///
/// A syntax error is reported on its own; escape failures are only reported
/// for lines that are syntactically valid.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The token sequence does not match the command grammar.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// One or more escapes on the line could not be decoded.
    #[error(transparent)]
    Escapes(#[from] EscapeErrors),
}

impl ParseError {
    /// Span of the first failure on the line.
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::Syntax(e) => Some(e.span),
            ParseError::Escapes(e) => e.first().map(|e| e.span),
        }
    }

    /// Move every span right by `offset` bytes.
    pub fn shifted(self, offset: usize) -> Self {
        match self {
            ParseError::Syntax(e) => ParseError::Syntax(e.shifted(offset)),
            ParseError::Escapes(e) => ParseError::Escapes(e.shifted(offset)),
        }
    }

    /// Render the failure as error diagnostics, one per problem found.
    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            ParseError::Syntax(e) => vec![syntax_diagnostic(e)],
            ParseError::Escapes(errs) => errs.iter().map(escape_diagnostic).collect(),
        }
    }
}

fn syntax_diagnostic(e: &SyntaxError) -> Diagnostic {
    let mut ctx = BTreeMap::new();
    ctx.insert("expected".into(), describe_expected(&e.expected));
    ctx.insert("found".into(), e.found.describe().to_owned());
    if !e.found_text.is_empty() {
        ctx.insert("found_text".into(), e.found_text.clone());
    }
    Diagnostic::error(
        e.kind.code(),
        format!("{}: expected {}, found {}", e.kind, describe_expected(&e.expected), e.found),
        Some(e.span),
    )
    .with_context(ctx)
}

fn escape_diagnostic(e: &EscapeDecodeError) -> Diagnostic {
    let mut ctx = BTreeMap::new();
    ctx.insert("escape".into(), e.text.clone());
    Diagnostic::error(e.kind.code(), format!("{} `{}`", e.kind, e.text), Some(e.span))
        .with_context(ctx)
}

/// Every escape failure found on one line, in source order. Never empty
/// when produced by the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EscapeErrors(pub Vec<EscapeDecodeError>);

impl EscapeErrors {
    /// Number of failures.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no failures were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first failure on the line.
    pub fn first(&self) -> Option<&EscapeDecodeError> {
        self.0.first()
    }

    /// Iterate over the failures in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, EscapeDecodeError> {
        self.0.iter()
    }

    fn shifted(self, offset: usize) -> Self {
        Self(self.0.into_iter().map(|e| e.shifted(offset)).collect())
    }
}

impl fmt::Display for EscapeErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => f.write_str("no escape errors"),
            [only] => write!(f, "{only}"),
            all => {
                write!(f, "{} escape errors: ", all.len())?;
                for (i, e) in all.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{e}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for EscapeErrors {}

impl<'a> IntoIterator for &'a EscapeErrors {
    type Item = &'a EscapeDecodeError;
    type IntoIter = std::slice::Iter<'a, EscapeDecodeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A [`ParseConfig`](crate::ParseConfig) that cannot be used.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The command prefix is the empty string.
    #[error("command prefix must not be empty")]
    EmptyPrefix,

    /// The command prefix contains whitespace or a quote.
    #[error("command prefix {prefix:?} contains forbidden character {offending:?}")]
    InvalidPrefix {
        /// The rejected prefix.
        prefix: String,
        /// The first forbidden character.
        offending: char,
    },
}
