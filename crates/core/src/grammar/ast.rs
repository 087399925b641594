use serde::Serialize;

use super::diag::Span;
use super::escape::EscapeKind;

/// Parse tree for one command line: a name and its ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandTree {
    /// The command name.
    pub name: CommandName,
    /// Arguments in input order.
    pub arguments: Vec<Argument>,
    /// Span from the first character of the name to the end of the last argument.
    pub span: Span,
}

/// A command name: one or more letters or digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandName {
    /// The name as written. Never empty, never contains whitespace, quotes or escapes.
    pub text: String,
    /// Source span of the name.
    pub span: Span,
}

/// One argument of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Argument {
    /// Delimited by `"`; may contain whitespace. The quotes are not part of
    /// the segments.
    Quoted {
        /// Interior segments in order (empty for `""`).
        segments: Vec<Segment>,
        /// Span including both quotes.
        span: Span,
    },
    /// Not delimited; ends at whitespace or end of line.
    Bare {
        /// Segments in order (never empty).
        segments: Vec<Segment>,
        /// Source span of the argument.
        span: Span,
    },
}

impl Argument {
    /// The argument's segments, in order.
    pub fn segments(&self) -> &[Segment] {
        match self {
            Argument::Quoted { segments, .. } | Argument::Bare { segments, .. } => segments,
        }
    }

    /// Source span of the argument.
    pub fn span(&self) -> Span {
        match self {
            Argument::Quoted { span, .. } | Argument::Bare { span, .. } => *span,
        }
    }

    /// Whether the argument was written in quotes.
    pub fn is_quoted(&self) -> bool {
        matches!(self, Argument::Quoted { .. })
    }
}

/// A piece of an argument: literal text or an escape still to be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    /// Characters copied verbatim. Adjacent literal tokens are merged.
    Text {
        /// The characters.
        text: String,
        /// Source span.
        span: Span,
    },
    /// A backslash escape.
    Escape {
        /// Which kind of escape.
        escape: EscapeKind,
        /// The escape as written, including the backslash.
        text: String,
        /// Source span.
        span: Span,
    },
}

impl Segment {
    /// Source span of the segment.
    pub fn span(&self) -> Span {
        match self {
            Segment::Text { span, .. } | Segment::Escape { span, .. } => *span,
        }
    }
}
