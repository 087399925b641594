//! argline core library.
//!
//! Splits one line of user input (as typed into a chat-style command
//! interface) into a command name and decoded argument strings. Arguments may
//! be bare or double-quoted, and may contain backslash escapes: regular
//! (`\n`, `\"`, ...), unicode (`\u0041`), and octal (`\101`).
//!
//! The main entry points are [`parse_line`] for a single line,
//! [`parse_line_with`] for lenient escape handling, and [`parse_message`]
//! for chat messages that start with a command prefix such as `!`.
//!
//! The pipeline is [`tokenize`] → [`parse_tree`] → [`build_command`]; each
//! stage is public for tools that want the intermediate results.

#![warn(missing_docs)]

/// Line-level parse entry points and result types.
pub mod command;
/// Parser configuration.
pub mod config;
/// Error types.
pub mod error;
/// Command grammar: lexer, parser, parse tree, escape decoder, and emitter.
pub mod grammar;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Entry points
pub use command::{
    ParseOutput, ParsedCommand, parse_line, parse_line_with, parse_message, strip_command_prefix,
};

// Configuration and errors
pub use config::{DEFAULT_COMMAND_PREFIX, InvalidEscapePolicy, ParseConfig};
pub use error::{ConfigError, EscapeErrors, ParseError};

// Pipeline stages
pub use grammar::builder::build_command;
pub use grammar::lexer::{Lexer, TokKind, Token, tokenize};
pub use grammar::parser::{SyntaxError, SyntaxErrorKind, parse_tokens, parse_tree};

// Parse tree
pub use grammar::ast::{Argument, CommandName, CommandTree, Segment};

// Escapes
pub use grammar::escape::{EscapeDecodeError, EscapeErrorKind, EscapeKind, decode_escape};

// Emitter
pub use grammar::emit::{emit_command_line, emit_message, escape_argument, is_valid_command_name};

// Diagnostics (re-exported from the diagnostics crate)
pub use grammar::diag::{Diagnostic, Severity, Span, codes};

// Serialization helpers
pub use grammar::dump::to_pretty_json;
