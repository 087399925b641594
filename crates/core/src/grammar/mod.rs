/// Command parse tree types.
pub mod ast;
/// Argument builder: decodes a parse tree into argument strings.
pub mod builder;
/// Re-exports from the diagnostics crate.
pub mod diag;
/// JSON serialization helpers.
pub mod dump;
/// Emitter: re-escapes decoded arguments into a command line.
pub mod emit;
/// Escape sequence decoding.
pub mod escape;
/// Command-line lexer: tokenizes one line into borrowed tokens.
pub mod lexer;
/// Recursive-descent command parser.
pub mod parser;
