//! Shared test helpers for `argline_core` integration tests.

#![allow(unreachable_pub)]

use argline_core::{
    InvalidEscapePolicy, ParseConfig, ParseError, ParseOutput, ParsedCommand, parse_line,
    parse_line_with,
};

/// Parse a line that is expected to succeed.
#[allow(dead_code)]
pub fn parse_ok(line: &str) -> ParsedCommand {
    parse_line(line).unwrap_or_else(|e| panic!("failed to parse {line:?}: {e}"))
}

/// Parse a line that is expected to fail.
#[allow(dead_code)]
pub fn parse_err(line: &str) -> ParseError {
    match parse_line(line) {
        Ok(cmd) => panic!("expected {line:?} to fail, got {cmd:?}"),
        Err(e) => e,
    }
}

/// Decoded arguments of a line that is expected to succeed.
#[allow(dead_code)]
pub fn args(line: &str) -> Vec<String> {
    parse_ok(line).arguments
}

/// Diagnostic codes produced by a failing line, in order.
#[allow(dead_code)]
pub fn error_codes(line: &str) -> Vec<String> {
    parse_err(line)
        .to_diagnostics()
        .iter()
        .map(|d| d.id.to_string())
        .collect()
}

/// Configuration that keeps invalid escapes as literal text.
#[allow(dead_code)]
pub fn lenient() -> ParseConfig {
    ParseConfig::default().with_invalid_escape(InvalidEscapePolicy::Passthrough)
}

/// Parse a line with [`lenient`] escape handling.
#[allow(dead_code)]
pub fn parse_lenient(line: &str) -> ParseOutput {
    parse_line_with(line, &lenient()).unwrap_or_else(|e| panic!("failed to parse {line:?}: {e}"))
}
