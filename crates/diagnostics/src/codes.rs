//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete. Every constant has an entry in [`crate::explain`].

// ── Syntax (CMD1xxx) ────────────────────────────────────────────────────

/// A token appeared where no grammar production expects it.
pub const UNEXPECTED_TOKEN: &str = "CMD1001";
/// The line does not start with a command name.
pub const MISSING_COMMAND_NAME: &str = "CMD1002";
/// The command name is followed by something other than whitespace or end of line.
pub const INVALID_COMMAND_NAME: &str = "CMD1003";
/// End of line reached inside a quoted argument.
pub const UNTERMINATED_QUOTE: &str = "CMD1004";
/// Two arguments are not separated by whitespace.
pub const MISSING_SEPARATOR: &str = "CMD1005";

// ── Escapes (CMD2xxx) ───────────────────────────────────────────────────

/// Backslash followed by a character that starts no known escape.
pub const INVALID_ESCAPE: &str = "CMD2001";
/// Octal escape whose value does not fit in one byte.
pub const OCTAL_OUT_OF_RANGE: &str = "CMD2002";
/// `\uXXXX` escape naming a surrogate half with no partner.
pub const LONE_SURROGATE: &str = "CMD2003";
/// Escape digits that could not be read as a number.
pub const MALFORMED_ESCAPE_DIGITS: &str = "CMD2004";
/// Invalid escape kept as literal text under the lenient policy.
pub const ESCAPE_PASSED_THROUGH: &str = "CMD2101";

// ── Messages (CMD3xxx) ──────────────────────────────────────────────────

/// Message does not start with the configured command prefix.
pub const NOT_A_COMMAND: &str = "CMD3001";

/// Every known diagnostic code, in numeric order.
pub const ALL: &[&str] = &[
    UNEXPECTED_TOKEN,
    MISSING_COMMAND_NAME,
    INVALID_COMMAND_NAME,
    UNTERMINATED_QUOTE,
    MISSING_SEPARATOR,
    INVALID_ESCAPE,
    OCTAL_OUT_OF_RANGE,
    LONE_SURROGATE,
    MALFORMED_ESCAPE_DIGITS,
    ESCAPE_PASSED_THROUGH,
    NOT_A_COMMAND,
];
