//! Emitter: turns a command name and decoded arguments back into a line that
//! parses to the same command.
//!
//! Arguments are written bare whenever possible and quoted only when they are
//! empty or contain whitespace. Inside either form, `\` and `"` are escaped,
//! `\n \t \r \b \f` use their short escapes, and any other control character
//! is written as `\uXXXX`.

use std::borrow::Cow;

/// Whether `name` can be used as a command name (one or more letters or digits).
pub fn is_valid_command_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(char::is_alphanumeric)
}

/// Source form of a single argument.
///
/// Returns the input unchanged (borrowed) when it needs neither quotes nor
/// escapes.
pub fn escape_argument(arg: &str) -> Cow<'_, str> {
    if arg.is_empty() {
        return Cow::Borrowed("\"\"");
    }
    let quote = arg.chars().any(char::is_whitespace);
    if !quote && !arg.chars().any(needs_escape) {
        return Cow::Borrowed(arg);
    }

    let mut out = String::with_capacity(arg.len() + 2);
    if quote {
        out.push('"');
    }
    for c in arg.chars() {
        push_escaped(&mut out, c);
    }
    if quote {
        out.push('"');
    }
    Cow::Owned(out)
}

/// Join a command name and arguments into one line.
///
/// `name` is written as is; the result only parses back when
/// [`is_valid_command_name`] holds for it.
pub fn emit_command_line<S: AsRef<str>>(name: &str, args: &[S]) -> String {
    let mut out = String::from(name);
    for arg in args {
        out.push(' ');
        out.push_str(&escape_argument(arg.as_ref()));
    }
    out
}

/// Like [`emit_command_line`], with a chat command prefix in front.
pub fn emit_message<S: AsRef<str>>(prefix: &str, name: &str, args: &[S]) -> String {
    let mut out = String::from(prefix);
    out.push_str(&emit_command_line(name, args));
    out
}

fn needs_escape(c: char) -> bool {
    matches!(c, '\\' | '"') || c.is_control()
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        '"' => out.push_str("\\\""),
        '\n' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        '\r' => out.push_str("\\r"),
        '\u{0008}' => out.push_str("\\b"),
        '\u{000C}' => out.push_str("\\f"),
        // Control characters are all in the BMP, so one code unit suffices.
        c if c.is_control() => out.push_str(&format!("\\u{:04X}", u32::from(c))),
        c => out.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_arguments_are_borrowed() {
        assert!(matches!(escape_argument("hello"), Cow::Borrowed("hello")));
        assert!(matches!(escape_argument("a-b.c"), Cow::Borrowed(_)));
        assert!(matches!(escape_argument("héllo€"), Cow::Borrowed(_)));
    }

    #[test]
    fn empty_and_spaced_arguments_are_quoted() {
        assert_eq!(escape_argument(""), "\"\"");
        assert_eq!(escape_argument("a b"), "\"a b\"");
        assert_eq!(escape_argument("tab\there"), "\"tab\\there\"");
    }

    #[test]
    fn specials_are_escaped() {
        assert_eq!(escape_argument("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(escape_argument("C:\\dir"), "C:\\\\dir");
        assert_eq!(escape_argument("\u{0008}\u{000C}\r"), "\"\\b\\f\\r\"");
        assert_eq!(escape_argument("\u{0001}"), "\\u0001");
        assert_eq!(escape_argument("\u{007F}x"), "\\u007Fx");
    }

    #[test]
    fn command_line() {
        assert_eq!(emit_command_line::<&str>("help", &[]), "help");
        assert_eq!(
            emit_command_line("echo", &["hello A", "world", ""]),
            "echo \"hello A\" world \"\""
        );
        assert_eq!(
            emit_message("!", "echo", &[String::from("x")]),
            "!echo x"
        );
    }

    #[test]
    fn command_name_validity() {
        assert!(is_valid_command_name("echo2"));
        assert!(is_valid_command_name("ünï"));
        assert!(!is_valid_command_name(""));
        assert!(!is_valid_command_name("re-load"));
        assert!(!is_valid_command_name("a b"));
    }
}
