use serde::Serialize;
use std::fmt;

use super::diag::Span;
use super::escape::regular_escape_value;

/// Classification of a command-line lexer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokKind {
    /// A single letter or digit.
    Alnum,
    /// A maximal run of whitespace characters.
    Whitespace,
    /// The `"` delimiter of a quoted argument.
    Quote,
    /// `\` followed by one of `b t n f r ' " \`.
    RegularEscape,
    /// `\u` followed by exactly four hex digits.
    UnicodeEscape,
    /// `\` followed by one to three octal digits.
    OctalEscape,
    /// `\` followed by anything else (or by nothing at end of line).
    InvalidEscape,
    /// Any other single character.
    NotWhitespaceOrQuote,
    /// Zero-width marker after the last character.
    EndOfInput,
}

impl TokKind {
    /// Whether this kind is one of the four escape kinds.
    pub fn is_escape(self) -> bool {
        matches!(
            self,
            TokKind::RegularEscape
                | TokKind::UnicodeEscape
                | TokKind::OctalEscape
                | TokKind::InvalidEscape
        )
    }

    /// Short human-readable name used in syntax error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokKind::Alnum => "letter or digit",
            TokKind::Whitespace => "whitespace",
            TokKind::Quote => "'\"'",
            TokKind::RegularEscape => "escape sequence",
            TokKind::UnicodeEscape => "unicode escape",
            TokKind::OctalEscape => "octal escape",
            TokKind::InvalidEscape => "invalid escape",
            TokKind::NotWhitespaceOrQuote => "symbol",
            TokKind::EndOfInput => "end of input",
        }
    }
}

impl fmt::Display for TokKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A token that borrows its text directly from the source line.
///
/// `text` is always exactly `&input[start..end]`. The `EndOfInput` token is
/// zero-width and sits at `input.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    /// The classification of this token.
    pub kind: TokKind,
    /// Borrowed slice of the source line for this token.
    pub text: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Token<'_> {
    /// Byte span of this token.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// Single-pass, maximal-munch tokenizer over one command line.
///
/// Tokens are produced lazily. The iterator yields exactly one
/// [`TokKind::EndOfInput`] token and then stops. Lexing never fails:
/// malformed backslash forms become [`TokKind::InvalidEscape`] tokens.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    /// Create a lexer positioned at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            done: false,
        }
    }

    fn token(&self, kind: TokKind, start: usize, end: usize) -> Token<'a> {
        Token {
            kind,
            text: &self.input[start..end],
            start,
            end,
        }
    }

    /// Classify the escape starting at the backslash at `start`.
    /// Returns the kind and the end offset of the escape.
    fn escape(&self, start: usize) -> (TokKind, usize) {
        let after = &self.input[start + 1..];
        let Some(c) = after.chars().next() else {
            // Lone trailing backslash.
            return (TokKind::InvalidEscape, start + 1);
        };

        if regular_escape_value(c).is_some() {
            return (TokKind::RegularEscape, start + 2);
        }

        if c == 'u' {
            let digits = after[1..]
                .bytes()
                .take(4)
                .take_while(u8::is_ascii_hexdigit)
                .count();
            return if digits == 4 {
                (TokKind::UnicodeEscape, start + 6)
            } else {
                (TokKind::InvalidEscape, start + 2)
            };
        }

        if is_octal_digit(c) {
            let digits = after
                .bytes()
                .take(3)
                .take_while(|b| is_octal_digit(*b as char))
                .count();
            return (TokKind::OctalEscape, start + 1 + digits);
        }

        (TokKind::InvalidEscape, start + 1 + c.len_utf8())
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.done {
            return None;
        }
        let start = self.pos;
        let rest = &self.input[start..];
        let Some(c) = rest.chars().next() else {
            self.done = true;
            return Some(self.token(TokKind::EndOfInput, start, start));
        };

        let (kind, end) = match c {
            '\\' => self.escape(start),
            '"' => (TokKind::Quote, start + 1),
            c if c.is_whitespace() => {
                let len = rest
                    .find(|ch: char| !ch.is_whitespace())
                    .unwrap_or(rest.len());
                (TokKind::Whitespace, start + len)
            }
            c if c.is_alphanumeric() => (TokKind::Alnum, start + c.len_utf8()),
            c => (TokKind::NotWhitespaceOrQuote, start + c.len_utf8()),
        };

        self.pos = end;
        Some(self.token(kind, start, end))
    }
}

fn is_octal_digit(c: char) -> bool {
    matches!(c, '0'..='7')
}

/// Tokenize a command line into a sequence of borrowed tokens ending in
/// [`TokKind::EndOfInput`].
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let toks: Vec<Token<'_>> = Lexer::new(input).collect();
    log::trace!("tokenized {} bytes into {} tokens", input.len(), toks.len());
    toks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    fn texts(input: &str) -> Vec<&str> {
        tokenize(input).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn empty_input_is_only_end_of_input() {
        let toks = tokenize("");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokKind::EndOfInput);
        assert_eq!((toks[0].start, toks[0].end), (0, 0));
    }

    #[test]
    fn alnum_is_one_token_per_character() {
        assert_eq!(
            kinds("ab1"),
            vec![
                TokKind::Alnum,
                TokKind::Alnum,
                TokKind::Alnum,
                TokKind::EndOfInput
            ]
        );
    }

    #[test]
    fn whitespace_run_is_a_single_token() {
        let toks = tokenize("a \t  b");
        assert_eq!(toks[1].kind, TokKind::Whitespace);
        assert_eq!(toks[1].text, " \t  ");
        assert_eq!(toks.len(), 4);
    }

    #[test]
    fn quote_and_symbols() {
        assert_eq!(
            kinds("\"-\""),
            vec![
                TokKind::Quote,
                TokKind::NotWhitespaceOrQuote,
                TokKind::Quote,
                TokKind::EndOfInput
            ]
        );
    }

    #[test]
    fn regular_escapes() {
        for src in [
            "\\b", "\\t", "\\n", "\\f", "\\r", "\\'", "\\\"", "\\\\",
        ] {
            let toks = tokenize(src);
            assert_eq!(toks[0].kind, TokKind::RegularEscape, "{src}");
            assert_eq!(toks[0].text, src);
            assert_eq!(toks[1].kind, TokKind::EndOfInput);
        }
    }

    #[test]
    fn unicode_escape_needs_four_hex_digits() {
        assert_eq!(texts("\\u00e9x"), vec!["\\u00e9", "x", ""]);
        assert_eq!(tokenize("\\u00e9")[0].kind, TokKind::UnicodeEscape);

        let short = tokenize("\\u0");
        assert_eq!(short[0].kind, TokKind::InvalidEscape);
        assert_eq!(short[0].text, "\\u");
        assert_eq!(short[1].kind, TokKind::Alnum);

        assert_eq!(tokenize("\\u")[0].kind, TokKind::InvalidEscape);
        assert_eq!(tokenize("\\uzzzz")[0].text, "\\u");
    }

    #[test]
    fn octal_escape_is_greedy_up_to_three_digits() {
        assert_eq!(texts("\\0"), vec!["\\0", ""]);
        assert_eq!(texts("\\10"), vec!["\\10", ""]);
        assert_eq!(texts("\\101"), vec!["\\101", ""]);
        assert_eq!(texts("\\1012"), vec!["\\101", "2", ""]);
        assert_eq!(texts("\\18"), vec!["\\1", "8", ""]);
        assert_eq!(tokenize("\\777")[0].kind, TokKind::OctalEscape);
    }

    #[test]
    fn invalid_escapes() {
        let toks = tokenize("\\q");
        assert_eq!(toks[0].kind, TokKind::InvalidEscape);
        assert_eq!(toks[0].text, "\\q");

        assert_eq!(tokenize("\\8")[0].kind, TokKind::InvalidEscape);
        assert_eq!(tokenize("\\ ")[0].text, "\\ ");
    }

    #[test]
    fn trailing_backslash_is_invalid_escape() {
        let toks = tokenize("a\\");
        assert_eq!(toks[1].kind, TokKind::InvalidEscape);
        assert_eq!(toks[1].text, "\\");
        assert_eq!(toks[2].kind, TokKind::EndOfInput);
    }

    #[test]
    fn invalid_escape_of_multibyte_char_keeps_char_boundary() {
        let toks = tokenize("\\é!");
        assert_eq!(toks[0].kind, TokKind::InvalidEscape);
        assert_eq!(toks[0].text, "\\é");
        assert_eq!(toks[1].text, "!");
    }

    #[test]
    fn non_ascii_letters_are_alnum() {
        let toks = tokenize("é€");
        assert_eq!(toks[0].kind, TokKind::Alnum);
        assert_eq!(toks[0].end, 2);
        assert_eq!(toks[1].kind, TokKind::NotWhitespaceOrQuote);
        assert_eq!(toks[1].start, 2);
        assert_eq!(toks[1].end, 5);
    }

    #[test]
    fn offsets_cover_the_input_contiguously() {
        let input = "echo \"hello \\u0041\"  w\\q";
        let toks = tokenize(input);
        let mut expected_start = 0;
        for t in &toks {
            assert_eq!(t.start, expected_start);
            assert_eq!(t.text, &input[t.start..t.end]);
            expected_start = t.end;
        }
        assert_eq!(expected_start, input.len());
    }

    #[test]
    fn lexer_stops_after_end_of_input() {
        let mut lexer = Lexer::new("a");
        assert_eq!(lexer.next().map(|t| t.kind), Some(TokKind::Alnum));
        assert_eq!(lexer.next().map(|t| t.kind), Some(TokKind::EndOfInput));
        assert!(lexer.next().is_none());
        assert!(lexer.next().is_none());
    }
}
