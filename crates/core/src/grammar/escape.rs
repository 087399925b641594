//! Backslash escape decoding for command arguments.
//!
//! The lexer classifies each backslash form into one of four escape token
//! kinds; this module turns the text of such a token into the character it
//! stands for:
//!
//! - regular: `\b \t \n \f \r \' \" \\`
//! - unicode: `\uXXXX`, four hex digits naming a UTF-16 code unit
//! - octal: `\o`, `\oo`, `\ooo`, a byte value `0..=255`
//! - invalid: anything else, which always fails to decode

use serde::Serialize;
use std::fmt;

use super::diag::{Span, codes};
use super::lexer::TokKind;

/// Regular escape letters and the characters they decode to.
const REGULAR_ESCAPES: &[(char, char)] = &[
    ('b', '\u{0008}'),
    ('t', '\t'),
    ('n', '\n'),
    ('f', '\u{000C}'),
    ('r', '\r'),
    ('\'', '\''),
    ('"', '"'),
    ('\\', '\\'),
];

/// Look up the character a regular escape letter stands for.
///
/// Returns `None` for letters that do not form a regular escape
/// (including `u` and digits, which introduce other escape kinds).
pub fn regular_escape_value(letter: char) -> Option<char> {
    REGULAR_ESCAPES
        .iter()
        .find(|(l, _)| *l == letter)
        .map(|(_, v)| *v)
}

/// The four kinds of escape token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapeKind {
    /// `\` + one of `b t n f r ' " \`.
    Regular,
    /// `\u` + four hex digits.
    Unicode,
    /// `\` + one to three octal digits.
    Octal,
    /// Any other backslash form.
    Invalid,
}

impl EscapeKind {
    /// Map an escape token kind to its escape kind; `None` for non-escape tokens.
    pub fn from_tok(kind: TokKind) -> Option<Self> {
        match kind {
            TokKind::RegularEscape => Some(EscapeKind::Regular),
            TokKind::UnicodeEscape => Some(EscapeKind::Unicode),
            TokKind::OctalEscape => Some(EscapeKind::Octal),
            TokKind::InvalidEscape => Some(EscapeKind::Invalid),
            _ => None,
        }
    }
}

/// The result of decoding one escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedUnit {
    /// A complete Unicode scalar value.
    Char(char),
    /// One half of a UTF-16 surrogate pair (`D800..=DFFF`).
    ///
    /// Only meaningful when a high half is immediately followed by a low
    /// half; see [`combine_surrogates`].
    Surrogate(u16),
}

/// Why an escape failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum EscapeErrorKind {
    /// Backslash followed by a character that starts no known escape.
    Invalid,
    /// Octal digits whose value exceeds one byte.
    OctalOutOfRange {
        /// The decoded value.
        value: u32,
    },
    /// A surrogate half that is not part of a high/low pair.
    LoneSurrogate {
        /// The UTF-16 code unit.
        unit: u16,
    },
    /// Digits that could not be read as a number.
    MalformedDigits,
}

impl EscapeErrorKind {
    /// Diagnostic code for this kind of failure.
    pub fn code(&self) -> &'static str {
        match self {
            EscapeErrorKind::Invalid => codes::INVALID_ESCAPE,
            EscapeErrorKind::OctalOutOfRange { .. } => codes::OCTAL_OUT_OF_RANGE,
            EscapeErrorKind::LoneSurrogate { .. } => codes::LONE_SURROGATE,
            EscapeErrorKind::MalformedDigits => codes::MALFORMED_ESCAPE_DIGITS,
        }
    }
}

impl fmt::Display for EscapeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscapeErrorKind::Invalid => write!(f, "invalid escape sequence"),
            EscapeErrorKind::OctalOutOfRange { value } => {
                write!(f, "octal escape value {value} does not fit in one byte")
            }
            EscapeErrorKind::LoneSurrogate { unit } => {
                write!(f, "unpaired surrogate escape U+{unit:04X}")
            }
            EscapeErrorKind::MalformedDigits => write!(f, "malformed escape digits"),
        }
    }
}

/// An escape that could not be decoded, with its source text and position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{kind} `{text}` at byte {}", .span.start)]
pub struct EscapeDecodeError {
    /// What went wrong.
    pub kind: EscapeErrorKind,
    /// The escape as written, including the backslash.
    pub text: String,
    /// Byte span of the escape in the source line.
    pub span: Span,
}

impl EscapeDecodeError {
    pub(crate) fn new(kind: EscapeErrorKind, text: &str, span: Span) -> Self {
        Self {
            kind,
            text: text.to_owned(),
            span,
        }
    }

    /// Move the span right by `offset` bytes.
    pub fn shifted(mut self, offset: usize) -> Self {
        self.span = self.span.shifted(offset);
        self
    }
}

/// Decode the text of one escape token.
///
/// `text` includes the leading backslash. Invalid escapes always fail;
/// whether that aborts the command is decided by the argument builder.
pub fn decode_escape(
    kind: EscapeKind,
    text: &str,
    span: Span,
) -> Result<DecodedUnit, EscapeDecodeError> {
    let fail = |k: EscapeErrorKind| EscapeDecodeError::new(k, text, span);
    match kind {
        EscapeKind::Regular => {
            let mut chars = text.chars().skip(1);
            match (chars.next().and_then(regular_escape_value), chars.next()) {
                (Some(c), None) => Ok(DecodedUnit::Char(c)),
                _ => Err(fail(EscapeErrorKind::Invalid)),
            }
        }
        EscapeKind::Unicode => {
            let digits = text
                .strip_prefix("\\u")
                .filter(|d| d.len() == 4 && d.bytes().all(|b| b.is_ascii_hexdigit()))
                .ok_or_else(|| fail(EscapeErrorKind::MalformedDigits))?;
            let unit = u16::from_str_radix(digits, 16)
                .map_err(|_| fail(EscapeErrorKind::MalformedDigits))?;
            if is_surrogate(unit) {
                return Ok(DecodedUnit::Surrogate(unit));
            }
            char::from_u32(u32::from(unit))
                .map(DecodedUnit::Char)
                .ok_or_else(|| fail(EscapeErrorKind::MalformedDigits))
        }
        EscapeKind::Octal => {
            let digits = text
                .strip_prefix('\\')
                .filter(|d| (1..=3).contains(&d.len()) && d.bytes().all(|b| matches!(b, b'0'..=b'7')))
                .ok_or_else(|| fail(EscapeErrorKind::MalformedDigits))?;
            let value = u32::from_str_radix(digits, 8)
                .map_err(|_| fail(EscapeErrorKind::MalformedDigits))?;
            let byte = u8::try_from(value)
                .map_err(|_| fail(EscapeErrorKind::OctalOutOfRange { value }))?;
            Ok(DecodedUnit::Char(char::from(byte)))
        }
        EscapeKind::Invalid => Err(fail(EscapeErrorKind::Invalid)),
    }
}

/// Whether `unit` is a UTF-16 surrogate half.
pub fn is_surrogate(unit: u16) -> bool {
    (0xD800..=0xDFFF).contains(&unit)
}

/// Whether `unit` is a leading (high) surrogate half.
pub fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

/// Combine a high and a low surrogate half into one scalar value.
///
/// Returns `None` unless `high` is a high half and `low` a low half.
pub fn combine_surrogates(high: u16, low: u16) -> Option<char> {
    let mut decoded = char::decode_utf16([high, low]);
    match (decoded.next(), decoded.next()) {
        (Some(Ok(c)), None) => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(kind: EscapeKind, text: &str) -> Result<DecodedUnit, EscapeDecodeError> {
        decode_escape(kind, text, Span::new(0, text.len()))
    }

    // ── Regular ─────────────────────────────────────────────────────────

    #[test]
    fn regular_table() {
        let cases = [
            ("\\b", '\u{0008}'),
            ("\\t", '\t'),
            ("\\n", '\n'),
            ("\\f", '\u{000C}'),
            ("\\r", '\r'),
            ("\\'", '\''),
            ("\\\"", '"'),
            ("\\\\", '\\'),
        ];
        for (src, expected) in cases {
            assert_eq!(
                decode(EscapeKind::Regular, src),
                Ok(DecodedUnit::Char(expected)),
                "{src}"
            );
        }
    }

    #[test]
    fn regular_escape_value_rejects_other_letters() {
        assert_eq!(regular_escape_value('q'), None);
        assert_eq!(regular_escape_value('u'), None);
        assert_eq!(regular_escape_value('0'), None);
    }

    #[test]
    fn regular_with_unknown_letter_is_invalid() {
        let err = decode(EscapeKind::Regular, "\\q").unwrap_err();
        assert_eq!(err.kind, EscapeErrorKind::Invalid);
    }

    // ── Unicode ─────────────────────────────────────────────────────────

    #[test]
    fn unicode_basic() {
        assert_eq!(
            decode(EscapeKind::Unicode, "\\u0041"),
            Ok(DecodedUnit::Char('A'))
        );
        assert_eq!(
            decode(EscapeKind::Unicode, "\\u00e9"),
            Ok(DecodedUnit::Char('é'))
        );
        assert_eq!(
            decode(EscapeKind::Unicode, "\\u0014"),
            Ok(DecodedUnit::Char('\u{0014}'))
        );
    }

    #[test]
    fn unicode_surrogates_are_reported_as_halves() {
        assert_eq!(
            decode(EscapeKind::Unicode, "\\uD83D"),
            Ok(DecodedUnit::Surrogate(0xD83D))
        );
        assert_eq!(
            decode(EscapeKind::Unicode, "\\uDE00"),
            Ok(DecodedUnit::Surrogate(0xDE00))
        );
    }

    #[test]
    fn unicode_malformed_digits() {
        let err = decode(EscapeKind::Unicode, "\\u00").unwrap_err();
        assert_eq!(err.kind, EscapeErrorKind::MalformedDigits);
        let err = decode(EscapeKind::Unicode, "\\u+0FF").unwrap_err();
        assert_eq!(err.kind, EscapeErrorKind::MalformedDigits);
    }

    #[test]
    fn surrogate_pairs_combine() {
        assert_eq!(combine_surrogates(0xD83D, 0xDE00), Some('😀'));
        assert_eq!(combine_surrogates(0xDE00, 0xD83D), None);
        assert_eq!(combine_surrogates(0xD83D, 0xD83D), None);
        assert!(is_high_surrogate(0xD800));
        assert!(!is_high_surrogate(0xDC00));
        assert!(is_surrogate(0xDFFF));
        assert!(!is_surrogate(0xE000));
    }

    // ── Octal ───────────────────────────────────────────────────────────

    #[test]
    fn octal_values() {
        assert_eq!(decode(EscapeKind::Octal, "\\0"), Ok(DecodedUnit::Char('\0')));
        assert_eq!(
            decode(EscapeKind::Octal, "\\10"),
            Ok(DecodedUnit::Char('\u{0008}'))
        );
        assert_eq!(decode(EscapeKind::Octal, "\\100"), Ok(DecodedUnit::Char('@')));
        assert_eq!(decode(EscapeKind::Octal, "\\101"), Ok(DecodedUnit::Char('A')));
        assert_eq!(
            decode(EscapeKind::Octal, "\\377"),
            Ok(DecodedUnit::Char('\u{00FF}'))
        );
    }

    #[test]
    fn octal_above_one_byte_is_out_of_range() {
        let err = decode(EscapeKind::Octal, "\\400").unwrap_err();
        assert_eq!(err.kind, EscapeErrorKind::OctalOutOfRange { value: 256 });
        assert_eq!(err.text, "\\400");
        let err = decode(EscapeKind::Octal, "\\777").unwrap_err();
        assert_eq!(err.kind, EscapeErrorKind::OctalOutOfRange { value: 511 });
    }

    #[test]
    fn octal_malformed_digits() {
        let err = decode(EscapeKind::Octal, "\\1234").unwrap_err();
        assert_eq!(err.kind, EscapeErrorKind::MalformedDigits);
        let err = decode(EscapeKind::Octal, "\\9").unwrap_err();
        assert_eq!(err.kind, EscapeErrorKind::MalformedDigits);
    }

    // ── Invalid ─────────────────────────────────────────────────────────

    #[test]
    fn invalid_always_fails_with_position() {
        let err = decode_escape(EscapeKind::Invalid, "\\q", Span::new(4, 6)).unwrap_err();
        assert_eq!(err.kind, EscapeErrorKind::Invalid);
        assert_eq!(err.span, Span::new(4, 6));
        assert_eq!(err.to_string(), "invalid escape sequence `\\q` at byte 4");
    }

    #[test]
    fn from_tok_maps_only_escapes() {
        assert_eq!(
            EscapeKind::from_tok(TokKind::OctalEscape),
            Some(EscapeKind::Octal)
        );
        assert_eq!(EscapeKind::from_tok(TokKind::Alnum), None);
        assert_eq!(EscapeKind::from_tok(TokKind::EndOfInput), None);
    }
}
