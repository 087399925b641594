//! Recursive-descent parser for command lines.
//!
//! Grammar (`WS` is one `Whitespace` token):
//!
//! ```text
//! command          := commandName WS* (argument (WS+ | &EndOfInput))* EndOfInput
//! argument         := quoteArgument | nonQuoteArgument
//! quoteArgument    := Quote notQuote* Quote
//! nonQuoteArgument := (escape | Alnum | NotWhitespaceOrQuote)+
//! notQuote         := escape | Alnum | Whitespace | NotWhitespaceOrQuote
//! commandName      := Alnum+
//! ```
//!
//! One token of lookahead picks every alternative. The first deviation is a
//! [`SyntaxError`]; there is no recovery.

use serde::Serialize;
use std::fmt;

use super::{
    ast::{Argument, CommandName, CommandTree, Segment},
    diag::{Span, codes},
    escape::EscapeKind,
    lexer::{TokKind, Token, tokenize},
};

/// Token kinds that may start an argument.
const ARGUMENT_START: &[TokKind] = &[
    TokKind::Quote,
    TokKind::RegularEscape,
    TokKind::UnicodeEscape,
    TokKind::OctalEscape,
    TokKind::InvalidEscape,
    TokKind::Alnum,
    TokKind::NotWhitespaceOrQuote,
];

// ─── Errors ─────────────────────────────────────────────────────────────────

/// Which grammar rule was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxErrorKind {
    /// The line does not start with a letter or digit (includes empty lines).
    MissingCommandName,
    /// The name is followed by something other than whitespace or end of line.
    InvalidCommandName,
    /// End of line inside a quoted argument.
    UnterminatedQuote,
    /// An argument is directly followed by another token.
    MissingSeparator,
    /// A token no production expects.
    UnexpectedToken,
}

impl SyntaxErrorKind {
    /// Diagnostic code for this kind of error.
    pub fn code(self) -> &'static str {
        match self {
            SyntaxErrorKind::MissingCommandName => codes::MISSING_COMMAND_NAME,
            SyntaxErrorKind::InvalidCommandName => codes::INVALID_COMMAND_NAME,
            SyntaxErrorKind::UnterminatedQuote => codes::UNTERMINATED_QUOTE,
            SyntaxErrorKind::MissingSeparator => codes::MISSING_SEPARATOR,
            SyntaxErrorKind::UnexpectedToken => codes::UNEXPECTED_TOKEN,
        }
    }
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyntaxErrorKind::MissingCommandName => "missing command name",
            SyntaxErrorKind::InvalidCommandName => "invalid command name",
            SyntaxErrorKind::UnterminatedQuote => "unterminated quoted argument",
            SyntaxErrorKind::MissingSeparator => "missing whitespace between arguments",
            SyntaxErrorKind::UnexpectedToken => "unexpected token",
        };
        f.write_str(s)
    }
}

/// The token sequence does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{kind}: expected {}, found {found} at byte {}", describe_expected(.expected), .span.start)]
pub struct SyntaxError {
    /// Which rule was violated.
    pub kind: SyntaxErrorKind,
    /// Token kinds that would have been accepted here.
    pub expected: Vec<TokKind>,
    /// Kind of the offending token.
    pub found: TokKind,
    /// Text of the offending token (empty at end of input).
    pub found_text: String,
    /// Span of the offending token.
    pub span: Span,
}

impl SyntaxError {
    /// Move the span right by `offset` bytes.
    pub fn shifted(mut self, offset: usize) -> Self {
        self.span = self.span.shifted(offset);
        self
    }
}

/// Render an expected-token set as `a, b or c`.
pub fn describe_expected(expected: &[TokKind]) -> String {
    match expected {
        [] => "nothing".to_owned(),
        [only] => only.describe().to_owned(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|k| k.describe()).collect();
            format!("{} or {}", head.join(", "), last.describe())
        }
    }
}

// ─── Public API ─────────────────────────────────────────────────────────────

/// Tokenize and parse one command line into a [`CommandTree`].
pub fn parse_tree(line: &str) -> Result<CommandTree, SyntaxError> {
    parse_tokens(&tokenize(line))
}

/// Parse a token sequence produced by [`tokenize`].
///
/// A slice missing its trailing `EndOfInput` is treated as if it ended there.
pub fn parse_tokens(toks: &[Token<'_>]) -> Result<CommandTree, SyntaxError> {
    Parser::new(toks).command()
}

// ─── Parser Implementation ─────────────────────────────────────────────────

struct Parser<'t, 'a> {
    toks: &'t [Token<'a>],
    pos: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn new(toks: &'t [Token<'a>]) -> Self {
        Self { toks, pos: 0 }
    }

    // ── Token navigation ────────────────────────────────────────────────

    fn peek(&self) -> Token<'a> {
        match self.toks.get(self.pos) {
            Some(tok) => *tok,
            None => {
                let end = self.toks.last().map_or(0, |t| t.end);
                Token {
                    kind: TokKind::EndOfInput,
                    text: "",
                    start: end,
                    end,
                }
            }
        }
    }

    fn advance(&mut self) -> Token<'a> {
        let tok = self.peek();
        if tok.kind != TokKind::EndOfInput {
            self.pos += 1;
        }
        tok
    }

    fn skip_whitespace(&mut self) {
        while self.peek().kind == TokKind::Whitespace {
            self.pos += 1;
        }
    }

    fn error(&self, kind: SyntaxErrorKind, expected: &[TokKind]) -> SyntaxError {
        let tok = self.peek();
        SyntaxError {
            kind,
            expected: expected.to_vec(),
            found: tok.kind,
            found_text: tok.text.to_owned(),
            span: tok.span(),
        }
    }

    // ── Productions ─────────────────────────────────────────────────────

    fn command(&mut self) -> Result<CommandTree, SyntaxError> {
        let name = self.command_name()?;

        match self.peek().kind {
            TokKind::Whitespace | TokKind::EndOfInput => {}
            _ => {
                return Err(self.error(
                    SyntaxErrorKind::InvalidCommandName,
                    &[TokKind::Alnum, TokKind::Whitespace, TokKind::EndOfInput],
                ));
            }
        }
        self.skip_whitespace();

        let mut arguments = Vec::new();
        while self.peek().kind != TokKind::EndOfInput {
            arguments.push(self.argument()?);
            match self.peek().kind {
                TokKind::Whitespace => self.skip_whitespace(),
                TokKind::EndOfInput => {}
                _ => {
                    return Err(self.error(
                        SyntaxErrorKind::MissingSeparator,
                        &[TokKind::Whitespace, TokKind::EndOfInput],
                    ));
                }
            }
        }

        let end = arguments.last().map_or(name.span, Argument::span);
        let span = name.span.cover(end);
        log::debug!(
            "parsed command {:?} with {} argument(s)",
            name.text,
            arguments.len()
        );
        Ok(CommandTree {
            name,
            arguments,
            span,
        })
    }

    fn command_name(&mut self) -> Result<CommandName, SyntaxError> {
        let first = self.peek();
        if first.kind != TokKind::Alnum {
            return Err(self.error(SyntaxErrorKind::MissingCommandName, &[TokKind::Alnum]));
        }
        let mut text = String::new();
        let mut end = first.end;
        while self.peek().kind == TokKind::Alnum {
            let tok = self.advance();
            text.push_str(tok.text);
            end = tok.end;
        }
        Ok(CommandName {
            text,
            span: Span::new(first.start, end),
        })
    }

    fn argument(&mut self) -> Result<Argument, SyntaxError> {
        match self.peek().kind {
            TokKind::Quote => self.quote_argument(),
            kind if is_bare_token(kind) => self.non_quote_argument(),
            _ => Err(self.error(SyntaxErrorKind::UnexpectedToken, ARGUMENT_START)),
        }
    }

    fn quote_argument(&mut self) -> Result<Argument, SyntaxError> {
        let open = self.advance();
        let mut segments = Vec::new();
        loop {
            let tok = self.peek();
            match tok.kind {
                TokKind::Quote => {
                    self.advance();
                    return Ok(Argument::Quoted {
                        segments,
                        span: Span::new(open.start, tok.end),
                    });
                }
                TokKind::EndOfInput => {
                    return Err(self.error(SyntaxErrorKind::UnterminatedQuote, &[TokKind::Quote]));
                }
                _ => {
                    self.advance();
                    push_segment(&mut segments, tok);
                }
            }
        }
    }

    fn non_quote_argument(&mut self) -> Result<Argument, SyntaxError> {
        let start = self.peek().start;
        let mut end = start;
        let mut segments = Vec::new();
        while is_bare_token(self.peek().kind) {
            let tok = self.advance();
            end = tok.end;
            push_segment(&mut segments, tok);
        }
        Ok(Argument::Bare {
            segments,
            span: Span::new(start, end),
        })
    }
}

/// Token kinds allowed inside a bare argument.
fn is_bare_token(kind: TokKind) -> bool {
    kind.is_escape() || matches!(kind, TokKind::Alnum | TokKind::NotWhitespaceOrQuote)
}

/// Append a token to an argument's segments, merging adjacent literal text.
fn push_segment(segments: &mut Vec<Segment>, tok: Token<'_>) {
    if let Some(escape) = EscapeKind::from_tok(tok.kind) {
        segments.push(Segment::Escape {
            escape,
            text: tok.text.to_owned(),
            span: tok.span(),
        });
        return;
    }
    if let Some(Segment::Text { text, span }) = segments.last_mut()
        && span.end == tok.start
    {
        text.push_str(tok.text);
        span.end = tok.end;
        return;
    }
    segments.push(Segment::Text {
        text: tok.text.to_owned(),
        span: tok.span(),
    });
}
