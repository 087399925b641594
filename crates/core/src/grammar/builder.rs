//! Argument builder: turns a [`CommandTree`] into decoded argument strings.

use std::collections::BTreeMap;

use super::{
    ast::{Argument, CommandTree, Segment},
    diag::{Diagnostic, Span, codes},
    escape::{
        DecodedUnit, EscapeDecodeError, EscapeErrorKind, EscapeKind, combine_surrogates,
        decode_escape, is_high_surrogate,
    },
};
use crate::command::{ParseOutput, ParsedCommand};
use crate::config::{InvalidEscapePolicy, ParseConfig};
use crate::error::{EscapeErrors, ParseError};

/// Decode every argument of `tree`.
///
/// All escape failures on the line are collected and returned together.
/// Under [`InvalidEscapePolicy::Passthrough`], invalid escapes are kept as
/// raw text and reported as warnings instead.
pub fn build_command(tree: &CommandTree, config: &ParseConfig) -> Result<ParseOutput, ParseError> {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let arguments: Vec<String> = tree
        .arguments
        .iter()
        .map(|arg| {
            let mut builder = ArgumentBuilder::new(config.invalid_escape, &mut errors, &mut warnings);
            builder.argument(arg);
            builder.finish()
        })
        .collect();

    if !errors.is_empty() {
        log::debug!(
            "command {:?}: {} escape error(s)",
            tree.name.text,
            errors.len()
        );
        return Err(ParseError::Escapes(EscapeErrors(errors)));
    }

    Ok(ParseOutput {
        command: ParsedCommand {
            name: tree.name.text.clone(),
            arguments,
        },
        warnings,
    })
}

/// High surrogate half waiting for its low half.
struct PendingHigh {
    unit: u16,
    text: String,
    span: Span,
}

struct ArgumentBuilder<'e> {
    out: String,
    pending: Option<PendingHigh>,
    policy: InvalidEscapePolicy,
    errors: &'e mut Vec<EscapeDecodeError>,
    warnings: &'e mut Vec<Diagnostic>,
}

impl<'e> ArgumentBuilder<'e> {
    fn new(
        policy: InvalidEscapePolicy,
        errors: &'e mut Vec<EscapeDecodeError>,
        warnings: &'e mut Vec<Diagnostic>,
    ) -> Self {
        Self {
            out: String::new(),
            pending: None,
            policy,
            errors,
            warnings,
        }
    }

    fn argument(&mut self, arg: &Argument) {
        // Quote delimiters are not segments, so both variants decode alike.
        for seg in arg.segments() {
            match seg {
                Segment::Text { text, .. } => {
                    self.flush_pending();
                    self.out.push_str(text);
                }
                Segment::Escape { escape, text, span } => self.escape(*escape, text, *span),
            }
        }
    }

    fn escape(&mut self, kind: EscapeKind, text: &str, span: Span) {
        match decode_escape(kind, text, span) {
            Ok(DecodedUnit::Char(c)) => {
                self.flush_pending();
                self.out.push(c);
            }
            Ok(DecodedUnit::Surrogate(unit)) => self.surrogate(unit, text, span),
            Err(e) if e.kind == EscapeErrorKind::Invalid
                && self.policy == InvalidEscapePolicy::Passthrough =>
            {
                self.flush_pending();
                self.passthrough(text, span);
            }
            Err(e) => {
                self.flush_pending();
                self.errors.push(e);
            }
        }
    }

    fn surrogate(&mut self, unit: u16, text: &str, span: Span) {
        if let Some(high) = self.pending.take() {
            if let Some(c) = combine_surrogates(high.unit, unit) {
                self.out.push(c);
                return;
            }
            self.lone(high.unit, &high.text, high.span);
        }
        if is_high_surrogate(unit) {
            self.pending = Some(PendingHigh {
                unit,
                text: text.to_owned(),
                span,
            });
        } else {
            self.lone(unit, text, span);
        }
    }

    fn lone(&mut self, unit: u16, text: &str, span: Span) {
        self.errors.push(EscapeDecodeError::new(
            EscapeErrorKind::LoneSurrogate { unit },
            text,
            span,
        ));
    }

    fn flush_pending(&mut self) {
        if let Some(high) = self.pending.take() {
            self.lone(high.unit, &high.text, high.span);
        }
    }

    fn passthrough(&mut self, text: &str, span: Span) {
        log::warn!(
            "invalid escape {text:?} at byte {} kept as literal text",
            span.start
        );
        self.out.push_str(text);
        let mut ctx = BTreeMap::new();
        ctx.insert("escape".into(), text.to_owned());
        self.warnings.push(
            Diagnostic::warn(
                codes::ESCAPE_PASSED_THROUGH,
                format!("invalid escape `{text}` kept as literal text"),
                Some(span),
            )
            .with_context(ctx),
        );
    }

    fn finish(mut self) -> String {
        self.flush_pending();
        self.out
    }
}
