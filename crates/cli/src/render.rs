//! Terminal rendering of parse diagnostics using ariadne.
//!
//! Each diagnostic becomes an ariadne [`Report`] anchored at its byte span in
//! the offending command line. JSON output does not go through here; the
//! subcommands serialize diagnostics directly.

use std::io::{self, IsTerminal};

use argline_diagnostics::{Diagnostic, Severity};
use ariadne::{Color, Config, Fmt, IndexType, Label, Report, ReportKind, Source};

// ── Output format ───────────────────────────────────────────────────────

/// Output format selected by `--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, or pretty on a terminal and JSON when piped.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ if io::stdout().is_terminal() => Format::Pretty,
            _ => Format::Json,
        }
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn report_kind(severity: &Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::Info => ReportKind::Advice,
        _ => ReportKind::Warning,
    }
}

fn severity_color(severity: &Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warn => Color::Yellow,
        Severity::Info => Color::Blue,
        _ => Color::White,
    }
}

/// `key=value` pairs of a diagnostic's context, or `None` when it has none.
fn context_note(diag: &Diagnostic) -> Option<String> {
    let ctx = diag.context.as_ref().filter(|c| !c.is_empty())?;
    Some(
        ctx.iter()
            .map(|(k, v)| format!("{k}={v:?}"))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Render diagnostics for one command line to stderr.
///
/// `origin` names the line in report headers (`<arg>`, `<stdin>:3`,
/// `commands.txt:12`). Spans are byte offsets into `source`.
pub(crate) fn render_pretty(source: &str, origin: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    let config = Config::default()
        .with_compact(false)
        .with_index_type(IndexType::Byte);
    let mut cache = (origin, Source::from(source));

    for diag in diagnostics {
        let Some(span) = diag.span else {
            eprintln!("{}[{}]: {}", diag.severity, diag.id, diag.message);
            if let Some(note) = context_note(diag) {
                eprintln!("  = note: {note}");
            }
            continue;
        };

        let start = span.start.min(source.len());
        let end = span.end.min(source.len()).max(start);
        let label_msg = match diag.context.as_ref().and_then(|c| c.get("expected")) {
            Some(expected) => format!("expected {expected}"),
            None => diag.message.clone(),
        };

        let mut builder = Report::build(report_kind(&diag.severity), (origin, start..end))
            .with_code(diag.id.as_ref())
            .with_message(&diag.message)
            .with_config(config)
            .with_label(
                Label::new((origin, start..end))
                    .with_message(label_msg)
                    .with_color(severity_color(&diag.severity)),
            );
        if let Some(note) = context_note(diag) {
            builder = builder.with_note(note);
        }
        if let Some(explanation) = diag.explain() {
            builder = builder.with_help(explanation);
        }
        builder.finish().eprint(&mut cache).ok();
    }
}

// ── Summary line ────────────────────────────────────────────────────────

/// Print a coloured count of errors and warnings, e.g. `2 errors, 1 warning`.
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let warnings = diagnostics
        .iter()
        .filter(|d| matches!(d.severity, Severity::Warn))
        .count();
    let infos = diagnostics.len() - errors - warnings;

    let mut parts = Vec::new();
    if errors > 0 {
        let s = if errors == 1 { "" } else { "s" };
        parts.push(format!("{}", format!("{errors} error{s}").fg(Color::Red)));
    }
    if warnings > 0 {
        let s = if warnings == 1 { "" } else { "s" };
        parts.push(format!("{}", format!("{warnings} warning{s}").fg(Color::Yellow)));
    }
    if infos > 0 {
        parts.push(format!("{}", format!("{infos} info").fg(Color::Blue)));
    }
    if !parts.is_empty() {
        eprintln!("{}", parts.join(", "));
    }
}
