mod render;

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result, bail};
use argline_core::{
    InvalidEscapePolicy, ParseConfig, ParseError, ParsedCommand, TokKind, emit_command_line,
    emit_message, is_valid_command_name, parse_line_with, parse_message, parse_tree,
    to_pretty_json, tokenize,
};
use argline_diagnostics::{self as diag, Diagnostic, codes};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;

use crate::render::{Format, print_summary, render_pretty};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "argline",
    version,
    about = "argline: tokenize, parse, and quote chat-style command lines"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Command prefix that marks a chat message as a command (default "!").
    #[arg(long, global = true)]
    prefix: Option<String>,

    /// Keep invalid escapes such as `\q` as literal text (with a warning)
    /// instead of rejecting the line.
    #[arg(long, global = true)]
    lenient_escapes: bool,

    /// JSON file with parser settings (`command_prefix`, `invalid_escape`).
    /// Command-line flags override it.
    #[arg(long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    // ── Line analysis ───────────────────────────────────────────────
    /// Parse command lines and print the decoded name and arguments.
    ///
    /// Reads LINE, or every non-blank line of --file (`-` for stdin), or
    /// stdin when neither is given.
    Parse {
        line: Option<String>,
        /// Read lines from a file instead (`-` for stdin).
        #[arg(long, short, conflicts_with = "line")]
        file: Option<String>,
        /// Treat input as chat messages: only lines starting with the
        /// command prefix are commands.
        #[arg(long)]
        messages: bool,
    },

    /// Check command lines for syntax and escape errors.
    Check {
        line: Option<String>,
        /// Read lines from a file instead (`-` for stdin).
        #[arg(long, short, conflicts_with = "line")]
        file: Option<String>,
        /// Treat input as chat messages (see `parse --help`).
        #[arg(long)]
        messages: bool,
    },

    /// Print the parse tree of a command line as JSON.
    Tree { line: String },

    /// Print the token stream of a command line.
    Tokens { line: String },

    // ── Generation ──────────────────────────────────────────────────
    /// Print a command line that parses to NAME with ARGS, quoting and
    /// escaping as needed.
    Quote {
        name: String,
        args: Vec<String>,
        /// Prepend the command prefix.
        #[arg(long)]
        message: bool,
    },

    // ── Reference ───────────────────────────────────────────────────
    /// Explain a diagnostic ID (e.g. CMD1004).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let format = Format::resolve_or_detect(cli.output.as_deref());
    let config = resolve_config(&cli)?;

    match cli.cmd {
        Cmd::Parse {
            line,
            file,
            messages,
        } => cmd_parse(&read_input(line, file.as_deref())?, &config, messages, format)?,
        Cmd::Check {
            line,
            file,
            messages,
        } => cmd_check(&read_input(line, file.as_deref())?, &config, messages, format)?,
        Cmd::Tree { line } => cmd_tree(&line, format)?,
        Cmd::Tokens { line } => cmd_tokens(&line, format)?,
        Cmd::Quote {
            name,
            args,
            message,
        } => cmd_quote(&name, &args, message.then_some(config.command_prefix.as_str()), format)?,
        Cmd::Explain { id } => cmd_explain(&id, format)?,
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Build the parser configuration from `--config`, then apply flag overrides.
fn resolve_config(cli: &Cli) -> Result<ParseConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{path}'"))?;
            serde_json::from_str::<ParseConfig>(&text)
                .with_context(|| format!("invalid config file '{path}'"))?
        }
        None => ParseConfig::default(),
    };
    if let Some(prefix) = &cli.prefix {
        config = config.with_command_prefix(prefix.clone());
    }
    if cli.lenient_escapes {
        config = config.with_invalid_escape(InvalidEscapePolicy::Passthrough);
    }
    config.validate().context("invalid parser configuration")?;
    log::debug!("using {config:?}");
    Ok(config)
}

// ── Input ───────────────────────────────────────────────────────────────

/// One command line and where it came from.
struct InputLine {
    /// Human-readable origin for diagnostics (`<arg>`, `<stdin>:2`, `cmds.txt:7`).
    origin: String,
    /// 1-based line number when read from a file or stdin.
    number: Option<usize>,
    text: String,
}

fn read_input(line: Option<String>, file: Option<&str>) -> Result<Vec<InputLine>> {
    if let Some(text) = line {
        return Ok(vec![InputLine {
            origin: "<arg>".to_owned(),
            number: None,
            text,
        }]);
    }

    let (name, content) = match file {
        Some(path) if path != "-" => (
            path.to_owned(),
            fs::read_to_string(path).with_context(|| format!("failed to read '{path}'"))?,
        ),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            ("<stdin>".to_owned(), buf)
        }
    };

    Ok(content
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| InputLine {
            origin: format!("{name}:{}", i + 1),
            number: Some(i + 1),
            text: l.to_owned(),
        })
        .collect())
}

// ── Per-line evaluation ─────────────────────────────────────────────────

/// Result of parsing one input line, as reported by `parse` and `check`.
#[derive(Serialize)]
struct LineReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    input: &'a str,
    command: Option<ParsedCommand>,
    diagnostics: Vec<Diagnostic>,
}

fn evaluate<'a>(input: &'a InputLine, config: &ParseConfig, messages: bool) -> LineReport<'a> {
    let result = if messages {
        parse_message(&input.text, config)
    } else {
        parse_line_with(&input.text, config).map(Some)
    };

    let (command, mut diagnostics) = match result {
        Ok(Some(out)) => (Some(out.command), out.warnings),
        Ok(None) => (None, vec![not_a_command(config)]),
        Err(err) => (None, err.to_diagnostics()),
    };
    if let Some(n) = input.number {
        for d in &mut diagnostics {
            d.context
                .get_or_insert_with(BTreeMap::new)
                .insert("line".into(), n.to_string());
        }
    }

    LineReport {
        line: input.number,
        input: &input.text,
        command,
        diagnostics,
    }
}

fn not_a_command(config: &ParseConfig) -> Diagnostic {
    Diagnostic::info(
        codes::NOT_A_COMMAND,
        format!(
            "message does not start with the command prefix {:?}",
            config.command_prefix
        ),
        None,
    )
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_parse(
    inputs: &[InputLine],
    config: &ParseConfig,
    messages: bool,
    format: Format,
) -> Result<()> {
    let reports: Vec<LineReport<'_>> = inputs
        .iter()
        .map(|i| evaluate(i, config, messages))
        .collect();

    match format {
        Format::Json => {
            // A single line prints one object; files print an array.
            let out = match reports.as_slice() {
                [single] if single.line.is_none() => serde_json::to_value(single)?,
                all => serde_json::to_value(all)?,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Commands to stdout, diagnostics to stderr.
            for (input, report) in inputs.iter().zip(&reports) {
                if let Some(command) = &report.command {
                    println!("{}", to_pretty_json(command)?);
                }
                render_pretty(&input.text, &input.origin, &report.diagnostics);
            }
            print_summary(&all_diagnostics(&reports));
        }
    }

    exit_on_errors(&all_diagnostics(&reports));
    Ok(())
}

fn cmd_check(
    inputs: &[InputLine],
    config: &ParseConfig,
    messages: bool,
    format: Format,
) -> Result<()> {
    let reports: Vec<LineReport<'_>> = inputs
        .iter()
        .map(|i| evaluate(i, config, messages))
        .collect();
    let diagnostics = all_diagnostics(&reports);
    let ok = !diagnostics.iter().any(Diagnostic::is_error);

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": ok,
                "lines": reports.len(),
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            for (input, report) in inputs.iter().zip(&reports) {
                render_pretty(&input.text, &input.origin, &report.diagnostics);
            }
            print_summary(&diagnostics);
            if ok {
                eprintln!("syntax ok");
            }
        }
    }

    exit_on_errors(&diagnostics);
    Ok(())
}

fn cmd_tree(line: &str, format: Format) -> Result<()> {
    match parse_tree(line) {
        Ok(tree) => println!("{}", to_pretty_json(&tree)?),
        Err(err) => {
            let diagnostics = ParseError::from(err).to_diagnostics();
            match format {
                Format::Json => {
                    let out = serde_json::json!({ "diagnostics": diagnostics });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                Format::Pretty => {
                    render_pretty(line, "<arg>", &diagnostics);
                    print_summary(&diagnostics);
                }
            }
            exit_on_errors(&diagnostics);
        }
    }
    Ok(())
}

fn cmd_tokens(line: &str, format: Format) -> Result<()> {
    let tokens = tokenize(line);
    match format {
        Format::Json => println!("{}", to_pretty_json(&tokens)?),
        Format::Pretty => {
            for t in &tokens {
                if t.kind == TokKind::EndOfInput {
                    println!("{:>4}..{:<4} {:?}", t.start, t.end, t.kind);
                } else {
                    println!("{:>4}..{:<4} {:?} {:?}", t.start, t.end, t.kind, t.text);
                }
            }
        }
    }
    Ok(())
}

fn cmd_quote(name: &str, args: &[String], prefix: Option<&str>, format: Format) -> Result<()> {
    if !is_valid_command_name(name) {
        bail!("invalid command name {name:?}: use one or more letters or digits");
    }
    let line = match prefix {
        Some(prefix) => emit_message(prefix, name, args),
        None => emit_command_line(name, args),
    };
    match format {
        Format::Json => {
            let out = serde_json::json!({ "line": line });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => println!("{line}"),
    }
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "id": id,
                "explanation": diag::explain(id),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Explanation is the expected output, so it goes to stdout.
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{id}: (no explanation available)");
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn all_diagnostics(reports: &[LineReport<'_>]) -> Vec<Diagnostic> {
    reports
        .iter()
        .flat_map(|r| r.diagnostics.iter().cloned())
        .collect()
}

/// Exit with code 1 if any diagnostic is an error.
/// Warnings and info do not cause a non-zero exit.
fn exit_on_errors(diagnostics: &[Diagnostic]) {
    if diagnostics.iter().any(Diagnostic::is_error) {
        process::exit(1);
    }
}
