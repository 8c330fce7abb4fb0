//! Pretty warning rendering using ariadne.
//!
//! Converts the engine's [`Warning`] type into ariadne reports for coloured,
//! expression-annotated terminal output. Falls back to structured JSON when
//! the output is piped or when the user explicitly requests it.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use foodex2_diagnostics::{Severity, Warning};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for warning rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, expression-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Resolve an explicit `--output` choice, defaulting on TTY detection.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            // Default: pretty for interactive terminals, JSON for pipes
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn report_kind(severity: Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::High => ReportKind::Warning,
        Severity::Low | Severity::None => ReportKind::Advice,
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::High => Color::Yellow,
        Severity::Low => Color::Blue,
        Severity::None => Color::Green,
    }
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Render warnings in pretty (ariadne) format to stderr.
///
/// Warnings with a span are rendered with the expression underlined at the
/// offending fragment. Those without a span are rendered as standalone
/// messages.
pub(crate) fn render_warnings_pretty(expression: &str, warnings: &[Warning]) {
    if warnings.is_empty() {
        return;
    }

    let config = Config::default().with_compact(false);
    let mut cache = ("expression", Source::from(expression));

    for warning in warnings {
        if let Some(span) = &warning.span {
            // Clamp to the expression length to survive odd spans.
            let start = span.start.min(expression.len());
            let end = span.end.min(expression.len()).max(start);

            let mut builder =
                Report::build(report_kind(warning.severity), ("expression", start..end))
                    .with_code(warning.id.as_ref())
                    .with_message(&warning.message)
                    .with_config(config);

            builder = builder.with_label(
                Label::new(("expression", start..end))
                    .with_message(label_message(warning))
                    .with_color(severity_color(warning.severity)),
            );

            if let Some(explanation) = warning.explain() {
                builder = builder.with_help(explanation);
            }

            builder.finish().eprint(&mut cache).ok();
        } else {
            eprintln!("{warning}");
            if !warning.terms.is_empty() {
                eprintln!("  = terms: {}", warning.terms.join(", "));
            }
            if let Some(explanation) = warning.explain() {
                eprintln!("  = help: {explanation}");
            }
        }
    }
}

/// Build a concise label message from the warning's context, avoiding
/// duplication with the report header message.
fn label_message(warning: &Warning) -> String {
    if let Some(context) = &warning.context
        && !context.is_empty()
    {
        context
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        warning.message.clone()
    }
}

// ── Summary line ────────────────────────────────────────────────────────

/// Print a coloured summary line showing warning counts per severity.
///
/// Example: `1 error, 2 high, 1 low`
pub(crate) fn print_summary(warnings: &[Warning]) {
    use ariadne::Fmt;

    let (mut errors, mut highs, mut lows, mut infos) = (0usize, 0usize, 0usize, 0usize);
    for warning in warnings {
        match warning.severity {
            Severity::Error => errors += 1,
            Severity::High => highs += 1,
            Severity::Low => lows += 1,
            Severity::None => infos += 1,
        }
    }

    if errors + highs + lows + infos == 0 {
        return;
    }

    let mut parts = Vec::new();
    if errors > 0 {
        let s = if errors == 1 { "" } else { "s" };
        parts.push(format!("{}", format!("{errors} error{s}").fg(Color::Red)));
    }
    if highs > 0 {
        parts.push(format!("{}", format!("{highs} high").fg(Color::Yellow)));
    }
    if lows > 0 {
        parts.push(format!("{}", format!("{lows} low").fg(Color::Blue)));
    }
    if infos > 0 {
        parts.push(format!("{}", format!("{infos} info").fg(Color::Green)));
    }
    eprintln!("{}", parts.join(", "));
}
