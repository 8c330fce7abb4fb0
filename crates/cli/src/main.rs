//! FoodEx2 CLI — validate FoodEx2 food classification codes against a catalogue.

mod render;

use std::fs;
use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use foodex2_catalogue::{Catalogue, parse_forbidden_csv};
use foodex2_core::{ValidationOutcome, Validator, ValidatorConfig};
use foodex2_diagnostics::codes;

use crate::render::{Format, print_summary, render_warnings_pretty};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "foodex2",
    version,
    about = "FoodEx2 toolchain — validate and explain FoodEx2 food classification codes"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Validate a single FoodEx2 expression.
    Validate {
        /// The expression, e.g. `A0B9Z#F28.A07JS$F01.A0F6E`.
        #[arg(value_name = "EXPRESSION")]
        expression: String,
        #[command(flatten)]
        catalogue: CatalogueArgs,
    },

    /// Validate a file of expressions, one per line, preserving order.
    Batch {
        /// File with one expression per line; blank lines are skipped.
        #[arg(value_name = "FILE")]
        file: String,
        #[command(flatten)]
        catalogue: CatalogueArgs,
    },

    /// Print the stored explanation for a warning code (e.g. BR19).
    Explain {
        /// The warning code.
        #[arg(value_name = "CODE")]
        code: String,
    },
}

/// Catalogue source and validation policy, shared by validate and batch.
#[derive(Debug, clap::Args)]
struct CatalogueArgs {
    /// Catalogue JSON file (terms, hierarchies, rule tables).
    #[arg(long, value_name = "PATH")]
    catalogue: String,
    /// Optional `;`-delimited forbidden-process table to merge in.
    #[arg(long, value_name = "PATH")]
    forbidden: Option<String>,
    /// Validation context: ICT, DCF, internal, or external.
    #[arg(long, value_name = "CONTEXT", default_value = "internal")]
    context: String,
    /// Treat HIGH warnings as non-blocking (ERROR still blocks).
    #[arg(long)]
    permissive: bool,
}

impl CatalogueArgs {
    fn build_validator(&self) -> Result<Validator> {
        let path = Path::new(&self.catalogue);
        let mut catalogue = Catalogue::from_path(path)
            .with_context(|| format!("loading catalogue from {}", path.display()))?;
        if let Some(csv_path) = &self.forbidden {
            let text = fs::read_to_string(csv_path)
                .with_context(|| format!("reading forbidden-process table {csv_path}"))?;
            let rows = parse_forbidden_csv(&text)
                .with_context(|| format!("parsing forbidden-process table {csv_path}"))?;
            catalogue = catalogue.with_forbidden_processes(rows);
        }
        let config = ValidatorConfig {
            context: self
                .context
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?,
            high_blocking: !self.permissive,
            ..ValidatorConfig::default()
        };
        Ok(Validator::with_config(Arc::new(catalogue), config))
    }
}

// ── Entry point ─────────────────────────────────────────────────────────

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            process::exit(2);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match cli.cmd {
        Cmd::Validate {
            expression,
            catalogue,
        } => {
            let validator = catalogue.build_validator()?;
            let outcome = validator
                .validate(&expression)
                .context("catalogue inconsistency detected during validation")?;
            report_outcome(&expression, &outcome, format);
            Ok(i32::from(!outcome.valid))
        }

        Cmd::Batch { file, catalogue } => {
            let text =
                fs::read_to_string(&file).with_context(|| format!("reading {file}"))?;
            let expressions: Vec<&str> = text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();
            let validator = catalogue.build_validator()?;
            let outcomes = validator
                .validate_batch(&expressions)
                .context("catalogue inconsistency detected during validation")?;
            match format {
                Format::Json => {
                    println!("{}", serde_json::to_string_pretty(&outcomes)?);
                }
                Format::Pretty => {
                    for outcome in &outcomes {
                        let verdict = if outcome.valid { "ok" } else { "INVALID" };
                        println!(
                            "{verdict}\t{}\t{}",
                            outcome.original_code, outcome.severity
                        );
                    }
                    let all: Vec<_> = outcomes
                        .iter()
                        .flat_map(|o| o.warnings.iter().cloned())
                        .collect();
                    print_summary(&all);
                }
            }
            Ok(i32::from(outcomes.iter().any(|o| !o.valid)))
        }

        Cmd::Explain { code } => {
            let Some(explanation) = codes::explain(&code) else {
                bail!("no explanation available for {code:?}");
            };
            println!("{code}: {explanation}");
            Ok(0)
        }
    }
}

fn report_outcome(expression: &str, outcome: &ValidationOutcome, format: Format) {
    match format {
        Format::Json => {
            // Serialization of plain data cannot fail.
            println!(
                "{}",
                serde_json::to_string_pretty(outcome).expect("outcome serializes")
            );
        }
        Format::Pretty => {
            render_warnings_pretty(expression, &outcome.warnings);
            if let Some(description) = &outcome.interpreted_description {
                println!("{description}");
            }
            if let Some(cleaned) = &outcome.cleaned_code {
                println!("cleaned code: {cleaned}");
            }
            println!(
                "{}: {}",
                if outcome.valid { "valid" } else { "invalid" },
                outcome.severity
            );
            print_summary(&outcome.warnings);
        }
    }
}
