//! Expression validation against the catalogue.
//!
//! The pipeline is strictly one-way: parse, structural checks, implicit
//! stripping, business rules, aggregation. Every fault becomes a typed
//! [`Warning`]; `Err` is reserved for catalogue-consistency failures.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use foodex2_catalogue::Catalogue;
use foodex2_diagnostics::{Severity, Warning, codes};

use crate::EngineError;
use crate::expression::{parser::parse_str, strip_implicit};
use crate::resolver::HierarchyResolver;

/// Shorthand for building a `BTreeMap<String, String>` context from key-value pairs.
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        std::collections::BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

mod aggregate;
mod rules;
mod structural;

pub use aggregate::{BaseTermInfo, FacetInfo, ValidationOutcome, WarningCounts};

// ─── Configuration ──────────────────────────────────────────────────────────

/// Which tool the validation runs for. Reserved context-specific rules
/// (BR14/BR15) stay inert under every value until they are defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValidationContext {
    /// The interactive coding tool.
    #[serde(rename = "ICT")]
    Ict,
    /// EFSA's data collection framework.
    #[serde(rename = "DCF")]
    Dcf,
    /// In-process use by another component.
    #[default]
    #[serde(rename = "internal")]
    Internal,
    /// External callers (API, CLI).
    #[serde(rename = "external")]
    External,
}

impl std::str::FromStr for ValidationContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ICT" => Ok(ValidationContext::Ict),
            "DCF" => Ok(ValidationContext::Dcf),
            "internal" => Ok(ValidationContext::Internal),
            "external" => Ok(ValidationContext::External),
            other => Err(format!(
                "unknown context {other:?} (expected ICT, DCF, internal, or external)"
            )),
        }
    }
}

/// Validation policy knobs.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Which tool the validation runs for.
    pub context: ValidationContext,
    /// Whether a `HIGH` warning invalidates the expression (the default).
    pub high_blocking: bool,
    /// Whether business rules still run after a structural `ERROR`. Off by
    /// default: an unresolved code makes most rules meaningless.
    pub evaluate_rules_on_error: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            context: ValidationContext::default(),
            high_blocking: true,
            evaluate_rules_on_error: false,
        }
    }
}

// ─── Validator ──────────────────────────────────────────────────────────────

/// The validation engine: a catalogue handle, its hierarchy resolver, and
/// the policy configuration.
///
/// One `Validator` serves any number of requests; per-request state lives on
/// the stack of [`Validator::validate`].
#[derive(Debug)]
pub struct Validator {
    catalogue: Arc<Catalogue>,
    resolver: HierarchyResolver,
    config: ValidatorConfig,
}

impl Validator {
    /// Create a validator with the default configuration.
    pub fn new(catalogue: Arc<Catalogue>) -> Self {
        Self::with_config(catalogue, ValidatorConfig::default())
    }

    /// Create a validator with an explicit configuration.
    pub fn with_config(catalogue: Arc<Catalogue>, config: ValidatorConfig) -> Self {
        Self {
            resolver: HierarchyResolver::new(Arc::clone(&catalogue)),
            catalogue,
            config,
        }
    }

    /// The catalogue this validator reads from.
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// The shared hierarchy resolver.
    pub fn resolver(&self) -> &HierarchyResolver {
        &self.resolver
    }

    /// The active configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate one expression.
    ///
    /// Never fails for expression-level problems — those come back as
    /// warnings in the outcome. `Err` means the catalogue itself is
    /// inconsistent (a hierarchy cycle).
    pub fn validate(&self, input: &str) -> Result<ValidationOutcome, EngineError> {
        let parsed = parse_str(input);
        let mut warnings = parsed.warnings;

        let Some(expression) = parsed.expression else {
            // Unusable base prefix: nothing to resolve, nothing to clean.
            return Ok(aggregate::build(
                input,
                None,
                None,
                warnings,
                &self.config,
                &self.catalogue,
            ));
        };

        structural::check(&expression, &self.catalogue, &mut warnings);

        let base = self.catalogue.term(&expression.base);

        // ── Implicit-facet stripping ────────────────────────────────────
        // Only meaningful with a resolved base term; acceptance is never
        // affected, but the cleaned code is what should be reported.
        let expression = if let Some(base_term) = base {
            let implicit = base_term.implicit_facet_refs();
            let (cleaned, stripped) = strip_implicit(&expression, &implicit);
            if !stripped.is_empty() {
                let removed: Vec<String> =
                    stripped.iter().map(ToString::to_string).collect();
                warnings.push(
                    Warning::high(
                        codes::IMPLICIT_FACET_REMOVED,
                        format!(
                            "facet(s) {} already implicit in {}; cleaned code is {}",
                            removed.join(", "),
                            base_term.code,
                            cleaned.canonical()
                        ),
                    )
                    .with_terms(stripped.iter().map(|f| f.descriptor.clone()))
                    .with_context(ctx!(
                        "cleaned" => cleaned.canonical(),
                        "removed" => removed.join(","),
                    )),
                );
            }
            cleaned
        } else {
            expression
        };

        // ── Business rules ──────────────────────────────────────────────
        let structural_error = warnings.iter().any(|w| w.severity == Severity::Error);
        if let Some(base_term) = base
            && (!structural_error || self.config.evaluate_rules_on_error)
        {
            let rule_ctx = rules::RuleCtx {
                base: base_term,
                explicit: &expression.facets,
                implicit: base_term.implicit_facet_refs(),
                catalogue: &self.catalogue,
                resolver: &self.resolver,
            };
            rules::evaluate(&rule_ctx, &mut warnings)?;
        }

        Ok(aggregate::build(
            input,
            Some(&expression),
            base,
            warnings,
            &self.config,
            &self.catalogue,
        ))
    }

    /// Validate a batch of expressions, preserving input order.
    ///
    /// Expressions are independent and the catalogue is read-only, so the
    /// batch fans out over rayon's bounded pool. The first catalogue
    /// consistency error aborts the whole batch.
    pub fn validate_batch<S: AsRef<str> + Sync>(
        &self,
        inputs: &[S],
    ) -> Result<Vec<ValidationOutcome>, EngineError> {
        inputs
            .par_iter()
            .map(|input| self.validate(input.as_ref()))
            .collect()
    }
}
