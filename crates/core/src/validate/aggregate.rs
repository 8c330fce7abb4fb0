//! Warning roll-up and the reportable outcome.

use serde::{Deserialize, Serialize};

use foodex2_catalogue::{Catalogue, Term, TermType, facet_group};
use foodex2_diagnostics::{Severity, Warning, codes};

use super::ValidatorConfig;
use crate::expression::ast::FacetExpression;

/// The base term as reported in an outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BaseTermInfo {
    /// Term code.
    pub code: String,
    /// Extended name.
    pub name: String,
    /// Term typology letter.
    #[serde(rename = "type")]
    pub term_type: TermType,
    /// Detail level, when the catalogue records one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_level: Option<String>,
}

/// One surviving explicit facet as reported in an outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacetInfo {
    /// Facet group id.
    pub group: String,
    /// Group label, when the group is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Descriptor code.
    pub descriptor: String,
    /// Descriptor name, when the term resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Warning tally by severity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WarningCounts {
    /// `ERROR` warnings.
    pub error: usize,
    /// `HIGH` warnings.
    pub high: usize,
    /// `LOW` warnings.
    pub low: usize,
    /// `NONE` (informational) warnings.
    pub info: usize,
    /// All warnings.
    pub total: usize,
}

/// The result of validating one expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Whether the expression may be reported under the active policy.
    pub valid: bool,
    /// The input as supplied.
    pub original_code: String,
    /// Canonical code after implicit-facet removal; absent when nothing was
    /// stripped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaned_code: Option<String>,
    /// The resolved base term.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_term: Option<BaseTermInfo>,
    /// Surviving explicit facets.
    pub facets: Vec<FacetInfo>,
    /// Human reading of the code: base name plus one `, <group> = <name>`
    /// clause per surviving facet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpreted_description: Option<String>,
    /// All warnings, in pipeline order.
    pub warnings: Vec<Warning>,
    /// Highest severity across the warnings.
    pub severity: Severity,
    /// Warning tally.
    pub warning_counts: WarningCounts,
}

impl ValidationOutcome {
    /// Blocking warnings: `ERROR` and `HIGH`.
    pub fn hard_warnings(&self) -> impl Iterator<Item = &Warning> {
        self.warnings
            .iter()
            .filter(|w| w.severity >= Severity::High)
    }

    /// Advisory warnings: `LOW`.
    pub fn soft_warnings(&self) -> impl Iterator<Item = &Warning> {
        self.warnings
            .iter()
            .filter(|w| w.severity == Severity::Low)
    }

    /// Informational entries: `NONE`.
    pub fn info_warnings(&self) -> impl Iterator<Item = &Warning> {
        self.warnings
            .iter()
            .filter(|w| w.severity == Severity::None)
    }
}

/// Assemble the outcome from everything the pipeline produced.
pub(super) fn build(
    original: &str,
    expression: Option<&FacetExpression>,
    base: Option<&Term>,
    mut warnings: Vec<Warning>,
    config: &ValidatorConfig,
    catalogue: &Catalogue,
) -> ValidationOutcome {
    // BR22: success marker, only when the base resolved, is not a hierarchy
    // term, and nothing blocking accumulated anywhere in the pipeline.
    let blocking = warnings.iter().any(|w| w.severity >= Severity::High);
    if let Some(base_term) = base
        && !base_term.is_hierarchy_term()
        && !blocking
        && let Some(def) = catalogue.rule(codes::VALIDATION_SUCCESS)
    {
        warnings.push(Warning::new(codes::VALIDATION_SUCCESS, def.severity, def.message));
    }

    let severity = warnings
        .iter()
        .map(|w| w.severity)
        .max()
        .unwrap_or(Severity::None);
    let valid = if config.high_blocking {
        severity < Severity::High
    } else {
        severity < Severity::Error
    };

    let stripped_any = warnings
        .iter()
        .any(|w| w.id == codes::IMPLICIT_FACET_REMOVED);
    let cleaned_code = if stripped_any {
        expression.map(FacetExpression::canonical)
    } else {
        None
    };

    let facets: Vec<FacetInfo> = expression
        .map(|e| {
            e.facets
                .iter()
                .map(|f| FacetInfo {
                    group: f.group.clone(),
                    label: facet_group(&f.group).map(|g| g.label.to_string()),
                    descriptor: f.descriptor.clone(),
                    name: catalogue.term(&f.descriptor).map(|t| t.name.clone()),
                })
                .collect()
        })
        .unwrap_or_default();

    let interpreted_description = base.map(|base_term| {
        let mut text = base_term.name.clone();
        for facet in &facets {
            let label = facet.label.as_deref().unwrap_or(&facet.group);
            let name = facet.name.as_deref().unwrap_or(&facet.descriptor);
            text.push_str(&format!(", {label} = {name}"));
        }
        text
    });

    let mut counts = WarningCounts::default();
    for warning in &warnings {
        match warning.severity {
            Severity::Error => counts.error += 1,
            Severity::High => counts.high += 1,
            Severity::Low => counts.low += 1,
            Severity::None => counts.info += 1,
        }
        counts.total += 1;
    }

    ValidationOutcome {
        valid,
        original_code: original.to_string(),
        cleaned_code,
        base_term: base.map(|b| BaseTermInfo {
            code: b.code.clone(),
            name: b.name.clone(),
            term_type: b.term_type,
            detail_level: b.detail_level.clone(),
        }),
        facets,
        interpreted_description,
        warnings,
        severity,
        warning_counts: counts,
    }
}
