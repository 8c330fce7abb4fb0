//! Diagnostics for the FoodEx2 toolchain.
//!
//! Provides [`Warning`], [`Severity`], and [`Span`] — the types the parser,
//! structural validator, and business-rule evaluator use to report problems
//! with a FoodEx2 expression. Warning codes are defined in the [`codes`]
//! module.

#![warn(missing_docs)]

/// Warning code constants and their explanations.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity of a validation warning.
///
/// The variants are declared in ascending order so that `Ord` gives the
/// roll-up the engine needs: `NONE < LOW < HIGH < ERROR`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Informational — the expression is acceptable as-is.
    #[default]
    None,
    /// Minor issue — the expression is acceptable but could be improved.
    Low,
    /// Blocking issue under the default configuration.
    High,
    /// Structural fault — the expression cannot be interpreted.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::High => write!(f, "HIGH"),
            Severity::Low => write!(f, "LOW"),
            Severity::None => write!(f, "NONE"),
        }
    }
}

/// Byte span in the input expression.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the first character (0-based).
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Create a zero-width span at the given position.
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }
}

/// A warning produced while validating a FoodEx2 expression.
///
/// Expression-level faults are always reported this way; the engine reserves
/// `Err` returns for infrastructural failures (unreadable catalogue, cycle in
/// a hierarchy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Warning code (e.g., `"BR19"`, `"VBA-CATEGORY"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Optional byte span of the offending fragment in the input expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Codes of the catalogue terms that triggered the warning, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub terms: Vec<String>,
    /// Machine-readable context for tooling. Keys and values are free-form
    /// strings; `BTreeMap` keeps serialized key order deterministic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Warning {
    /// Create a warning with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span: None,
            terms: Vec::new(),
            context: None,
        }
    }

    /// Shorthand for an `ERROR` warning.
    pub fn error(id: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(id, Severity::Error, message)
    }

    /// Shorthand for a `HIGH` warning.
    pub fn high(id: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(id, Severity::High, message)
    }

    /// Shorthand for a `LOW` warning.
    pub fn low(id: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(id, Severity::Low, message)
    }

    /// Shorthand for a `NONE` (informational) warning.
    pub fn info(id: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(id, Severity::None, message)
    }

    /// Attach a source span (builder pattern).
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach the catalogue terms involved (builder pattern).
    pub fn with_terms(mut self, terms: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.terms = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Attach machine-readable context metadata (builder pattern).
    ///
    /// Keys are short descriptors like `"facet"`, `"group"`, `"hierarchy"`.
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Returns the stored explanation for this warning's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        codes::explain(&self.id)
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Severity ordering ───────────────────────────────────────────────

    #[test]
    fn severity_orders_none_low_high_error() {
        assert!(Severity::None < Severity::Low);
        assert!(Severity::Low < Severity::High);
        assert!(Severity::High < Severity::Error);
    }

    #[test]
    fn severity_max_is_the_rollup() {
        let sevs = [Severity::Low, Severity::High, Severity::None];
        assert_eq!(sevs.iter().copied().max(), Some(Severity::High));
    }

    #[test]
    fn severity_display_and_serde_agree() {
        for (sev, text) in [
            (Severity::Error, "ERROR"),
            (Severity::High, "HIGH"),
            (Severity::Low, "LOW"),
            (Severity::None, "NONE"),
        ] {
            assert_eq!(format!("{sev}"), text);
            assert_eq!(serde_json::to_string(&sev).unwrap(), format!("\"{text}\""));
        }
    }

    // ── Span ────────────────────────────────────────────────────────────

    #[test]
    fn span_new_valid() {
        let s = Span::new(5, 10);
        assert_eq!(s.start, 5);
        assert_eq!(s.end, 10);
    }

    #[test]
    #[should_panic(expected = "Span end (3) < start (5)")]
    fn span_new_inverted_panics() {
        Span::new(5, 3);
    }

    #[test]
    fn span_empty() {
        let s = Span::empty(7);
        assert_eq!(s.start, 7);
        assert_eq!(s.end, 7);
    }

    // ── Warning constructors ────────────────────────────────────────────

    #[test]
    fn warning_error_constructor() {
        let w = Warning::error(codes::BASE_NOT_FOUND, "term not in catalogue");
        assert_eq!(w.id, "VBA-NOTFOUND");
        assert_eq!(w.severity, Severity::Error);
        assert!(w.span.is_none());
        assert!(w.terms.is_empty());
    }

    #[test]
    fn warning_high_with_terms() {
        let w = Warning::high(codes::DEPRECATED_TERM, "deprecated").with_terms(["A0B9Z"]);
        assert_eq!(w.severity, Severity::High);
        assert_eq!(w.terms, vec!["A0B9Z"]);
    }

    #[test]
    fn warning_display() {
        let w = Warning::high(codes::FORBIDDEN_PROCESS, "process not applicable");
        assert_eq!(format!("{w}"), "HIGH[BR19]: process not applicable");
    }

    // ── Serde behaviour ─────────────────────────────────────────────────

    #[test]
    fn warning_serde_roundtrip() {
        let w = Warning::error(codes::STRUCT_FACET, "bad fragment")
            .with_span(Span::new(6, 14))
            .with_terms(["A07JS"])
            .with_context(BTreeMap::from([("fragment".into(), "F28A07JS".into())]));
        let json = serde_json::to_string(&w).unwrap();
        let w2: Warning = serde_json::from_str(&json).unwrap();
        assert_eq!(w, w2);
    }

    #[test]
    fn warning_serde_omits_empty_fields() {
        let w = Warning::low(codes::NON_SPECIFIC_TERM, "non-specific");
        let json = serde_json::to_string(&w).unwrap();
        assert!(!json.contains("span"), "None span should be omitted: {json}");
        assert!(
            !json.contains("terms"),
            "empty terms should be omitted: {json}"
        );
        assert!(
            !json.contains("context"),
            "None context should be omitted: {json}"
        );
    }

    #[test]
    fn warning_context_deterministic_order() {
        let w = Warning::high(codes::SINGLE_CARDINALITY, "repeated group").with_context(
            BTreeMap::from([
                ("z_last".into(), "1".into()),
                ("a_first".into(), "2".into()),
            ]),
        );
        let json = serde_json::to_string(&w).unwrap();
        let a = json.find("a_first").unwrap();
        let z = json.find("z_last").unwrap();
        assert!(a < z, "BTreeMap keys should serialize sorted: {json}");
    }

    // ── explain() ───────────────────────────────────────────────────────

    #[test]
    fn warning_explain_known() {
        let w = Warning::high(codes::FORBIDDEN_PROCESS, "x");
        assert!(w.explain().is_some());
    }

    #[test]
    fn warning_explain_unknown() {
        let w = Warning::high("BR99", "x");
        assert!(w.explain().is_none());
    }
}
