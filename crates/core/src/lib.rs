//! FoodEx2 validation engine.
//!
//! Parses FoodEx2 expressions (a five-character base term refined by facet
//! descriptors, e.g. `A0B9Z#F28.A07JS$F01.A0F6E`), resolves every code
//! against the catalogue, enforces the structural and business rules, and
//! rolls the warnings up into a [`ValidationOutcome`]. The main entry points
//! are [`parse_str`] for parsing and [`Validator::validate`] for the full
//! pipeline.

#![warn(missing_docs)]

/// Expression grammar: AST, parser, canonical emission, implicit stripping.
pub mod expression;
/// Memoized ancestor/descendant queries over the catalogue hierarchies.
pub mod resolver;
/// Structural validation, business rules, and result aggregation.
pub mod validate;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Parser
pub use expression::parser::{ParseResult, parse_str};

// AST
pub use expression::ast::FacetExpression;

// Resolver
pub use resolver::HierarchyResolver;

// Validator
pub use validate::{
    ValidationContext, ValidationOutcome, Validator, ValidatorConfig, WarningCounts,
};

// Re-exported from the catalogue and diagnostics crates
pub use foodex2_catalogue::{Catalogue, FacetRef, Term, TermType};
pub use foodex2_diagnostics::{Severity, Span, Warning, codes};

/// Infrastructural failure inside the engine.
///
/// Expression-level faults never surface here — they become [`Warning`]s.
/// An `EngineError` means the catalogue itself is unusable and the process
/// should treat it as a system error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A parent chain in the catalogue loops back on itself.
    #[error("cycle detected in hierarchy {hierarchy:?} while resolving ancestors of {code}")]
    HierarchyCycle {
        /// Hierarchy containing the cycle.
        hierarchy: String,
        /// Term whose ancestor walk revisited a code.
        code: String,
    },
}
