//! Business-rule definitions.
//!
//! The catalogue may ship its own rule-message table; [`default_rule`] backs
//! every known id with an embedded definition so validation works against a
//! bare term dump. Reserved slots (BR02, BR09, BR14, BR15, BR18) stay in the
//! table to preserve the numbering; BR29–BR31 name the structural error
//! classes reported under the `STRUCT_*`/`VBA-*` codes.

use serde::{Deserialize, Serialize};

use foodex2_diagnostics::Severity;

/// A rule definition: id, default severity, and message text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    /// Rule id (`BR01`…`BR31`, `VBA-*`, `STRUCT_*`).
    pub id: String,
    /// Severity a warning with this id carries.
    pub severity: Severity,
    /// Message text rendered into the warning.
    pub message: String,
}

/// The embedded rule table: `(id, severity, message)`.
const DEFAULT_RULES: &[(&str, Severity, &str)] = &[
    // Structural — parser
    (
        "STRUCT_BASE",
        Severity::Error,
        "the expression must start with a five-character base term code",
    ),
    (
        "STRUCT_FACET",
        Severity::Error,
        "facet fragments must have the form Fnn.CODE5",
    ),
    // Structural — validator
    (
        "VBA-NOTFOUND",
        Severity::Error,
        "base term not found in the catalogue",
    ),
    (
        "VBA-FACET404",
        Severity::Error,
        "facet descriptor not found in the catalogue",
    ),
    (
        "VBA-CATEGORY",
        Severity::Error,
        "facet descriptor does not belong to the hierarchy of its group",
    ),
    (
        "VBA-DUPLICATE",
        Severity::High,
        "the same facet appears more than once",
    ),
    (
        "VBA-IMPLICIT",
        Severity::High,
        "explicit facet already implicit in the base term; report the cleaned code",
    ),
    // Business rules
    (
        "BR01",
        Severity::High,
        "the source commodity of a raw term must be a child of the implicit one or of the base term",
    ),
    ("BR02", Severity::None, "reserved rule slot"),
    (
        "BR03",
        Severity::High,
        "F01 source facet not allowed in composite food",
    ),
    (
        "BR04",
        Severity::High,
        "F27 source commodity facet not allowed in composite food",
    ),
    (
        "BR05",
        Severity::High,
        "the source commodity of a derivative must specify one of the implicit ones",
    ),
    (
        "BR06",
        Severity::High,
        "the F01 source facet on a derivative requires exactly one F27 source commodity; none present",
    ),
    (
        "BR07",
        Severity::High,
        "the F01 source facet on a derivative requires exactly one F27 source commodity; several present",
    ),
    (
        "BR08",
        Severity::High,
        "base term not in the reporting hierarchy; the code cannot be used for data submission",
    ),
    ("BR09", Severity::None, "reserved rule slot"),
    (
        "BR10",
        Severity::Low,
        "non-specific base term; prefer a more precise one when available",
    ),
    (
        "BR11",
        Severity::Low,
        "generic Processed facet used; prefer the specific process applied",
    ),
    (
        "BR12",
        Severity::Low,
        "the ingredient facet on raw or derivative terms records minor ingredients only",
    ),
    (
        "BR13",
        Severity::High,
        "this physical state creates a new derivative; report the existing derivative base term instead",
    ),
    ("BR14", Severity::None, "reserved for ICT-specific checks"),
    ("BR15", Severity::None, "reserved for DCF-specific checks"),
    (
        "BR16",
        Severity::High,
        "explicit facet is broader than an implicit facet of the same group",
    ),
    (
        "BR17",
        Severity::High,
        "facet descriptors cannot be used as base terms",
    ),
    ("BR18", Severity::None, "reserved rule slot"),
    (
        "BR19",
        Severity::High,
        "this process cannot be applied to the base term; it is forbidden for its group",
    ),
    ("BR20", Severity::High, "deprecated term used"),
    ("BR21", Severity::High, "dismissed term used"),
    ("BR22", Severity::None, "the expression raised no blocking warning"),
    (
        "BR23",
        Severity::Low,
        "hierarchy base term; acceptable for exposure screening but low in detail",
    ),
    (
        "BR24",
        Severity::High,
        "hierarchy base term outside the exposure hierarchy; not valid for reporting",
    ),
    (
        "BR25",
        Severity::High,
        "more than one facet in a single-cardinality group",
    ),
    (
        "BR26",
        Severity::High,
        "mutually exclusive processes applied together (same ordinal code)",
    ),
    (
        "BR27",
        Severity::High,
        "processes sharing a decimal ordinal group each create a different derivative",
    ),
    (
        "BR28",
        Severity::High,
        "reconstitution or dilution cannot be applied to a concentrated or dehydrated base term",
    ),
    (
        "BR29",
        Severity::Error,
        "malformed expression structure (reported as STRUCT_BASE/STRUCT_FACET)",
    ),
    (
        "BR30",
        Severity::Error,
        "unresolved base term (reported as VBA-NOTFOUND)",
    ),
    (
        "BR31",
        Severity::Error,
        "unresolved or misplaced facet descriptor (reported as VBA-FACET404/VBA-CATEGORY)",
    ),
];

/// The embedded default definition for `id`, if the id is known.
pub fn default_rule(id: &str) -> Option<RuleDefinition> {
    DEFAULT_RULES
        .iter()
        .find(|(rule_id, _, _)| *rule_id == id)
        .map(|&(rule_id, severity, message)| RuleDefinition {
            id: rule_id.to_string(),
            severity,
            message: message.to_string(),
        })
}
