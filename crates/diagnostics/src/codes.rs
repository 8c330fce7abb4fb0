//! Warning code constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete. Business-rule codes keep the catalogue's `BRnn`
//! numbering; structural codes use the `STRUCT_*` / `VBA-*` families.

// ── Structural codes (parser) ───────────────────────────────────────────

/// Input shorter than five characters or base prefix not five uppercase alphanumerics.
pub const STRUCT_BASE: &str = "STRUCT_BASE";
/// Facet fragment not of the form `Fnn.CODE5`.
pub const STRUCT_FACET: &str = "STRUCT_FACET";

// ── Structural codes (validator) ────────────────────────────────────────

/// Base term code does not resolve in the catalogue.
pub const BASE_NOT_FOUND: &str = "VBA-NOTFOUND";
/// Facet descriptor code does not resolve in the catalogue.
pub const DESCRIPTOR_NOT_FOUND: &str = "VBA-FACET404";
/// Facet descriptor does not belong to the hierarchy assigned to its group.
pub const FACET_CATEGORY: &str = "VBA-CATEGORY";
/// Two identical explicit facets in one expression.
pub const DUPLICATE_FACET: &str = "VBA-DUPLICATE";
/// An explicit facet duplicated an implicit one and was stripped.
pub const IMPLICIT_FACET_REMOVED: &str = "VBA-IMPLICIT";

// ── Business rules ──────────────────────────────────────────────────────

/// F27 on a raw term must stay under the implicit source commodity or the base.
pub const SOURCE_COMMODITY_RAW: &str = "BR01";
/// F01 source facet on a composite base term.
pub const SOURCE_IN_COMPOSITE: &str = "BR03";
/// F27 source-commodity facet on a composite base term.
pub const SOURCE_COMMODITY_IN_COMPOSITE: &str = "BR04";
/// Explicit F27 on a derivative must specify one of the implicit F27 facets.
pub const SOURCE_COMMODITY_DERIVATIVE: &str = "BR05";
/// F01 on a derivative needs exactly one F27; none found.
pub const SOURCE_WITHOUT_COMMODITY: &str = "BR06";
/// F01 on a derivative needs exactly one F27; several found.
pub const SOURCE_WITH_MULTIPLE_COMMODITIES: &str = "BR07";
/// Base term is not a member of the reporting hierarchy.
pub const NOT_REPORTABLE: &str = "BR08";
/// Base term is a non-specific catch-all.
pub const NON_SPECIFIC_TERM: &str = "BR10";
/// Process facet is the generic "Processed" term or one of its descendants.
pub const GENERIC_PROCESS_FACET: &str = "BR11";
/// Ingredient facet on a raw or derivative base is minor information only.
pub const MINOR_INGREDIENT: &str = "BR12";
/// Physical-state facet that turns a raw commodity into a derivative.
pub const STATE_CREATES_DERIVATIVE: &str = "BR13";
/// Explicit facet is broader than an implicit facet of the same group.
pub const FACET_LESS_DETAILED: &str = "BR16";
/// A facet descriptor used as the base term.
pub const FACET_AS_BASE_TERM: &str = "BR17";
/// Process facet is forbidden for the base term or one of its ancestors.
pub const FORBIDDEN_PROCESS: &str = "BR19";
/// Deprecated term used as base or descriptor.
pub const DEPRECATED_TERM: &str = "BR20";
/// Dismissed term used as base or descriptor.
pub const DISMISSED_TERM: &str = "BR21";
/// No blocking warning was raised.
pub const VALIDATION_SUCCESS: &str = "BR22";
/// Hierarchy base term inside the exposure hierarchy.
pub const EXPOSURE_HIERARCHY_BASE: &str = "BR23";
/// Hierarchy base term outside the exposure hierarchy.
pub const NON_EXPOSURE_HIERARCHY_BASE: &str = "BR24";
/// More than one facet in a single-cardinality group.
pub const SINGLE_CARDINALITY: &str = "BR25";
/// Two processes with the same integer ordinal applied together.
pub const MUTUALLY_EXCLUSIVE_PROCESSES: &str = "BR26";
/// Two processes sharing the integer part of a decimal ordinal applied together.
pub const DECIMAL_ORDINAL_PROCESSES: &str = "BR27";
/// Reconstitution or dilution applied to a concentrated or dehydrated base.
pub const RECONSTITUTION_ON_DEHYDRATED: &str = "BR28";

/// Returns the stored explanation for a warning code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    Some(match id {
        STRUCT_BASE => {
            "A FoodEx2 expression starts with a five-character base term code of \
             uppercase letters and digits; anything shorter or differently shaped \
             cannot be looked up in the catalogue."
        }
        STRUCT_FACET => {
            "Each facet fragment must be a group id and a descriptor code joined \
             by a dot, e.g. `F28.A07KQ`."
        }
        BASE_NOT_FOUND => "The base term code has no entry in the loaded catalogue.",
        DESCRIPTOR_NOT_FOUND => "A facet descriptor code has no entry in the loaded catalogue.",
        FACET_CATEGORY => {
            "Every facet group draws its descriptors from one attached hierarchy; \
             this descriptor is not a member of the hierarchy paired with its group."
        }
        DUPLICATE_FACET => "The same group/descriptor pair appears twice in the expression.",
        IMPLICIT_FACET_REMOVED => {
            "The base term already carries this facet implicitly; the explicit copy \
             was removed and the cleaned code should be reported instead."
        }
        SOURCE_COMMODITY_RAW => {
            "On a raw commodity, explicit F27 facets may only restrict the implicit \
             source commodity (or the base term itself), never replace it."
        }
        SOURCE_IN_COMPOSITE => {
            "Composite foods describe their sources through ingredients; the F01 \
             source facet is reserved for raw commodities and derivatives."
        }
        SOURCE_COMMODITY_IN_COMPOSITE => {
            "Composite foods describe their sources through ingredients; the F27 \
             source-commodity facet is reserved for raw commodities and derivatives."
        }
        SOURCE_COMMODITY_DERIVATIVE => {
            "On a derivative with implicit source commodities, an explicit F27 must \
             be a more specific descendant of one of them."
        }
        SOURCE_WITHOUT_COMMODITY => {
            "The F01 source facet on a derivative is only interpretable together \
             with exactly one F27 source commodity; none is present."
        }
        SOURCE_WITH_MULTIPLE_COMMODITIES => {
            "The F01 source facet on a derivative is only interpretable together \
             with exactly one F27 source commodity; several are present."
        }
        NOT_REPORTABLE => {
            "Only members of the reporting hierarchy may be used for official data \
             submission."
        }
        NON_SPECIFIC_TERM => {
            "Non-specific terms are catch-alls; prefer a more precise base term \
             when one exists."
        }
        GENERIC_PROCESS_FACET => {
            "The generic `Processed` descriptor adds no information; pick the \
             specific process that was applied."
        }
        MINOR_INGREDIENT => {
            "On raw commodities and derivatives the ingredient facet records minor \
             ingredients only; it does not change the food's nature."
        }
        STATE_CREATES_DERIVATIVE => {
            "This physical state defines a derivative product; report the existing \
             derivative base term instead of faceting the raw commodity."
        }
        FACET_LESS_DETAILED => {
            "An explicit facet that is an ancestor of an implicit facet of the same \
             group removes detail instead of adding it."
        }
        FACET_AS_BASE_TERM => "Facet descriptors only refine a food; they cannot stand alone.",
        FORBIDDEN_PROCESS => {
            "The forbidden-process table blocks this process for the base term or \
             one of its reporting-hierarchy ancestors, because applying it would \
             create a different food."
        }
        DEPRECATED_TERM => "Deprecated terms are kept for old data and must not appear in new codes.",
        DISMISSED_TERM => "Dismissed terms were removed from the catalogue and cannot be reported.",
        VALIDATION_SUCCESS => "The expression raised no blocking warning.",
        EXPOSURE_HIERARCHY_BASE => {
            "A hierarchy term inside the exposure hierarchy is acceptable for \
             screening but carries less detail than a leaf term."
        }
        NON_EXPOSURE_HIERARCHY_BASE => {
            "A hierarchy term outside the exposure hierarchy groups foods for \
             navigation only and cannot be reported."
        }
        SINGLE_CARDINALITY => {
            "This facet group admits a single value per food; keep the most \
             specific descriptor and drop the others."
        }
        MUTUALLY_EXCLUSIVE_PROCESSES => {
            "Processes sharing an integer ordinal code are mutually exclusive \
             alternatives and cannot both apply to one derivative."
        }
        DECIMAL_ORDINAL_PROCESSES => {
            "Processes sharing the integer part of a decimal ordinal each create a \
             distinct derivative; report separate codes instead of combining them."
        }
        RECONSTITUTION_ON_DEHYDRATED => {
            "Reconstituting or diluting a concentrate/powder yields a different \
             food; report the reconstituted product's own base term."
        }
        _ => return None,
    })
}
