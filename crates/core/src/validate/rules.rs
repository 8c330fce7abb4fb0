//! The business-rule registry.
//!
//! Each rule is a pure function of the base term, the (normalized) explicit
//! facets, and the catalogue/resolver pair. The registry is data: a slice of
//! `(id, predicate)` slots evaluated in id order, so tests can enumerate the
//! rule set and reserved slots stay visible. BR22 (success) lives in the
//! aggregator, BR25 (cardinality) in the structural validator, and the
//! remaining gaps (BR02, BR09, BR14, BR15, BR18) are numbering placeholders
//! that never fire.

use std::collections::{BTreeMap, HashSet};

use foodex2_catalogue::{
    Catalogue, FacetRef, Term, TermType, facet_group, hierarchies,
};
use foodex2_diagnostics::{Severity, Warning, codes};

use crate::EngineError;
use crate::resolver::HierarchyResolver;

/// The generic "Processed" term; BR11 flags it and all its descendants.
const GENERIC_PROCESSED: &str = "A07XS";

/// Base-term name fragments that mark a concentrated/dehydrated food (the
/// BR28 fallback when the catalogue's dehydration set is not populated).
const DEHYDRATION_KEYWORDS: &[&str] = &["concentrate", "powder", "dried", "dehydrated"];

// ─── Rule context ───────────────────────────────────────────────────────────

/// Everything a rule predicate may consult.
pub(super) struct RuleCtx<'a> {
    /// The resolved base term.
    pub(super) base: &'a Term,
    /// Explicit facets after implicit stripping.
    pub(super) explicit: &'a [FacetRef],
    /// Facets inherited from the base term.
    pub(super) implicit: Vec<FacetRef>,
    /// The catalogue store.
    pub(super) catalogue: &'a Catalogue,
    /// The hierarchy resolver.
    pub(super) resolver: &'a HierarchyResolver,
}

impl RuleCtx<'_> {
    fn explicit_of(&self, group: &str) -> impl Iterator<Item = &FacetRef> {
        self.explicit.iter().filter(move |f| f.group == group)
    }

    fn implicit_of(&self, group: &str) -> impl Iterator<Item = &FacetRef> {
        self.implicit.iter().filter(move |f| f.group == group)
    }

    fn has_explicit(&self, group: &str) -> bool {
        self.explicit_of(group).next().is_some()
    }

    /// Implicit ∪ explicit facets of a group, deduplicated by pair, each
    /// tagged with whether it was explicit.
    fn combined_of(&self, group: &str) -> Vec<(&FacetRef, bool)> {
        let mut seen: HashSet<&FacetRef> = HashSet::new();
        let mut out = Vec::new();
        for facet in self.implicit_of(group) {
            if seen.insert(facet) {
                out.push((facet, false));
            }
        }
        for facet in self.explicit_of(group) {
            if seen.insert(facet) {
                out.push((facet, true));
            }
        }
        out
    }
}

// ─── Hits and the registry ──────────────────────────────────────────────────

/// One violation found by a rule: the terms involved plus optional context.
struct Hit {
    terms: Vec<String>,
    context: Option<BTreeMap<String, String>>,
}

impl Hit {
    fn on(terms: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
            context: None,
        }
    }

    fn with_context(mut self, context: BTreeMap<String, String>) -> Self {
        self.context = Some(context);
        self
    }
}

type RuleFn = fn(&RuleCtx<'_>) -> Result<Vec<Hit>, EngineError>;

struct RuleSlot {
    id: &'static str,
    check: Option<RuleFn>,
}

/// BR01–BR31 in id order. `check: None` marks a slot handled elsewhere or
/// reserved.
static RULES: &[RuleSlot] = &[
    RuleSlot { id: codes::SOURCE_COMMODITY_RAW, check: Some(br01) },
    RuleSlot { id: "BR02", check: None },
    RuleSlot { id: codes::SOURCE_IN_COMPOSITE, check: Some(br03) },
    RuleSlot { id: codes::SOURCE_COMMODITY_IN_COMPOSITE, check: Some(br04) },
    RuleSlot { id: codes::SOURCE_COMMODITY_DERIVATIVE, check: Some(br05) },
    RuleSlot { id: codes::SOURCE_WITHOUT_COMMODITY, check: Some(br06) },
    RuleSlot { id: codes::SOURCE_WITH_MULTIPLE_COMMODITIES, check: Some(br07) },
    RuleSlot { id: codes::NOT_REPORTABLE, check: Some(br08) },
    RuleSlot { id: "BR09", check: None },
    RuleSlot { id: codes::NON_SPECIFIC_TERM, check: Some(br10) },
    RuleSlot { id: codes::GENERIC_PROCESS_FACET, check: Some(br11) },
    RuleSlot { id: codes::MINOR_INGREDIENT, check: Some(br12) },
    RuleSlot { id: codes::STATE_CREATES_DERIVATIVE, check: Some(br13) },
    RuleSlot { id: "BR14", check: None }, // reserved for ICT
    RuleSlot { id: "BR15", check: None }, // reserved for DCF
    RuleSlot { id: codes::FACET_LESS_DETAILED, check: Some(br16) },
    RuleSlot { id: codes::FACET_AS_BASE_TERM, check: Some(br17) },
    RuleSlot { id: "BR18", check: None },
    RuleSlot { id: codes::FORBIDDEN_PROCESS, check: Some(br19) },
    RuleSlot { id: codes::DEPRECATED_TERM, check: Some(br20) },
    RuleSlot { id: codes::DISMISSED_TERM, check: Some(br21) },
    RuleSlot { id: codes::VALIDATION_SUCCESS, check: None }, // aggregator
    RuleSlot { id: codes::EXPOSURE_HIERARCHY_BASE, check: Some(br23) },
    RuleSlot { id: codes::NON_EXPOSURE_HIERARCHY_BASE, check: Some(br24) },
    RuleSlot { id: codes::SINGLE_CARDINALITY, check: None }, // structural validator
    RuleSlot { id: codes::MUTUALLY_EXCLUSIVE_PROCESSES, check: Some(br26) },
    RuleSlot { id: codes::DECIMAL_ORDINAL_PROCESSES, check: Some(br27) },
    RuleSlot { id: codes::RECONSTITUTION_ON_DEHYDRATED, check: Some(br28) },
    RuleSlot { id: "BR29", check: None }, // parser
    RuleSlot { id: "BR30", check: None }, // structural validator
    RuleSlot { id: "BR31", check: None }, // structural validator
];

/// Run every active rule in id order, appending one warning per hit.
///
/// Evaluation never short-circuits on a warning; only a catalogue
/// consistency error aborts.
pub(super) fn evaluate(
    rule_ctx: &RuleCtx<'_>,
    warnings: &mut Vec<Warning>,
) -> Result<(), EngineError> {
    for slot in RULES {
        let Some(check) = slot.check else { continue };
        for hit in check(rule_ctx)? {
            let (severity, message) = match rule_ctx.catalogue.rule(slot.id) {
                Some(def) => (def.severity, def.message),
                None => (Severity::High, format!("rule {} violated", slot.id)),
            };
            let mut warning = Warning::new(slot.id, severity, message).with_terms(hit.terms);
            if let Some(context) = hit.context {
                warning = warning.with_context(context);
            }
            warnings.push(warning);
        }
    }
    Ok(())
}

// ─── Source commodity rules (BR01, BR03–BR07) ───────────────────────────────

/// BR01: on a raw term, an explicit F27 must descend from an implicit F27 or
/// from the base term itself in `racsource`.
fn br01(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    if rule_ctx.base.term_type != TermType::Raw {
        return Ok(Vec::new());
    }
    let implicit: Vec<&str> = rule_ctx
        .implicit_of("F27")
        .map(|f| f.descriptor.as_str())
        .collect();
    let mut hits = Vec::new();
    for facet in rule_ctx.explicit_of("F27") {
        let under_implicit = rule_ctx.resolver.is_descendant_of_any(
            &facet.descriptor,
            implicit.iter().copied(),
            hierarchies::RACSOURCE,
        )?;
        let under_base = rule_ctx.resolver.is_ancestor(
            &rule_ctx.base.code,
            &facet.descriptor,
            hierarchies::RACSOURCE,
        )?;
        if !under_implicit && !under_base {
            hits.push(
                Hit::on([facet.descriptor.clone()])
                    .with_context(ctx!("facet" => facet.to_string())),
            );
        }
    }
    Ok(hits)
}

/// BR03: no F01 source facet on composite foods.
fn br03(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    Ok(composite_group_offenders(rule_ctx, "F01"))
}

/// BR04: no F27 source-commodity facet on composite foods.
fn br04(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    Ok(composite_group_offenders(rule_ctx, "F27"))
}

fn composite_group_offenders(rule_ctx: &RuleCtx<'_>, group: &str) -> Vec<Hit> {
    if !rule_ctx.base.term_type.is_composite() {
        return Vec::new();
    }
    let offenders: Vec<String> = rule_ctx
        .explicit_of(group)
        .map(|f| f.descriptor.clone())
        .collect();
    if offenders.is_empty() {
        Vec::new()
    } else {
        vec![Hit::on(offenders).with_context(ctx!("group" => group))]
    }
}

/// BR05: on a derivative with implicit source commodities, an explicit F27
/// must specify (descend from) one of them.
fn br05(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    if rule_ctx.base.term_type != TermType::Derivative {
        return Ok(Vec::new());
    }
    let implicit: Vec<&str> = rule_ctx
        .implicit_of("F27")
        .map(|f| f.descriptor.as_str())
        .collect();
    if implicit.is_empty() {
        return Ok(Vec::new());
    }
    let mut hits = Vec::new();
    for facet in rule_ctx.explicit_of("F27") {
        if !rule_ctx.resolver.is_descendant_of_any(
            &facet.descriptor,
            implicit.iter().copied(),
            hierarchies::RACSOURCE,
        )? {
            hits.push(
                Hit::on([facet.descriptor.clone()])
                    .with_context(ctx!("facet" => facet.to_string())),
            );
        }
    }
    Ok(hits)
}

/// BR06: F01 on a derivative with no F27 at all (implicit or explicit).
fn br06(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    if !source_on_derivative(rule_ctx) {
        return Ok(Vec::new());
    }
    if rule_ctx.combined_of("F27").is_empty() {
        let sources: Vec<String> = rule_ctx
            .explicit_of("F01")
            .map(|f| f.descriptor.clone())
            .collect();
        return Ok(vec![Hit::on(sources)]);
    }
    Ok(Vec::new())
}

/// BR07: F01 on a derivative with more than one F27 (implicit or explicit).
fn br07(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    if !source_on_derivative(rule_ctx) {
        return Ok(Vec::new());
    }
    let commodities = rule_ctx.combined_of("F27");
    if commodities.len() > 1 {
        let terms: Vec<String> = commodities
            .iter()
            .map(|(f, _)| f.descriptor.clone())
            .collect();
        return Ok(vec![
            Hit::on(terms).with_context(ctx!("count" => commodities.len().to_string())),
        ]);
    }
    Ok(Vec::new())
}

fn source_on_derivative(rule_ctx: &RuleCtx<'_>) -> bool {
    rule_ctx.base.term_type == TermType::Derivative && rule_ctx.has_explicit("F01")
}

// ─── Base-term suitability (BR08, BR10, BR17, BR23, BR24) ───────────────────

/// BR08: the base term must be reportable. Dismissed terms are BR21's job.
fn br08(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    if !rule_ctx.base.is_dismissed() && !rule_ctx.base.is_member(hierarchies::REPORT) {
        return Ok(vec![Hit::on([rule_ctx.base.code.clone()])]);
    }
    Ok(Vec::new())
}

/// BR10: non-specific base term.
fn br10(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    if rule_ctx.base.term_type == TermType::NonSpecific {
        return Ok(vec![Hit::on([rule_ctx.base.code.clone()])]);
    }
    Ok(Vec::new())
}

/// BR17: a facet descriptor cannot be the base term.
fn br17(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    if rule_ctx.base.term_type == TermType::Facet {
        return Ok(vec![Hit::on([rule_ctx.base.code.clone()])]);
    }
    Ok(Vec::new())
}

/// BR23: hierarchy base term inside the exposure hierarchy.
fn br23(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    if rule_ctx.base.is_hierarchy_term() && rule_ctx.base.is_member(hierarchies::EXPO) {
        return Ok(vec![Hit::on([rule_ctx.base.code.clone()])]);
    }
    Ok(Vec::new())
}

/// BR24: hierarchy base term outside the exposure hierarchy.
fn br24(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    if rule_ctx.base.is_hierarchy_term() && !rule_ctx.base.is_member(hierarchies::EXPO) {
        return Ok(vec![Hit::on([rule_ctx.base.code.clone()])]);
    }
    Ok(Vec::new())
}

// ─── Facet suitability (BR11, BR12, BR13, BR16) ─────────────────────────────

/// BR11: the generic "Processed" descriptor (or a descendant) adds nothing.
fn br11(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    let mut hits = Vec::new();
    for facet in rule_ctx.explicit_of("F28") {
        if facet.descriptor == GENERIC_PROCESSED
            || rule_ctx.resolver.is_ancestor(
                GENERIC_PROCESSED,
                &facet.descriptor,
                hierarchies::PROCESS,
            )?
        {
            hits.push(Hit::on([facet.descriptor.clone()]));
        }
    }
    Ok(hits)
}

/// BR12: F04 on raw/derivative terms records minor ingredients only.
fn br12(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    if !matches!(
        rule_ctx.base.term_type,
        TermType::Raw | TermType::Derivative
    ) {
        return Ok(Vec::new());
    }
    let offenders: Vec<String> = rule_ctx
        .explicit_of("F04")
        .map(|f| f.descriptor.clone())
        .collect();
    if offenders.is_empty() {
        Ok(Vec::new())
    } else {
        Ok(vec![Hit::on(offenders)])
    }
}

/// BR13: a physical state from the derivative-creating set on a raw term.
fn br13(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    if rule_ctx.base.term_type != TermType::Raw {
        return Ok(Vec::new());
    }
    let hits = rule_ctx
        .explicit_of("F03")
        .filter(|f| rule_ctx.catalogue.derivative_states.contains(&f.descriptor))
        .map(|f| Hit::on([f.descriptor.clone()]))
        .collect();
    Ok(hits)
}

/// BR16: an explicit facet must not be broader than an implicit facet of the
/// same group.
fn br16(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    let mut hits = Vec::new();
    for explicit in rule_ctx.explicit {
        let Some(group) = facet_group(&explicit.group) else {
            continue; // unknown group already failed the category check
        };
        for implicit in rule_ctx.implicit_of(&explicit.group) {
            let broader = rule_ctx.resolver.is_ancestor(
                &explicit.descriptor,
                &implicit.descriptor,
                group.hierarchy,
            )?;
            if broader
                && !rule_ctx.resolver.are_siblings(
                    &explicit.descriptor,
                    &implicit.descriptor,
                    group.hierarchy,
                )
            {
                hits.push(
                    Hit::on([explicit.descriptor.clone(), implicit.descriptor.clone()])
                        .with_context(ctx!("group" => &explicit.group)),
                );
            }
        }
    }
    Ok(hits)
}

// ─── Process rules (BR19, BR26–BR28) ────────────────────────────────────────

/// BR19: a process from the forbidden-process table on a raw term.
fn br19(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    if rule_ctx.base.term_type != TermType::Raw || !rule_ctx.has_explicit("F28") {
        return Ok(Vec::new());
    }
    let forbidden = rule_ctx
        .resolver
        .forbidden_processes_for(&rule_ctx.base.code)?;
    let hits = rule_ctx
        .explicit_of("F28")
        .filter(|f| forbidden.contains(&f.descriptor))
        .map(|f| {
            Hit::on([f.descriptor.clone()])
                .with_context(ctx!("base" => &rule_ctx.base.code))
        })
        .collect();
    Ok(hits)
}

/// BR26: two or more F28 facets sharing an integer ordinal, at least one
/// explicit, on a derivative.
fn br26(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    ordinal_conflicts(rule_ctx, false)
}

/// BR27: like BR26, but on the integer part of decimal ordinals.
fn br27(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    ordinal_conflicts(rule_ctx, true)
}

fn ordinal_conflicts(rule_ctx: &RuleCtx<'_>, decimal: bool) -> Result<Vec<Hit>, EngineError> {
    if rule_ctx.base.term_type != TermType::Derivative {
        return Ok(Vec::new());
    }
    // Bucket F28 facets by the integer part of their ordinal. BTreeMap keeps
    // warning order deterministic across runs.
    let mut buckets: BTreeMap<u32, Vec<(&FacetRef, bool)>> = BTreeMap::new();
    for (facet, explicit) in rule_ctx.combined_of("F28") {
        let ordinal = rule_ctx
            .resolver
            .process_ordinal(&facet.descriptor, &rule_ctx.base.code)?;
        if ordinal.is_non_exclusive() || ordinal.is_decimal() != decimal {
            continue;
        }
        buckets.entry(ordinal.integer).or_default().push((facet, explicit));
    }
    let hits = buckets
        .into_iter()
        .filter(|(_, members)| {
            members.len() >= 2 && members.iter().any(|&(_, explicit)| explicit)
        })
        .map(|(integer, members)| {
            let terms: Vec<String> = members
                .iter()
                .map(|(f, _)| f.descriptor.clone())
                .collect();
            Hit::on(terms).with_context(ctx!("ordinal" => integer.to_string()))
        })
        .collect();
    Ok(hits)
}

/// BR28: reconstitution/dilution on a concentrated or dehydrated base.
///
/// Armed either by the base-term name keywords or by an implicit F28 in the
/// catalogue's dehydration set; the facet-based trigger is authoritative
/// when the sets are populated, the name match is the fragile fallback.
fn br28(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    let name = rule_ctx.base.name.to_lowercase();
    let name_match = DEHYDRATION_KEYWORDS.iter().any(|k| name.contains(k));
    let implicit_match = rule_ctx.implicit_of("F28").any(|f| {
        rule_ctx
            .catalogue
            .dehydration_processes
            .contains(&f.descriptor)
    });
    if !name_match && !implicit_match {
        return Ok(Vec::new());
    }
    let hits = rule_ctx
        .explicit_of("F28")
        .filter(|f| {
            rule_ctx
                .catalogue
                .reconstitution_processes
                .contains(&f.descriptor)
        })
        .map(|f| Hit::on([f.descriptor.clone()]))
        .collect();
    Ok(hits)
}

// ─── Term lifecycle rules (BR20, BR21) ──────────────────────────────────────

/// BR20: deprecated base term or descriptor, one hit per term.
fn br20(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    Ok(lifecycle_offenders(rule_ctx, |t| t.deprecated))
}

/// BR21: dismissed base term or descriptor, one hit per term.
fn br21(rule_ctx: &RuleCtx<'_>) -> Result<Vec<Hit>, EngineError> {
    Ok(lifecycle_offenders(rule_ctx, Term::is_dismissed))
}

fn lifecycle_offenders(rule_ctx: &RuleCtx<'_>, offends: fn(&Term) -> bool) -> Vec<Hit> {
    let mut hits = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    if offends(rule_ctx.base) {
        seen.insert(&rule_ctx.base.code);
        hits.push(Hit::on([rule_ctx.base.code.clone()]).with_context(ctx!("role" => "base")));
    }
    for facet in rule_ctx.explicit {
        if seen.contains(facet.descriptor.as_str()) {
            continue;
        }
        if rule_ctx
            .catalogue
            .term(&facet.descriptor)
            .is_some_and(offends)
        {
            seen.insert(&facet.descriptor);
            hits.push(
                Hit::on([facet.descriptor.clone()])
                    .with_context(ctx!("role" => "facet", "group" => &facet.group)),
            );
        }
    }
    hits
}
