//! Structural checks: every code resolves, every facet sits in the right
//! hierarchy, cardinality and duplication constraints hold.
//!
//! Runs on the expression as written (before implicit stripping), so a
//! facet that will later be stripped still counts toward cardinality and
//! duplication — the warning tells the user what their input looks like,
//! not what the cleaned code will.

use std::collections::HashSet;

use foodex2_catalogue::{Catalogue, FacetRef, facet_group};
use foodex2_diagnostics::{Warning, codes};

use crate::expression::ast::FacetExpression;

pub(super) fn check(
    expression: &FacetExpression,
    catalogue: &Catalogue,
    warnings: &mut Vec<Warning>,
) {
    check_base_exists(expression, catalogue, warnings);
    check_descriptors(expression, catalogue, warnings);
    check_cardinality(expression, catalogue, warnings);
    check_duplicates(expression, warnings);
}

fn check_base_exists(
    expression: &FacetExpression,
    catalogue: &Catalogue,
    warnings: &mut Vec<Warning>,
) {
    if catalogue.term(&expression.base).is_none() {
        warnings.push(
            Warning::error(
                codes::BASE_NOT_FOUND,
                format!("base term {} not found in the catalogue", expression.base),
            )
            .with_terms([expression.base.clone()]),
        );
    }
}

/// Descriptor existence and facet-category membership, one pass per facet.
fn check_descriptors(
    expression: &FacetExpression,
    catalogue: &Catalogue,
    warnings: &mut Vec<Warning>,
) {
    for facet in &expression.facets {
        let Some(term) = catalogue.term(&facet.descriptor) else {
            warnings.push(
                Warning::error(
                    codes::DESCRIPTOR_NOT_FOUND,
                    format!("facet descriptor {} not found in the catalogue", facet),
                )
                .with_terms([facet.descriptor.clone()])
                .with_context(ctx!("group" => &facet.group)),
            );
            continue;
        };
        let Some(group) = facet_group(&facet.group) else {
            warnings.push(
                Warning::error(
                    codes::FACET_CATEGORY,
                    format!("facet group {} has no hierarchy attached", facet.group),
                )
                .with_terms([facet.descriptor.clone()])
                .with_context(ctx!("group" => &facet.group)),
            );
            continue;
        };
        if !term.is_member(group.hierarchy) {
            warnings.push(
                Warning::error(
                    codes::FACET_CATEGORY,
                    format!(
                        "descriptor {} is not a member of the {} hierarchy required by {}",
                        facet.descriptor, group.hierarchy, facet.group
                    ),
                )
                .with_terms([facet.descriptor.clone()])
                .with_context(ctx!(
                    "group" => &facet.group,
                    "hierarchy" => group.hierarchy,
                )),
            );
        }
    }
}

/// At most one facet per single-cardinality group; one warning per group.
fn check_cardinality(
    expression: &FacetExpression,
    catalogue: &Catalogue,
    warnings: &mut Vec<Warning>,
) {
    let mut flagged: HashSet<&str> = HashSet::new();
    for facet in &expression.facets {
        if flagged.contains(facet.group.as_str()) {
            continue;
        }
        let single = facet_group(&facet.group).is_some_and(|g| g.single_cardinality);
        if !single {
            continue;
        }
        let members: Vec<&FacetRef> = expression.facets_of(&facet.group).collect();
        if members.len() > 1 {
            flagged.insert(&facet.group);
            warnings.push(
                Warning::new(
                    codes::SINGLE_CARDINALITY,
                    catalogue.rule_severity(codes::SINGLE_CARDINALITY),
                    format!(
                        "facet group {} admits a single facet; found {}",
                        facet.group,
                        members.len()
                    ),
                )
                .with_terms(members.iter().map(|f| f.descriptor.clone()))
                .with_context(ctx!(
                    "group" => &facet.group,
                    "count" => members.len().to_string(),
                )),
            );
        }
    }
}

/// No two explicit facets may be equal; one warning per duplicated pair.
///
/// Detection is order-insensitive: any permutation of the same facet list
/// produces the same warnings.
fn check_duplicates(expression: &FacetExpression, warnings: &mut Vec<Warning>) {
    let mut seen: HashSet<&FacetRef> = HashSet::new();
    let mut reported: HashSet<&FacetRef> = HashSet::new();
    for facet in &expression.facets {
        if !seen.insert(facet) && reported.insert(facet) {
            warnings.push(
                Warning::high(
                    codes::DUPLICATE_FACET,
                    format!("facet {} appears more than once", facet),
                )
                .with_terms([facet.descriptor.clone()])
                .with_context(ctx!("group" => &facet.group)),
            );
        }
    }
}
