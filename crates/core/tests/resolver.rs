//! Hierarchy resolver tests: ancestor chains, memoization, relation
//! helpers, forbidden-process closure, ordinal lookup, and cycle handling.

mod common;

use std::sync::Arc;

use common::CATALOGUE;
use foodex2_catalogue::{Catalogue, OrdinalCode};
use foodex2_core::{EngineError, HierarchyResolver, Validator};

fn resolver() -> HierarchyResolver {
    HierarchyResolver::new(Arc::clone(&CATALOGUE))
}

// ─── Ancestor chains ────────────────────────────────────────────────────────

#[test]
fn ancestors_walk_nearest_parent_first() {
    let r = resolver();
    let chain = r.ancestors("A0F6G", "racsource").unwrap();
    assert_eq!(chain.as_slice(), ["A0F6F", "A0F6E"]);
}

#[test]
fn roots_and_non_members_have_no_ancestors() {
    let r = resolver();
    assert!(r.ancestors("A0F6E", "racsource").unwrap().is_empty());
    assert!(r.ancestors("A0F6E", "process").unwrap().is_empty());
    assert!(r.ancestors("ZZZZZ", "racsource").unwrap().is_empty());
}

#[test]
fn chains_are_memoized() {
    let r = resolver();
    let first = r.ancestors("A0F6G", "racsource").unwrap();
    let second = r.ancestors("A0F6G", "racsource").unwrap();
    assert!(
        Arc::ptr_eq(&first, &second),
        "second lookup must hit the cache"
    );
}

// ─── Relations ──────────────────────────────────────────────────────────────

#[test]
fn is_ancestor_spans_multiple_levels() {
    let r = resolver();
    assert!(r.is_ancestor("A0F6F", "A0F6G", "racsource").unwrap());
    assert!(r.is_ancestor("A0F6E", "A0F6G", "racsource").unwrap());
    assert!(!r.is_ancestor("A0F6G", "A0F6E", "racsource").unwrap());
    assert!(!r.is_ancestor("A0F6X", "A0F6G", "racsource").unwrap());
}

#[test]
fn is_ancestor_is_irreflexive_for_every_fixture_term() {
    let r = resolver();
    for term in &CATALOGUE.terms {
        for hierarchy in term.parents.keys() {
            assert!(
                !r.is_ancestor(&term.code, &term.code, hierarchy).unwrap(),
                "{} must not be its own ancestor in {hierarchy}",
                term.code
            );
        }
    }
}

#[test]
fn direct_parent_and_siblings() {
    let r = resolver();
    assert!(r.is_parent_of("A0F6F", "A0F6G", "racsource"));
    assert!(!r.is_parent_of("A0F6E", "A0F6G", "racsource"));
    // A07XT and A07XU share the parent A07XS.
    assert!(r.are_siblings("A07XT", "A07XU", "process"));
    assert!(!r.are_siblings("A07XT", "A07XT", "process"));
    assert!(!r.are_siblings("A07XS", "A07KQ", "process"), "two roots");
    assert!(!r.are_siblings("A07XS", "A07XT", "process"), "parent/child");
}

// ─── Forbidden processes and ordinals ───────────────────────────────────────

#[test]
fn forbidden_closure_includes_ancestor_rows() {
    let r = resolver();
    // Rows are rooted at A000F; A000L inherits them through `report`.
    let forbidden = r.forbidden_processes_for("A000L").unwrap();
    for process in ["A07LG", "A07KQ", "A07KX", "A07MJ", "A07MK"] {
        assert!(forbidden.contains(process), "missing {process}");
    }
}

#[test]
fn forbidden_closure_includes_the_term_itself() {
    let r = resolver();
    let forbidden = r.forbidden_processes_for("A000F").unwrap();
    assert!(forbidden.contains("A07LG"));
}

#[test]
fn unrelated_terms_have_no_forbidden_processes() {
    let r = resolver();
    assert!(r.forbidden_processes_for("A0F6X").unwrap().is_empty());
}

#[test]
fn ordinals_resolve_through_the_report_hierarchy() {
    let r = resolver();
    assert_eq!(
        r.process_ordinal("A07KQ", "A01DJ").unwrap(),
        OrdinalCode { integer: 1, decimal: 0 }
    );
    assert_eq!(
        r.process_ordinal("A07MJ", "A01DJ").unwrap(),
        OrdinalCode { integer: 1, decimal: 1 }
    );
}

#[test]
fn missing_ordinal_is_non_exclusive() {
    let r = resolver();
    assert_eq!(
        r.process_ordinal("A07XT", "A01DJ").unwrap(),
        OrdinalCode::NON_EXCLUSIVE
    );
}

// ─── Cycle handling ─────────────────────────────────────────────────────────

/// Two terms that parent each other in `report`, plus a process descriptor
/// so a validation can be driven into the ancestor walk.
fn cyclic_catalogue() -> Arc<Catalogue> {
    let json = r#"{
        "terms": [
            {
                "code": "AAAA1",
                "name": "Looping term",
                "termType": "r",
                "parents": { "report": "AAAA2", "expo": null }
            },
            {
                "code": "AAAA2",
                "name": "Looping parent",
                "termType": "g",
                "parents": { "report": "AAAA1" }
            },
            {
                "code": "A07AA",
                "name": "Some process",
                "termType": "f",
                "parents": { "process": null }
            }
        ]
    }"#;
    Arc::new(Catalogue::from_json_str(json).unwrap())
}

#[test]
fn cycle_is_a_resolver_error_not_a_hang() {
    let r = HierarchyResolver::new(cyclic_catalogue());
    let err = r.ancestors("AAAA1", "report").unwrap_err();
    assert_eq!(
        err,
        EngineError::HierarchyCycle {
            hierarchy: "report".into(),
            code: "AAAA1".into(),
        }
    );
}

#[test]
fn cycle_surfaces_as_an_engine_error_from_validate() {
    // BR19 walks the report ancestors of a raw base with an explicit F28.
    let validator = Validator::new(cyclic_catalogue());
    let err = validator.validate("AAAA1#F28.A07AA").unwrap_err();
    assert!(matches!(err, EngineError::HierarchyCycle { .. }));
}
