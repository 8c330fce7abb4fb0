//! FoodEx2 expression grammar.
//!
//! An expression is a base term code optionally refined by facet fragments:
//! `BASE(SEP GROUP.DESC)*` with `SEP ∈ {#, $}`. Convention puts `#` before
//! the first facet and `$` before the rest, but both separators are accepted
//! in any position — catalogue data itself mixes them.

/// Expression AST.
pub mod ast;
/// Canonical serialization.
pub mod emit;
/// Expression parser.
pub mod parser;

use foodex2_catalogue::FacetRef;

use ast::FacetExpression;

/// Split the expression's explicit facets into those that survive and those
/// that merely repeat an implicit facet of the base term.
///
/// Returns `(cleaned, stripped)`. Stripping is idempotent: running it on an
/// already-cleaned expression strips nothing. Relative order of the
/// survivors is preserved.
pub fn strip_implicit(
    expr: &FacetExpression,
    implicit: &[FacetRef],
) -> (FacetExpression, Vec<FacetRef>) {
    let (stripped, kept): (Vec<FacetRef>, Vec<FacetRef>) = expr
        .facets
        .iter()
        .cloned()
        .partition(|f| implicit.contains(f));
    (FacetExpression::new(expr.base.clone(), kept), stripped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_implicit_removes_only_duplicated_pairs() {
        let expr = FacetExpression::new(
            "A0B9Z",
            vec![
                FacetRef::new("F28", "A07KQ"),
                FacetRef::new("F01", "A0F6E"),
            ],
        );
        let implicit = vec![FacetRef::new("F28", "A07KQ")];
        let (clean, stripped) = strip_implicit(&expr, &implicit);
        assert_eq!(clean.facets, vec![FacetRef::new("F01", "A0F6E")]);
        assert_eq!(stripped, vec![FacetRef::new("F28", "A07KQ")]);
    }

    #[test]
    fn strip_implicit_matches_the_full_pair() {
        // Same descriptor under a different group is a different facet.
        let expr = FacetExpression::new("A0B9Z", vec![FacetRef::new("F01", "A07KQ")]);
        let implicit = vec![FacetRef::new("F28", "A07KQ")];
        let (clean, stripped) = strip_implicit(&expr, &implicit);
        assert_eq!(clean.facets.len(), 1);
        assert!(stripped.is_empty());
    }

    #[test]
    fn strip_implicit_is_idempotent() {
        let expr = FacetExpression::new("A0B9Z", vec![FacetRef::new("F28", "A07KQ")]);
        let implicit = vec![FacetRef::new("F28", "A07KQ")];
        let (clean, stripped) = strip_implicit(&expr, &implicit);
        assert_eq!(stripped.len(), 1);
        let (again, stripped_again) = strip_implicit(&clean, &implicit);
        assert!(stripped_again.is_empty());
        assert_eq!(again.facets, clean.facets);
    }
}
