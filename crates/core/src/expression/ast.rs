use serde::{Deserialize, Serialize};

use foodex2_catalogue::FacetRef;

/// A parsed FoodEx2 expression: the base term code plus the explicit facets.
///
/// Facet order is kept as written for faithful reporting, but carries no
/// meaning — set membership governs the semantics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacetExpression {
    /// Five-character base term code.
    pub base: String,
    /// Explicit facets, in source order.
    pub facets: Vec<FacetRef>,
}

impl FacetExpression {
    /// Create an expression from a base code and its explicit facets.
    pub fn new(base: impl Into<String>, facets: Vec<FacetRef>) -> Self {
        Self {
            base: base.into(),
            facets,
        }
    }

    /// The explicit facets belonging to the given group.
    pub fn facets_of(&self, group: &str) -> impl Iterator<Item = &FacetRef> {
        self.facets.iter().filter(move |f| f.group == group)
    }

    /// Whether any explicit facet belongs to the given group.
    pub fn has_group(&self, group: &str) -> bool {
        self.facets_of(group).next().is_some()
    }

    /// Canonical serialization (`#` before the first facet, `$` after).
    pub fn canonical(&self) -> String {
        super::emit::canonical_code(&self.base, &self.facets)
    }
}

impl std::fmt::Display for FacetExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical())
    }
}
