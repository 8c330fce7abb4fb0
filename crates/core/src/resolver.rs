//! Memoized hierarchy queries.
//!
//! Ancestor lookup dominates validation cost: most business rules reduce to
//! "is X somewhere above Y in hierarchy H". The resolver walks the
//! catalogue's parent links once per `(code, hierarchy)` pair and caches the
//! resulting chain, so each chain is computed at most once per process
//! lifetime. A valid catalogue has no cycles; the walk carries a visited set
//! anyway and reports a revisit as [`EngineError::HierarchyCycle`] rather
//! than spinning.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use foodex2_catalogue::{Catalogue, OrdinalCode, hierarchies};

use crate::EngineError;

/// Ancestor chains keyed by `(code, hierarchy)`.
type ChainCache = HashMap<(String, String), Arc<Vec<String>>>;

/// Read-only hierarchy query layer over a shared catalogue handle.
///
/// Safe to share across request workers: the memoization table sits behind
/// an `RwLock` and cached chains are immutable `Arc`s.
#[derive(Debug)]
pub struct HierarchyResolver {
    catalogue: Arc<Catalogue>,
    cache: RwLock<ChainCache>,
}

impl HierarchyResolver {
    /// Create a resolver over the given catalogue.
    pub fn new(catalogue: Arc<Catalogue>) -> Self {
        Self {
            catalogue,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The ancestors of `code` in `hierarchy`, nearest parent first,
    /// excluding `code` itself. Unknown codes and non-members have no
    /// ancestors.
    pub fn ancestors(
        &self,
        code: &str,
        hierarchy: &str,
    ) -> Result<Arc<Vec<String>>, EngineError> {
        let key = (code.to_string(), hierarchy.to_string());
        if let Some(chain) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(chain));
        }

        let mut chain = Vec::new();
        let mut seen: HashSet<&str> = HashSet::from([code]);
        let mut current = self.catalogue.parent(code, hierarchy);
        while let Some(parent) = current {
            if !seen.insert(parent) || chain.len() > self.catalogue.term_count() {
                return Err(EngineError::HierarchyCycle {
                    hierarchy: hierarchy.to_string(),
                    code: code.to_string(),
                });
            }
            chain.push(parent.to_string());
            current = self.catalogue.parent(parent, hierarchy);
        }

        let chain = Arc::new(chain);
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&chain));
        Ok(chain)
    }

    /// Whether `ancestor` lies strictly above `descendant` in `hierarchy`.
    ///
    /// Irreflexive: `is_ancestor(x, x, …)` is `false`.
    pub fn is_ancestor(
        &self,
        ancestor: &str,
        descendant: &str,
        hierarchy: &str,
    ) -> Result<bool, EngineError> {
        if ancestor == descendant {
            return Ok(false);
        }
        Ok(self
            .ancestors(descendant, hierarchy)?
            .iter()
            .any(|c| c == ancestor))
    }

    /// Whether `code` descends from any of `candidates` in `hierarchy`.
    pub fn is_descendant_of_any<'a>(
        &self,
        code: &str,
        candidates: impl IntoIterator<Item = &'a str>,
        hierarchy: &str,
    ) -> Result<bool, EngineError> {
        let chain = self.ancestors(code, hierarchy)?;
        Ok(candidates
            .into_iter()
            .any(|cand| cand != code && chain.iter().any(|c| c == cand)))
    }

    /// Whether `parent` is the direct parent of `child` in `hierarchy`.
    pub fn is_parent_of(&self, parent: &str, child: &str, hierarchy: &str) -> bool {
        self.catalogue.parent(child, hierarchy) == Some(parent)
    }

    /// Whether `a` and `b` share a direct parent in `hierarchy`.
    ///
    /// A term is not its own sibling, and two roots are not siblings.
    pub fn are_siblings(&self, a: &str, b: &str, hierarchy: &str) -> bool {
        if a == b {
            return false;
        }
        match (
            self.catalogue.parent(a, hierarchy),
            self.catalogue.parent(b, hierarchy),
        ) {
            (Some(pa), Some(pb)) => pa == pb,
            _ => false,
        }
    }

    /// Every process forbidden for `code`: the union of the forbidden-table
    /// rows of the term itself and of its reporting-hierarchy ancestors.
    pub fn forbidden_processes_for(&self, code: &str) -> Result<HashSet<String>, EngineError> {
        let mut set: HashSet<String> = self
            .catalogue
            .forbidden_for_root(code)
            .map(|row| row.process_code.clone())
            .collect();
        for ancestor in self.ancestors(code, hierarchies::REPORT)?.iter() {
            set.extend(
                self.catalogue
                    .forbidden_for_root(ancestor)
                    .map(|row| row.process_code.clone()),
            );
        }
        Ok(set)
    }

    /// Ordinal code of `process` in the context of `context_code`: the first
    /// forbidden-table row found walking from the context term up through
    /// its reporting-hierarchy ancestors. A process with no row is
    /// non-exclusive (`0`).
    pub fn process_ordinal(
        &self,
        process: &str,
        context_code: &str,
    ) -> Result<OrdinalCode, EngineError> {
        let own = self
            .catalogue
            .forbidden_for_root(context_code)
            .find(|row| row.process_code == process);
        if let Some(row) = own {
            return Ok(row.ordinal_code);
        }
        for ancestor in self.ancestors(context_code, hierarchies::REPORT)?.iter() {
            let hit = self
                .catalogue
                .forbidden_for_root(ancestor)
                .find(|row| row.process_code == process);
            if let Some(row) = hit {
                return Ok(row.ordinal_code);
            }
        }
        Ok(OrdinalCode::NON_EXCLUSIVE)
    }
}
