//! FoodEx2 catalogue reference data.
//!
//! Defines the term model, the facet-group reference table, and the
//! [`Catalogue`] store — read-only access to the ~31 000 terms, their
//! per-hierarchy parents, the forbidden-process table, and the business-rule
//! definitions. The catalogue is deserialized once at startup and never
//! mutated afterwards; lookup indexes are built lazily and cached.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

use foodex2_diagnostics::Severity;

/// Forbidden-process rows, ordinal codes, and the `;`-delimited CSV loader.
pub mod process;
/// Business-rule definitions and the embedded default rule table.
pub mod rules;

pub use process::{ForbiddenProcess, OrdinalCode, parse_forbidden_csv};
pub use rules::RuleDefinition;

// ─── Well-known hierarchy codes ─────────────────────────────────────────────

/// Hierarchy codes the business rules refer to by name.
pub mod hierarchies {
    /// The reporting hierarchy — membership allows official data submission.
    pub const REPORT: &str = "report";
    /// The exposure hierarchy — membership signals suitability for
    /// consumption/exposure data.
    pub const EXPO: &str = "expo";
    /// The source-commodities hierarchy backing the F27 facet.
    pub const RACSOURCE: &str = "racsource";
    /// The process hierarchy backing the F28 facet.
    pub const PROCESS: &str = "process";
}

// ─── Term typology ──────────────────────────────────────────────────────────

/// Term type — the catalogue's closed typology, stored as one-letter codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TermType {
    /// Raw commodity.
    #[serde(rename = "r")]
    Raw,
    /// Derivative of a raw commodity.
    #[serde(rename = "d")]
    Derivative,
    /// Aggregated composite food.
    #[serde(rename = "c")]
    Composite,
    /// Simple composite food.
    #[serde(rename = "s")]
    SimpleComposite,
    /// Facet descriptor — refines other foods, never stands alone.
    #[serde(rename = "f")]
    Facet,
    /// Grouping term.
    #[serde(rename = "g")]
    Group,
    /// Hierarchy-only term.
    #[serde(rename = "h")]
    Hierarchy,
    /// Non-specific catch-all term.
    #[serde(rename = "n")]
    NonSpecific,
}

impl TermType {
    /// Whether this is one of the two composite types (`c` or `s`).
    pub fn is_composite(self) -> bool {
        matches!(self, TermType::Composite | TermType::SimpleComposite)
    }
}

impl std::fmt::Display for TermType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = match self {
            TermType::Raw => 'r',
            TermType::Derivative => 'd',
            TermType::Composite => 'c',
            TermType::SimpleComposite => 's',
            TermType::Facet => 'f',
            TermType::Group => 'g',
            TermType::Hierarchy => 'h',
            TermType::NonSpecific => 'n',
        };
        write!(f, "{c}")
    }
}

/// Publication status of a term.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TermStatus {
    /// Approved for use.
    #[default]
    Approved,
    /// Removed from the catalogue; kept only so old data stays resolvable.
    Dismissed,
}

// ─── FacetRef ───────────────────────────────────────────────────────────────

/// A facet reference: a group id (`F01`…`F34`) paired with a five-character
/// descriptor code. Equality is on the full pair — the same descriptor under
/// two groups is two distinct facets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FacetRef {
    /// Facet group id, e.g. `"F28"`.
    pub group: String,
    /// Descriptor term code, e.g. `"A07KQ"`.
    pub descriptor: String,
}

impl FacetRef {
    /// Create a facet reference from a group id and descriptor code.
    pub fn new(group: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            descriptor: descriptor.into(),
        }
    }
}

impl std::fmt::Display for FacetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.group, self.descriptor)
    }
}

impl std::str::FromStr for FacetRef {
    type Err = FacetRefParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((group, descriptor)) = s.split_once('.') else {
            return Err(FacetRefParseError(s.to_string()));
        };
        if !is_facet_group_id(group) || !is_term_code(descriptor) {
            return Err(FacetRefParseError(s.to_string()));
        }
        Ok(FacetRef::new(group, descriptor))
    }
}

/// Error returned when a string is not a `Fnn.CODE5` facet reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a facet reference: {0:?}")]
pub struct FacetRefParseError(pub String);

/// Whether `s` is a well-formed five-character term code (`[A-Z0-9]{5}`).
pub fn is_term_code(s: &str) -> bool {
    s.len() == 5 && s.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Whether `s` is a syntactically valid facet group id (`F` + two digits).
///
/// Syntactic only — reserved ids like `F05` pass here and are rejected by the
/// category check against [`facet_group`].
pub fn is_facet_group_id(s: &str) -> bool {
    s.len() == 3 && s.as_bytes()[0] == b'F' && s[1..].bytes().all(|b| b.is_ascii_digit())
}

/// Parse an implicit-facets string into facet references.
///
/// The catalogue encodes inherited facets as `$`- and/or `#`-joined
/// fragments; observed data mixes both separators, so both are accepted in
/// any position. Malformed fragments are skipped — the catalogue is
/// validated upstream and a partial read beats refusing the whole term.
pub fn parse_facet_list(raw: &str) -> Vec<FacetRef> {
    raw.split(['$', '#'])
        .filter(|fragment| !fragment.is_empty())
        .filter_map(|fragment| fragment.parse().ok())
        .collect()
}

// ─── Facet group reference table ────────────────────────────────────────────

/// A facet group and the hierarchy its descriptors are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetGroup {
    /// Group id, e.g. `"F28"`.
    pub id: &'static str,
    /// Code of the hierarchy this group's descriptors belong to.
    pub hierarchy: &'static str,
    /// Human label used in interpreted descriptions.
    pub label: &'static str,
    /// Whether at most one facet of this group may appear in an expression.
    pub single_cardinality: bool,
}

/// The authoritative facet-group → hierarchy mapping.
///
/// Gaps in the numbering (F05, F13–F16) are reserved ids with no hierarchy
/// attached; an expression using them fails the category check.
pub const FACET_GROUPS: &[FacetGroup] = &[
    FacetGroup { id: "F01", hierarchy: "source", label: "Source", single_cardinality: true },
    FacetGroup { id: "F02", hierarchy: "part", label: "Part-nature", single_cardinality: true },
    FacetGroup { id: "F03", hierarchy: "state", label: "Physical state", single_cardinality: true },
    FacetGroup { id: "F04", hierarchy: "ingred", label: "Ingredient", single_cardinality: false },
    FacetGroup { id: "F06", hierarchy: "medium", label: "Surrounding medium", single_cardinality: false },
    FacetGroup { id: "F07", hierarchy: "fat", label: "Fat content", single_cardinality: true },
    FacetGroup { id: "F08", hierarchy: "sweet", label: "Sweetening agent", single_cardinality: false },
    FacetGroup { id: "F09", hierarchy: "fort", label: "Fortification agent", single_cardinality: false },
    FacetGroup { id: "F10", hierarchy: "qual", label: "Qualitative information", single_cardinality: false },
    FacetGroup { id: "F11", hierarchy: "alcohol", label: "Alcohol content", single_cardinality: true },
    FacetGroup { id: "F12", hierarchy: "dough", label: "Dough mass", single_cardinality: false },
    FacetGroup { id: "F17", hierarchy: "cookext", label: "Extent of cooking", single_cardinality: false },
    FacetGroup { id: "F18", hierarchy: "packformat", label: "Packaging format", single_cardinality: false },
    FacetGroup { id: "F19", hierarchy: "packmat", label: "Packaging material", single_cardinality: false },
    FacetGroup { id: "F20", hierarchy: "partcon", label: "Part consumed or analysed", single_cardinality: false },
    FacetGroup { id: "F21", hierarchy: "prod", label: "Production method", single_cardinality: false },
    FacetGroup { id: "F22", hierarchy: "place", label: "Place of consumption", single_cardinality: true },
    FacetGroup { id: "F23", hierarchy: "targcon", label: "Target consumer", single_cardinality: false },
    FacetGroup { id: "F24", hierarchy: "use", label: "Intended use", single_cardinality: true },
    FacetGroup { id: "F25", hierarchy: "riskingred", label: "Risk ingredient", single_cardinality: false },
    FacetGroup { id: "F26", hierarchy: "gen", label: "Generic term", single_cardinality: true },
    FacetGroup { id: "F27", hierarchy: "racsource", label: "Source commodities", single_cardinality: false },
    FacetGroup { id: "F28", hierarchy: "process", label: "Process", single_cardinality: false },
    FacetGroup { id: "F29", hierarchy: "fpurpose", label: "Final preparation purpose", single_cardinality: false },
    FacetGroup { id: "F30", hierarchy: "replev", label: "Reporting level", single_cardinality: true },
    FacetGroup { id: "F31", hierarchy: "animage", label: "Animal age", single_cardinality: false },
    FacetGroup { id: "F32", hierarchy: "gender", label: "Gender", single_cardinality: true },
    FacetGroup { id: "F33", hierarchy: "legis", label: "Legislative class", single_cardinality: false },
    FacetGroup { id: "F34", hierarchy: "hostsampled", label: "Host sampled", single_cardinality: true },
];

/// Look up a facet group by id. The table has 29 entries; a linear scan
/// beats a map here.
pub fn facet_group(id: &str) -> Option<&'static FacetGroup> {
    FACET_GROUPS.iter().find(|g| g.id == id)
}

// ─── Term ───────────────────────────────────────────────────────────────────

/// A catalogue term.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    /// Five-character uppercase alphanumeric code.
    pub code: String,
    /// Extended name.
    pub name: String,
    /// Short name, when distinct from the extended one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    /// Free-text scope note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_note: Option<String>,
    /// Term typology.
    pub term_type: TermType,
    /// Detail level; `"H"` marks hierarchy terms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_level: Option<String>,
    /// Publication status.
    #[serde(default)]
    pub status: TermStatus,
    /// Whether the term is deprecated.
    #[serde(default)]
    pub deprecated: bool,
    /// Inherited facets, encoded as `$`/`#`-joined `Fnn.CODE5` fragments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implicit_facets: Option<String>,
    /// Direct parent per hierarchy. Key presence means membership; a `None`
    /// value marks a hierarchy root.
    #[serde(default)]
    pub parents: HashMap<String, Option<String>>,
}

impl Term {
    /// Whether the detail level marks this as a hierarchy term.
    pub fn is_hierarchy_term(&self) -> bool {
        self.detail_level.as_deref() == Some("H")
    }

    /// Whether the term was dismissed from the catalogue.
    pub fn is_dismissed(&self) -> bool {
        self.status == TermStatus::Dismissed
    }

    /// Whether the term belongs to the given hierarchy.
    pub fn is_member(&self, hierarchy: &str) -> bool {
        self.parents.contains_key(hierarchy)
    }

    /// Direct parent code in the given hierarchy, if the term is a non-root
    /// member.
    pub fn parent(&self, hierarchy: &str) -> Option<&str> {
        self.parents.get(hierarchy)?.as_deref()
    }

    /// Parse the inherited facets of this term.
    pub fn implicit_facet_refs(&self) -> Vec<FacetRef> {
        self.implicit_facets
            .as_deref()
            .map(parse_facet_list)
            .unwrap_or_default()
    }
}

// ─── Catalogue store ────────────────────────────────────────────────────────

/// The complete reference-data set: terms, hierarchy links, forbidden
/// processes, rule definitions, and the catalogue-driven rule sets.
///
/// Deserialized from JSON once at startup. Lookup indexes are `OnceLock`
/// caches built on first access, so a deserialized catalogue is immediately
/// shareable across threads.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalogue {
    /// Catalogue release identifier (e.g., `"MTX 15.3"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalogue_version: Option<String>,
    /// All terms.
    pub terms: Vec<Term>,
    /// Forbidden-process rows (may also be merged from the CSV table).
    #[serde(default)]
    pub forbidden_processes: Vec<ForbiddenProcess>,
    /// Rule definitions overriding the embedded defaults.
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
    /// Physical-state descriptors that turn a raw commodity into a
    /// derivative (arms BR13).
    #[serde(default)]
    pub derivative_states: HashSet<String>,
    /// Process descriptors indicating dehydration/concentration (arms BR28).
    #[serde(default)]
    pub dehydration_processes: HashSet<String>,
    /// Process descriptors indicating reconstitution or dilution (the BR28
    /// violation set).
    #[serde(default)]
    pub reconstitution_processes: HashSet<String>,

    /// Cached code → index map into `terms` (lazily initialized).
    #[serde(skip)]
    term_index: OnceLock<HashMap<String, usize>>,
    /// Cached root-group code → row indexes into `forbidden_processes`.
    #[serde(skip)]
    forbidden_index: OnceLock<HashMap<String, Vec<usize>>>,
    /// Cached rule id → index map into `rules`.
    #[serde(skip)]
    rule_index: OnceLock<HashMap<String, usize>>,
}

impl Catalogue {
    /// Deserialize a catalogue from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogueError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and deserialize a catalogue from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, CatalogueError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogueError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Merge extra forbidden-process rows (e.g., from the CSV reference
    /// table). Consumes `self` so the merge happens before any lookup index
    /// is built.
    pub fn with_forbidden_processes(mut self, rows: Vec<ForbiddenProcess>) -> Self {
        self.forbidden_processes.extend(rows);
        self.forbidden_index = OnceLock::new();
        self
    }

    /// Number of terms in the catalogue. Also the traversal bound for
    /// hierarchy walks: no valid parent chain is longer than this.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    fn term_index(&self) -> &HashMap<String, usize> {
        self.term_index.get_or_init(|| {
            self.terms
                .iter()
                .enumerate()
                .map(|(i, t)| (t.code.clone(), i))
                .collect()
        })
    }

    /// Exact code lookup. A missing term is a plain `None`; the caller
    /// decides whether absence is a failure.
    pub fn term(&self, code: &str) -> Option<&Term> {
        self.term_index().get(code).map(|&i| &self.terms[i])
    }

    /// Direct parent of `code` in `hierarchy`, if any.
    pub fn parent(&self, code: &str, hierarchy: &str) -> Option<&str> {
        self.term(code)?.parent(hierarchy)
    }

    /// Whether `code` resolves to a member of `hierarchy`.
    pub fn is_member(&self, code: &str, hierarchy: &str) -> bool {
        self.term(code).is_some_and(|t| t.is_member(hierarchy))
    }

    /// Implicit facets of `code`; empty for unknown terms.
    pub fn implicit_facets(&self, code: &str) -> Vec<FacetRef> {
        self.term(code)
            .map(Term::implicit_facet_refs)
            .unwrap_or_default()
    }

    fn forbidden_index(&self) -> &HashMap<String, Vec<usize>> {
        self.forbidden_index.get_or_init(|| {
            let mut m: HashMap<String, Vec<usize>> = HashMap::new();
            for (i, row) in self.forbidden_processes.iter().enumerate() {
                m.entry(row.root_group_code.clone()).or_default().push(i);
            }
            m
        })
    }

    /// Forbidden-process rows whose root group is exactly `root_code`.
    ///
    /// Transitive coverage (a process forbidden for an ancestor is forbidden
    /// for the term) is the hierarchy resolver's job; this is the flat row
    /// lookup it builds on.
    pub fn forbidden_for_root(&self, root_code: &str) -> impl Iterator<Item = &ForbiddenProcess> {
        self.forbidden_index()
            .get(root_code)
            .into_iter()
            .flatten()
            .map(|&i| &self.forbidden_processes[i])
    }

    fn rule_index(&self) -> &HashMap<String, usize> {
        self.rule_index.get_or_init(|| {
            self.rules
                .iter()
                .enumerate()
                .map(|(i, r)| (r.id.clone(), i))
                .collect()
        })
    }

    /// Rule definition for `id` — the catalogue's own entry when present,
    /// otherwise the embedded default. `None` only for unknown ids.
    pub fn rule(&self, id: &str) -> Option<RuleDefinition> {
        self.rule_index()
            .get(id)
            .map(|&i| self.rules[i].clone())
            .or_else(|| rules::default_rule(id))
    }

    /// Severity a warning with this rule id carries, defaulting to `HIGH`
    /// for unknown ids so nothing slips through silently.
    pub fn rule_severity(&self, id: &str) -> Severity {
        self.rule(id).map_or(Severity::High, |r| r.severity)
    }
}

/// Failure to load the catalogue or one of its reference tables.
///
/// These are fatal at startup — distinct from the per-expression warnings
/// the validation engine reports.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    /// Reading a reference file from disk failed.
    #[error("failed to read {path}")]
    Io {
        /// Path of the unreadable file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The catalogue JSON did not deserialize.
    #[error("malformed catalogue JSON")]
    Json(#[from] serde_json::Error),
    /// A row of the forbidden-process CSV table did not parse.
    #[error("forbidden-process table, line {line}: {reason}")]
    Csv {
        /// 1-based line number of the offending row.
        line: usize,
        /// What was wrong with the row.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(code: &str, term_type: TermType) -> Term {
        Term {
            code: code.into(),
            name: format!("{code} name"),
            short_name: None,
            scope_note: None,
            term_type,
            detail_level: Some("M".into()),
            status: TermStatus::Approved,
            deprecated: false,
            implicit_facets: None,
            parents: HashMap::new(),
        }
    }

    fn catalogue(terms: Vec<Term>) -> Catalogue {
        let json = serde_json::json!({ "terms": terms }).to_string();
        Catalogue::from_json_str(&json).unwrap()
    }

    // ── Codes and facet refs ────────────────────────────────────────────

    #[test]
    fn term_code_shape() {
        assert!(is_term_code("A0B9Z"));
        assert!(is_term_code("00000"));
        assert!(!is_term_code("A0B9"));
        assert!(!is_term_code("A0B9ZX"));
        assert!(!is_term_code("a0b9z"));
        assert!(!is_term_code("A0B-Z"));
    }

    #[test]
    fn facet_group_id_shape() {
        assert!(is_facet_group_id("F01"));
        assert!(is_facet_group_id("F99"));
        assert!(!is_facet_group_id("F1"));
        assert!(!is_facet_group_id("G01"));
        assert!(!is_facet_group_id("F0A"));
    }

    #[test]
    fn facet_ref_parse_and_display() {
        let fr: FacetRef = "F28.A07KQ".parse().unwrap();
        assert_eq!(fr, FacetRef::new("F28", "A07KQ"));
        assert_eq!(fr.to_string(), "F28.A07KQ");
    }

    #[test]
    fn facet_ref_rejects_malformed() {
        assert!("F28A07KQ".parse::<FacetRef>().is_err());
        assert!("F28.A07K".parse::<FacetRef>().is_err());
        assert!("X28.A07KQ".parse::<FacetRef>().is_err());
    }

    #[test]
    fn facet_ref_equality_is_on_the_pair() {
        // The same descriptor under two groups is two distinct facets.
        assert_ne!(FacetRef::new("F01", "A07KQ"), FacetRef::new("F27", "A07KQ"));
    }

    #[test]
    fn parse_facet_list_accepts_both_separators() {
        let mixed = parse_facet_list("F27.A0F6E$F28.A07KQ#F28.A07KS");
        assert_eq!(
            mixed,
            vec![
                FacetRef::new("F27", "A0F6E"),
                FacetRef::new("F28", "A07KQ"),
                FacetRef::new("F28", "A07KS"),
            ]
        );
    }

    #[test]
    fn parse_facet_list_skips_empty_and_malformed_fragments() {
        assert_eq!(
            parse_facet_list("$F27.A0F6E$$garbage#"),
            vec![FacetRef::new("F27", "A0F6E")]
        );
        assert!(parse_facet_list("").is_empty());
    }

    // ── Facet group table ───────────────────────────────────────────────

    #[test]
    fn facet_group_mapping_matches_reference() {
        assert_eq!(facet_group("F01").unwrap().hierarchy, "source");
        assert_eq!(facet_group("F27").unwrap().hierarchy, "racsource");
        assert_eq!(facet_group("F28").unwrap().hierarchy, "process");
        assert_eq!(facet_group("F34").unwrap().hierarchy, "hostsampled");
    }

    #[test]
    fn reserved_group_ids_are_absent() {
        for reserved in ["F05", "F13", "F14", "F15", "F16"] {
            assert!(facet_group(reserved).is_none(), "{reserved} is reserved");
        }
    }

    #[test]
    fn single_cardinality_set_matches_reference() {
        let single: Vec<&str> = FACET_GROUPS
            .iter()
            .filter(|g| g.single_cardinality)
            .map(|g| g.id)
            .collect();
        assert_eq!(
            single,
            ["F01", "F02", "F03", "F07", "F11", "F22", "F24", "F26", "F30", "F32", "F34"]
        );
    }

    // ── Term model ──────────────────────────────────────────────────────

    #[test]
    fn term_type_letters_roundtrip() {
        for (tt, letter) in [
            (TermType::Raw, "\"r\""),
            (TermType::Derivative, "\"d\""),
            (TermType::Composite, "\"c\""),
            (TermType::SimpleComposite, "\"s\""),
            (TermType::Facet, "\"f\""),
            (TermType::Group, "\"g\""),
            (TermType::Hierarchy, "\"h\""),
            (TermType::NonSpecific, "\"n\""),
        ] {
            assert_eq!(serde_json::to_string(&tt).unwrap(), letter);
            assert_eq!(serde_json::from_str::<TermType>(letter).unwrap(), tt);
        }
    }

    #[test]
    fn hierarchy_term_detection() {
        let mut t = term("A0BX1", TermType::Hierarchy);
        t.detail_level = Some("H".into());
        assert!(t.is_hierarchy_term());
        t.detail_level = Some("M".into());
        assert!(!t.is_hierarchy_term());
    }

    #[test]
    fn membership_and_parent() {
        let mut t = term("A000L", TermType::Raw);
        t.parents.insert("report".into(), Some("A000F".into()));
        t.parents.insert("expo".into(), None);
        assert!(t.is_member("report"));
        assert_eq!(t.parent("report"), Some("A000F"));
        assert!(t.is_member("expo"));
        assert_eq!(t.parent("expo"), None, "roots have no parent");
        assert!(!t.is_member("process"));
    }

    // ── Catalogue store ─────────────────────────────────────────────────

    #[test]
    fn term_lookup_hits_and_misses() {
        let cat = catalogue(vec![term("A000J", TermType::Composite)]);
        assert_eq!(cat.term("A000J").unwrap().code, "A000J");
        assert!(cat.term("ZZZZZ").is_none());
    }

    #[test]
    fn implicit_facets_of_unknown_term_are_empty() {
        let cat = catalogue(vec![]);
        assert!(cat.implicit_facets("A000J").is_empty());
    }

    #[test]
    fn forbidden_rows_grouped_by_root() {
        let mut cat = catalogue(vec![]);
        cat.forbidden_processes = vec![
            ForbiddenProcess {
                root_group_code: "A000F".into(),
                root_group_label: None,
                process_code: "A07LG".into(),
                ordinal_code: "1.1".parse().unwrap(),
            },
            ForbiddenProcess {
                root_group_code: "A000F".into(),
                root_group_label: None,
                process_code: "A07KQ".into(),
                ordinal_code: OrdinalCode::NON_EXCLUSIVE,
            },
        ];
        let procs: Vec<&str> = cat
            .forbidden_for_root("A000F")
            .map(|r| r.process_code.as_str())
            .collect();
        assert_eq!(procs, ["A07LG", "A07KQ"]);
        assert_eq!(cat.forbidden_for_root("XXXXX").count(), 0);
    }

    #[test]
    fn rule_lookup_prefers_catalogue_then_defaults() {
        let mut cat = catalogue(vec![]);
        cat.rules = vec![RuleDefinition {
            id: "BR19".into(),
            severity: Severity::Low,
            message: "custom text".into(),
        }];
        let custom = cat.rule("BR19").unwrap();
        assert_eq!(custom.severity, Severity::Low);
        assert_eq!(custom.message, "custom text");

        let fallback = cat.rule("BR03").unwrap();
        assert_eq!(fallback.severity, Severity::High);
        assert!(cat.rule("BR99").is_none());
    }

    #[test]
    fn catalogue_json_roundtrip() {
        let json = r#"{
            "catalogueVersion": "MTX 15.3",
            "terms": [{
                "code": "A000J",
                "name": "Mixed fruit jam",
                "termType": "c",
                "detailLevel": "M",
                "implicitFacets": "F28.A07KQ",
                "parents": {"report": "A000F"}
            }],
            "derivativeStates": ["A0BZS"]
        }"#;
        let cat = Catalogue::from_json_str(json).unwrap();
        assert_eq!(cat.catalogue_version.as_deref(), Some("MTX 15.3"));
        let t = cat.term("A000J").unwrap();
        assert_eq!(t.term_type, TermType::Composite);
        assert_eq!(t.implicit_facet_refs(), vec![FacetRef::new("F28", "A07KQ")]);
        assert!(cat.derivative_states.contains("A0BZS"));
    }
}
