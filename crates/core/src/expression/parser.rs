use foodex2_catalogue::{FacetRef, is_facet_group_id, is_term_code};
use foodex2_diagnostics::{Span, Warning, codes};

use super::ast::FacetExpression;

/// Shorthand for building a `BTreeMap<String, String>` context from key-value pairs.
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        std::collections::BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

/// Result of parsing a FoodEx2 expression string.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ParseResult {
    /// The parsed expression. `None` only when the base prefix itself is
    /// unusable; a malformed facet fragment keeps the rest of the
    /// expression available for structural validation.
    pub expression: Option<FacetExpression>,
    /// Structural warnings produced during parsing.
    pub warnings: Vec<Warning>,
}

impl ParseResult {
    /// Whether parsing produced any `ERROR`-severity warning.
    pub fn has_errors(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.severity == foodex2_diagnostics::Severity::Error)
    }
}

/// Parse a FoodEx2 expression string.
///
/// Accepts `BASE(SEP GROUP.DESC)*` with either separator in any position.
/// Leading and trailing ASCII whitespace is ignored. Structural faults are
/// reported as `STRUCT_BASE` / `STRUCT_FACET` warnings with byte spans into
/// the original input; parsing continues past a bad fragment so one typo
/// does not mask the rest of the expression.
pub fn parse_str(input: &str) -> ParseResult {
    let trimmed = input.trim_ascii();
    let offset = input.len() - input.trim_ascii_start().len();
    let mut warnings = Vec::new();

    // ── Base prefix ─────────────────────────────────────────────────────
    if trimmed.len() < 5 {
        warnings.push(
            Warning::error(
                codes::STRUCT_BASE,
                format!("expression {trimmed:?} is shorter than a base term code"),
            )
            .with_span(Span::new(offset, offset + trimmed.len())),
        );
        return ParseResult {
            expression: None,
            warnings,
        };
    }
    // `get` instead of slicing: a multi-byte character straddling the
    // boundary must read as a malformed base, not a panic.
    let base = trimmed.get(..5).unwrap_or_default();
    if !is_term_code(base) {
        warnings.push(
            Warning::error(
                codes::STRUCT_BASE,
                format!("base prefix {base:?} is not five uppercase alphanumerics"),
            )
            .with_span(Span::new(offset, offset + 5)),
        );
        return ParseResult {
            expression: None,
            warnings,
        };
    }

    // ── Facet fragments ─────────────────────────────────────────────────
    // Walk the remainder by byte offset so every warning can point at the
    // offending fragment. Empty fragments (doubled separators, trailing
    // separator) are discarded.
    let mut facets = Vec::new();
    let rest = &trimmed[5..];
    let mut fragment_start = 0usize;
    for (pos, _) in rest
        .char_indices()
        .filter(|&(_, c)| c == '#' || c == '$')
        .chain(std::iter::once((rest.len(), '#')))
    {
        let fragment = &rest[fragment_start..pos];
        let span = Span::new(offset + 5 + fragment_start, offset + 5 + pos);
        fragment_start = pos + 1;
        if fragment.is_empty() {
            continue;
        }
        match parse_fragment(fragment) {
            Some(facet) => facets.push(facet),
            None => warnings.push(
                Warning::error(
                    codes::STRUCT_FACET,
                    format!("facet fragment {fragment:?} is not of the form Fnn.CODE5"),
                )
                .with_span(span)
                .with_context(ctx!("fragment" => fragment)),
            ),
        }
    }

    ParseResult {
        expression: Some(FacetExpression::new(base, facets)),
        warnings,
    }
}

/// Parse one `GROUP.DESC` fragment, requiring exactly one dot.
fn parse_fragment(fragment: &str) -> Option<FacetRef> {
    let (group, descriptor) = fragment.split_once('.')?;
    if descriptor.contains('.') || !is_facet_group_id(group) || !is_term_code(descriptor) {
        return None;
    }
    Some(FacetRef::new(group, descriptor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodex2_diagnostics::Severity;

    fn parse_ok(input: &str) -> FacetExpression {
        let r = parse_str(input);
        assert!(r.warnings.is_empty(), "unexpected warnings: {:?}", r.warnings);
        r.expression.expect("expression")
    }

    #[test]
    fn bare_base_parses() {
        let e = parse_ok("A0B9Z");
        assert_eq!(e.base, "A0B9Z");
        assert!(e.facets.is_empty());
    }

    #[test]
    fn conventional_separators_parse() {
        let e = parse_ok("A0B9Z#F28.A07JS$F01.A0F6E");
        assert_eq!(e.base, "A0B9Z");
        assert_eq!(
            e.facets,
            vec![FacetRef::new("F28", "A07JS"), FacetRef::new("F01", "A0F6E")]
        );
    }

    #[test]
    fn either_separator_in_any_position() {
        let hash_only = parse_ok("A0B9Z#F28.A07JS#F01.A0F6E");
        let dollar_first = parse_ok("A0B9Z$F28.A07JS$F01.A0F6E");
        assert_eq!(hash_only.facets, dollar_first.facets);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let e = parse_ok("  A0B9Z#F28.A07JS\n");
        assert_eq!(e.canonical(), "A0B9Z#F28.A07JS");
    }

    #[test]
    fn empty_fragments_are_discarded() {
        let e = parse_ok("A0B9Z##F28.A07JS$");
        assert_eq!(e.facets, vec![FacetRef::new("F28", "A07JS")]);
    }

    #[test]
    fn short_input_is_a_base_error() {
        let r = parse_str("A0B");
        assert!(r.expression.is_none());
        assert_eq!(r.warnings.len(), 1);
        assert_eq!(r.warnings[0].id, codes::STRUCT_BASE);
        assert_eq!(r.warnings[0].severity, Severity::Error);
    }

    #[test]
    fn lowercase_base_is_a_base_error() {
        let r = parse_str("a0b9z#F28.A07JS");
        assert!(r.expression.is_none());
        assert_eq!(r.warnings[0].id, codes::STRUCT_BASE);
        assert_eq!(r.warnings[0].span, Some(Span::new(0, 5)));
    }

    #[test]
    fn bad_fragment_is_reported_and_skipped() {
        let r = parse_str("A0B9Z#F28A07JS$F01.A0F6E");
        let e = r.expression.expect("rest of the expression survives");
        assert_eq!(e.facets, vec![FacetRef::new("F01", "A0F6E")]);
        assert_eq!(r.warnings.len(), 1);
        let w = &r.warnings[0];
        assert_eq!(w.id, codes::STRUCT_FACET);
        // Span covers the offending fragment, right after "A0B9Z#".
        assert_eq!(w.span, Some(Span::new(6, 14)));
        assert_eq!(
            w.context.as_ref().unwrap().get("fragment").unwrap(),
            "F28A07JS"
        );
    }

    #[test]
    fn two_dots_in_a_fragment_are_rejected() {
        let r = parse_str("A0B9Z#F28.A07.S");
        assert!(r.warnings.iter().any(|w| w.id == codes::STRUCT_FACET));
    }

    #[test]
    fn bad_group_id_is_rejected() {
        for bad in ["A0B9Z#G28.A07JS", "A0B9Z#F2.A07JS", "A0B9Z#F281.A07JS"] {
            let r = parse_str(bad);
            assert!(
                r.warnings.iter().any(|w| w.id == codes::STRUCT_FACET),
                "{bad} should fail the fragment check"
            );
        }
    }

    #[test]
    fn parse_serialize_roundtrip() {
        for code in [
            "A0B9Z",
            "A0B9Z#F28.A07JS",
            "A0B9Z#F28.A07JS$F01.A0F6E$F02.A06JH",
        ] {
            let e = parse_ok(code);
            assert_eq!(e.canonical(), code);
            let reparsed = parse_ok(&e.canonical());
            assert_eq!(reparsed, e);
        }
    }
}
