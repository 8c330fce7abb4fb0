//! Canonical expression serialization.
//!
//! Output always uses `#` before the first facet and `$` before every
//! subsequent one, whatever separators the input used. This is the form the
//! cleaned code is reported in.

use foodex2_catalogue::FacetRef;

/// Serialize a base code and facet list in canonical form.
pub fn canonical_code(base: &str, facets: &[FacetRef]) -> String {
    let mut out = String::with_capacity(5 + facets.len() * 10);
    out.push_str(base);
    for (i, facet) in facets.iter().enumerate() {
        out.push(if i == 0 { '#' } else { '$' });
        out.push_str(&facet.group);
        out.push('.');
        out.push_str(&facet.descriptor);
    }
    out
}
