//! Forbidden-process rows and process ordinal codes.
//!
//! A process is forbidden for a term when the forbidden-process table lists
//! it under the term or any of its reporting-hierarchy ancestors. The same
//! table carries the ordinal codes that drive the mutual-exclusion rules:
//! integer ordinals mark alternatives at one categorical level, decimal
//! ordinals sharing an integer part mark processes that each create a
//! distinct derivative, and `0` is non-exclusive.

use serde::{Deserialize, Serialize};

use crate::{CatalogueError, is_term_code};

/// One row of the forbidden-process reference table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ForbiddenProcess {
    /// Code of the hierarchy group the prohibition is rooted at.
    pub root_group_code: String,
    /// Label of the root group, when the source table carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_group_label: Option<String>,
    /// The forbidden process descriptor code.
    pub process_code: String,
    /// Ordinal code of the process in this group's context.
    #[serde(default)]
    pub ordinal_code: OrdinalCode,
}

// ─── Ordinal codes ──────────────────────────────────────────────────────────

/// A process ordinal code, e.g. `1`, `1.2`, or `0`.
///
/// Stored as its integer and decimal parts; `decimal == 0` means an integer
/// ordinal (the table writes these as `1` or `1.0` interchangeably).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OrdinalCode {
    /// Integer part — the mutual-exclusion category.
    pub integer: u32,
    /// Decimal part — non-zero for derivative-creating variants.
    pub decimal: u32,
}

impl OrdinalCode {
    /// Ordinal `0` — the process combines freely with others.
    pub const NON_EXCLUSIVE: OrdinalCode = OrdinalCode {
        integer: 0,
        decimal: 0,
    };

    /// Whether this ordinal places the process in no exclusion category.
    pub fn is_non_exclusive(self) -> bool {
        self.integer == 0
    }

    /// Whether this is a decimal ordinal (`1.1`, `1.2`, …).
    pub fn is_decimal(self) -> bool {
        self.decimal != 0
    }
}

impl std::fmt::Display for OrdinalCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.decimal == 0 {
            write!(f, "{}", self.integer)
        } else {
            write!(f, "{}.{}", self.integer, self.decimal)
        }
    }
}

impl std::str::FromStr for OrdinalCode {
    type Err = OrdinalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || OrdinalParseError(s.to_string());
        let (int_part, dec_part) = match s.split_once('.') {
            Some((i, d)) => (i, Some(d)),
            None => (s, None),
        };
        let integer = int_part.parse().map_err(|_| err())?;
        let decimal = match dec_part {
            Some(d) => d.parse().map_err(|_| err())?,
            None => 0,
        };
        Ok(OrdinalCode { integer, decimal })
    }
}

/// Error returned when a string is not an `int[.frac]` ordinal code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not an ordinal code: {0:?}")]
pub struct OrdinalParseError(pub String);

// The reference table writes ordinals as bare numbers; catalogue JSON has
// been observed with both string and numeric spellings, so accept either.
impl Serialize for OrdinalCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OrdinalCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(f64),
        }
        let text = match Repr::deserialize(deserializer)? {
            Repr::Text(s) => s,
            Repr::Number(n) => n.to_string(),
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ─── CSV loader ─────────────────────────────────────────────────────────────

/// Parse the `;`-delimited forbidden-process reference table.
///
/// Expected columns: `ROOT_GROUP_CODE;ROOT_GROUP_LABEL;FORBIDDEN_PROCS;`
/// `FORBIDDEN_PROCS_LABELS;ORDINAL_CODE`. A header row and blank lines are
/// tolerated; a missing ordinal column means `0`.
pub fn parse_forbidden_csv(text: &str) -> Result<Vec<ForbiddenProcess>, CatalogueError> {
    let mut rows = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r').trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(';').map(str::trim).collect();
        if idx == 0 && fields[0].eq_ignore_ascii_case("ROOT_GROUP_CODE") {
            continue;
        }
        let row_err = |reason: String| CatalogueError::Csv {
            line: idx + 1,
            reason,
        };
        if fields.len() < 3 {
            return Err(row_err(format!(
                "expected at least 3 `;`-separated columns, found {}",
                fields.len()
            )));
        }
        let root = fields[0];
        let process = fields[2];
        if !is_term_code(root) {
            return Err(row_err(format!("bad root group code {root:?}")));
        }
        if !is_term_code(process) {
            return Err(row_err(format!("bad process code {process:?}")));
        }
        let ordinal_code = match fields.get(4).copied().filter(|s| !s.is_empty()) {
            Some(raw) => raw
                .parse()
                .map_err(|e: OrdinalParseError| row_err(e.to_string()))?,
            None => OrdinalCode::NON_EXCLUSIVE,
        };
        rows.push(ForbiddenProcess {
            root_group_code: root.to_string(),
            root_group_label: Some(fields[1].to_string()).filter(|s| !s.is_empty()),
            process_code: process.to_string(),
            ordinal_code,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Ordinal codes ───────────────────────────────────────────────────

    #[test]
    fn ordinal_parse_integer_forms() {
        assert_eq!("1".parse::<OrdinalCode>().unwrap(), OrdinalCode { integer: 1, decimal: 0 });
        assert_eq!("1.0".parse::<OrdinalCode>().unwrap(), OrdinalCode { integer: 1, decimal: 0 });
        assert_eq!("0".parse::<OrdinalCode>().unwrap(), OrdinalCode::NON_EXCLUSIVE);
    }

    #[test]
    fn ordinal_parse_decimal_forms() {
        let o: OrdinalCode = "1.2".parse().unwrap();
        assert_eq!(o, OrdinalCode { integer: 1, decimal: 2 });
        assert!(o.is_decimal());
        assert!(!o.is_non_exclusive());
    }

    #[test]
    fn ordinal_parse_rejects_garbage() {
        assert!("".parse::<OrdinalCode>().is_err());
        assert!("x".parse::<OrdinalCode>().is_err());
        assert!("1.".parse::<OrdinalCode>().is_err());
        assert!("1.2.3".parse::<OrdinalCode>().is_err());
    }

    #[test]
    fn ordinal_display() {
        assert_eq!(OrdinalCode { integer: 2, decimal: 0 }.to_string(), "2");
        assert_eq!(OrdinalCode { integer: 1, decimal: 2 }.to_string(), "1.2");
    }

    #[test]
    fn ordinal_serde_accepts_string_and_number() {
        assert_eq!(
            serde_json::from_str::<OrdinalCode>("\"1.2\"").unwrap(),
            OrdinalCode { integer: 1, decimal: 2 }
        );
        assert_eq!(
            serde_json::from_str::<OrdinalCode>("1.2").unwrap(),
            OrdinalCode { integer: 1, decimal: 2 }
        );
        assert_eq!(
            serde_json::to_string(&OrdinalCode { integer: 1, decimal: 2 }).unwrap(),
            "\"1.2\""
        );
    }

    // ── CSV loader ──────────────────────────────────────────────────────

    const SAMPLE: &str = "ROOT_GROUP_CODE;ROOT_GROUP_LABEL;FORBIDDEN_PROCS;FORBIDDEN_PROCS_LABELS;ORDINAL_CODE\n\
        A000F;Cereal grains;A07LG;Juicing;1.1\n\
        A000F;Cereal grains;A07KQ;Freezing;\n\
        \n\
        A01BS;Milk;A07KX;Drying;2\n";

    #[test]
    fn csv_parses_rows_and_skips_header() {
        let rows = parse_forbidden_csv(SAMPLE).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].root_group_code, "A000F");
        assert_eq!(rows[0].process_code, "A07LG");
        assert_eq!(rows[0].ordinal_code, OrdinalCode { integer: 1, decimal: 1 });
        assert_eq!(rows[1].ordinal_code, OrdinalCode::NON_EXCLUSIVE);
        assert_eq!(rows[2].root_group_label.as_deref(), Some("Milk"));
    }

    #[test]
    fn csv_without_header_is_accepted() {
        let rows = parse_forbidden_csv("A000F;Cereals;A07LG;Juicing;1").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ordinal_code, OrdinalCode { integer: 1, decimal: 0 });
    }

    #[test]
    fn csv_reports_offending_line() {
        let err = parse_forbidden_csv("A000F;Cereals;notacode;x;1").unwrap_err();
        match err {
            CatalogueError::Csv { line, reason } => {
                assert_eq!(line, 1);
                assert!(reason.contains("notacode"), "{reason}");
            }
            other => panic!("expected Csv error, got {other:?}"),
        }
    }

    #[test]
    fn csv_rejects_short_rows() {
        assert!(parse_forbidden_csv("A000F;Cereals").is_err());
    }
}
