//! Shared test helpers for `foodex2_core` integration tests.

#![allow(unreachable_pub)]

use std::sync::{Arc, LazyLock};

use foodex2_catalogue::{Catalogue, parse_forbidden_csv};
use foodex2_core::{ValidationOutcome, Validator, ValidatorConfig, Warning};

/// Fixture catalogue loaded once per test binary via `LazyLock`.
///
/// A small but complete corpus: a grain subtree in the reporting hierarchy,
/// a bovine subtree in `racsource`/`source`, process/state/ingredient
/// descriptors, and a forbidden-process table merged from the CSV fixture
/// so the CSV path is exercised end to end.
pub static CATALOGUE: LazyLock<Arc<Catalogue>> = LazyLock::new(|| {
    let catalogue = Catalogue::from_json_str(include_str!("../fixtures/catalogue.json"))
        .expect("fixture catalogue parses");
    let forbidden = parse_forbidden_csv(include_str!("../fixtures/forbidden.csv"))
        .expect("fixture forbidden table parses");
    Arc::new(catalogue.with_forbidden_processes(forbidden))
});

/// A validator over the fixture catalogue with the default policy.
#[allow(dead_code)]
pub fn validator() -> Validator {
    Validator::new(Arc::clone(&CATALOGUE))
}

/// A validator with HIGH warnings downgraded to non-blocking.
#[allow(dead_code)]
pub fn permissive_validator() -> Validator {
    Validator::with_config(
        Arc::clone(&CATALOGUE),
        ValidatorConfig {
            high_blocking: false,
            ..ValidatorConfig::default()
        },
    )
}

/// Validate one expression, panicking on catalogue-consistency errors.
#[allow(dead_code)]
pub fn validate(expression: &str) -> ValidationOutcome {
    validator()
        .validate(expression)
        .expect("fixture catalogue is consistent")
}

/// Whether the outcome contains a warning with the given id.
#[allow(dead_code)]
pub fn has_warning(outcome: &ValidationOutcome, id: &str) -> bool {
    outcome.warnings.iter().any(|w| w.id == id)
}

/// First warning with the given id.
#[allow(dead_code)]
pub fn find_warning<'a>(outcome: &'a ValidationOutcome, id: &str) -> &'a Warning {
    outcome
        .warnings
        .iter()
        .find(|w| w.id == id)
        .unwrap_or_else(|| panic!("expected warning {id}, got {:?}", outcome.warnings))
}

/// Warning ids of the outcome, in emission order.
#[allow(dead_code)]
pub fn warning_ids(outcome: &ValidationOutcome) -> Vec<String> {
    outcome.warnings.iter().map(|w| w.id.to_string()).collect()
}
