//! Recompute fixture indicators and diff them against expectations.

use std::collections::BTreeMap;

use mookit_core::geometry::{self, Direction};
use mookit_core::indicators;
use mookit_core::{hv, ndfilter};

use crate::fixtures::FixtureCase;

/// Values may legitimately differ in the last couple of ULPs between
/// platforms; anything below this relative bound counts as equal.
const RELATIVE_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub enum CaseResult {
    Pass,
    Fail { indicator: String, expected: f64, actual: f64 },
}

#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub name: String,
    pub result: CaseResult,
    /// Everything that was recomputed, for the report.
    pub actual: BTreeMap<String, f64>,
}

fn minmax_of(case: &FixtureCase) -> Vec<Direction> {
    if case.maximise.is_empty() {
        geometry::minimise_all(case.nobj)
    } else {
        geometry::from_maximise_mask(&case.maximise)
    }
}

/// Compute the full indicator table for a case.
pub fn capture_case(case: &FixtureCase) -> BTreeMap<String, f64> {
    let minmax = minmax_of(case);
    let dim = case.nobj;
    let mut out = BTreeMap::new();

    // Hypervolume only supports the pure minimisation convention; apply
    // the agree transform first.
    let agreed = geometry::force_agree_minimise(&case.data, dim, &minmax);
    let mut ref_point = case.reference_point.clone();
    for (d, &mm) in minmax.iter().enumerate() {
        if mm == Direction::Maximise {
            ref_point[d] = -ref_point[d];
        }
    }
    out.insert(
        "hv".to_string(),
        hv::hypervolume(&agreed, dim, &ref_point),
    );

    out.insert(
        "igd".to_string(),
        indicators::igd(&minmax, dim, &case.data, &case.reference_set),
    );
    out.insert(
        "igd_plus".to_string(),
        indicators::igd_plus(&minmax, dim, &case.data, &case.reference_set),
    );
    out.insert(
        "gd".to_string(),
        indicators::gd(&minmax, dim, &case.data, &case.reference_set),
    );
    out.insert(
        "avg_hausdorff".to_string(),
        indicators::avg_hausdorff_dist(&minmax, dim, &case.data, &case.reference_set, 1),
    );
    out.insert(
        "epsilon_additive".to_string(),
        indicators::epsilon_additive_minmax(dim, &minmax, &case.data, &case.reference_set),
    );
    if let Ok(mult) =
        indicators::epsilon_mult_minmax(dim, &minmax, &case.data, &case.reference_set)
    {
        out.insert("epsilon_mult".to_string(), mult);
    }
    let nondom = ndfilter::is_nondominated(&case.data, dim, &minmax, false);
    out.insert(
        "nondominated".to_string(),
        nondom.iter().filter(|&&b| b).count() as f64,
    );
    out
}

fn values_match(expected: f64, actual: f64) -> bool {
    if expected == actual {
        return true;
    }
    if expected.is_infinite() || actual.is_infinite() {
        return expected == actual;
    }
    let scale = expected.abs().max(actual.abs()).max(1.0);
    (expected - actual).abs() <= RELATIVE_TOLERANCE * scale
}

/// Recompute a case and compare every expected value.
pub fn verify_case(case: &FixtureCase) -> VerificationResult {
    let actual = capture_case(case);
    for (key, &expected) in &case.expected {
        match actual.get(key) {
            Some(&value) if values_match(expected, value) => {}
            Some(&value) => {
                return VerificationResult {
                    name: case.name.clone(),
                    result: CaseResult::Fail {
                        indicator: key.clone(),
                        expected,
                        actual: value,
                    },
                    actual,
                };
            }
            None => {
                return VerificationResult {
                    name: case.name.clone(),
                    result: CaseResult::Fail {
                        indicator: key.clone(),
                        expected,
                        actual: f64::NAN,
                    },
                    actual,
                };
            }
        }
    }
    VerificationResult {
        name: case.name.clone(),
        result: CaseResult::Pass,
        actual,
    }
}
