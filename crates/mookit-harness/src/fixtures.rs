//! Fixture files: input data plus expected indicator values.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// One captured scenario: a multi-set input, a reference point and set,
/// and the expected indicator values keyed by indicator name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    pub name: String,
    pub nobj: usize,
    /// Points, row-major.
    pub data: Vec<f64>,
    /// Cumulative set sizes.
    pub cumsizes: Vec<usize>,
    /// Reference point for hypervolume.
    pub reference_point: Vec<f64>,
    /// Reference set for distance indicators, row-major.
    pub reference_set: Vec<f64>,
    #[serde(default)]
    pub maximise: Vec<bool>,
    /// Expected values, e.g. "hv" -> 11.0.
    pub expected: BTreeMap<String, f64>,
}

/// A named collection of cases, one JSON file on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    pub family: String,
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), FixtureError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip() {
        let case = FixtureCase {
            name: "three-points".into(),
            nobj: 2,
            data: vec![1.0, 6.0, 2.0, 4.0, 4.0, 3.0],
            cumsizes: vec![3],
            reference_point: vec![5.0, 7.0],
            reference_set: vec![1.0, 6.0, 2.0, 4.0, 4.0, 3.0],
            maximise: vec![false, false],
            expected: [("hv".to_string(), 11.0)].into_iter().collect(),
        };
        let set = FixtureSet {
            family: "hv".into(),
            cases: vec![case],
        };
        let text = serde_json::to_string(&set).unwrap();
        let back: FixtureSet = serde_json::from_str(&text).unwrap();
        assert_eq!(back.cases.len(), 1);
        assert_eq!(back.cases[0].expected["hv"], 11.0);
    }
}
