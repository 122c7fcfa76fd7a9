//! Error kinds shared across the workspace.
//!
//! The core never returns partial results: an operation either completes
//! or surfaces one of these errors. Allocation failure is not represented
//! here; it aborts through the global allocator, matching the fatal
//! treatment required by the resource model.

use thiserror::Error;

/// Errors reported by the core engines and the data loaders.
#[derive(Debug, Error)]
pub enum Error {
    /// Conflicting matrix shapes: mismatched columns, empty input, or a
    /// reference set whose dimension differs from the data.
    #[error("input shape: {0}")]
    InputShape(String),

    /// Values outside the domain an indicator requires, e.g. non-positive
    /// coordinates for the multiplicative epsilon.
    #[error("input domain: {0}")]
    InputDomain(String),

    /// A set declared non-dominated contains a dominated point.
    #[error("point {index} is dominated")]
    CheckFailed { index: usize },

    /// Malformed input data.
    #[error("{file}:{line}:{column}: {detail}")]
    Parse {
        file: String,
        line: usize,
        column: usize,
        detail: String,
    },

    /// I/O failure while reading or writing data files.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A parameter outside its documented range: attainment level,
    /// percentile, objective count, or distance exponent.
    #[error("out of range: {0}")]
    OutOfRange(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_location() {
        let e = Error::Parse {
            file: "points.dat".into(),
            line: 3,
            column: 2,
            detail: "could not convert `abc` to f64".into(),
        };
        assert_eq!(
            e.to_string(),
            "points.dat:3:2: could not convert `abc` to f64"
        );
    }
}
