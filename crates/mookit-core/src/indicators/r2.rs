//! Exact R2 indicator for two objectives with a uniform weight density
//! over [0, 1], measured against an ideal (utopian) reference point.
//!
//! The weighted-Tchebycheff utility of a single point has a closed form
//! per weight interval; sweeping the non-dominated prefix of the sorted
//! points accumulates those segments between consecutive corners.

use crate::sort::{cmp_lex_asc, sorted_row_indices};

/// Twice the utility of the axis-parallel segment between y1, y2, y2p.
fn utility(y1: f64, y2: f64, y2p: f64) -> f64 {
    if y1 == 0.0 {
        return 0.0;
    }
    let w = y2 / (y1 + y2);
    let wp = if y2p == f64::MAX {
        1.0
    } else {
        y2p / (y1 + y2p)
    };
    y1 * (wp * wp - w * w)
}

/// Exact R2 value of two-objective `data` (minimisation) against the
/// ideal reference point `r`. Returns 0 when `r` is dominated and
/// `f64::MAX` when no point relates to it.
pub fn r2_exact(data: &[f64], r: &[f64]) -> f64 {
    let dim = 2;
    let n = data.len() / dim;
    assert!(n > 0, "R2 of an empty set is undefined");
    let p = sorted_row_indices(data, dim, cmp_lex_asc);
    let row = |j: usize| &data[p[j] * dim..p[j] * dim + dim];

    // Skip points left of the ideal point.
    let mut j = 0;
    while j < n && row(j)[0] < r[0] {
        j += 1;
    }
    if j == n {
        if row(n - 1)[1] <= r[1] {
            return 0.0; // the ideal reference is dominated
        }
        return f64::MAX; // nothing to evaluate against
    }

    let mut prev_y1 = row(j)[0] - r[0];
    let mut prev_y2 = row(j)[1] - r[1];
    if prev_y2 < 0.0 {
        return 0.0;
    }

    let mut acc = utility(prev_y1, prev_y2, f64::MAX);
    while j < n - 1 {
        j += 1;
        let y1 = row(j)[0] - r[0];
        let y2 = row(j)[1] - r[1];
        if y2 < 0.0 {
            continue;
        }
        if y2 < prev_y2 {
            // A new corner of the non-dominated prefix.
            acc += utility(prev_y2, prev_y1, y1) + utility(y1, y2, prev_y2);
            prev_y1 = y1;
            prev_y2 = y2;
        }
    }
    acc += utility(prev_y2, prev_y1, f64::MAX);
    0.5 * acc
}
