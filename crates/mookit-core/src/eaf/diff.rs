//! EAF differences between two halves of a collection of runs.
//!
//! The first half of the sets forms the "left" side, the second half the
//! "right" side. Differences are expressed either as rectangles whose
//! colour is rescaled to a number of intervals, or as the full surface
//! table with one signed interval value per point.

use super::{Eaf, RectSet, attsurf, eaf_compute_rectangles};
use crate::error::Result;

/// Signed interval value of surface point `k`: the difference between
/// the attainment fractions of the two halves, scaled to `intervals`.
pub fn diff_interval(surf: &Eaf, k: usize, intervals: usize) -> f64 {
    let nruns = surf.nruns;
    assert!(nruns % 2 == 0, "differences need an even set count");
    let division = nruns / 2;
    let left = surf.attained.count_range(k, 0, division) as f64;
    let right = surf.attained.count_range(k, division, nruns) as f64;
    intervals as f64 * (left / division as f64 - right / (nruns - division) as f64)
}

/// Rectangles of the difference between consecutive full-level surfaces,
/// with colours rescaled from counts to `intervals`.
pub fn eafdiff_rectangles(
    data: &[f64],
    dim: usize,
    cumsizes: &[usize],
    intervals: usize,
) -> Result<(RectSet, Vec<f64>)> {
    let nruns = cumsizes.len();
    let levels: Vec<usize> = (1..=nruns).collect();
    let surfs = attsurf(data, dim, cumsizes, &levels)?;
    let rects = eaf_compute_rectangles(&surfs);
    let division = (nruns / 2) as f64;
    let scaled: Vec<f64> = rects
        .colors
        .iter()
        .map(|&c| intervals as f64 * c as f64 / division)
        .collect();
    Ok((rects, scaled))
}

/// Every full-level surface point with its signed interval value:
/// rows of `dim + 1` values.
pub fn eafdiff_matrix(
    data: &[f64],
    dim: usize,
    cumsizes: &[usize],
    intervals: usize,
) -> Result<Vec<f64>> {
    let nruns = cumsizes.len();
    let levels: Vec<usize> = (1..=nruns).collect();
    let surfs = attsurf(data, dim, cumsizes, &levels)?;
    let total: usize = surfs.iter().map(|s| s.len()).sum();
    let mut out = Vec::with_capacity(total * (dim + 1));
    for surf in &surfs {
        for k in 0..surf.len() {
            out.extend_from_slice(surf.point(k));
            out.push(diff_interval(surf, k, intervals));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_runs() -> (Vec<f64>, Vec<usize>) {
        (vec![1.0, 3.0, 3.0, 1.0, 2.0, 2.0], vec![2, 3])
    }

    #[test]
    fn interval_values_are_signed_fractions() {
        let (data, cumsizes) = two_runs();
        let surfs = attsurf(&data, 2, &cumsizes, &[1]).unwrap();
        // Point (1,3) is attained by the left run only.
        assert_eq!(diff_interval(&surfs[0], 0, 2), 2.0);
        // Point (2,2) by the right run only.
        assert_eq!(diff_interval(&surfs[0], 1, 2), -2.0);
    }

    #[test]
    fn rectangle_colors_rescale() {
        let (data, cumsizes) = two_runs();
        let (rects, scaled) = eafdiff_rectangles(&data, 2, &cumsizes, 1).unwrap();
        assert_eq!(rects.colors.len(), scaled.len());
        for (&c, &s) in rects.colors.iter().zip(&scaled) {
            assert_eq!(s, c as f64);
        }
    }

    #[test]
    fn matrix_rows_carry_dim_plus_one_values() {
        let (data, cumsizes) = two_runs();
        let m = eafdiff_matrix(&data, 2, &cumsizes, 2).unwrap();
        assert_eq!(m.len() % 3, 0);
        // All surface levels are present: level 1 has 3 points, level 2
        // has 2.
        assert_eq!(m.len() / 3, 5);
    }
}
