//! Exclusive hypervolume contributions.
//!
//! The contribution of point i is HV(S) − HV(S \ {i}), obtained by
//! overwriting the point's row with the reference point, recomputing, and
//! restoring the row. O(n) full hypervolume computations; the buffer is
//! back in its original state on return.

use super::hypervolume;
use crate::geometry::strongly_dominates;

/// Write each point's exclusive contribution into `hvc` and return the
/// total hypervolume. Dominated points (and points not strictly
/// dominating `r`) get 0; contributions below √ε are clamped to 0.
pub fn hv_contributions(hvc: &mut [f64], points: &mut [f64], dim: usize, r: &[f64]) -> f64 {
    let size = points.len() / dim;
    assert_eq!(hvc.len(), size);
    let tolerance = f64::EPSILON.sqrt();
    let total = hypervolume(points, dim, r);
    let mut tmp = vec![0.0; dim];
    for i in 0..size {
        let row = i * dim..(i + 1) * dim;
        if !strongly_dominates(&points[row.clone()], r) {
            hvc[i] = 0.0;
            continue;
        }
        tmp.copy_from_slice(&points[row.clone()]);
        points[row.clone()].copy_from_slice(r);
        let without = hypervolume(points, dim, r);
        let c = total - without;
        hvc[i] = if c.abs() >= tolerance { c } else { 0.0 };
        debug_assert!(hvc[i] >= 0.0);
        points[row].copy_from_slice(&tmp);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staircase_contributions_2d() {
        let mut pts = vec![1.0, 6.0, 2.0, 4.0, 4.0, 3.0];
        let orig = pts.clone();
        let mut hvc = vec![0.0; 3];
        let r = [5.0, 7.0];
        let total = hv_contributions(&mut hvc, &mut pts, 2, &r);
        assert_eq!(total, 11.0);
        // Exclusive slabs: (2-1)*(7-6), (4-2)*(6-4)... computed directly:
        // removing a point leaves the other two.
        assert_eq!(hvc, vec![1.0, 4.0, 1.0]);
        assert_eq!(pts, orig, "buffer restored");
    }

    #[test]
    fn dominated_point_contributes_zero() {
        let mut pts = vec![1.0, 1.0, 2.0, 2.0];
        let mut hvc = vec![0.0; 2];
        hv_contributions(&mut hvc, &mut pts, 2, &[3.0, 3.0]);
        assert_eq!(hvc[1], 0.0);
        assert_eq!(hvc[0], 4.0 - 1.0);
    }

    #[test]
    fn duplicate_points_contribute_zero() {
        let mut pts = vec![1.0, 1.0, 1.0, 1.0];
        let mut hvc = vec![0.0; 2];
        let total = hv_contributions(&mut hvc, &mut pts, 2, &[2.0, 2.0]);
        assert_eq!(total, 1.0);
        assert_eq!(hvc, vec![0.0, 0.0]);
    }

    #[test]
    fn sum_of_contributions_bounded_by_total() {
        let mut pts = vec![
            1.0, 2.0, 3.0, //
            2.0, 1.0, 3.0, //
            0.5, 0.5, 3.5, //
        ];
        let mut hvc = vec![0.0; 3];
        let total = hv_contributions(&mut hvc, &mut pts, 3, &[4.0, 4.0, 4.0]);
        let sum: f64 = hvc.iter().sum();
        assert!(sum <= total + 1e-12);
        assert!(hvc.iter().all(|&c| c >= 0.0));
    }
}
