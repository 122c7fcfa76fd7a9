//! Hypervolume engines.
//!
//! `HV(P, r)` is the Lebesgue measure of the union of the boxes `[p, r]`
//! over all points `p` that strictly dominate the reference point `r`
//! (minimisation). Dedicated sweeps handle two, three (HV3D+) and four
//! (HV4D+) objectives; five and more recurse dimension by dimension,
//! bottoming out in the 4D engine (Fonseca, Paquete and López-Ibáñez,
//! CEC 2006; Guerreiro and Fonseca, IEEE TEC 22(3), 2018).

pub mod approx;
mod contrib;
mod hv2d;
mod hv3d;
mod hv4d;
mod recursive;

pub use contrib::hv_contributions;
pub use hv2d::hv2d;
pub use hv3d::hv3d_plus;
pub use hv4d::hv4d_plus;

use crate::geometry::MAX_DIMENSION;

/// Hypervolume of `data` (row-major, `dim` objectives, minimisation)
/// bounded by the reference point `r`. Points that do not strictly
/// dominate `r` contribute nothing; the result is 0 when no point does.
pub fn hypervolume(data: &[f64], dim: usize, r: &[f64]) -> f64 {
    assert!((2..=MAX_DIMENSION).contains(&dim));
    assert_eq!(r.len(), dim);
    assert_eq!(data.len() % dim, 0);
    if data.is_empty() {
        return 0.0;
    }
    match dim {
        2 => hv2d::hv2d(data, r),
        3 => hv3d::hv3d_plus(data, r),
        4 => hv4d::hv4d_plus(data, r),
        _ => recursive::hv_recursive_entry(data, dim, r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_points_2d() {
        let pts = vec![1.0, 6.0, 2.0, 4.0, 4.0, 3.0];
        let r = [5.0, 7.0];
        assert_eq!(hypervolume(&pts, 2, &r), 11.0);
    }

    #[test]
    fn dominated_duplicate_3d() {
        // The duplicate and the dominated point change nothing.
        let full = vec![
            1.0, 2.0, 3.0, //
            2.0, 1.0, 3.0, //
            1.0, 2.0, 3.0, //
            0.5, 0.5, 3.5, //
        ];
        let clean = vec![
            1.0, 2.0, 3.0, //
            2.0, 1.0, 3.0, //
            0.5, 0.5, 3.5, //
        ];
        let r = [4.0, 4.0, 4.0];
        let a = hypervolume(&full, 3, &r);
        let b = hypervolume(&clean, 3, &r);
        assert!((a - b).abs() < 1e-12, "{a} vs {b}");
    }

    #[test]
    fn reference_strict_domination() {
        let pts = vec![1.0, 1.0];
        assert!(hypervolume(&pts, 2, &[2.0, 2.0]) > 0.0);
        // A point on the reference boundary contributes nothing.
        assert_eq!(hypervolume(&pts, 2, &[1.0, 2.0]), 0.0);
        assert_eq!(hypervolume(&pts, 2, &[0.5, 0.5]), 0.0);
    }

    #[test]
    fn monotone_under_union() {
        let small = vec![2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0];
        let big = vec![2.0, 2.0, 2.0, 2.0, 1.0, 3.0, 2.0, 2.0];
        let r = [4.0, 4.0, 4.0, 4.0];
        assert!(hypervolume(&small, 4, &r) <= hypervolume(&big, 4, &r));
    }

    /// Brute-force grid measure for cross-checking the engines on small
    /// integer instances.
    fn grid_hv(points: &[f64], dim: usize, r: &[f64], lo: f64) -> f64 {
        let steps = 16usize;
        let cell: Vec<f64> = (0..dim).map(|d| (r[d] - lo) / steps as f64).collect();
        let mut count = 0usize;
        let total = steps.pow(dim as u32);
        for idx in 0..total {
            let mut rem = idx;
            let centre: Vec<f64> = (0..dim)
                .map(|d| {
                    let i = rem % steps;
                    rem /= steps;
                    lo + (i as f64 + 0.5) * cell[d]
                })
                .collect();
            let dominated = points
                .chunks_exact(dim)
                .any(|p| p.iter().zip(&centre).all(|(a, b)| a <= b));
            if dominated {
                count += 1;
            }
        }
        count as f64 * cell.iter().product::<f64>()
    }

    #[test]
    fn engines_match_grid_measure() {
        // Points on quarter-cell centres so the grid measure is exact.
        let r = [4.0, 4.0, 4.0];
        let pts3 = vec![
            1.0, 2.0, 3.0, //
            2.0, 1.0, 3.0, //
            0.5, 0.5, 3.5, //
            3.0, 3.0, 0.5, //
        ];
        let exact = hv3d_plus(&pts3, &r);
        let grid = grid_hv(&pts3, 3, &r, 0.0);
        assert!((exact - grid).abs() < 1e-9, "{exact} vs {grid}");

        let r4 = [4.0, 4.0, 4.0, 4.0];
        let pts4 = vec![
            1.0, 2.0, 3.0, 2.0, //
            2.0, 1.0, 3.0, 2.0, //
            0.5, 0.5, 3.5, 1.0, //
            3.0, 3.0, 0.5, 3.0, //
        ];
        let exact = hv4d_plus(&pts4, &r4);
        let grid = grid_hv(&pts4, 4, &r4, 0.0);
        assert!((exact - grid).abs() < 1e-9, "{exact} vs {grid}");
    }

    #[test]
    fn recursive_engine_matches_product_structure() {
        // A single point in 5D: the box volume is exact.
        let pts = vec![1.0, 1.0, 1.0, 1.0, 1.0];
        let r = [3.0, 3.0, 3.0, 3.0, 3.0];
        assert_eq!(hypervolume(&pts, 5, &r), 32.0);

        // Two incomparable points overlapping in a known way: inclusion-
        // exclusion gives 2^5 + 2^5 - 1^5 overlap intersection.
        let pts = vec![
            1.0, 1.0, 1.0, 1.0, 2.0, //
            2.0, 1.0, 1.0, 1.0, 1.0, //
        ];
        // vol(a) = 2*2*2*2*1 = 16, vol(b) = 1*2*2*2*2 = 16,
        // intersection = [2,2,2,2,2]..r = 1*1*1*1*1? No: max per coord =
        // (2,1,1,1,2) so 1*2*2*2*1 = 8. HV = 16 + 16 - 8 = 24.
        assert_eq!(hypervolume(&pts, 5, &r), 24.0);
    }

    #[test]
    fn dominated_point_does_not_change_hv_5d() {
        let r = [4.0; 5];
        let base = vec![
            1.0, 2.0, 3.0, 2.0, 1.0, //
            2.0, 1.0, 2.0, 3.0, 2.0, //
            3.0, 3.0, 1.0, 1.0, 3.0, //
        ];
        let mut with_dom = base.clone();
        with_dom.extend_from_slice(&[3.5, 3.5, 3.5, 3.5, 3.5]);
        let a = hypervolume(&base, 5, &r);
        let b = hypervolume(&with_dom, 5, &r);
        assert!((a - b).abs() < 1e-12);
        assert!(a > 0.0);
    }
}
