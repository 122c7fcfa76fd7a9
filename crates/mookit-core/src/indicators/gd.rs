//! The generational-distance family: GD, IGD, IGD+ and the averaged
//! Hausdorff distance, all through one parameterised kernel.
//!
//! GD was introduced by Van Veldhuizen and Lamont (1998); the GD_p/IGD_p
//! normalisation is from Schütze et al. (IEEE TEC 16(4), 2012) and the
//! IGD+ modification from Ishibuchi et al. (EMO 2015). The kernel walks
//! the "from" set, finds each point's nearest neighbour in the "to" set
//! under the Euclidean norm, and aggregates the p-th powers.

use crate::geometry::{self, Agreement, Direction, MAX_DIMENSION};
use crate::powi::pow_uint;

/// Aggregate nearest-neighbour distances from `points_a` to `points_r`.
///
/// `plus` replaces each coordinate difference with its part in the
/// worse-than-reference direction (the IGD+ modification). With `psize`
/// the mean is taken before the outer p-th root, otherwise after.
/// An empty `points_a` yields +inf.
fn gd_common(
    minmax: &[Direction],
    dim: usize,
    points_a: &[f64],
    points_r: &[f64],
    plus: bool,
    psize: bool,
    p: u32,
) -> f64 {
    assert!((2..=MAX_DIMENSION).contains(&dim));
    assert!(p >= 1, "distance exponent must be at least 1");
    let size_a = points_a.len() / dim;
    let size_r = points_r.len() / dim;
    // An empty set on either side puts the nearest neighbour at infinity.
    if size_a == 0 || size_r == 0 {
        return f64::INFINITY;
    }
    let agree = geometry::agreement(minmax);

    let mut gd = 0.0;
    let mut diff = [0.0f64; MAX_DIMENSION];
    for pa in points_a.chunks_exact(dim) {
        let mut min_dist = f64::INFINITY;
        let mut zero = false;
        for pr in points_r.chunks_exact(dim) {
            for d in 0..dim {
                let a_d = pa[d];
                let r_d = pr[d];
                diff[d] = match agree {
                    Agreement::Minimise => {
                        if plus {
                            (r_d - a_d).max(0.0)
                        } else {
                            a_d - r_d
                        }
                    }
                    Agreement::Maximise => {
                        if plus {
                            (a_d - r_d).max(0.0)
                        } else {
                            a_d - r_d
                        }
                    }
                    Agreement::Mixed => match minmax[d] {
                        Direction::Minimise => {
                            if plus {
                                (r_d - a_d).max(0.0)
                            } else {
                                a_d - r_d
                            }
                        }
                        Direction::Maximise => {
                            if plus {
                                (a_d - r_d).max(0.0)
                            } else {
                                a_d - r_d
                            }
                        }
                        Direction::Ignore => 0.0,
                    },
                };
            }
            let dist: f64 = diff[..dim].iter().map(|v| v * v).sum();
            if dist == 0.0 {
                zero = true;
                break;
            }
            // Squared distances preserve the minimum; the root waits
            // until after the loop.
            min_dist = min_dist.min(dist);
        }
        if zero {
            continue;
        }
        let contrib = if p == 1 {
            min_dist.sqrt()
        } else if p % 2 == 0 {
            pow_uint(min_dist, p / 2)
        } else {
            pow_uint(min_dist.sqrt(), p)
        };
        gd += contrib;
    }
    debug_assert!(gd >= 0.0);

    if p == 1 {
        gd / size_a as f64
    } else if psize {
        (gd / size_a as f64).powf(1.0 / p as f64)
    } else {
        gd.powf(1.0 / p as f64) / size_a as f64
    }
}

/// Generational distance of the approximation set `data` to `reference`.
pub fn gd(minmax: &[Direction], dim: usize, data: &[f64], reference: &[f64]) -> f64 {
    gd_common(minmax, dim, data, reference, false, false, 1)
}

/// GD with exponent p and size normalisation inside the root.
pub fn gd_p(minmax: &[Direction], dim: usize, data: &[f64], reference: &[f64], p: u32) -> f64 {
    gd_common(minmax, dim, data, reference, false, true, p)
}

/// Inverted generational distance: averages over the reference set.
pub fn igd(minmax: &[Direction], dim: usize, data: &[f64], reference: &[f64]) -> f64 {
    gd_common(minmax, dim, reference, data, false, false, 1)
}

/// IGD with exponent p and size normalisation inside the root.
pub fn igd_p(minmax: &[Direction], dim: usize, data: &[f64], reference: &[f64], p: u32) -> f64 {
    gd_common(minmax, dim, reference, data, false, true, p)
}

/// IGD+ of Ishibuchi et al.: only worse-than-reference coordinate
/// differences count, making the indicator weakly Pareto compliant.
pub fn igd_plus(minmax: &[Direction], dim: usize, data: &[f64], reference: &[f64]) -> f64 {
    gd_common(minmax, dim, reference, data, true, true, 1)
}

/// Averaged Hausdorff distance: max(GD_p, IGD_p).
pub fn avg_hausdorff_dist(
    minmax: &[Direction],
    dim: usize,
    data: &[f64],
    reference: &[f64],
    p: u32,
) -> f64 {
    let gd_p = gd_common(minmax, dim, data, reference, false, true, p);
    let igd_p = gd_common(minmax, dim, reference, data, false, true, p);
    gd_p.max(igd_p)
}

/// [`igd`] with a boolean maximise mask.
pub fn igd_maximise(dim: usize, data: &[f64], reference: &[f64], maximise: &[bool]) -> f64 {
    let minmax = geometry::from_maximise_mask(maximise);
    igd(&minmax, dim, data, reference)
}

/// [`igd_plus`] with a boolean maximise mask.
pub fn igd_plus_maximise(dim: usize, data: &[f64], reference: &[f64], maximise: &[bool]) -> f64 {
    let minmax = geometry::from_maximise_mask(maximise);
    igd_plus(&minmax, dim, data, reference)
}

/// [`avg_hausdorff_dist`] with a boolean maximise mask.
pub fn avg_hausdorff_maximise(
    dim: usize,
    data: &[f64],
    reference: &[f64],
    maximise: &[bool],
    p: u32,
) -> f64 {
    let minmax = geometry::from_maximise_mask(maximise);
    avg_hausdorff_dist(&minmax, dim, data, reference, p)
}
