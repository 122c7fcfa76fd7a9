//! Weighted hypervolume in two dimensions.
//!
//! Two flavours: an exact sweep over a rectangle decomposition of the
//! objective space, and the HypE-style sampled estimator with uniform,
//! exponential or bivariate-Gaussian sampling densities (Bader and
//! Zitzler, Evolutionary Computation 19(1), 2011).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::geometry::{self, Direction};
use crate::sort::{cmp_y_desc_x_asc, sorted_row_indices};

/// Axis-aligned rectangle with a weight, lower-left to upper-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedRect {
    pub lx: f64,
    pub ly: f64,
    pub ux: f64,
    pub uy: f64,
    pub weight: f64,
}

/// Clamp the rectangles to the reference point and drop the ones that
/// collapse to a line.
fn preprocess_rectangles(rects: &[WeightedRect], reference: &[f64]) -> Vec<WeightedRect> {
    rects
        .iter()
        .map(|r| WeightedRect {
            lx: r.lx.min(reference[0]),
            ly: r.ly.min(reference[1]),
            ux: r.ux.min(reference[0]),
            uy: r.uy.min(reference[1]),
            weight: r.weight,
        })
        .filter(|r| r.lx != r.ux && r.ly != r.uy)
        .collect()
}

/// Exact weighted hypervolume of `data` over a rectangle decomposition,
/// bounded by `reference`. Each rectangle contributes its weight times
/// the area of its part dominated by some point.
pub fn rect_weighted_hv2d(data: &[f64], rects: &[WeightedRect], reference: &[f64]) -> f64 {
    let dim = 2;
    let n = data.len() / dim;
    if n == 0 || rects.is_empty() {
        return 0.0;
    }
    let mut rs = preprocess_rectangles(rects, reference);
    if rs.is_empty() {
        return 0.0;
    }
    // Points stream top-down, rectangles by top-right corner top-down.
    let order = sorted_row_indices(data, dim, cmp_y_desc_x_asc);
    rs.sort_by(|a, b| b.uy.total_cmp(&a.uy).then(a.ux.total_cmp(&b.ux)));

    let last_top = rs[rs.len() - 1].uy;
    let last_right = rs.iter().map(|r| r.ux).fold(f64::NEG_INFINITY, f64::max);

    let mut whv = 0.0;
    let mut top = rs[0].uy;
    let mut pk = 0usize;
    let row = |k: usize| [data[order[k] * dim], data[order[k] * dim + 1]];
    let mut px = row(0);

    // Advance the point stream; the running ceiling becomes the old
    // point's y. False means the sweep is complete.
    macro_rules! next_point {
        () => {{
            top = px[1];
            pk += 1;
            if pk >= n || top == last_top || px[0] >= last_right {
                return whv;
            }
            px = row(pk);
        }};
    }

    // Skip points above every rectangle.
    while px[1] >= rs[0].uy {
        next_point!();
    }

    loop {
        debug_assert!(px[1] < rs[0].uy);
        let mut r = 0;
        loop {
            let rect = rs[r];
            if px[0] < rect.ux && rect.ly < top {
                // The slice of `rect` below the ceiling dominated by px.
                debug_assert!(top > px[1]);
                whv += (rect.ux - px[0].max(rect.lx))
                    * (top.min(rect.uy) - px[1].max(rect.ly))
                    * rect.weight;
            }
            r += 1;
            if r >= rs.len() || px[1] >= rs[r].uy {
                break;
            }
        }
        // Move on, folding y-ties above the highest rectangle.
        loop {
            next_point!();
            if !(top == px[1] && px[1] >= rs[0].uy) {
                break;
            }
        }
    }
}

/// Sampling density for the HypE estimator, over the normalised unit
/// square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HypeDist {
    Uniform,
    /// Exponential decay away from the ideal point, half the samples per
    /// axis pattern.
    Exponential { mu: f64 },
    /// Bivariate Gaussian centred at `mu` (objective-space coordinates,
    /// normalised internally) with σ = 0.25 and ρ = 1.
    Gaussian { mu: [f64; 2] },
}

fn normalise01(points: &[f64], ideal: &[f64], reference: &[f64]) -> Vec<f64> {
    let mut out = points.to_vec();
    let minmax = geometry::minimise_all(2);
    geometry::normalise(
        &mut out,
        2,
        &minmax,
        Some(Direction::Minimise),
        0.0,
        1.0,
        ideal,
        reference,
    );
    out
}

fn bivariate_normal_fill(
    rng: &mut StdRng,
    mu: [f64; 2],
    sigma: [f64; 2],
    rho: f64,
    out: &mut [f64],
) {
    let sigma2rho = sigma[1] * rho;
    let nu = sigma[1] * (1.0 - rho * rho).sqrt();
    for pair in out.chunks_exact_mut(2) {
        let x1: f64 = rng.sample(StandardNormal);
        let x2: f64 = rng.sample(StandardNormal);
        pair[0] = mu[0] + x1 * sigma[0];
        pair[1] = mu[1] + x1 * sigma2rho + nu * x2;
    }
}

fn create_samples(dist: &HypeDist, rng: &mut StdRng, nsamples: usize) -> Vec<f64> {
    let nobj = 2;
    let mut samples = vec![0.0; nsamples * nobj];
    match *dist {
        HypeDist::Uniform => {
            for s in samples.iter_mut() {
                *s = rng.r#gen::<f64>();
            }
        }
        HypeDist::Exponential { mu } => {
            let half = nsamples / 2;
            for i in 0..nsamples {
                // (0, 1]: keeps the logarithm finite.
                let u = 1.0 - rng.r#gen::<f64>();
                let v = rng.r#gen::<f64>();
                if i < half {
                    samples[i * nobj] = -mu * u.ln();
                    samples[i * nobj + 1] = v;
                } else {
                    samples[i * nobj] = v;
                    samples[i * nobj + 1] = -mu * u.ln();
                }
            }
        }
        HypeDist::Gaussian { mu } => {
            bivariate_normal_fill(rng, mu, [0.25, 0.25], 1.0, &mut samples);
        }
    }
    samples
}

/// Count dominators per sample; every dominating point collects
/// 1/(number of dominators), so an attained sample contributes one unit
/// in total.
fn estimate_whv(points: &[f64], samples: &[f64]) -> f64 {
    let nobj = 2;
    let mut whv = 0.0;
    for sample in samples.chunks_exact(nobj) {
        let count = points
            .chunks_exact(nobj)
            .filter(|p| sample[0] >= p[0] && sample[1] >= p[1])
            .count();
        if count > 0 {
            whv += count as f64 * (1.0 / count as f64);
        }
    }
    whv
}

/// HypE-style sampled weighted hypervolume of two-objective `points`
/// between the `ideal` and `reference` corners. `seed` must be non-zero
/// so runs are reproducible.
pub fn whv_hype_estimate(
    points: &[f64],
    ideal: &[f64],
    reference: &[f64],
    dist: HypeDist,
    nsamples: usize,
    seed: u32,
) -> f64 {
    assert!(seed != 0, "the library boundary requires an explicit seed");
    assert!(nsamples > 0);
    let nobj = 2;
    let mut rng = StdRng::seed_from_u64(seed as u64);

    // The Gaussian mean is given in objective space; move it into the
    // unit square with the points.
    let dist = match dist {
        HypeDist::Gaussian { mu } => {
            let m = normalise01(&mu, ideal, reference);
            HypeDist::Gaussian { mu: [m[0], m[1]] }
        }
        d => d,
    };

    let samples = create_samples(&dist, &mut rng, nsamples);
    let normalised = normalise01(points, ideal, reference);
    let whv = estimate_whv(&normalised, &samples);
    let volume: f64 = (0..nobj).map(|k| reference[k] - ideal[k]).product();
    whv * volume / nsamples as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hv::hypervolume;

    #[test]
    fn unit_weight_rectangle_equals_plain_hv() {
        let pts = vec![1.0, 6.0, 2.0, 4.0, 4.0, 3.0];
        let r = [5.0, 7.0];
        // One rectangle covering the whole dominated region with w = 1.
        let rects = [WeightedRect {
            lx: 0.0,
            ly: 0.0,
            ux: 5.0,
            uy: 7.0,
            weight: 1.0,
        }];
        let whv = rect_weighted_hv2d(&pts, &rects, &r);
        let hv = hypervolume(&pts, 2, &r);
        assert!((whv - hv).abs() < 1e-12, "{whv} vs {hv}");
    }

    #[test]
    fn weight_scales_linearly() {
        let pts = vec![1.0, 1.0];
        let r = [3.0, 3.0];
        let unit = [WeightedRect {
            lx: 0.0,
            ly: 0.0,
            ux: 3.0,
            uy: 3.0,
            weight: 1.0,
        }];
        let double = [WeightedRect {
            weight: 2.0,
            ..unit[0]
        }];
        let a = rect_weighted_hv2d(&pts, &unit, &r);
        let b = rect_weighted_hv2d(&pts, &double, &r);
        assert!((b - 2.0 * a).abs() < 1e-12);
    }

    #[test]
    fn disjoint_rectangles_sum() {
        let pts = vec![0.0, 0.0];
        let r = [4.0, 4.0];
        let rects = [
            WeightedRect {
                lx: 0.0,
                ly: 0.0,
                ux: 2.0,
                uy: 2.0,
                weight: 1.0,
            },
            WeightedRect {
                lx: 2.0,
                ly: 2.0,
                ux: 4.0,
                uy: 4.0,
                weight: 3.0,
            },
        ];
        // Point dominates everything: 4*1 + 4*3.
        assert_eq!(rect_weighted_hv2d(&pts, &rects, &r), 16.0);
    }

    #[test]
    fn degenerate_rectangles_are_dropped() {
        let pts = vec![0.0, 0.0];
        let r = [4.0, 4.0];
        let rects = [
            WeightedRect {
                lx: 1.0,
                ly: 0.0,
                ux: 1.0,
                uy: 4.0,
                weight: 9.0,
            },
            // Clamping to the reference collapses this one.
            WeightedRect {
                lx: 4.0,
                ly: 0.0,
                ux: 9.0,
                uy: 4.0,
                weight: 9.0,
            },
        ];
        assert_eq!(rect_weighted_hv2d(&pts, &rects, &r), 0.0);
    }

    #[test]
    fn hype_uniform_approximates_hv() {
        let pts = vec![1.0, 6.0, 2.0, 4.0, 4.0, 3.0];
        let ideal = [0.0, 0.0];
        let r = [5.0, 7.0];
        let exact = hypervolume(&pts, 2, &r);
        let est = whv_hype_estimate(&pts, &ideal, &r, HypeDist::Uniform, 100_000, 31);
        assert!((est - exact).abs() / exact < 0.05, "{est} vs {exact}");
    }

    #[test]
    fn hype_is_deterministic_per_seed() {
        let pts = vec![1.0, 1.0];
        let ideal = [0.0, 0.0];
        let r = [2.0, 2.0];
        for dist in [
            HypeDist::Uniform,
            HypeDist::Exponential { mu: 0.5 },
            HypeDist::Gaussian { mu: [1.0, 1.0] },
        ] {
            let a = whv_hype_estimate(&pts, &ideal, &r, dist, 2000, 9);
            let b = whv_hype_estimate(&pts, &ideal, &r, dist, 2000, 9);
            assert_eq!(a, b);
        }
    }
}
