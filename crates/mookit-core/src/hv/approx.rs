//! Stochastic hypervolume approximation for up to 32 objectives.
//!
//! Both estimators integrate over directions of the positive orthant of
//! the unit sphere: for a direction w, the largest scaled box radius
//! max_i min_k (p_ik / w_k) raised to the d-th power, averaged and
//! multiplied by the volume of the unit d-sphere divided by d, converges
//! to the hypervolume.
//!
//! The deterministic variant follows Hua–Wang: a Kronecker sequence over
//! a prime larger than the dimension yields low-discrepancy polar
//! samples, inverted through the partial integral of sin^m. The Monte
//! Carlo variant draws directions as normalised absolute Gaussians from
//! a caller-seeded generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::geometry::MAX_DIMENSION;
use crate::powi::pow_uint;

const EPSILON: f64 = 1e-20;

/// Smallest prime p with m <= (p - 1) / 2, indexed by m.
const PRIMES: [u32; 33] = [
    1, 3, 5, 7, 11, 11, 13, 17, 17, 19, //
    23, 23, 29, 29, 29, 31, 37, 37, 37, 41, //
    41, 43, 47, 47, 53, 53, 53, 59, 59, 59, //
    61, 67, 67,
];

/// Kronecker sequence multipliers for the polar samples.
fn construct_polar_a(m: usize, nsamples: u32) -> Vec<u32> {
    debug_assert!((1..=MAX_DIMENSION).contains(&m));
    let p = PRIMES[m] as f64;
    let mut a = vec![0u32; m];
    a[0] = 1;
    for (k, slot) in a.iter_mut().enumerate().skip(1) {
        let t = 2.0 * (2.0 * std::f64::consts::PI * k as f64 / p).cos().abs();
        let frac = t - t.floor();
        *slot = (nsamples as f64 * frac).round() as u32;
    }
    a
}

fn compute_polar_sample(sample: &mut [f64], i: u32, nsamples: u32, a: &[u32]) {
    if i + 1 < nsamples {
        let factor = (i + 1) as f64 / nsamples as f64;
        for (s, &ak) in sample.iter_mut().zip(a) {
            let v = factor * ak as f64;
            *s = v - v.floor();
        }
    } else {
        // The last sample is pinned to the origin.
        sample.fill(0.0);
    }
}

/// ∫₀^{π/2} sin^m θ dθ via the Wallis recurrence
/// I_m = (m−1)/m · I_{m−2}, I_0 = π/2, I_1 = 1.
fn sin_power_integrals_half_pi(up_to: usize) -> Vec<f64> {
    let mut table = vec![0.0; up_to + 1];
    table[0] = std::f64::consts::FRAC_PI_2;
    if up_to >= 1 {
        table[1] = 1.0;
    }
    for m in 2..=up_to {
        table[m] = (m - 1) as f64 / m as f64 * table[m - 2];
    }
    table
}

/// ∫₀^b sin^m θ dθ by the same recurrence with the boundary term:
/// I_m(b) = ((m−1) I_{m−2}(b) − cos b · sin^{m−1} b) / m.
fn sin_power_integral_to(m: usize, b: f64) -> f64 {
    let (sin_b, cos_b) = b.sin_cos();
    let mut even = b; // I_0
    let mut odd = 1.0 - cos_b; // I_1
    if m == 0 {
        return even;
    }
    if m == 1 {
        return odd;
    }
    for k in 2..=m {
        let boundary = cos_b * pow_uint(sin_b, (k - 1) as u32);
        let prev = if k % 2 == 0 { even } else { odd };
        let next = ((k - 1) as f64 * prev - boundary) / k as f64;
        if k % 2 == 0 {
            even = next;
        } else {
            odd = next;
        }
    }
    if m % 2 == 0 { even } else { odd }
}

/// Invert θ = ∫₀^x sin^m by Newton's method from x = π/2.
fn solve_inverse_sin_power(theta: f64, m: usize, half_pi_table: &[f64]) -> f64 {
    let mut x = std::f64::consts::FRAC_PI_2;
    let mut f = half_pi_table[m] - theta;
    let mut iters = 0;
    while f.abs() > 1e-14 && iters < 64 {
        let g = pow_uint(x.sin(), m as u32);
        x -= f / g;
        f = sin_power_integral_to(m, x) - theta;
        iters += 1;
    }
    x
}

/// Γ(k/2) for integer k >= 1, exact for half-integer arguments.
fn gamma_half(k: u32) -> f64 {
    let mut g;
    let mut x;
    if k % 2 == 0 {
        g = 1.0; // Γ(1)
        x = 1.0;
    } else {
        g = std::f64::consts::PI.sqrt(); // Γ(1/2)
        x = 0.5;
    }
    while x < k as f64 / 2.0 {
        g *= x;
        x += 1.0;
    }
    g
}

/// Orthant surface of the unit d-sphere divided by d, which equals one
/// orthant of the unit ball volume: π^{d/2} / Γ(d/2 + 1) / 2^d.
fn sphere_volume_div_by_dim(d: usize) -> f64 {
    let d = d as u32;
    std::f64::consts::PI.powf(d as f64 * 0.5) / gamma_half(d + 2) / 2f64.powi(d as i32)
}

/// Shift `data` to box coordinates `ref − x` (flipping maximised
/// objectives) and drop points with any non-positive component.
fn transform_points(data: &[f64], dim: usize, r: &[f64], maximise: &[bool]) -> Vec<f64> {
    let mut points = Vec::with_capacity(data.len());
    'rows: for row in data.chunks_exact(dim) {
        let start = points.len();
        for k in 0..dim {
            let mut v = r[k] - row[k];
            if maximise[k] {
                v = -v;
            }
            if v <= 0.0 {
                points.truncate(start);
                continue 'rows;
            }
            points.push(v);
        }
    }
    points
}

fn max_scaled_radius(points: &[f64], dim: usize, w: &[f64]) -> f64 {
    let mut max_s_w: f64 = 0.0;
    for row in points.chunks_exact(dim) {
        let mut min_ratio = f64::INFINITY;
        for k in 0..dim {
            let ratio = row[k] * w[k];
            if ratio < min_ratio {
                min_ratio = ratio;
            }
        }
        if min_ratio > max_s_w {
            max_s_w = min_ratio;
        }
    }
    max_s_w
}

/// Quasi-Monte-Carlo hypervolume approximation (deterministic).
pub fn hv_approx_hua_wang(
    data: &[f64],
    dim: usize,
    r: &[f64],
    maximise: &[bool],
    nsamples: u32,
) -> f64 {
    assert!((2..=MAX_DIMENSION).contains(&dim));
    assert!(nsamples > 0);
    let points = transform_points(data, dim, r, maximise);
    if points.is_empty() {
        return 0.0;
    }

    let half_pi = sin_power_integrals_half_pi(dim);
    let polar_a = construct_polar_a(dim - 1, nsamples);
    let c_m = sphere_volume_div_by_dim(dim);

    let mut theta = vec![0.0; dim - 1];
    let mut w = vec![0.0; dim];
    let mut expected = 0.0;
    for i in 0..nsamples {
        compute_polar_sample(&mut theta, i, nsamples, &polar_a);
        // Invert each coordinate through its sin-power integral.
        for j in 0..dim - 1 {
            let m = dim - j - 2;
            theta[j] = solve_inverse_sin_power(theta[j] * half_pi[dim - 2 - j], m, &half_pi);
        }
        // Polar angles to a direction vector, then invert components so
        // the inner loop multiplies instead of divides.
        w[0] = theta.iter().map(|t| t.sin()).product();
        for j in 1..dim {
            let mut v = theta[dim - j - 1].cos();
            for t in &theta[..dim - j - 1] {
                v *= t.sin();
            }
            w[j] = v;
        }
        for v in w.iter_mut() {
            *v = if v.abs() <= EPSILON {
                1.0 / EPSILON
            } else {
                1.0 / *v
            };
        }
        expected += pow_uint(max_scaled_radius(&points, dim, &w), dim as u32);
    }
    c_m * expected / nsamples as f64
}

/// Monte-Carlo hypervolume approximation with a caller-supplied non-zero
/// seed for reproducibility.
pub fn hv_approx_normal(
    data: &[f64],
    dim: usize,
    r: &[f64],
    maximise: &[bool],
    nsamples: u32,
    seed: u32,
) -> f64 {
    assert!((2..=MAX_DIMENSION).contains(&dim));
    assert!(nsamples > 0);
    assert!(seed != 0, "the library boundary requires an explicit seed");
    let points = transform_points(data, dim, r, maximise);
    if points.is_empty() {
        return 0.0;
    }

    let mut rng = StdRng::seed_from_u64(seed as u64);
    let c_m = sphere_volume_div_by_dim(dim);
    let mut w = vec![0.0; dim];
    let mut expected = 0.0;
    for _ in 0..nsamples {
        for v in w.iter_mut() {
            let g: f64 = rng.sample(StandardNormal);
            *v = g.abs().max(1e-15);
        }
        let norm = w.iter().map(|v| v * v).sum::<f64>().sqrt();
        for v in w.iter_mut() {
            *v = norm / *v;
        }
        expected += pow_uint(max_scaled_radius(&points, dim, &w), dim as u32);
    }
    c_m * expected / nsamples as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hv::hypervolume;

    #[test]
    fn wallis_table() {
        let t = sin_power_integrals_half_pi(4);
        assert!((t[0] - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
        assert_eq!(t[1], 1.0);
        assert!((t[2] - std::f64::consts::FRAC_PI_4).abs() < 1e-15);
        assert!((t[3] - 2.0 / 3.0).abs() < 1e-15);
        assert!((t[4] - 3.0 * std::f64::consts::PI / 16.0).abs() < 1e-15);
    }

    #[test]
    fn partial_integral_matches_half_pi_table() {
        let t = sin_power_integrals_half_pi(8);
        for m in 0..=8 {
            let v = sin_power_integral_to(m, std::f64::consts::FRAC_PI_2);
            assert!((v - t[m]).abs() < 1e-12, "m={m}: {v} vs {}", t[m]);
        }
    }

    #[test]
    fn inverse_integral_round_trip() {
        let half_pi = sin_power_integrals_half_pi(6);
        for m in 0..6 {
            for frac in [0.1, 0.5, 0.9] {
                let theta = frac * half_pi[m];
                let x = solve_inverse_sin_power(theta, m, &half_pi);
                let back = sin_power_integral_to(m, x);
                assert!((back - theta).abs() < 1e-10, "m={m} frac={frac}");
            }
        }
    }

    #[test]
    fn sphere_constant() {
        // One orthant of the unit ball: π/4 in 2D, π/6 in 3D.
        assert!((sphere_volume_div_by_dim(2) - std::f64::consts::PI / 4.0).abs() < 1e-14);
        assert!((sphere_volume_div_by_dim(3) - std::f64::consts::PI / 6.0).abs() < 1e-14);
    }

    #[test]
    fn hua_wang_converges_to_exact() {
        let pts = vec![1.0, 6.0, 2.0, 4.0, 4.0, 3.0];
        let r = [5.0, 7.0];
        let exact = hypervolume(&pts, 2, &r);
        let approx = hv_approx_hua_wang(&pts, 2, &r, &[false, false], 50_000);
        assert!(
            (approx - exact).abs() / exact < 0.02,
            "{approx} vs {exact}"
        );
    }

    #[test]
    fn normal_mc_converges_to_exact() {
        let pts = vec![1.0, 2.0, 3.0, 2.0, 1.0, 3.0, 0.5, 0.5, 3.5];
        let r = [4.0, 4.0, 4.0];
        let exact = hypervolume(&pts, 3, &r);
        let approx = hv_approx_normal(&pts, 3, &r, &[false; 3], 100_000, 42);
        assert!(
            (approx - exact).abs() / exact < 0.05,
            "{approx} vs {exact}"
        );
    }

    #[test]
    fn deterministic_for_equal_inputs() {
        let pts = vec![1.0, 2.0, 2.0, 1.0];
        let r = [3.0, 3.0];
        let a = hv_approx_normal(&pts, 2, &r, &[false, false], 1000, 7);
        let b = hv_approx_normal(&pts, 2, &r, &[false, false], 1000, 7);
        assert_eq!(a, b);
        let c = hv_approx_hua_wang(&pts, 2, &r, &[false, false], 1000);
        let d = hv_approx_hua_wang(&pts, 2, &r, &[false, false], 1000);
        assert_eq!(c, d);
    }

    #[test]
    fn no_dominating_points_gives_zero() {
        let pts = vec![5.0, 5.0];
        assert_eq!(
            hv_approx_hua_wang(&pts, 2, &[4.0, 4.0], &[false, false], 100),
            0.0
        );
        assert_eq!(
            hv_approx_normal(&pts, 2, &[4.0, 4.0], &[false, false], 100, 1),
            0.0
        );
    }
}
