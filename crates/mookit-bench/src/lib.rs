//! Shared input generation for the mookit benchmarks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic cloud of points in [0, 1]^dim.
pub fn random_points(n: usize, dim: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n * dim).map(|_| rng.r#gen::<f64>()).collect()
}

/// Points on a spherical front, scaled into [0, 1]^dim; nothing
/// dominates anything, the worst case for the filters.
pub fn spherical_front(n: usize, dim: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(n * dim);
    for _ in 0..n {
        let raw: Vec<f64> = (0..dim).map(|_| rng.r#gen::<f64>().max(1e-9)).collect();
        let norm = raw.iter().map(|v| v * v).sum::<f64>().sqrt();
        out.extend(raw.iter().map(|v| v / norm));
    }
    out
}
