//! Attainment levels and percentiles.

/// Percentile of `level` out of `n` sets.
pub fn level_to_percentile(level: usize, n: usize) -> f64 {
    if level == n {
        100.0
    } else {
        level as f64 * 100.0 / n as f64
    }
}

/// Level for a percentile in (0, 100]. Values within √ε of an integer
/// round down instead of up; level 0 clamps to 1.
pub fn percentile_to_level(p: f64, n: usize) -> usize {
    assert!(
        p > 0.0 && p <= 100.0,
        "percentile {p} outside (0, 100]"
    );
    let tolerance = f64::EPSILON.sqrt();
    let x = n as f64 * p / 100.0;
    let level = if x - x.floor() <= tolerance {
        x.floor() as usize
    } else {
        x.ceil() as usize
    };
    debug_assert!(level <= n);
    level.max(1)
}

/// Levels for a percentile list, or every level 1..=nruns when no
/// percentiles are given.
pub fn levels_from_percentiles(percentiles: Option<&[f64]>, nruns: usize) -> Vec<usize> {
    match percentiles {
        Some(ps) => ps.iter().map(|&p| percentile_to_level(p, nruns)).collect(),
        None => (1..=nruns).collect(),
    }
}

/// The percentiles of all `n_sets` levels.
pub fn all_percentiles(n_sets: usize) -> Vec<f64> {
    let x = 100.0 / n_sets as f64;
    (1..=n_sets).map(|i| i as f64 * x).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_exact_levels() {
        for n in [1usize, 2, 5, 10, 100] {
            for level in 1..=n {
                let p = level_to_percentile(level, n);
                assert_eq!(percentile_to_level(p, n), level, "n={n} level={level}");
            }
        }
    }

    #[test]
    fn median_of_ten() {
        assert_eq!(percentile_to_level(50.0, 10), 5);
        assert_eq!(percentile_to_level(51.0, 10), 6);
        assert_eq!(percentile_to_level(49.9, 10), 5);
    }

    #[test]
    fn small_percentiles_clamp_to_one() {
        assert_eq!(percentile_to_level(0.001, 10), 1);
    }

    #[test]
    fn default_levels_are_all() {
        assert_eq!(levels_from_percentiles(None, 3), vec![1, 2, 3]);
        assert_eq!(
            levels_from_percentiles(Some(&[50.0, 100.0]), 4),
            vec![2, 4]
        );
    }

    #[test]
    fn all_percentiles_end_at_hundred() {
        let ps = all_percentiles(4);
        assert_eq!(ps, vec![25.0, 50.0, 75.0, 100.0]);
    }
}
