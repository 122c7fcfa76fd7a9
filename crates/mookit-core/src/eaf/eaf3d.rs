//! Three-objective attainment surfaces.
//!
//! A layered sweep in z: the cross-section of the level-ℓ attained
//! region at height z is the 2D level-ℓ attained region of the sets
//! truncated to points with z' <= z, and it only changes at input z
//! values. At every z event the 2D surface of the truncated sets is
//! rebuilt; points of it that the previous cross-section did not already
//! cover are minimal in three dimensions and join the output with the
//! sweep height as third coordinate. Worst case O(n² log n).

use super::{Eaf, eaf2d, run_table};

/// One 2D staircase, sorted by x ascending (y descending), used to test
/// whether a candidate was already attained at the previous z event.
struct Staircase {
    points: Vec<[f64; 2]>,
}

impl Staircase {
    fn empty() -> Self {
        Self { points: Vec::new() }
    }

    fn from_surface(surf: &Eaf) -> Self {
        Self {
            points: (0..surf.len())
                .map(|k| {
                    let p = surf.point(k);
                    [p[0], p[1]]
                })
                .collect(),
        }
    }

    /// True iff some staircase point weakly dominates (x, y).
    fn covers(&self, x: f64, y: f64) -> bool {
        // Rightmost point with x-coordinate <= x has the smallest y
        // among those candidates.
        let idx = self.points.partition_point(|p| p[0] <= x);
        if idx == 0 {
            return false;
        }
        self.points[idx - 1][1] <= y
    }
}

/// Three-objective attainment surfaces of a multi-set input.
pub fn eaf3d(data: &[f64], cumsizes: &[usize], levels: &[usize]) -> Vec<Eaf> {
    let nobj = 3;
    let nruns = cumsizes.len();
    let ntotal = *cumsizes.last().unwrap();
    let runtab = run_table(cumsizes);

    // Rows in ascending z, grouped into events of equal z.
    let mut order: Vec<usize> = (0..ntotal).collect();
    order.sort_by(|&a, &b| data[a * nobj + 2].total_cmp(&data[b * nobj + 2]));

    let mut out: Vec<Eaf> = levels
        .iter()
        .map(|_| Eaf::new(nobj, nruns, ntotal))
        .collect();
    let mut previous: Vec<Staircase> = levels.iter().map(|_| Staircase::empty()).collect();

    // Truncated input, regrouped by set at every event.
    let mut truncated_sets: Vec<Vec<f64>> = vec![Vec::new(); nruns];
    let mut flat = Vec::with_capacity(ntotal * 2);
    let mut flat_cumsizes = vec![0usize; nruns];

    let mut e = 0usize;
    while e < ntotal {
        let z = data[order[e] * nobj + 2];
        while e < ntotal && data[order[e] * nobj + 2] == z {
            let row = order[e];
            truncated_sets[runtab[row]]
                .extend_from_slice(&data[row * nobj..row * nobj + 2]);
            e += 1;
        }

        // Assemble the truncated multi-set; every set must be non-empty
        // for the 2D sweep, so skip sets that have no points yet by
        // keeping run indices aligned through a padding point at +inf.
        flat.clear();
        let mut total = 0usize;
        for (r, set) in truncated_sets.iter().enumerate() {
            if set.is_empty() {
                flat.extend_from_slice(&[f64::INFINITY, f64::INFINITY]);
                total += 1;
            } else {
                flat.extend_from_slice(set);
                total += set.len() / 2;
            }
            flat_cumsizes[r] = total;
        }

        let surfaces = eaf2d(&flat, &flat_cumsizes, levels);
        for (l, surf) in surfaces.iter().enumerate() {
            for k in 0..surf.len() {
                let p = surf.point(k);
                if p[0].is_infinite() || p[1].is_infinite() {
                    continue;
                }
                if !previous[l].covers(p[0], p[1]) {
                    let counts: Vec<i32> = surf
                        .attained_by(k)
                        .iter()
                        .map(|&b| i32::from(b))
                        .collect();
                    out[l].push_point(&[p[0], p[1], z], &counts);
                }
            }
            previous[l] = Staircase::from_surface(surf);
        }
    }
    out
}
