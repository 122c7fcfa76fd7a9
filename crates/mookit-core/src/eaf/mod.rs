//! Empirical attainment function (EAF) surfaces.
//!
//! Given m approximation sets, the level-ℓ attainment surface is the
//! lower boundary of the region weakly dominated by at least ℓ of the
//! sets. Constructors exist for two and three objectives; converters
//! turn pairs of consecutive surfaces into filled polygons or
//! axis-aligned rectangles coloured by the attainment count difference
//! between the first and second half of the sets.

mod diff;
mod eaf3d;
mod levels;
mod polygon;
mod rectangles;

pub use diff::{diff_interval, eafdiff_matrix, eafdiff_rectangles};
pub use eaf3d::eaf3d;
pub use levels::{all_percentiles, level_to_percentile, levels_from_percentiles, percentile_to_level};
pub use polygon::{PolygonSet, eaf_compute_polygon};
pub use rectangles::{RectSet, eaf_compute_rectangles};

use crate::bitset::BitMatrix;
use crate::error::{Error, Result};

/// One attainment surface: its points plus, per point, the mask of input
/// sets attaining it.
#[derive(Debug, Clone)]
pub struct Eaf {
    pub nruns: usize,
    pub dim: usize,
    /// Surface points, row-major.
    pub points: Vec<f64>,
    /// Row k holds the attainment mask of point k.
    pub attained: BitMatrix,
    maxsize: usize,
    nreallocs: u32,
}

impl Eaf {
    fn new(dim: usize, nruns: usize, npoints_hint: usize) -> Self {
        // Most surfaces are much smaller than the input; grow on demand
        // with decreasing aggressiveness.
        let maxsize = 256 + npoints_hint / (2 * nruns.max(1));
        let mut points = Vec::new();
        points.reserve_exact(maxsize * dim);
        Self {
            nruns,
            dim,
            points,
            attained: BitMatrix::new(nruns),
            maxsize,
            nreallocs: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, k: usize) -> &[f64] {
        &self.points[k * self.dim..(k + 1) * self.dim]
    }

    /// Attainment mask of point `k` as booleans.
    pub fn attained_by(&self, k: usize) -> Vec<bool> {
        self.attained.row(k)
    }

    fn push_point(&mut self, coords: &[f64], attained_counts: &[i32]) {
        debug_assert_eq!(coords.len(), self.dim);
        if self.len() == self.maxsize {
            let factor = 1.0 + 1.0 / 2f64.powf(self.nreallocs as f64 / 4.0);
            self.maxsize = (self.maxsize as f64 * factor) as usize + 100;
            self.nreallocs += 1;
            self.points.reserve_exact(self.maxsize * self.dim - self.points.len());
        }
        self.points.extend_from_slice(coords);
        self.attained.push_row_from_counts(attained_counts);
    }

    /// Signed difference between the attaining sets in the first half
    /// and in the second half, for point `k`.
    pub fn diff_color(&self, k: usize) -> i32 {
        let division = self.nruns / 2;
        let left = self.attained.count_range(k, 0, division) as i32;
        let right = self.attained.count_range(k, division, self.nruns) as i32;
        left - right
    }
}

fn validate(cumsizes: &[usize], levels: &[usize]) -> Result<()> {
    if cumsizes.is_empty() {
        return Err(Error::InputShape("no input sets".into()));
    }
    if !cumsizes.windows(2).all(|w| w[0] < w[1]) || cumsizes[0] == 0 {
        return Err(Error::InputShape(
            "cumulative set sizes must be strictly increasing".into(),
        ));
    }
    let nruns = cumsizes.len();
    for &l in levels {
        if l < 1 || l > nruns {
            return Err(Error::OutOfRange(format!(
                "attainment level {l} not in [1, {nruns}]"
            )));
        }
    }
    Ok(())
}

/// Attainment surfaces of a multi-set input at the requested levels.
/// `cumsizes` holds the cumulative row counts of the sets; `dim` must be
/// 2 or 3.
pub fn attsurf(
    data: &[f64],
    dim: usize,
    cumsizes: &[usize],
    levels: &[usize],
) -> Result<Vec<Eaf>> {
    validate(cumsizes, levels)?;
    let ntotal = *cumsizes.last().unwrap();
    if data.len() != ntotal * dim {
        return Err(Error::InputShape(format!(
            "expected {} values for {} points of dimension {}, got {}",
            ntotal * dim,
            ntotal,
            dim,
            data.len()
        )));
    }
    match dim {
        2 => Ok(eaf2d(data, cumsizes, levels)),
        3 => Ok(eaf3d(data, cumsizes, levels)),
        _ => Err(Error::OutOfRange(
            "attainment surfaces support only 2 or 3 objectives".into(),
        )),
    }
}

/// Map each row to the index of the set it belongs to.
fn run_table(cumsizes: &[usize]) -> Vec<usize> {
    let ntotal = *cumsizes.last().unwrap();
    let mut runtab = vec![0usize; ntotal];
    let mut j = 0;
    for (k, slot) in runtab.iter_mut().enumerate() {
        while k >= cumsizes[j] {
            j += 1;
        }
        *slot = j;
    }
    runtab
}

/// Two-objective attainment surfaces by dimension sweep: one cursor
/// moves right over x until the level is attained, the other moves down
/// over y until it no longer is; each turn of the staircase is one
/// surface point.
pub fn eaf2d(data: &[f64], cumsizes: &[usize], levels: &[usize]) -> Vec<Eaf> {
    let nobj = 2;
    let nruns = cumsizes.len();
    let ntotal = *cumsizes.last().unwrap();

    let datax = crate::sort::sorted_row_indices(data, nobj, |a, b| a[0].total_cmp(&b[0]));
    let datay = crate::sort::sorted_row_indices(data, nobj, |a, b| b[1].total_cmp(&a[1]));
    let px = |k: usize| &data[datax[k] * nobj..datax[k] * nobj + nobj];
    let py = |k: usize| &data[datay[k] * nobj..datay[k] * nobj + nobj];
    let runtab = run_table(cumsizes);

    let mut attained = vec![0i32; nruns];
    let mut save_attained = vec![0i32; nruns];

    let mut out = Vec::with_capacity(levels.len());
    for &level in levels {
        let mut eaf = Eaf::new(nobj, nruns, ntotal);
        attained.fill(0);
        let mut nattained = 0usize;
        let mut x = 0usize;
        let mut y = 0usize;

        // Start at the upper-left corner.
        let run = runtab[datax[0]];
        attained[run] += 1;
        nattained += 1;

        loop {
            // Move right until the level is attained, keeping x-ties
            // together.
            while x < ntotal - 1 && (nattained < level || px(x)[0] == px(x + 1)[0]) {
                x += 1;
                if px(x)[1] <= py(y)[1] {
                    let run = runtab[datax[x]];
                    if attained[run] == 0 {
                        nattained += 1;
                    }
                    attained[run] += 1;
                }
            }

            if nattained >= level {
                // Move down until the level is lost, folding y-ties and
                // remembering the mask as it was before the descent.
                loop {
                    save_attained.copy_from_slice(&attained);
                    loop {
                        if py(y)[0] <= px(x)[0] {
                            let run = runtab[datay[y]];
                            attained[run] -= 1;
                            if attained[run] == 0 {
                                nattained -= 1;
                            }
                        }
                        y += 1;
                        if !(y < ntotal && py(y)[1] == py(y - 1)[1]) {
                            break;
                        }
                    }
                    if !(nattained >= level && y < ntotal) {
                        break;
                    }
                }
                debug_assert!(nattained < level);
                eaf.push_point(&[px(x)[0], py(y - 1)[1]], &save_attained);
            }

            if !(x < ntotal - 1 && y < ntotal) {
                break;
            }
        }
        out.push(eaf);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_set_input() -> (Vec<f64>, Vec<usize>) {
        // S1 = {(1,3), (3,1)}, S2 = {(2,2)}.
        (vec![1.0, 3.0, 3.0, 1.0, 2.0, 2.0], vec![2, 3])
    }

    #[test]
    fn level_one_surface() {
        let (data, cumsizes) = two_set_input();
        let eaf = attsurf(&data, 2, &cumsizes, &[1]).unwrap();
        assert_eq!(eaf[0].len(), 3);
        let pts: Vec<&[f64]> = (0..3).map(|k| eaf[0].point(k)).collect();
        assert_eq!(pts[0], &[1.0, 3.0]);
        assert_eq!(pts[1], &[2.0, 2.0]);
        assert_eq!(pts[2], &[3.0, 1.0]);
        assert_eq!(eaf[0].attained_by(0), vec![true, false]);
        assert_eq!(eaf[0].attained_by(1), vec![false, true]);
        assert_eq!(eaf[0].attained_by(2), vec![true, false]);
    }

    #[test]
    fn level_two_surface() {
        let (data, cumsizes) = two_set_input();
        let eaf = attsurf(&data, 2, &cumsizes, &[2]).unwrap();
        assert_eq!(eaf[0].len(), 2);
        assert_eq!(eaf[0].point(0), &[2.0, 3.0]);
        assert_eq!(eaf[0].point(1), &[3.0, 2.0]);
        assert_eq!(eaf[0].attained_by(0), vec![true, true]);
        assert_eq!(eaf[0].attained_by(1), vec![true, true]);
    }

    #[test]
    fn surface_monotone_across_levels() {
        let data = vec![
            1.0, 4.0, 4.0, 1.0, // set 1
            2.0, 3.0, 3.0, 2.0, // set 2
            1.5, 3.5, 3.5, 1.5, // set 3
        ];
        let cumsizes = vec![2, 4, 6];
        let eaf = attsurf(&data, 2, &cumsizes, &[1, 2, 3]).unwrap();
        // Every point of a deeper level is weakly dominated by some
        // point of the shallower one.
        for pair in eaf.windows(2) {
            for k in 0..pair[1].len() {
                let q = pair[1].point(k);
                let dominated = (0..pair[0].len()).any(|i| {
                    let p = pair[0].point(i);
                    p[0] <= q[0] && p[1] <= q[1]
                });
                assert!(dominated, "{q:?} escapes the shallower surface");
            }
        }
    }

    #[test]
    fn bad_level_is_rejected() {
        let (data, cumsizes) = two_set_input();
        assert!(attsurf(&data, 2, &cumsizes, &[0]).is_err());
        assert!(attsurf(&data, 2, &cumsizes, &[3]).is_err());
    }

    #[test]
    fn duplicate_columns_stay_grouped() {
        // Two points of different sets sharing x; level 2 must see them
        // as one column.
        let data = vec![
            1.0, 3.0, //
            1.0, 2.0, //
        ];
        let cumsizes = vec![1, 2];
        let eaf = attsurf(&data, 2, &cumsizes, &[2]).unwrap();
        assert_eq!(eaf[0].len(), 1);
        assert_eq!(eaf[0].point(0), &[1.0, 3.0]);
    }
}
