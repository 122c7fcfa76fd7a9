//! Axis-aligned rectangle decomposition between consecutive attainment
//! surfaces.
//!
//! A simpler two-cursor sweep than the polygon walk: rectangles span
//! from a point of the shallower surface to the staircase of the deeper
//! one, bounded above by a running top, each carrying the colour of its
//! left corner. Coordinates repeated between the two surfaces merge.

use super::Eaf;

/// Rectangles as (xmin, ymin, xmax, ymax) with one colour each.
#[derive(Debug, Clone, Default)]
pub struct RectSet {
    pub rects: Vec<[f64; 4]>,
    pub colors: Vec<i32>,
}

impl RectSet {
    fn add(&mut self, lx: f64, ly: f64, ux: f64, uy: f64, color: i32) {
        debug_assert!(lx < ux);
        debug_assert!(ly < uy);
        self.rects.push([lx, ly, ux, uy]);
        self.colors.push(color);
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Rectangles for every pair of consecutive surfaces.
pub fn eaf_compute_rectangles(surfs: &[Eaf]) -> RectSet {
    let nruns = surfs[0].nruns;
    assert!(nruns % 2 == 0, "colour differences need an even set count");
    let mut regions = RectSet::default();
    for b in 1..surfs.len() {
        rectangles_between(&surfs[b - 1], &surfs[b], &mut regions);
    }
    regions
}

fn rectangles_between(sa: &Eaf, sb: &Eaf, regions: &mut RectSet) {
    const INF: f64 = f64::INFINITY;
    let ea_size = sa.len();
    let eb_size = sb.len();
    if ea_size == 0 || eb_size == 0 {
        return;
    }
    let color: Vec<i32> = (0..ea_size).map(|k| sa.diff_color(k)).collect();
    let pa = |k: usize| sa.point(k);
    let pb = |k: usize| sb.point(k);

    let mut top = INF;
    let mut ka = 0usize;
    let mut kb = 0usize;
    let mut pka = pa(ka);
    let mut pkb = pb(kb);

    let b_exhausted = 'sweep: loop {
        while pka[1] < pkb[1] {
            if pka[0] < pkb[0] {
                // pka strictly dominates pkb's column.
                regions.add(pka[0], pkb[1], pkb[0], top, color[ka]);
            }
            top = pkb[1];
            kb += 1;
            if kb >= eb_size {
                break 'sweep true;
            }
            pkb = pb(kb);
        }
        // pka at or above pkb.
        if pka[0] < pkb[0] {
            regions.add(pka[0], pka[1], pkb[0], top, color[ka]);
        } else {
            // Skip exactly repeated points.
            debug_assert!(pka[0] == pkb[0] && pka[1] == pkb[1]);
        }
        top = pka[1];
        ka += 1;
        if ka >= ea_size {
            break 'sweep false;
        }
        pka = pa(ka);

        if pkb[1] == top {
            // pkb was level with the previous pka; move on.
            kb += 1;
            if kb >= eb_size {
                break 'sweep true;
            }
            pkb = pb(kb);
        }
    };

    if b_exhausted {
        // One unbounded rectangle per remaining point of a.
        loop {
            debug_assert!(pka[1] < pkb[1]);
            regions.add(pka[0], pka[1], INF, top, color[ka]);
            top = pka[1];
            ka += 1;
            if ka >= ea_size {
                break;
            }
            pka = pa(ka);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::attsurf;
    use super::*;

    fn two_runs() -> Vec<Eaf> {
        let data = vec![
            1.0, 3.0, 3.0, 1.0, // run 1
            2.0, 2.0, // run 2
        ];
        attsurf(&data, 2, &[2, 3], &[1, 2]).unwrap()
    }

    #[test]
    fn rectangles_have_positive_area() {
        let surfs = two_runs();
        let rs = eaf_compute_rectangles(&surfs);
        assert!(!rs.is_empty());
        for r in &rs.rects {
            assert!(r[2] > r[0] && r[3] > r[1], "degenerate {r:?}");
        }
        assert_eq!(rs.rects.len(), rs.colors.len());
    }

    #[test]
    fn rectangles_do_not_overlap() {
        let surfs = two_runs();
        let rs = eaf_compute_rectangles(&surfs);
        for i in 0..rs.len() {
            for j in i + 1..rs.len() {
                let a = rs.rects[i];
                let b = rs.rects[j];
                let separated =
                    a[2] <= b[0] || b[2] <= a[0] || a[3] <= b[1] || b[3] <= a[1];
                assert!(separated, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn finite_rectangle_areas_match_strip() {
        // The finite-area strip between the two surfaces of two_runs()
        // decomposes into unit cells around (2,2)..(3,3).
        let surfs = two_runs();
        let rs = eaf_compute_rectangles(&surfs);
        let finite_area: f64 = rs
            .rects
            .iter()
            .filter(|r| r.iter().all(|v| v.is_finite()))
            .map(|r| (r[2] - r[0]) * (r[3] - r[1]))
            .sum();
        assert!((finite_area - 1.0).abs() < 1e-12, "area {finite_area}");
    }
}
