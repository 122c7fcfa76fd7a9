//! Filled polygons between consecutive attainment surfaces.
//!
//! For surfaces a < b, each maximal run of equal colour along surface a
//! opens one polygon: down the staircase of a, across to surface b, and
//! back up b in reverse until the run's horizontal span is covered.
//! Colour is the attainment count difference between the first and the
//! second half of the input sets, so the set count must be even.
//! Degenerate column overlaps between the two levels are carried over
//! through `topleft_y` so polygons share edges but never interiors.

use super::Eaf;

/// Closed polygons as a flat point vector; each polygon ends with a
/// (-inf, -inf) sentinel pair and owns one entry of `colors`.
#[derive(Debug, Clone, Default)]
pub struct PolygonSet {
    pub xy: Vec<f64>,
    pub colors: Vec<i32>,
}

impl PolygonSet {
    /// Iterate over the polygons as point slices (sentinel excluded).
    pub fn polygons(&self) -> impl Iterator<Item = &[f64]> {
        self.xy
            .split(|v| *v == f64::NEG_INFINITY)
            .filter(|s| !s.is_empty())
    }
}

fn init_colors(surf: &Eaf) -> Vec<i32> {
    (0..surf.len()).map(|k| surf.diff_color(k)).collect()
}

/// Polygons for every pair of consecutive surfaces.
pub fn eaf_compute_polygon(surfs: &[Eaf]) -> PolygonSet {
    let nruns = surfs[0].nruns;
    assert!(nruns % 2 == 0, "colour differences need an even set count");
    let mut polygon = PolygonSet::default();

    for b in 1..surfs.len() {
        polygons_between(&surfs[b - 1], &surfs[b], &mut polygon);
    }
    #[cfg(debug_assertions)]
    check_polygons(&polygon);
    polygon
}

fn polygons_between(sa: &Eaf, sb: &Eaf, polygon: &mut PolygonSet) {
    const INF: f64 = f64::INFINITY;
    let ea_size = sa.len() as i64;
    let eb_size = sb.len() as i64;
    let color = init_colors(sa);
    let pa = |k: i64| sa.point(k as usize);
    let pb = |k: i64| sb.point(k as usize);

    let mut topleft_y = INF;
    let mut last_b: i64 = -1;
    let mut ka: i64 = 0;
    loop {
        let mut kb = last_b + 1;
        // Skip the prefix where a and b overlap in the same x column.
        while ka < ea_size && kb < eb_size {
            let pka = pa(ka);
            let pkb = pb(kb);
            if pkb[0] != pka[0] {
                break;
            }
            topleft_y = pkb[1];
            last_b = kb;
            if pkb[1] == pka[1] {
                // Exactly overlapping points appear with repeated
                // coordinates in the input; skip both.
                ka += 1;
                kb += 1;
            } else {
                debug_assert!(pkb[1] > pka[1]);
                kb += 1;
                break;
            }
        }

        // Everything in a was overlapping.
        if ka == ea_size {
            break;
        }

        let mut prev_pka_y = topleft_y;
        let color_0 = color[ka as usize];
        let mut pka;
        // Walk down surface a until the colour changes or b intersects.
        loop {
            pka = pa(ka);
            while kb < eb_size {
                let pkb = pb(kb);
                debug_assert!(pkb[0] > pka[0]);
                if pkb[1] <= pka[1] {
                    break;
                }
                kb += 1;
            }
            debug_assert!(pka[1] < prev_pka_y);
            push_point(polygon, pka[0], prev_pka_y);
            push_point(polygon, pka[0], pka[1]);
            prev_pka_y = pka[1];
            ka += 1;

            if kb < eb_size && ka < ea_size {
                let pkb = pb(kb);
                let pka_next = pa(ka);
                if pkb[0] <= pka_next[0] {
                    // Surface b intersects a: close here.
                    break;
                }
            }
            if !(ka < ea_size && color_0 == color[ka as usize]) {
                break;
            }
        }

        if ka == ea_size {
            // Surface a is exhausted; walk the whole of b back.
            if last_b == eb_size - 1 {
                // Nothing left on the other side.
                push_point(polygon, INF, pka[1]);
                push_point(polygon, INF, topleft_y);
                debug_assert!(topleft_y > pka[1]);
            } else {
                let mut kb = eb_size - 1;
                let mut pkb = pb(kb);
                debug_assert!(pkb[1] >= pka[1]);
                if pkb[1] > pka[1] {
                    // Turn the corner through infinity.
                    push_point(polygon, INF, pka[1]);
                    push_point(polygon, INF, pkb[1]);
                    debug_assert!(pkb[1] <= topleft_y);
                }
                let mut prev_pkb_x = pkb[0];
                push_point(polygon, pkb[0], pkb[1]);
                kb -= 1;
                while kb > last_b {
                    pkb = pb(kb);
                    debug_assert!(pkb[1] > pka[1]);
                    push_point(polygon, prev_pkb_x, pkb[1]);
                    push_point(polygon, pkb[0], pkb[1]);
                    prev_pkb_x = pkb[0];
                    kb -= 1;
                }
                push_point(polygon, pkb[0], topleft_y);
                debug_assert!(topleft_y > pkb[1]);
            }
            close_polygon(polygon, color_0);
            break;
        }

        if kb == eb_size {
            debug_assert!(pka[1] < topleft_y);
            push_point(polygon, INF, pka[1]);
            push_point(polygon, INF, topleft_y);
            last_b = eb_size - 1;
        } else {
            // Bounded above by b between last_b and kb.
            let mut pkb = pb(kb);
            debug_assert!(pkb[1] <= pka[1]);
            debug_assert!(pkb[0] != pka[0]);
            // A shared horizontal means this b point still bounds the
            // next polygon.
            let save_last_b = if pkb[1] == pka[1] { kb } else { kb - 1 };
            let mut prev_pkb_x = pkb[0];
            push_point(polygon, pkb[0], pka[1]);
            kb -= 1;
            while kb > last_b {
                pkb = pb(kb);
                debug_assert!(pkb[1] > pka[1]);
                push_point(polygon, prev_pkb_x, pkb[1]);
                push_point(polygon, pkb[0], pkb[1]);
                prev_pkb_x = pkb[0];
                kb -= 1;
            }
            push_point(polygon, pkb[0], topleft_y);
            debug_assert!(topleft_y > pkb[1]);
            last_b = save_last_b;
        }
        close_polygon(polygon, color_0);
        debug_assert!(topleft_y >= pka[1]);
        topleft_y = pka[1];
    }
}

fn push_point(polygon: &mut PolygonSet, x: f64, y: f64) {
    polygon.xy.push(x);
    polygon.xy.push(y);
}

fn close_polygon(polygon: &mut PolygonSet, color: i32) {
    polygon.colors.push(color);
    push_point(polygon, f64::NEG_INFINITY, f64::NEG_INFINITY);
}

// ---------------------------------------------------------------------
// Debug validation: emitted polygons must not overlap pairwise.
// ---------------------------------------------------------------------

#[cfg(debug_assertions)]
fn min_max_coordinate(poly: &[f64], k: usize) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in poly.chunks_exact(2) {
        min = min.min(p[k]);
        max = max.max(p[k]);
    }
    (min, max)
}

#[cfg(debug_assertions)]
fn polygon_dominates_point(poly: &[f64], x: &[f64]) -> bool {
    poly.chunks_exact(2).any(|p| p[0] < x[0] && p[1] < x[1])
}

#[cfg(debug_assertions)]
fn polygon_dominates_any_point(a: &[f64], b: &[f64]) -> bool {
    b.chunks_exact(2).any(|x| polygon_dominates_point(a, x))
}

#[cfg(debug_assertions)]
fn polygons_intersect(a: &[f64], b: &[f64]) -> bool {
    for k in 0..2 {
        let (min_a, max_a) = min_max_coordinate(a, k);
        let (min_b, max_b) = min_max_coordinate(b, k);
        // A separating line on either axis rules an overlap out.
        if max_a <= min_b || max_b <= min_a {
            return false;
        }
    }
    // Orthogonal polygons overlap iff each has a corner dominated by a
    // corner of the other.
    polygon_dominates_any_point(a, b) && polygon_dominates_any_point(b, a)
}

#[cfg(debug_assertions)]
fn check_polygons(p: &PolygonSet) {
    let polys: Vec<&[f64]> = p.polygons().collect();
    for i in 0..polys.len() {
        for j in i + 1..polys.len() {
            assert!(
                !polygons_intersect(polys[i], polys[j]),
                "polygons {i} and {j} overlap"
            );
        }
    }
}
