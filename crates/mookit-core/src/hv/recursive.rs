//! Recursive dimension-sweep hypervolume for five or more objectives.
//!
//! Each node sits in one circular doubly-linked list per sweep dimension
//! above the fourth. The recursion deletes points beyond the current
//! bound in the sweep dimension, accumulates area · Δcoordinate while
//! reinserting them, and bottoms out by handing the active points to the
//! 4D engine (Fonseca, Paquete and López-Ibáñez, CEC 2006).

use super::hv4d::hv4d_plus;
use crate::geometry::strongly_dominates;

/// The recursion stops at this 0-based coordinate: a call sweeping
/// coordinate 3 covers the first four objectives.
const STOP_DIMENSION: usize = 3;

const HEAD: u32 = 0;

struct RecList {
    /// Full objective count.
    dim: usize,
    /// Lists (and per-node area/volume slots) for coordinates 3..dim.
    d_stop: usize,
    /// Filtered points, row-major. Node k >= 1 owns row k - 1.
    pts: Vec<f64>,
    next: Vec<u32>,
    prev: Vec<u32>,
    area: Vec<f64>,
    vol: Vec<f64>,
    /// A point ignored at sweep coordinate `k` repeats its predecessor's
    /// area for every recursion at or below `k`.
    ignore: Vec<usize>,
}

impl RecList {
    fn x(&self, node: u32) -> &[f64] {
        debug_assert!(node != HEAD);
        let row = node as usize - 1;
        &self.pts[row * self.dim..(row + 1) * self.dim]
    }

    fn coord(&self, node: u32, k: usize) -> f64 {
        self.x(node)[k]
    }

    #[inline]
    fn slot(&self, node: u32, j: usize) -> usize {
        node as usize * self.d_stop + j
    }

    fn next_of(&self, node: u32, j: usize) -> u32 {
        self.next[self.slot(node, j)]
    }

    fn prev_of(&self, node: u32, j: usize) -> u32 {
        self.prev[self.slot(node, j)]
    }

    fn delete(&mut self, node: u32, sweep: usize, bound: &mut [f64]) {
        for i in STOP_DIMENSION..sweep {
            let j = i - STOP_DIMENSION;
            let prev = self.prev_of(node, j);
            let next = self.next_of(node, j);
            let prev_slot = self.slot(prev, j);
            self.next[prev_slot] = next;
            let next_slot = self.slot(next, j);
            self.prev[next_slot] = prev;
            let x_i = self.coord(node, i);
            if bound[j] > x_i {
                bound[j] = x_i;
            }
        }
    }

    fn reinsert(&mut self, node: u32, sweep: usize, bound: &mut [f64]) {
        for i in STOP_DIMENSION..sweep {
            let j = i - STOP_DIMENSION;
            let prev = self.prev_of(node, j);
            let next = self.next_of(node, j);
            let prev_slot = self.slot(prev, j);
            self.next[prev_slot] = node;
            let next_slot = self.slot(next, j);
            self.prev[next_slot] = node;
            let x_i = self.coord(node, i);
            if bound[j] > x_i {
                bound[j] = x_i;
            }
        }
    }
}

/// Link every node into one sorted circular list per sweep coordinate.
fn setup_lists(data: &[f64], dim: usize, r: &[f64]) -> RecList {
    let mut pts = Vec::new();
    for p in data.chunks_exact(dim) {
        if strongly_dominates(p, r) {
            pts.extend_from_slice(p);
        }
    }
    let n = pts.len() / dim;
    let d_stop = dim - STOP_DIMENSION;
    let mut lst = RecList {
        dim,
        d_stop,
        pts,
        next: vec![HEAD; (n + 1) * d_stop],
        prev: vec![HEAD; (n + 1) * d_stop],
        area: vec![0.0; (n + 1) * d_stop],
        vol: vec![0.0; (n + 1) * d_stop],
        ignore: vec![0; n + 1],
    };

    let mut order: Vec<u32> = (1..=n as u32).collect();
    for k in STOP_DIMENSION..dim {
        let j = k - STOP_DIMENSION;
        order.sort_by(|&a, &b| lst.coord(a, k).total_cmp(&lst.coord(b, k)));
        let mut prev = HEAD;
        for &node in &order {
            let prev_slot = lst.slot(prev, j);
            lst.next[prev_slot] = node;
            let node_slot = lst.slot(node, j);
            lst.prev[node_slot] = prev;
            prev = node;
        }
        let prev_slot = lst.slot(prev, j);
        lst.next[prev_slot] = HEAD;
        let head_slot = lst.slot(HEAD, j);
        lst.prev[head_slot] = prev;
    }
    lst
}

/// Hand the first four coordinates of the active points to the 4D engine.
fn hv_bottom_4d(lst: &RecList, c: usize, r: &[f64]) -> f64 {
    let mut p = lst.next_of(HEAD, 0);
    if c == 1 {
        let x = lst.x(p);
        return (r[0] - x[0]) * (r[1] - x[1]) * (r[2] - x[2]) * (r[3] - x[3]);
    }
    let mut scratch = Vec::with_capacity(c * 4);
    while p != HEAD {
        scratch.extend_from_slice(&lst.x(p)[..4]);
        p = lst.next_of(p, 0);
    }
    debug_assert_eq!(scratch.len(), c * 4);
    hv4d_plus(&scratch, &r[..4])
}

fn hv_recursive(
    lst: &mut RecList,
    sweep: usize,
    mut c: usize,
    r: &[f64],
    bound: &mut [f64],
) -> f64 {
    if sweep == STOP_DIMENSION {
        return hv_bottom_4d(lst, c, r);
    }

    let j = sweep - STOP_DIMENSION;
    // Reset stale ignore marks left over from sibling recursions.
    {
        let mut pp = lst.prev_of(HEAD, j);
        while pp != HEAD {
            if lst.ignore[pp as usize] < sweep {
                lst.ignore[pp as usize] = 0;
            }
            pp = lst.prev_of(pp, j);
        }
    }

    let mut p1 = lst.prev_of(HEAD, j);
    let mut p0 = HEAD;
    // Delete all points above the bound; with repeated coordinates, all
    // but one of the points sitting exactly on the bound go too. With
    // c > 1 the list holds at least two points, so p1's predecessor is
    // never the head.
    while c > 1 {
        let prev = lst.prev_of(p1, j);
        if lst.coord(p1, sweep) <= bound[j] && lst.coord(prev, sweep) < bound[j] {
            break;
        }
        lst.delete(p1, sweep, bound);
        p0 = p1;
        p1 = prev;
        c -= 1;
    }

    let mut hyperv = 0.0;
    if c > 1 {
        let pr = lst.prev_of(p1, j);
        let pr_slot = lst.slot(pr, j);
        hyperv = lst.vol[pr_slot]
            + lst.area[pr_slot] * (lst.coord(p1, sweep) - lst.coord(pr, sweep));
    } else {
        // Base: the area columns of the single remaining point are plain
        // box volumes in increasing dimension.
        let mut area = r[0] - lst.coord(p1, 0);
        for i in 1..=STOP_DIMENSION {
            area *= r[i] - lst.coord(p1, i);
        }
        let slot0 = lst.slot(p1, 0);
        lst.area[slot0] = area;
        for i in 1..=j {
            let grown =
                lst.area[lst.slot(p1, i - 1)] * (r[STOP_DIMENSION + i] - lst.coord(p1, STOP_DIMENSION + i));
            let slot_i = lst.slot(p1, i);
            lst.area[slot_i] = grown;
        }
    }

    loop {
        let p1_slot = lst.slot(p1, j);
        lst.vol[p1_slot] = hyperv;
        if lst.ignore[p1 as usize] >= sweep {
            let pr = lst.prev_of(p1, j);
            let pr_area = lst.area[lst.slot(pr, j)];
            let p1_slot = lst.slot(p1, j);
            lst.area[p1_slot] = pr_area;
        } else {
            let a = hv_recursive(lst, sweep - 1, c, r, bound);
            let p1_slot = lst.slot(p1, j);
            lst.area[p1_slot] = a;
            let pr = lst.prev_of(p1, j);
            if a <= lst.area[lst.slot(pr, j)] {
                lst.ignore[p1 as usize] = sweep;
            }
        }

        let p1_area = lst.area[lst.slot(p1, j)];
        if p0 == HEAD {
            hyperv += p1_area * (r[sweep] - lst.coord(p1, sweep));
            return hyperv;
        }
        hyperv += p1_area * (lst.coord(p0, sweep) - lst.coord(p1, sweep));
        bound[j] = lst.coord(p0, sweep);
        lst.reinsert(p0, sweep, bound);
        c += 1;
        p1 = p0;
        p0 = lst.next_of(p0, j);
    }
}

/// Entry point for `dim >= 5`.
pub(super) fn hv_recursive_entry(data: &[f64], dim: usize, r: &[f64]) -> f64 {
    debug_assert!(dim > STOP_DIMENSION + 1);
    let mut lst = setup_lists(data, dim, r);
    let n = lst.pts.len() / dim;
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        let x = lst.x(1);
        return (0..dim).map(|i| r[i] - x[i]).product();
    }
    let mut bound = vec![-f64::MAX; dim - STOP_DIMENSION];
    hv_recursive(&mut lst, dim - 1, n, r, &mut bound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_point_is_a_box() {
        let pts = vec![1.0, 1.0, 1.0, 1.0, 1.0, 2.0];
        let r = [3.0; 6];
        assert_eq!(hv_recursive_entry(&pts, 6, &r), 2.0f64.powi(5) * 1.0);
    }

    #[test]
    fn extrusion_of_4d_instance() {
        // Constant fifth coordinate: HV5D = HV4D * (r4 - w).
        let pts4 = vec![
            1.0, 2.0, 1.0, 1.0, //
            2.0, 1.0, 1.0, 1.0, //
        ];
        let mut pts5 = Vec::new();
        for row in pts4.chunks_exact(4) {
            pts5.extend_from_slice(row);
            pts5.push(2.0);
        }
        let hv4 = hv4d_plus(&pts4, &[3.0; 4]);
        let hv5 = hv_recursive_entry(&pts5, 5, &[3.0; 5]);
        assert!((hv5 - hv4).abs() < 1e-9, "{hv5} vs {hv4}");
    }

    #[test]
    fn ties_in_the_sweep_coordinate() {
        // Three points sharing the fifth coordinate plus one below.
        let pts = vec![
            1.0, 2.0, 1.0, 1.0, 2.0, //
            2.0, 1.0, 1.0, 1.0, 2.0, //
            1.5, 1.5, 1.0, 1.0, 2.0, //
            2.5, 2.5, 2.5, 2.5, 1.0, //
        ];
        let r = [3.0; 5];
        let hv = hv_recursive_entry(&pts, 5, &r);
        assert!(hv > 0.0);
        // Dropping the dominated slice member must not increase HV.
        let hv_small = hv_recursive_entry(&pts[..15], 5, &r);
        assert!(hv >= hv_small);
    }
}
