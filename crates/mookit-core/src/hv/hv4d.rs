//! HV4D+: four-objective hypervolume.
//!
//! The fourth coordinate is swept in ascending order; each step solves a
//! one-contribution problem in three dimensions against the HV3D+ list of
//! the points already processed, then accumulates 3D volume · Δw
//! (Guerreiro and Fonseca, IEEE TEC 22(3), 2018). The list carries two
//! link directions (z order and w order) plus the `closest` delimiters
//! needed to rebuild the 2D staircase at any z.

use crate::geometry::{strongly_dominates, weakly_dominates};
use crate::sort::{cmp_lex_rev_asc, sorted_row_indices};

const DIM: usize = 4;

#[derive(Debug, Clone, Copy)]
struct Node4 {
    x: [f64; DIM],
    /// next[0]: z order, next[1]: w order.
    next: [u32; 2],
    prev: [u32; 2],
    closest: [u32; 2],
    cnext: [u32; 2],
}

const S1: u32 = 0; // (-MAX, r1, -MAX, -MAX)
const S2: u32 = 1; // (r0, -MAX, -MAX, -MAX)
const S3: u32 = 2; // (-MAX, -MAX, r2, r3)
const NONE: u32 = u32::MAX;

fn setup_list(data: &[f64], r: &[f64]) -> Vec<Node4> {
    let keep: Vec<&[f64]> = data
        .chunks_exact(DIM)
        .filter(|p| strongly_dominates(p, r))
        .collect();
    let mut flat: Vec<f64> = Vec::with_capacity(keep.len() * DIM);
    for p in &keep {
        flat.extend_from_slice(p);
    }
    let order = sorted_row_indices(&flat, DIM, cmp_lex_rev_asc);

    let inf = f64::MAX;
    let sentinel = |x: [f64; DIM]| Node4 {
        x,
        next: [NONE; 2],
        prev: [NONE; 2],
        closest: [S2, S1],
        cnext: [NONE; 2],
    };
    let mut nodes = vec![
        sentinel([-inf, r[1], -inf, -inf]),
        sentinel([r[0], -inf, -inf, -inf]),
        sentinel([-inf, -inf, r[2], r[3]]),
    ];
    // Circular sentinel links in both directions.
    for d in 0..2 {
        nodes[S1 as usize].next[d] = S2;
        nodes[S1 as usize].prev[d] = S3;
        nodes[S2 as usize].next[d] = S3;
        nodes[S2 as usize].prev[d] = S1;
        nodes[S3 as usize].next[d] = S1;
        nodes[S3 as usize].prev[d] = S2;
    }

    // Points enter the w list only; the z list grows during the sweep.
    let mut q = S2;
    for (i, &row) in order.iter().enumerate() {
        let idx = (3 + i) as u32;
        let mut x = [0.0; DIM];
        x.copy_from_slice(&flat[row * DIM..row * DIM + DIM]);
        nodes.push(Node4 {
            x,
            next: [NONE, S3],
            prev: [NONE, q],
            closest: [NONE, NONE],
            cnext: [NONE, NONE],
        });
        nodes[q as usize].next[1] = idx;
        q = idx;
    }
    nodes[q as usize].next[1] = S3;
    nodes[S3 as usize].prev[1] = q;
    nodes
}

#[inline]
fn remove_from_z(nodes: &mut [Node4], old: u32) {
    let prev = nodes[old as usize].prev[0];
    let next = nodes[old as usize].next[0];
    nodes[prev as usize].next[0] = next;
    nodes[next as usize].prev[0] = prev;
}

#[inline]
fn add_to_z(nodes: &mut [Node4], newp: u32) {
    // newp's old successor may have been removed as dominated.
    let prev = nodes[newp as usize].prev[0];
    let next = nodes[prev as usize].next[0];
    nodes[newp as usize].next[0] = next;
    nodes[next as usize].prev[0] = newp;
    nodes[prev as usize].next[0] = newp;
}

#[inline]
fn lex_less_3d(a: &[f64], b: &[f64]) -> bool {
    a[2] < b[2]
        || (a[2] == b[2] && (a[1] < b[1] || (a[1] == b[1] && a[0] <= b[0])))
}

#[inline]
fn lex_cmp_3d_102(a: &[f64], b: &[f64]) -> bool {
    a[1] < b[1] || (a[1] == b[1] && (a[0] < b[0] || (a[0] == b[0] && a[2] < b[2])))
}

#[inline]
fn lex_cmp_3d_012(a: &[f64], b: &[f64]) -> bool {
    a[0] < b[0] || (a[0] == b[0] && (a[1] < b[1] || (a[1] == b[1] && a[2] < b[2])))
}

/// Walk the z list and either drop points now dominated by `newp` in
/// (x, y, z) or record `newp` as a nearer delimiter.
fn update_links(nodes: &mut [Node4], newp: u32) {
    let newx = nodes[newp as usize].x;
    let mut p = nodes[newp as usize].next[0];
    while p != S3 {
        let px = nodes[p as usize].x;
        let next = nodes[p as usize].next[0];
        if px[0] <= newx[0] && px[1] <= newx[1] && (px[0] < newx[0] || px[1] < newx[1]) {
            return;
        }
        if newx[0] <= px[0] {
            if newx[1] <= px[1] {
                remove_from_z(nodes, p);
            } else if newx[0] < px[0]
                && lex_cmp_3d_102(&newx, &nodes[nodes[p as usize].closest[1] as usize].x)
            {
                nodes[p as usize].closest[1] = newp;
            }
        } else if newx[1] < px[1]
            && lex_cmp_3d_012(&newx, &nodes[nodes[p as usize].closest[0] as usize].x)
        {
            nodes[p as usize].closest[0] = newp;
        }
        p = next;
    }
}

/// Rebuild the 2D staircase at z = `newp.z` while locating `newp`'s
/// delimiters and its slot in the z list. Returns false when `newp` is
/// dominated in (x, y, z) and contributes nothing.
fn restart_base_setup_z_and_closest(nodes: &mut [Node4], newp: u32) -> bool {
    let newx = nodes[newp as usize].x;
    let mut closest0 = S2;
    let mut closest1 = S1;
    // Relink the sentinels of the 2D staircase.
    nodes[S1 as usize].cnext[0] = S2;
    nodes[S2 as usize].cnext[1] = S1;

    let mut p = nodes[S2 as usize].next[0];
    loop {
        let px = nodes[p as usize].x;
        if px[0] <= newx[0] && px[1] <= newx[1] && px[2] <= newx[2] {
            debug_assert!(weakly_dominates(&px[..3], &newx[..3]));
            return false;
        }
        if !lex_less_3d(&px, &newx) {
            nodes[newp as usize].closest = [closest0, closest1];
            nodes[newp as usize].prev[0] = nodes[p as usize].prev[0];
            nodes[newp as usize].next[0] = p;
            return true;
        }

        // Reconstruct the staircase membership of p.
        let c = nodes[p as usize].closest;
        nodes[p as usize].cnext = c;
        nodes[c[0] as usize].cnext[1] = p;
        nodes[c[1] as usize].cnext[0] = p;

        let c0x = nodes[closest0 as usize].x;
        let c1x = nodes[closest1 as usize].x;
        if px[1] < newx[1] && (px[0] < c0x[0] || (px[0] == c0x[0] && px[1] < c0x[1])) {
            closest0 = p;
        } else if px[0] < newx[0] && (px[1] < c1x[1] || (px[1] == c1x[1] && px[0] < c1x[0])) {
            closest1 = p;
        }
        p = nodes[p as usize].next[0];
    }
}

fn compute_area_simple(nodes: &[Node4], px: &[f64], q: u32, i: usize) -> f64 {
    let j = 1 - i;
    let mut q = q;
    let mut u = nodes[q as usize].cnext[i];
    let mut area = (nodes[q as usize].x[j] - px[j]) * (nodes[u as usize].x[i] - px[i]);
    while px[j] < nodes[u as usize].x[j] {
        q = u;
        u = nodes[u as usize].cnext[i];
        area += (nodes[q as usize].x[j] - px[j])
            * (nodes[u as usize].x[i] - nodes[q as usize].x[i]);
    }
    area
}

/// Volume exclusively dominated by `newp` in (x, y, z), swept upward in z
/// from `newp.z`. Updates the staircase links in place so the caller can
/// resume at the next z event.
fn one_contribution_3d(nodes: &mut [Node4], newp: u32) -> f64 {
    let c = nodes[newp as usize].closest;
    nodes[newp as usize].cnext = c;
    let newx = nodes[newp as usize].x;
    // If newx shares x with its delimiter the first strip is empty.
    let mut area = compute_area_simple(nodes, &newx, c[0], 1);
    let mut volume = 0.0;
    let mut lastz = newx[2];
    let mut p = nodes[newp as usize].next[0];
    loop {
        let px = nodes[p as usize].x;
        volume += area * (px[2] - lastz);
        if px[0] <= newx[0] && px[1] <= newx[1] {
            return volume;
        }
        let pc = nodes[p as usize].closest;
        nodes[p as usize].cnext = pc;

        if px[0] < newx[0] {
            if px[1] <= nodes[nodes[newp as usize].cnext[1] as usize].x[1] {
                let tmp = [newx[0], px[1]];
                area -= compute_area_simple(nodes, &tmp, nodes[newp as usize].cnext[1], 0);
                let nc1 = nodes[newp as usize].cnext[1];
                nodes[p as usize].cnext[1] = nc1;
                let pc0 = nodes[p as usize].cnext[0];
                nodes[pc0 as usize].cnext[1] = p;
                nodes[newp as usize].cnext[1] = p;
            }
        } else if px[1] < newx[1] {
            if px[0] <= nodes[nodes[newp as usize].cnext[0] as usize].x[0] {
                let tmp = [px[0], newx[1]];
                area -= compute_area_simple(nodes, &tmp, nodes[newp as usize].cnext[0], 1);
                let nc0 = nodes[newp as usize].cnext[0];
                nodes[p as usize].cnext[0] = nc0;
                let pc1 = nodes[p as usize].cnext[1];
                nodes[pc1 as usize].cnext[0] = p;
                nodes[newp as usize].cnext[0] = p;
            }
        } else {
            area -= compute_area_simple(nodes, &px, nodes[p as usize].cnext[0], 1);
            let pc1 = nodes[p as usize].cnext[1];
            nodes[pc1 as usize].cnext[0] = p;
            let pc0 = nodes[p as usize].cnext[0];
            nodes[pc0 as usize].cnext[1] = p;
        }
        lastz = px[2];
        p = nodes[p as usize].next[0];
    }
}

/// Four-objective hypervolume (minimisation) of `data` against `r`.
pub fn hv4d_plus(data: &[f64], r: &[f64]) -> f64 {
    assert_eq!(r.len(), DIM);
    let mut nodes = setup_list(data, r);
    if nodes.len() == 3 {
        return 0.0;
    }

    let mut volume = 0.0;
    let mut hv = 0.0;
    let mut newp = nodes[S2 as usize].next[1];
    while newp != S3 {
        if restart_base_setup_z_and_closest(&mut nodes, newp) {
            let v = one_contribution_3d(&mut nodes, newp);
            debug_assert!(v > 0.0);
            volume += v;
            add_to_z(&mut nodes, newp);
            update_links(&mut nodes, newp);
        }
        let next_w = nodes[newp as usize].next[1];
        let height = nodes[next_w as usize].x[3] - nodes[newp as usize].x[3];
        debug_assert!(height >= 0.0);
        hv += volume * height;
        newp = next_w;
    }
    hv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_point_box() {
        let pts = vec![1.0, 1.0, 1.0, 1.0];
        assert_eq!(hv4d_plus(&pts, &[3.0, 3.0, 3.0, 2.0]), 8.0);
    }

    #[test]
    fn duplicate_point_counts_once() {
        let pts = vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        assert_eq!(hv4d_plus(&pts, &[2.0, 2.0, 2.0, 2.0]), 1.0);
    }

    #[test]
    fn incomparable_pair_inclusion_exclusion() {
        let pts = vec![
            1.0, 2.0, 1.0, 1.0, //
            2.0, 1.0, 1.0, 1.0, //
        ];
        let r = [3.0, 3.0, 3.0, 3.0];
        // vol(a) = 2*1*2*2 = 8, vol(b) = 1*2*2*2 = 8,
        // intersection from (2,2,1,1) = 1*1*2*2 = 4.
        assert_eq!(hv4d_plus(&pts, &r), 12.0);
    }

    #[test]
    fn dominated_point_adds_nothing() {
        let base = vec![1.0, 1.0, 1.0, 1.0];
        let mut with_dom = base.clone();
        with_dom.extend_from_slice(&[1.5, 1.5, 1.5, 1.5]);
        let r = [2.0, 2.0, 2.0, 2.0];
        assert_eq!(hv4d_plus(&base, &r), hv4d_plus(&with_dom, &r));
    }

    #[test]
    fn agrees_with_3d_extrusion() {
        // Constant fourth coordinate: HV4D = HV3D * (r3 - w).
        let pts3 = vec![1.0, 2.0, 3.0, 2.0, 1.0, 3.0, 0.5, 0.5, 3.5];
        let mut pts4 = Vec::new();
        for row in pts3.chunks_exact(3) {
            pts4.extend_from_slice(row);
            pts4.push(1.0);
        }
        let r3 = [4.0, 4.0, 4.0];
        let hv3 = super::super::hv3d::hv3d_plus(&pts3, &r3);
        let hv4 = hv4d_plus(&pts4, &[4.0, 4.0, 4.0, 4.0]);
        assert!((hv4 - hv3 * 3.0).abs() < 1e-9, "{hv4} vs {}", hv3 * 3.0);
    }
}
