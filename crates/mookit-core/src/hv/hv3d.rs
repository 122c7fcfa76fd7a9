//! HV3D+: three-objective hypervolume by dimension sweep.
//!
//! Points are swept in ascending z. A preprocessing pass runs the 3D
//! Kung–Luccio–Preparata sweep over an AVL tree of (x, y) projections,
//! removing z-dominated points and recording for each survivor its two
//! delimiters in the projection (`cnext`); the main sweep then updates
//! the dominated 2D area incrementally and accumulates area · Δz between
//! consecutive z-events (Guerreiro and Fonseca, IEEE TEC 22(3), 2018).

use crate::avl::{AvlTree, NIL};
use crate::geometry::strongly_dominates;
use crate::sort::{cmp_lex_rev_asc, sorted_row_indices};

const DIM: usize = 3;

/// Sweep-list node. Sentinels occupy the first three arena slots.
#[derive(Debug, Clone, Copy)]
struct Node3 {
    x: [f64; DIM],
    next: u32,
    prev: u32,
    cnext: [u32; 2],
}

const S1: u32 = 0; // (-MAX, r1, -MAX)
const S2: u32 = 1; // (r0, -MAX, -MAX)
const S3: u32 = 2; // (-MAX, -MAX, r2)

/// Build the z-sorted list of points strictly dominating `r`, bracketed
/// by the three sentinels.
fn setup_list(data: &[f64], r: &[f64]) -> Vec<Node3> {
    let keep: Vec<&[f64]> = data
        .chunks_exact(DIM)
        .filter(|p| strongly_dominates(p, r))
        .collect();
    let mut flat: Vec<f64> = Vec::with_capacity(keep.len() * DIM);
    for p in &keep {
        flat.extend_from_slice(p);
    }
    let order = sorted_row_indices(&flat, DIM, cmp_lex_rev_asc);

    let n = order.len();
    let mut nodes = Vec::with_capacity(n + 3);
    let inf = f64::MAX;
    nodes.push(Node3 {
        x: [-inf, r[1], -inf],
        next: S2,
        prev: S3,
        cnext: [NIL, NIL],
    });
    nodes.push(Node3 {
        x: [r[0], -inf, -inf],
        next: S3,
        prev: S1,
        cnext: [NIL, NIL],
    });
    nodes.push(Node3 {
        x: [-inf, -inf, r[2]],
        next: S1,
        prev: S2,
        cnext: [NIL, NIL],
    });

    let mut q = S2;
    for (i, &row) in order.iter().enumerate() {
        let idx = (3 + i) as u32;
        let mut x = [0.0; DIM];
        x.copy_from_slice(&flat[row * DIM..row * DIM + DIM]);
        nodes.push(Node3 {
            x,
            next: S3,
            prev: q,
            cnext: [NIL, NIL],
        });
        nodes[q as usize].next = idx;
        q = idx;
    }
    nodes[q as usize].next = S3;
    nodes[S3 as usize].prev = q;
    nodes
}

#[inline]
fn remove_from_z(nodes: &mut [Node3], old: u32) {
    let prev = nodes[old as usize].prev;
    let next = nodes[old as usize].next;
    nodes[prev as usize].next = next;
    nodes[next as usize].prev = prev;
}

/// Sweep the (x, y) projections in z order, dropping dominated points
/// and recording each survivor's delimiters in `cnext`.
fn preprocessing(nodes: &mut Vec<Node3>) {
    let n = nodes.len() - 3;
    if n == 0 {
        return;
    }
    // The tree borrows the node coordinates immutably; copy them out once
    // so the sweep below can keep mutating the list links.
    let coords: Vec<[f64; DIM]> = nodes.iter().map(|nd| nd.x).collect();
    let coords = &coords;
    // y ascending, ties x descending; never reports equality, so exact
    // duplicates fall on the "greater" side and are caught as dominated.
    let mut tree = AvlTree::with_capacity(n + 2, move |a: u32, b: u32| {
        let xa = &coords[a as usize];
        let xb = &coords[b as usize];
        match xa[1].total_cmp(&xb[1]) {
            std::cmp::Ordering::Equal => {
                if xa[0] > xb[0] {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Greater
                }
            }
            ord => ord,
        }
    });

    // The first point is never dominated.
    let first = nodes[S2 as usize].next;
    let tn_first = tree.alloc(first);
    tree.insert_top(tn_first);
    // Sentinel (-MAX, r1) goes after it in y, (r0, -MAX) before.
    let tn_s1 = tree.alloc(S1);
    tree.insert_after(tn_first, tn_s1);
    let tn_s2 = tree.alloc(S2);
    tree.insert_before(tn_first, tn_s2);
    nodes[first as usize].cnext = [S2, S1];

    let mut p = nodes[first as usize].next;
    while p != S3 {
        let px = nodes[p as usize].x;
        let (found, sign) = tree.search_closest(p);
        let (prev_x, mut nodeaux) = if sign == 1 {
            (coords[tree.item(found) as usize], tree.next(found))
        } else {
            (coords[tree.item(tree.prev(found)) as usize], found)
        };
        let next_p = nodes[p as usize].next;
        if prev_x[0] <= px[0] {
            // Dominated by a point already in the tree.
            remove_from_z(nodes, p);
        } else if coords[tree.item(nodeaux) as usize][1] == px[1] {
            // Same y with smaller x ahead of us.
            remove_from_z(nodes, p);
        } else {
            // Unlink everything the new point dominates.
            while coords[tree.item(nodeaux) as usize][0] >= px[0] {
                let nxt = tree.next(nodeaux);
                tree.unlink(nodeaux);
                nodeaux = nxt;
            }
            let tn = tree.alloc(p);
            tree.insert_before(nodeaux, tn);
            nodes[p as usize].cnext = [tree.item(tree.prev(tn)), tree.item(tree.next(tn))];
        }
        p = next_p;
    }
}

/// Area dominated exclusively below `px` in the projection, swept along
/// dimension `i` starting from the outer delimiter `q`.
fn compute_area_simple(nodes: &[Node3], px: &[f64], q: u32, i: usize) -> f64 {
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

/// Three-objective hypervolume (minimisation) of `data` against `r`.
pub fn hv3d_plus(data: &[f64], r: &[f64]) -> f64 {
    assert_eq!(r.len(), DIM);
    let mut nodes = setup_list(data, r);
    if nodes.len() == 3 {
        return 0.0;
    }
    preprocessing(&mut nodes);

    // Link sentinels (-inf, r1) and (r0, -inf) for the area walks.
    nodes[S1 as usize].cnext[0] = S2;
    nodes[S2 as usize].cnext[1] = S1;

    let mut area = 0.0;
    let mut volume = 0.0;
    let mut p = nodes[S2 as usize].next;
    while p != S3 {
        let px = nodes[p as usize].x;
        area += compute_area_simple(&nodes, &px, nodes[p as usize].cnext[0], 1);
        let c0 = nodes[p as usize].cnext[0];
        let c1 = nodes[p as usize].cnext[1];
        nodes[c0 as usize].cnext[1] = p;
        nodes[c1 as usize].cnext[0] = p;
        // Two points may share a z-value; the slab is then empty.
        let next = nodes[p as usize].next;
        volume += area * (nodes[next as usize].x[2] - px[2]);
        p = next;
    }
    volume
}
