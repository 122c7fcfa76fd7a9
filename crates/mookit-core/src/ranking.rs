//! Pareto rank assignment (non-dominated sorting), assuming
//! minimisation of every objective.
//!
//! The 2D case runs in O(n log n) by sorting lexicographically and
//! placing each point on the first front whose current tail does not
//! weakly dominate it, located by binary search over the tail array
//! (M. T. Jensen, IEEE TEC 7(5), 2003). Higher dimensions peel fronts
//! pairwise in O(n²·ranks).

use crate::geometry::{MAX_DIMENSION, weakly_dominates};
use crate::sort::cmp_lex_asc;

/// Rank of every point, starting at 1 for the non-dominated front.
/// Duplicated points share a rank.
pub fn pareto_rank(points: &[f64], dim: usize) -> Vec<usize> {
    assert!((2..=MAX_DIMENSION).contains(&dim));
    let size = points.len() / dim;
    if size == 0 {
        return Vec::new();
    }
    if dim == 2 {
        pareto_rank_2d(points)
    } else {
        pareto_rank_peel(points, dim)
    }
}

fn pareto_rank_2d(points: &[f64]) -> Vec<usize> {
    let dim = 2;
    let size = points.len() / dim;
    let order = crate::sort::sorted_row_indices(points, dim, cmp_lex_asc);
    let row = |k: usize| &points[order[k] * dim..order[k] * dim + dim];

    // front_last[f] is the position (in sorted order) of the current
    // tail of front f; tails have strictly decreasing y across fronts.
    let mut front_last = vec![0usize; size];
    let mut front = vec![0usize; size];
    let mut n_front = 0usize;

    for k in 1..size {
        let p = row(k);
        let last = row(front_last[n_front]);
        if p[1] < last[1] {
            let mut low = 0usize;
            let mut high = n_front + 1;
            loop {
                let mid = low + (high - low) / 2;
                let pmid = row(front_last[mid]);
                if p[1] < pmid[1] {
                    high = mid;
                } else if p[1] > pmid[1] || (p[1] == pmid[1] && p[0] > pmid[0]) {
                    low = mid + 1;
                } else {
                    // Duplicated point: same front as its twin.
                    low = mid;
                    break;
                }
                if low >= high {
                    break;
                }
            }
            front_last[low] = k;
            front[k] = low;
        } else if p[1] == last[1] && p[0] == last[0] {
            front_last[n_front] = k;
            front[k] = n_front;
        } else {
            n_front += 1;
            front_last[n_front] = k;
            front[k] = n_front;
        }
    }

    let mut rank = vec![0usize; size];
    for k in 0..size {
        rank[order[k]] = front[k] + 1;
    }
    rank
}

fn pareto_rank_peel(points: &[f64], dim: usize) -> Vec<usize> {
    let size = points.len() / dim;
    let mut rank = vec![1usize; size];
    let mut level = 2usize;
    loop {
        let mut nothing_new = true;
        for j in 0..size {
            if rank[j] != level - 1 {
                continue;
            }
            for k in 0..size {
                if k == j || rank[k] != level - 1 {
                    continue;
                }
                let pj = &points[j * dim..j * dim + dim];
                let pk = &points[k * dim..k * dim + dim];
                let j_leq_k = weakly_dominates(pj, pk);
                let k_leq_j = weakly_dominates(pk, pj);
                if j_leq_k && !k_leq_j {
                    nothing_new = false;
                    rank[k] += 1;
                } else if !j_leq_k && k_leq_j {
                    nothing_new = false;
                    rank[j] += 1;
                    break;
                }
            }
        }
        if nothing_new {
            return rank;
        }
        level += 1;
    }
}
