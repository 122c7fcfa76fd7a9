//! Non-dominated filtering.
//!
//! Dimension-sweep algorithms in two and three dimensions (Kung, Luccio
//! and Preparata, JACM 22(4), 1975) and a pairwise O(n²) fallback for
//! higher dimensions, plus the early-exit variants that stop at the first
//! dominated point.
//!
//! With `keep_weakly == false` exactly one of a group of coordinate-equal
//! points survives. The sweeps sort stably, so in 2D and 3D the survivor
//! is the first duplicate in input order; the pairwise path keeps the
//! last one.

use crate::avl::{AvlTree, NIL};
use crate::diag::DiagSink;
use crate::error::{Error, Result};
use crate::geometry::{self, Agreement, Direction};
use crate::sort::{cmp_lex_rev_asc, sorted_row_indices};

/// What to do when a set expected to be non-dominated is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckPolicy {
    /// Report and keep the dominated points.
    Warn,
    /// Report, remove the dominated points and continue.
    Filter,
    /// Fail with [`Error::CheckFailed`].
    Abort,
}

/// 2D sweep. Rows sorted by (y asc, x asc); the reference point is the
/// one with the smallest x seen so far, which weakly dominates the
/// current row iff its x does not exceed the row's x.
fn filter_2d(
    points: &[f64],
    keep_weakly: bool,
    mut nondom: Option<&mut [bool]>,
    stop_at_first: bool,
) -> (usize, Option<usize>) {
    let dim = 2;
    let size = points.len() / dim;
    debug_assert!(size >= 2);
    let p = sorted_row_indices(points, dim, cmp_lex_rev_asc);
    let row = |i: usize| &points[p[i] * dim..p[i] * dim + dim];

    let mut n_nondom = size;
    let mut k = 0;
    for j in 1..size {
        if row(k)[0] > row(j)[0] {
            k = j;
        } else if !keep_weakly || row(k)[0] != row(j)[0] || row(k)[1] != row(j)[1] {
            if stop_at_first {
                return (n_nondom, Some(p[j]));
            }
            if let Some(flags) = nondom.as_deref_mut() {
                flags[p[j]] = false;
            }
            n_nondom -= 1;
        }
    }
    (n_nondom, None)
}

/// 3D sweep. Rows sorted by (z, y, x) ascending; an AVL tree ordered by
/// (x asc, y asc) holds the non-dominated (x, y) projections seen so far,
/// closed off by an (inf, inf) sentinel.
fn filter_3d(
    points: &[f64],
    keep_weakly: bool,
    mut nondom: Option<&mut [bool]>,
    stop_at_first: bool,
) -> (usize, Option<usize>) {
    let dim = 3;
    let size = points.len() / dim;
    debug_assert!(size >= 2);
    let p = sorted_row_indices(points, dim, cmp_lex_rev_asc);

    let sentinel: u32 = size as u32;
    let coord = |id: u32, d: usize| -> f64 {
        if id == sentinel {
            f64::INFINITY
        } else {
            points[id as usize * dim + d]
        }
    };
    let cmp = |a: u32, b: u32| {
        coord(a, 0)
            .total_cmp(&coord(b, 0))
            .then_with(|| coord(a, 1).total_cmp(&coord(b, 1)))
    };

    let mut tree = AvlTree::with_capacity(size + 1, cmp);
    let first = tree.alloc(p[0] as u32);
    tree.insert_top(first);
    let end = tree.alloc(sentinel);
    tree.insert_after(first, end);

    let mut last_dom: Option<usize> = None;
    let mut n_nondom = size;
    let mut prev = p[0];
    for j in 1..size {
        let pj = p[j];
        let pjx = &points[pj * dim..pj * dim + dim];
        let prev_x = &points[prev * dim..prev * dim + dim];
        if prev_x[0] > pjx[0] || prev_x[1] > pjx[1] {
            let (found, sign) = tree.search_closest(pj as u32);
            let (before, mut nodeaux) = if sign == 1 {
                (Some(tree.item(found)), tree.next(found))
            } else {
                let prev_node = tree.prev(found);
                let before = if prev_node != NIL {
                    Some(tree.item(prev_node))
                } else {
                    None
                };
                (before, found)
            };

            let dominated = match before {
                Some(b) => coord(b, 1) <= pjx[1],
                None => false,
            };
            if dominated {
                last_dom = Some(pj);
                if stop_at_first {
                    return (n_nondom, last_dom);
                }
                if let Some(flags) = nondom.as_deref_mut() {
                    flags[pj] = false;
                }
                n_nondom -= 1;
            } else {
                // Remove every projection that pj dominates.
                while nodeaux != end && pjx[1] <= coord(tree.item(nodeaux), 1) {
                    let next = tree.next(nodeaux);
                    tree.unlink(nodeaux);
                    nodeaux = next;
                }
                let newnode = tree.alloc(pj as u32);
                tree.insert_before(nodeaux, newnode);
            }
        } else if !keep_weakly
            || prev_x[0] != pjx[0]
            || prev_x[1] != pjx[1]
            || prev_x[2] != pjx[2]
            || last_dom == Some(prev)
        {
            // Duplicate of, or weakly dominated by, the previous row.
            last_dom = Some(pj);
            if stop_at_first {
                return (n_nondom, last_dom);
            }
            if let Some(flags) = nondom.as_deref_mut() {
                flags[pj] = false;
            }
            n_nondom -= 1;
        }
        prev = pj;
    }
    (n_nondom, None)
}

/// Pairwise O(n²) check, specialised once on the agreement summary.
fn filter_general(
    points: &[f64],
    dim: usize,
    minmax: &[Direction],
    keep_weakly: bool,
    nondom: &mut [bool],
    stop_at_first: bool,
) -> (usize, Option<usize>) {
    let size = points.len() / dim;
    let agree = geometry::agreement(minmax);

    for k in 0..size.saturating_sub(1) {
        for j in (k + 1)..size {
            if !nondom[k] {
                break;
            }
            if !nondom[j] {
                continue;
            }
            let pk = &points[k * dim..k * dim + dim];
            let pj = &points[j * dim..j * dim + dim];
            let mut k_leq_j = true;
            let mut j_leq_k = true;
            match agree {
                Agreement::Minimise => {
                    for d in 0..dim {
                        j_leq_k = j_leq_k && pj[d] <= pk[d];
                        k_leq_j = k_leq_j && pk[d] <= pj[d];
                    }
                }
                Agreement::Maximise => {
                    for d in 0..dim {
                        j_leq_k = j_leq_k && pj[d] >= pk[d];
                        k_leq_j = k_leq_j && pk[d] >= pj[d];
                    }
                }
                Agreement::Mixed => {
                    for d in 0..dim {
                        match minmax[d] {
                            Direction::Minimise => {
                                j_leq_k = j_leq_k && pj[d] <= pk[d];
                                k_leq_j = k_leq_j && pk[d] <= pj[d];
                            }
                            Direction::Maximise => {
                                j_leq_k = j_leq_k && pj[d] >= pk[d];
                                k_leq_j = k_leq_j && pk[d] >= pj[d];
                            }
                            Direction::Ignore => {}
                        }
                    }
                }
            }

            // k is removed when weakly dominated by j, unless the two are
            // equal and weak survivors are kept; j is removed when
            // dominated by k. Both cannot go.
            nondom[k] = !j_leq_k || (keep_weakly && k_leq_j);
            nondom[j] = !k_leq_j || j_leq_k;
            debug_assert!(nondom[k] || nondom[j]);

            if stop_at_first && (!nondom[k] || !nondom[j]) {
                let pos = if nondom[k] { j } else { k };
                return (0, Some(pos));
            }
        }
    }
    let n_nondom = nondom.iter().filter(|&&b| b).count();
    (n_nondom, None)
}

fn dispatch(
    points: &[f64],
    dim: usize,
    minmax: &[Direction],
    keep_weakly: bool,
    nondom: Option<&mut [bool]>,
    stop_at_first: bool,
) -> (usize, Option<usize>) {
    assert!((2..=geometry::MAX_DIMENSION).contains(&dim));
    assert_eq!(minmax.len(), dim);
    let size = points.len() / dim;
    if size < 2 {
        return (size, None);
    }
    if dim <= 3 {
        let agreed = geometry::force_agree_minimise(points, dim, minmax);
        return if dim == 2 {
            filter_2d(&agreed, keep_weakly, nondom, stop_at_first)
        } else {
            filter_3d(&agreed, keep_weakly, nondom, stop_at_first)
        };
    }
    match nondom {
        Some(flags) => filter_general(points, dim, minmax, keep_weakly, flags, stop_at_first),
        None => {
            let mut flags = vec![true; size];
            filter_general(points, dim, minmax, keep_weakly, &mut flags, stop_at_first)
        }
    }
}

/// Flag per row: `true` iff the row is not weakly dominated by any other
/// row (with `keep_weakly == true`, duplicates all stay).
pub fn is_nondominated(
    points: &[f64],
    dim: usize,
    minmax: &[Direction],
    keep_weakly: bool,
) -> Vec<bool> {
    let size = points.len() / dim;
    let mut nondom = vec![true; size];
    dispatch(points, dim, minmax, keep_weakly, Some(&mut nondom), false);
    nondom
}

/// [`is_nondominated`] with every objective minimised.
pub fn is_nondominated_minimise(points: &[f64], dim: usize, keep_weakly: bool) -> Vec<bool> {
    is_nondominated(points, dim, &geometry::minimise_all(dim), keep_weakly)
}

/// Index of the first dominated point found, if any. Which index is
/// reported among ties depends on the sweep order but is deterministic
/// for a given input.
pub fn find_dominated_point(points: &[f64], dim: usize, minmax: &[Direction]) -> Option<usize> {
    dispatch(points, dim, minmax, false, None, true).1
}

/// Early-exit scan that treats exact duplicates as non-dominated.
pub fn find_weakly_dominated_point(points: &[f64], dim: usize, maximise: &[bool]) -> Option<usize> {
    let minmax = geometry::from_maximise_mask(maximise);
    dispatch(points, dim, &minmax, true, None, true).1
}

/// Copy the non-dominated rows into a fresh matrix.
pub fn get_nondominated_set(points: &[f64], dim: usize, minmax: &[Direction]) -> Vec<f64> {
    let nondom = is_nondominated(points, dim, minmax, false);
    let mut out = Vec::with_capacity(nondom.iter().filter(|&&b| b).count() * dim);
    for (k, keep) in nondom.iter().enumerate() {
        if *keep {
            out.extend_from_slice(&points[k * dim..k * dim + dim]);
        }
    }
    out
}

/// Compact the non-dominated rows to the front of `points` and return how
/// many survive. The tail beyond the returned count is unspecified.
pub fn filter_dominated_in_place(points: &mut [f64], dim: usize, minmax: &[Direction]) -> usize {
    let nondom = is_nondominated(points, dim, minmax, false);
    let mut write = 0;
    for (k, keep) in nondom.iter().enumerate() {
        if *keep {
            if write != k {
                points.copy_within(k * dim..k * dim + dim, write * dim);
            }
            write += 1;
        }
    }
    write
}

/// Verify that `points` contains no dominated rows, applying `policy`
/// when it does. Returns the number of rows kept; with
/// [`CheckPolicy::Filter`] the vector is truncated to the survivors.
pub fn check_nondominated(
    points: &mut Vec<f64>,
    dim: usize,
    minmax: &[Direction],
    policy: CheckPolicy,
    sink: &dyn DiagSink,
) -> Result<usize> {
    let size = points.len() / dim;
    let nondom = is_nondominated(points, dim, minmax, false);
    let n_dom = nondom.iter().filter(|&&b| !b).count();
    if n_dom == 0 {
        return Ok(size);
    }
    match policy {
        CheckPolicy::Abort => {
            let index = nondom.iter().position(|&b| !b).unwrap_or(0);
            Err(Error::CheckFailed { index })
        }
        CheckPolicy::Warn => {
            sink.warn(&format!("input contains {n_dom} dominated points"));
            Ok(size)
        }
        CheckPolicy::Filter => {
            sink.warn(&format!("removing {n_dom} dominated points"));
            let kept = filter_dominated_in_place(points, dim, minmax);
            points.truncate(kept * dim);
            Ok(kept)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::SilentSink;
    use crate::geometry::minimise_all;

    #[test]
    fn two_d_ties_keep_one_or_all() {
        let pts = vec![1.0, 1.0, 1.0, 1.0, 2.0, 0.0];
        let strict = is_nondominated_minimise(&pts, 2, false);
        assert_eq!(strict.iter().filter(|&&b| b).count(), 2);
        assert!(strict[2], "(2,0) is never dominated");
        // Stable sort: the first duplicate survives.
        assert_eq!(strict[0..2], [true, false]);

        let weak = is_nondominated_minimise(&pts, 2, true);
        assert_eq!(weak, vec![true, true, true]);
    }

    #[test]
    fn two_d_weakly_dominated_removed_even_with_keep_weakly() {
        // (1,2) is weakly dominated by (1,1) but is not a duplicate.
        let pts = vec![1.0, 1.0, 1.0, 2.0];
        let weak = is_nondominated_minimise(&pts, 2, true);
        assert_eq!(weak, vec![true, false]);
    }

    #[test]
    fn three_d_filter_matches_pairwise() {
        let pts = vec![
            1.0, 2.0, 3.0, //
            2.0, 1.0, 3.0, //
            1.0, 2.0, 3.0, //
            0.5, 0.5, 3.5, //
            3.0, 3.0, 3.0, // dominated by the first two
        ];
        let got = is_nondominated_minimise(&pts, 3, false);
        assert!(!got[4]);
        // One of the duplicate rows 0/2 goes, everything else stays.
        assert!(got[1] && got[3]);
        assert_eq!(got[0..3].iter().filter(|&&b| b).count(), 2);
        assert!(got[0] && !got[2], "first duplicate survives");
    }

    #[test]
    fn three_d_weak_duplicates_stay() {
        let pts = vec![
            1.0, 2.0, 3.0, //
            1.0, 2.0, 3.0, //
            2.0, 1.0, 3.0, //
        ];
        let weak = is_nondominated_minimise(&pts, 3, true);
        assert_eq!(weak, vec![true, true, true]);
    }

    #[test]
    fn filter_idempotent() {
        let dim = 2;
        let mut pts = vec![
            1.0, 6.0, 2.0, 4.0, 4.0, 3.0, 3.0, 5.0, 5.0, 5.0, 2.0, 4.0,
        ];
        let minmax = minimise_all(dim);
        let n1 = filter_dominated_in_place(&mut pts, dim, &minmax);
        pts.truncate(n1 * dim);
        let once = pts.clone();
        let n2 = filter_dominated_in_place(&mut pts, dim, &minmax);
        pts.truncate(n2 * dim);
        assert_eq!(n1, n2);
        assert_eq!(pts, once);
    }

    #[test]
    fn agree_symmetry() {
        use Direction::*;
        // Filtering with a mixed mask equals flipping the maximised axis
        // and filtering under pure minimisation.
        let pts = vec![1.0, 6.0, 2.0, 4.0, 4.0, 3.0, 3.0, 3.5];
        let mixed = [Minimise, Maximise];
        let direct = is_nondominated(&pts, 2, &mixed, false);

        let mut flipped = pts.clone();
        crate::geometry::agree_objectives(&mut flipped, 2, &mixed, Minimise);
        let via_agree = is_nondominated_minimise(&flipped, 2, false);
        assert_eq!(direct, via_agree);
    }

    #[test]
    fn general_dimension_filter() {
        let pts = vec![
            1.0, 1.0, 1.0, 1.0, //
            2.0, 2.0, 2.0, 2.0, // dominated
            0.5, 2.0, 1.0, 1.0, //
        ];
        let got = is_nondominated_minimise(&pts, 4, false);
        assert_eq!(got, vec![true, false, true]);
    }

    #[test]
    fn early_exit_reports_a_dominated_row() {
        let pts = vec![1.0, 1.0, 2.0, 2.0, 0.0, 3.0];
        let pos = find_dominated_point(&pts, 2, &minimise_all(2)).unwrap();
        assert_eq!(pos, 1);
        let none = find_dominated_point(&[1.0, 2.0, 2.0, 1.0], 2, &minimise_all(2));
        assert_eq!(none, None);
    }

    #[test]
    fn find_weakly_dominated_ignores_duplicates() {
        let pts = vec![1.0, 1.0, 1.0, 1.0];
        assert_eq!(find_weakly_dominated_point(&pts, 2, &[false, false]), None);
        let pts = vec![1.0, 1.0, 1.0, 2.0];
        assert_eq!(
            find_weakly_dominated_point(&pts, 2, &[false, false]),
            Some(1)
        );
    }

    #[test]
    fn check_policies() {
        let dim = 2;
        let minmax = minimise_all(dim);
        let mut pts = vec![1.0, 1.0, 2.0, 2.0];
        let err = check_nondominated(&mut pts, dim, &minmax, CheckPolicy::Abort, &SilentSink);
        assert!(matches!(err, Err(Error::CheckFailed { index: 1 })));

        let kept =
            check_nondominated(&mut pts, dim, &minmax, CheckPolicy::Filter, &SilentSink).unwrap();
        assert_eq!(kept, 1);
        assert_eq!(pts, vec![1.0, 1.0]);
    }
}
