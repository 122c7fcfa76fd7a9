//! Lexicographic comparators over point rows and sorted index generation.
//!
//! The sweep algorithms never reorder the caller's rows; they sort row
//! indices with these comparators instead. All sorts are stable, so among
//! coordinate-equal rows the first one in input order comes first; the
//! filters rely on this to make duplicate survival deterministic.

use std::cmp::Ordering;

/// Lexicographic ascending on (x, y, ...) from the first coordinate.
#[inline]
pub fn cmp_lex_asc(a: &[f64], b: &[f64]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.total_cmp(y) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    Ordering::Equal
}

/// Lexicographic ascending starting from the last coordinate, i.e.
/// (z, y, x) for 3-dimensional rows. The dimension-sweep algorithms sort
/// by the sweep coordinate first.
#[inline]
pub fn cmp_lex_rev_asc(a: &[f64], b: &[f64]) -> Ordering {
    for (x, y) in a.iter().zip(b).rev() {
        match x.total_cmp(y) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    Ordering::Equal
}

/// x ascending, ties y ascending.
#[inline]
pub fn cmp_x_asc_y_asc(a: &[f64], b: &[f64]) -> Ordering {
    a[0].total_cmp(&b[0]).then_with(|| a[1].total_cmp(&b[1]))
}

/// y ascending, ties x descending. Order of the 2D projections inside the
/// hypervolume sweep structure.
#[inline]
pub fn cmp_y_asc_x_desc(a: &[f64], b: &[f64]) -> Ordering {
    a[1].total_cmp(&b[1]).then_with(|| b[0].total_cmp(&a[0]))
}

/// y descending, ties x ascending. Order of the weighted-hypervolume
/// point stream.
#[inline]
pub fn cmp_y_desc_x_asc(a: &[f64], b: &[f64]) -> Ordering {
    b[1].total_cmp(&a[1]).then_with(|| a[0].total_cmp(&b[0]))
}

/// Row indices of `points` sorted by `cmp` (stable).
pub fn sorted_row_indices<F>(points: &[f64], dim: usize, cmp: F) -> Vec<usize>
where
    F: Fn(&[f64], &[f64]) -> Ordering,
{
    let n = points.len() / dim;
    let mut idx: Vec<usize> = (0..n).collect();
    idx.sort_by(|&i, &j| cmp(&points[i * dim..i * dim + dim], &points[j * dim..j * dim + dim]));
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_lexicographic_sorts_by_last_axis_first() {
        let pts = vec![
            2.0, 1.0, 5.0, //
            1.0, 1.0, 3.0, //
            0.0, 9.0, 3.0, //
        ];
        let idx = sorted_row_indices(&pts, 3, cmp_lex_rev_asc);
        assert_eq!(idx, vec![1, 2, 0]);
    }

    #[test]
    fn stability_keeps_input_order_of_duplicates() {
        let pts = vec![1.0, 1.0, 1.0, 1.0, 0.0, 2.0];
        let idx = sorted_row_indices(&pts, 2, cmp_lex_asc);
        assert_eq!(idx, vec![2, 0, 1]);
    }

    #[test]
    fn y_orderings() {
        let a = [1.0, 2.0];
        let b = [3.0, 2.0];
        assert_eq!(cmp_y_asc_x_desc(&a, &b), Ordering::Greater);
        assert_eq!(cmp_y_desc_x_asc(&a, &b), Ordering::Less);
    }
}
