//! Inverse-CDF lookup by binary search

use crate::dtype::Element;

/// Smallest index `j` with `cdf[j] >= u`
///
/// Lower-bound search over a non-decreasing cumulative distribution. Ties
/// resolve to the earliest index, so a draw landing exactly on a bucket
/// boundary belongs to the bucket that ends there:
///
/// ```text
/// cdf:    [0.1, 0.3, 0.6, 1.0]
/// u=0.05 → 0
/// u=0.10 → 0
/// u=0.25 → 1
/// u=0.80 → 3
/// ```
///
/// Comparisons are carried out in f64, the precision of the uniform draw.
/// Returns `cdf.len()` only if `u` exceeds every entry, which cannot happen
/// for `u <= 1` when the last entry is exactly 1.
#[inline]
pub fn lower_bound<A: Element>(cdf: &[A], u: f64) -> usize {
    let mut left = 0usize;
    let mut right = cdf.len();

    while left < right {
        let mid = left + (right - left) / 2;
        if cdf[mid].to_f64() < u {
            left = mid + 1;
        } else {
            right = mid;
        }
    }
    left
}
