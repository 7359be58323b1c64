//! Per-row cumulative distribution: build, validate, draw, remove mass

use super::search::lower_bound;
use crate::dtype::FloatElement;
use crate::error::{Error, ProbabilityIssue, Result};
use crate::tensor::StridedRow;

/// Support statistics of a validated row
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RowSupport {
    /// Number of categories with strictly positive weight
    pub positive: usize,
    /// Sum of the row's weights before normalization
    pub total: f64,
}

/// Normalized cumulative distribution over one row of weights
///
/// Entry `j` holds the mass of categories `0..=j`. The buffer is allocated
/// once and rebuilt in place for every row of a batch.
///
/// `A` is the accumulator type the prefix sums are computed in.
#[derive(Clone, Debug, Default)]
pub struct CumulativeDistribution<A> {
    cdf: Vec<A>,
}

impl<A: FloatElement> CumulativeDistribution<A> {
    /// Create an empty distribution with room for `n_categories` entries
    pub fn with_capacity(n_categories: usize) -> Self {
        Self {
            cdf: Vec::with_capacity(n_categories),
        }
    }

    /// Current cumulative values
    #[inline]
    pub fn as_slice(&self) -> &[A] {
        &self.cdf
    }

    /// Number of categories
    #[inline]
    pub fn len(&self) -> usize {
        self.cdf.len()
    }

    /// Whether no row has been built yet
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cdf.is_empty()
    }

    /// Rebuild from a row of raw weights
    ///
    /// Validates every entry (`>= 0`, finite), the total (`> 0`) and, when
    /// sampling without replacement, that at least `num_samples` categories
    /// carry positive weight. `row_idx` is only used for error reporting.
    ///
    /// Normalization is unconditional and the last entry is forced to exactly
    /// one so that no draw can fall past the final bucket.
    pub fn build<T: FloatElement>(
        &mut self,
        row: StridedRow<'_, T>,
        row_idx: usize,
        num_samples: usize,
        replacement: bool,
    ) -> Result<RowSupport> {
        self.cdf.clear();

        let mut sum = A::zero();
        let mut n_zeros = 0usize;
        for (index, val) in row.iter().enumerate() {
            // -inf reports as negative, NaN and +inf as non-finite
            let issue = if val < T::zero() {
                Some(ProbabilityIssue::Negative)
            } else if !val.is_finite() {
                Some(ProbabilityIssue::NonFinite)
            } else {
                None
            };
            if let Some(issue) = issue {
                return Err(Error::InvalidProbability {
                    row: row_idx,
                    index,
                    value: val.to_f64(),
                    issue,
                });
            }

            let val = A::from_f64(val.to_f64());
            sum = sum + val;
            if val == A::zero() {
                n_zeros += 1;
            }
            self.cdf.push(sum);
        }

        // A non-finite sum means the prefix sum overflowed the accumulator
        if !(sum > A::zero() && sum.is_finite()) {
            return Err(Error::DegenerateDistribution {
                row: row_idx,
                sum: sum.to_f64(),
            });
        }

        let positive = self.cdf.len() - n_zeros;
        if !replacement && positive < num_samples {
            return Err(Error::InsufficientSupport {
                row: row_idx,
                positive,
                requested: num_samples,
            });
        }

        for c in self.cdf.iter_mut() {
            *c = *c / sum;
        }
        self.clamp_last();

        Ok(RowSupport {
            positive,
            total: sum.to_f64(),
        })
    }

    /// Force the final bucket to end at exactly one
    #[inline]
    pub fn clamp_last(&mut self) {
        if let Some(last) = self.cdf.last_mut() {
            *last = A::one();
        }
    }

    /// Map one uniform draw `u` in `[0, 1)` to a category index
    ///
    /// Lower bound of `u`, except that a zero-width bucket is never returned:
    /// `u == 0` would otherwise select a leading zero-weight (or already
    /// removed) category. For `u > 0` the lower bound always has positive
    /// width, so only that edge moves forward to the next bucket with mass.
    #[inline]
    pub fn draw(&mut self, u: f64) -> usize {
        self.clamp_last();
        let mut idx = lower_bound(&self.cdf, u);
        let last = self.cdf.len().saturating_sub(1);
        while idx < last && self.cdf[idx] <= self.bucket_start(idx) {
            idx += 1;
        }
        idx
    }

    #[inline]
    fn bucket_start(&self, idx: usize) -> A {
        if idx == 0 {
            A::zero()
        } else {
            self.cdf[idx - 1]
        }
    }

    /// Remove category `sample_idx` so it can never be drawn again
    ///
    /// Subtracts the category's marginal mass from its own bucket and every
    /// later one, then rescales the whole distribution by the remaining mass.
    /// Fails if nothing would be left to renormalize by, which validation
    /// should have ruled out.
    pub fn remove(&mut self, sample_idx: usize, row_idx: usize) -> Result<()> {
        let removed = self.cdf[sample_idx] - self.bucket_start(sample_idx);
        let remaining = A::one() - removed;

        if !(remaining > A::zero()) {
            return Err(Error::InternalInvariantViolation {
                row: row_idx,
                reason: format!(
                    "remaining probability mass {} after removing category {} (mass {})",
                    remaining.to_f64(),
                    sample_idx,
                    removed.to_f64()
                ),
            });
        }

        for (k, c) in self.cdf.iter_mut().enumerate() {
            let mut v = *c;
            if k >= sample_idx {
                v = v - removed;
            }
            *c = v / remaining;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built<T: FloatElement>(weights: &[T], n: usize, replacement: bool) -> Result<Vec<f64>> {
        let mut cdf = CumulativeDistribution::<f64>::default();
        cdf.build(StridedRow::contiguous(weights), 0, n, replacement)?;
        Ok(cdf.as_slice().to_vec())
    }

    fn assert_valid(cdf: &[f64]) {
        assert!(cdf[0] >= 0.0, "first entry {} < 0", cdf[0]);
        for w in cdf.windows(2) {
            assert!(w[1] >= w[0], "not monotonic: {:?}", cdf);
        }
        assert_eq!(*cdf.last().unwrap(), 1.0);
    }

    #[test]
    fn test_normalizes_unnormalized_weights() {
        let cdf = built(&[1.0f64, 2.0, 3.0, 4.0], 1, true).unwrap();
        let expected = [0.1, 0.3, 0.6, 1.0];
        for (a, b) in cdf.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12, "{:?}", cdf);
        }
        assert_valid(&cdf);
    }

    #[test]
    fn test_normalizes_already_normalized_weights() {
        let cdf = built(&[0.25f32, 0.25, 0.5], 1, true).unwrap();
        assert_eq!(cdf, vec![0.25, 0.5, 1.0]);
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let weights = [0.3f32, 1.7, 0.0, 2.2, 0.9];
        let mut cdf = CumulativeDistribution::<f32>::default();
        cdf.build(StridedRow::contiguous(&weights), 0, 1, true)
            .unwrap();
        let first = cdf.as_slice().to_vec();
        cdf.build(StridedRow::contiguous(&weights), 0, 1, true)
            .unwrap();
        assert_eq!(first, cdf.as_slice());
    }

    #[test]
    fn test_reports_support() {
        let mut cdf = CumulativeDistribution::<f64>::default();
        let support = cdf
            .build(StridedRow::contiguous(&[0.0f64, 2.0, 0.0, 6.0]), 0, 2, false)
            .unwrap();
        assert_eq!(
            support,
            RowSupport {
                positive: 2,
                total: 8.0
            }
        );
    }

    #[test]
    fn test_negative_entry() {
        let err = built(&[-1.0f64, 2.0], 1, true).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidProbability {
                index: 0,
                issue: ProbabilityIssue::Negative,
                ..
            }
        ));
    }

    #[test]
    fn test_non_finite_entries() {
        for bad in [f32::NAN, f32::INFINITY] {
            let err = built(&[1.0f32, bad], 1, true).unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidProbability {
                    index: 1,
                    issue: ProbabilityIssue::NonFinite,
                    ..
                }
            ));
        }
        let err = built(&[f64::NEG_INFINITY], 1, true).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidProbability {
                issue: ProbabilityIssue::Negative,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_sum() {
        let err = built(&[0.0f64, 0.0], 1, true).unwrap_err();
        assert!(matches!(err, Error::DegenerateDistribution { .. }));
    }

    #[test]
    fn test_overflowing_sum() {
        let mut cdf = CumulativeDistribution::<f32>::default();
        let err = cdf
            .build(StridedRow::contiguous(&[f32::MAX, f32::MAX]), 0, 1, true)
            .unwrap_err();
        assert!(matches!(err, Error::DegenerateDistribution { .. }));

        // Accumulating in f64 has the headroom
        assert!(built(&[f32::MAX, f32::MAX], 1, true).is_ok());
    }

    #[test]
    fn test_insufficient_support() {
        let err = built(&[1.0f64, 0.0, 0.0], 2, false).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientSupport {
                positive: 1,
                requested: 2,
                ..
            }
        ));
        // Same row is fine with replacement
        assert!(built(&[1.0f64, 0.0, 0.0], 2, true).is_ok());
    }

    #[test]
    fn test_last_entry_is_exactly_one() {
        let weights = vec![0.1f32; 1000];
        let mut cdf = CumulativeDistribution::<f32>::default();
        cdf.build(StridedRow::contiguous(&weights), 0, 1, true)
            .unwrap();
        assert_eq!(*cdf.as_slice().last().unwrap(), 1.0);
    }

    #[test]
    fn test_draw_boundaries() {
        let mut cdf = CumulativeDistribution::<f64>::default();
        cdf.build(StridedRow::contiguous(&[1.0f64, 1.0, 2.0]), 0, 1, true)
            .unwrap();
        assert_eq!(cdf.draw(0.0), 0);
        assert_eq!(cdf.draw(0.25), 0);
        assert_eq!(cdf.draw(0.2500001), 1);
        assert_eq!(cdf.draw(0.5), 1);
        assert_eq!(cdf.draw(0.75), 2);
        assert_eq!(cdf.draw(1.0), 2);
    }

    #[test]
    fn test_zero_draw_skips_empty_leading_buckets() {
        let mut cdf = CumulativeDistribution::<f64>::default();
        cdf.build(StridedRow::contiguous(&[0.0f64, 0.0, 3.0, 1.0]), 0, 1, true)
            .unwrap();
        assert_eq!(cdf.draw(0.0), 2);
        assert_eq!(cdf.draw(0.5), 2);
        assert_eq!(cdf.draw(0.9), 3);

        // A removed first category is skipped the same way
        let mut cdf = CumulativeDistribution::<f32>::default();
        cdf.build(StridedRow::contiguous(&[1.0f32, 1.0, 1.0]), 0, 2, false)
            .unwrap();
        assert_eq!(cdf.draw(0.0), 0);
        cdf.remove(0, 0).unwrap();
        assert_eq!(cdf.draw(0.0), 1);
    }

    #[test]
    fn test_remove_middle_category() {
        let mut cdf = CumulativeDistribution::<f64>::default();
        cdf.build(StridedRow::contiguous(&[1.0f64, 2.0, 1.0]), 0, 2, false)
            .unwrap();
        cdf.remove(1, 0).unwrap();

        let values = cdf.as_slice();
        assert!((values[0] - 0.5).abs() < 1e-12);
        assert!((values[1] - 0.5).abs() < 1e-12);
        assert_eq!(values[2], 1.0);
        assert_valid(values);

        // The removed bucket has zero width and can no longer be hit
        for u in [0.3, 0.5000001, 0.7, 0.99] {
            assert_ne!(cdf.draw(u), 1);
        }
    }

    #[test]
    fn test_remove_first_and_last() {
        let mut cdf = CumulativeDistribution::<f64>::default();
        cdf.build(StridedRow::contiguous(&[1.0f64, 1.0, 1.0, 1.0]), 0, 3, false)
            .unwrap();
        cdf.remove(0, 0).unwrap();
        assert_valid(cdf.as_slice());
        assert_eq!(cdf.as_slice()[0], 0.0);

        cdf.remove(3, 0).unwrap();
        assert_valid(cdf.as_slice());
        let values = cdf.as_slice();
        assert!((values[1] - 0.5).abs() < 1e-12);
        assert_eq!(values[2], 1.0);
    }

    #[test]
    fn test_remove_everything_fails_fast() {
        let mut cdf = CumulativeDistribution::<f64>::default();
        cdf.build(StridedRow::contiguous(&[0.0f64, 3.0]), 4, 1, false)
            .unwrap();
        let err = cdf.remove(1, 4).unwrap_err();
        assert!(matches!(
            err,
            Error::InternalInvariantViolation { row: 4, .. }
        ));
    }
}
