//! Row/batch multinomial driver

use super::cumulative::CumulativeDistribution;
use crate::dtype::FloatElement;
use crate::error::{Error, Result};
use crate::random::UniformSource;
use crate::tensor::Tensor;
use log::trace;

/// Draw `num_samples` category indices per row of `probs` into `out`
///
/// `probs` is a 1-D distribution or a 2-D batch `[n_dist, n_categories]`;
/// `out` is `[num_samples]` or `[n_dist, num_samples]` to match. Both may
/// have arbitrary strides. `A` selects the type the per-row cumulative
/// distribution is accumulated in.
///
/// For every row the cumulative distribution is built and validated once,
/// then each sample takes one uniform value from `source` and a binary search.
/// Without replacement, the drawn category's mass is removed before the next
/// draw of the same row.
///
/// The first failing row aborts the call; `out` is then partially written and
/// must not be used.
pub fn multinomial_kernel<T, A, S>(
    probs: &Tensor<T>,
    out: &mut Tensor<i64>,
    num_samples: usize,
    replacement: bool,
    source: &mut S,
) -> Result<()>
where
    T: FloatElement,
    A: FloatElement,
    S: UniformSource + ?Sized,
{
    let weights = probs.matrix_view()?;
    let mut indices = out.matrix_view_mut()?;

    let n_dist = weights.rows();
    let n_categories = weights.cols();

    if indices.rows() != n_dist || indices.cols() != num_samples {
        return Err(Error::shape_mismatch(
            &[n_dist, num_samples],
            &[indices.rows(), indices.cols()],
        ));
    }
    if n_categories == 0 {
        return Err(Error::invalid_argument(
            "probs",
            "distribution must have at least one category",
        ));
    }

    let mut cdf = CumulativeDistribution::<A>::with_capacity(n_categories);

    for i in 0..n_dist {
        let support = cdf.build(weights.row(i), i, num_samples, replacement)?;
        trace!(
            "multinomial row {}: {} of {} categories positive, total weight {}",
            i, support.positive, n_categories, support.total
        );

        for j in 0..num_samples {
            let sample_idx = cdf.draw(source.next_uniform());
            indices.set(i, j, sample_idx as i64);

            if !replacement && j + 1 < num_samples {
                cdf.remove(sample_idx, i)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::Layout;

    /// Replays a fixed sequence of uniform values
    struct Scripted {
        values: Vec<f64>,
        next: usize,
    }

    impl Scripted {
        fn new(values: &[f64]) -> Self {
            Self {
                values: values.to_vec(),
                next: 0,
            }
        }
    }

    impl UniformSource for Scripted {
        fn next_uniform(&mut self) -> f64 {
            let u = self.values[self.next];
            self.next += 1;
            u
        }
    }

    fn run(weights: &[f64], shape: &[usize], n: usize, replacement: bool, u: &[f64]) -> Result<Vec<i64>> {
        let probs = Tensor::from_slice(weights, shape)?;
        let mut out_shape = shape[..shape.len() - 1].to_vec();
        out_shape.push(n);
        let mut out = Tensor::<i64>::zeros(&out_shape);
        multinomial_kernel::<f64, f64, _>(&probs, &mut out, n, replacement, &mut Scripted::new(u))?;
        Ok(out.to_vec())
    }

    #[test]
    fn test_with_replacement_follows_draws() {
        let got = run(&[1.0, 1.0, 2.0], &[3], 4, true, &[0.1, 0.3, 0.6, 0.99]).unwrap();
        assert_eq!(got, vec![0, 1, 2, 2]);
    }

    #[test]
    fn test_without_replacement_removes_mass() {
        // cdf [0.25, 0.5, 1.0]; draw 0.9 -> 2; remaining cdf [0.5, 1.0, 1.0]
        // draw 0.9 again -> 1; remaining cdf [1.0, 1.0, 1.0]; draw 0.9 -> 0
        let got = run(&[1.0, 1.0, 2.0], &[3], 3, false, &[0.9, 0.9, 0.9]).unwrap();
        assert_eq!(got, vec![2, 1, 0]);
    }

    #[test]
    fn test_rows_are_independent() {
        let got = run(
            &[1.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            &[2, 3],
            2,
            true,
            &[0.5, 0.9, 0.1, 0.5],
        )
        .unwrap();
        assert_eq!(got, vec![0, 0, 2, 2]);
    }

    #[test]
    fn test_upper_edge_draw_hits_last_positive_bucket() {
        let got = run(&[3.0, 1.0, 0.0], &[3], 1, true, &[1.0]).unwrap();
        // cdf [0.75, 1.0, 1.0]: the lower bound of 1.0 is index 1
        assert_eq!(got, vec![1]);
    }

    #[test]
    fn test_zero_draw_never_selects_zero_weight_category() {
        let got = run(&[0.0, 1.0, 0.0], &[3], 1, true, &[0.0]).unwrap();
        assert_eq!(got, vec![1]);

        let got = run(&[0.0, 1.0, 0.0], &[3], 1, false, &[0.0]).unwrap();
        assert_eq!(got, vec![1]);
    }

    #[test]
    fn test_zero_draws_without_replacement_stay_distinct() {
        let got = run(&[0.0, 1.0, 1.0], &[3], 2, false, &[0.0, 0.0]).unwrap();
        assert_eq!(got, vec![1, 2]);

        let got = run(&[0.0, 2.0, 0.0, 1.0, 3.0], &[5], 3, false, &[0.0, 0.0, 0.0]).unwrap();
        assert_eq!(got, vec![1, 3, 4]);
    }

    #[test]
    fn test_failure_reports_row() {
        let err = run(&[1.0, 1.0, 0.0, 0.0], &[2, 2], 1, true, &[0.5, 0.5]).unwrap_err();
        assert!(matches!(err, Error::DegenerateDistribution { row: 1, .. }));
    }

    #[test]
    fn test_strided_input_and_output() {
        // Weights stored column-major: logical rows [1, 0, 0] and [0, 0, 1]
        let storage = vec![1.0f64, 0.0, 0.0, 0.0, 0.0, 1.0];
        let probs = Tensor::from_parts(storage, Layout::new(&[2, 3], &[1, 2], 0)).unwrap();
        assert_eq!(probs.to_vec(), vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);

        // Output written column-major with a leading pad element
        let mut out =
            Tensor::from_parts(vec![-1i64; 5], Layout::new(&[2, 2], &[1, 2], 1)).unwrap();
        multinomial_kernel::<f64, f32, _>(
            &probs,
            &mut out,
            2,
            true,
            &mut Scripted::new(&[0.3, 0.7, 0.3, 0.7]),
        )
        .unwrap();

        assert_eq!(out.to_vec(), vec![0, 0, 2, 2]);
        assert_eq!(out.storage()[0], -1);
    }

    #[test]
    fn test_output_shape_checked() {
        let probs = Tensor::from_slice(&[1.0f32, 1.0], &[2]).unwrap();
        let mut out = Tensor::<i64>::zeros(&[3]);
        let err = multinomial_kernel::<f32, f32, _>(
            &probs,
            &mut out,
            2,
            true,
            &mut Scripted::new(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }
}
