//! Multinomial entry point: shape validation, output allocation, dispatch

use super::config::SamplerConfig;
use super::kernel::multinomial_kernel;
use crate::dtype::{AccumulationPrecision, FloatElement};
use crate::error::{Error, Result};
use crate::random::{Generator, GeneratorState, default_generator};
use crate::tensor::{FloatTensor, Tensor, dispatch_float};
use log::debug;
use std::sync::Arc;

/// Categorical sampling operations
pub trait MultinomialOps {
    /// Sample from a multinomial (categorical) distribution
    ///
    /// Given a tensor of non-negative weights for each category, samples
    /// category indices according to those weights.
    ///
    /// # Algorithm
    ///
    /// Inverse transform sampling (CDF method):
    /// 1. Build the normalized cumulative sum of the weights (CDF)
    /// 2. For each sample, draw uniform u ∈ `[0, 1)`
    /// 3. Binary search for the smallest index i where `CDF[i] >= u`
    ///
    /// Without replacement, the drawn category's probability mass is removed
    /// and the CDF renormalized before the next draw from the same row.
    ///
    /// # Arguments
    ///
    /// * `probs` - Weight tensor with shape `[num_categories]` or
    ///   `[num_distributions, num_categories]`, any strides
    ///   - Weights must be finite and non-negative
    ///   - Weights are normalized per row (they need not sum to 1)
    /// * `num_samples` - Number of samples to draw per distribution
    /// * `replacement` - Whether a category may be drawn more than once
    ///
    /// # Returns
    ///
    /// I64 tensor of zero-based indices with shape `[num_samples]` or
    /// `[num_distributions, num_samples]`.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidArgument` if `num_samples` is 0, `probs` is not 1D/2D,
    ///   has no categories or too many, or `num_samples > num_categories`
    ///   without replacement
    /// - `Error::InvalidProbability` for a negative, infinite or NaN weight
    /// - `Error::DegenerateDistribution` if a row sums to zero
    /// - `Error::InsufficientSupport` if a row has fewer positive weights
    ///   than `num_samples` without replacement
    ///
    /// # Examples
    ///
    /// ```
    /// use catdraw::prelude::*;
    /// use std::sync::Arc;
    ///
    /// let sampler = CpuSampler::new(Arc::new(Generator::new(0)));
    ///
    /// let probs: FloatTensor = Tensor::from_slice(&[0.1f32, 0.2, 0.3, 0.4], &[4])?.into();
    /// let samples = sampler.multinomial(&probs, 3, false)?; // Shape: [3]
    ///
    /// let batch: FloatTensor = Tensor::from_slice(&[0.1f64, 0.9, 0.5, 0.5], &[2, 2])?.into();
    /// let batch_samples = sampler.multinomial(&batch, 5, true)?; // Shape: [2, 5]
    /// assert_eq!(batch_samples.shape(), &[2, 5]);
    /// # Ok::<(), catdraw::error::Error>(())
    /// ```
    fn multinomial(
        &self,
        probs: &FloatTensor,
        num_samples: usize,
        replacement: bool,
    ) -> Result<Tensor<i64>>;

    /// Like [`Self::multinomial`], writing into a caller-provided output
    ///
    /// `out` must have the output shape described for
    /// [`Self::multinomial`]; it may use any strides.
    fn multinomial_into(
        &self,
        probs: &FloatTensor,
        out: &mut Tensor<i64>,
        num_samples: usize,
        replacement: bool,
    ) -> Result<()>;
}

/// Host sampler bound to a shared [`Generator`]
///
/// Every call locks the generator once and holds it until all rows are done.
#[derive(Clone, Debug)]
pub struct CpuSampler {
    generator: Arc<Generator>,
    config: SamplerConfig,
}

impl CpuSampler {
    /// Create a sampler with the default configuration
    pub fn new(generator: Arc<Generator>) -> Self {
        Self::with_config(generator, SamplerConfig::default())
    }

    /// Create a sampler with an explicit configuration
    pub fn with_config(generator: Arc<Generator>, config: SamplerConfig) -> Self {
        Self { generator, config }
    }

    /// Create a sampler with its own generator seeded with `seed`
    pub fn seeded(seed: u64) -> Self {
        Self::new(Arc::new(Generator::new(seed)))
    }

    /// The generator this sampler draws from
    pub fn generator(&self) -> &Arc<Generator> {
        &self.generator
    }

    /// Active configuration
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Validate arguments and compute the output shape
    fn output_shape(
        &self,
        probs: &FloatTensor,
        num_samples: usize,
        replacement: bool,
    ) -> Result<Vec<usize>> {
        if num_samples == 0 {
            return Err(Error::invalid_argument(
                "num_samples",
                "num_samples must be > 0",
            ));
        }

        let shape = probs.shape();
        let (n_dist, n_categories) = match *shape {
            [n_categories] => (None, n_categories),
            [n_dist, n_categories] => (Some(n_dist), n_categories),
            _ => {
                return Err(Error::invalid_argument(
                    "probs",
                    format!(
                        "multinomial requires 1D or 2D probability tensor, got {}D",
                        shape.len()
                    ),
                ));
            }
        };

        if n_categories == 0 {
            return Err(Error::invalid_argument(
                "probs",
                "probs tensor must have at least 1 category (last dim > 0)",
            ));
        }
        if n_categories > self.config.max_categories() {
            return Err(Error::invalid_argument(
                "probs",
                format!(
                    "number of categories cannot exceed {}, got {}",
                    self.config.max_categories(),
                    n_categories
                ),
            ));
        }
        if !replacement && num_samples > n_categories {
            return Err(Error::invalid_argument(
                "num_samples",
                format!(
                    "cannot sample {} items without replacement from {} categories",
                    num_samples, n_categories
                ),
            ));
        }

        Ok(match n_dist {
            Some(n_dist) => vec![n_dist, num_samples],
            None => vec![num_samples],
        })
    }

    fn run(
        &self,
        probs: &FloatTensor,
        out: &mut Tensor<i64>,
        num_samples: usize,
        replacement: bool,
    ) -> Result<()> {
        debug!(
            "multinomial: dtype={} shape={:?} contiguous={} num_samples={} replacement={} accumulation={:?}",
            probs.dtype(),
            probs.shape(),
            probs.is_contiguous(),
            num_samples,
            replacement,
            self.config.accumulation()
        );

        // Held for the whole batch; released on every return path
        let mut state = self.generator.lock();
        dispatch_float!(probs, t => self.run_typed(t, out, num_samples, replacement, &mut state))
    }

    fn run_typed<T: FloatElement>(
        &self,
        probs: &Tensor<T>,
        out: &mut Tensor<i64>,
        num_samples: usize,
        replacement: bool,
        state: &mut GeneratorState,
    ) -> Result<()> {
        match self.config.accumulation() {
            AccumulationPrecision::Native => multinomial_kernel::<T, T::Accum, _>(
                probs,
                out,
                num_samples,
                replacement,
                state,
            ),
            AccumulationPrecision::F64 => {
                multinomial_kernel::<T, f64, _>(probs, out, num_samples, replacement, state)
            }
        }
    }
}

impl Default for CpuSampler {
    /// Sampler drawing from the process-wide default generator
    fn default() -> Self {
        Self::new(default_generator())
    }
}

impl MultinomialOps for CpuSampler {
    fn multinomial(
        &self,
        probs: &FloatTensor,
        num_samples: usize,
        replacement: bool,
    ) -> Result<Tensor<i64>> {
        let out_shape = self.output_shape(probs, num_samples, replacement)?;
        let mut out = Tensor::<i64>::zeros(&out_shape);
        self.run(probs, &mut out, num_samples, replacement)?;
        Ok(out)
    }

    fn multinomial_into(
        &self,
        probs: &FloatTensor,
        out: &mut Tensor<i64>,
        num_samples: usize,
        replacement: bool,
    ) -> Result<()> {
        let out_shape = self.output_shape(probs, num_samples, replacement)?;
        if out.shape() != out_shape.as_slice() {
            return Err(Error::shape_mismatch(&out_shape, out.shape()));
        }
        self.run(probs, out, num_samples, replacement)
    }
}
