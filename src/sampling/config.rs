//! Sampler configuration

use crate::dtype::AccumulationPrecision;

/// Largest supported number of categories per distribution
///
/// Beyond 2^24 consecutive integers are no longer representable in f32, so
/// cumulative buckets of single-precision rows stop being distinguishable.
pub const MAX_CATEGORIES: usize = 1 << 24;

/// Options controlling how [`super::CpuSampler`] runs the kernel
///
/// # Example
///
/// ```
/// use catdraw::dtype::AccumulationPrecision;
/// use catdraw::sampling::SamplerConfig;
///
/// let config = SamplerConfig::default().with_accumulation(AccumulationPrecision::F64);
/// assert_eq!(config.accumulation(), AccumulationPrecision::F64);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SamplerConfig {
    accumulation: AccumulationPrecision,
    max_categories: usize,
}

impl SamplerConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Precision the per-row cumulative distribution is built in
    pub fn with_accumulation(mut self, accumulation: AccumulationPrecision) -> Self {
        self.accumulation = accumulation;
        self
    }

    /// Reject distributions wider than `max_categories`
    ///
    /// Clamped to [`MAX_CATEGORIES`].
    pub fn with_max_categories(mut self, max_categories: usize) -> Self {
        self.max_categories = max_categories.min(MAX_CATEGORIES);
        self
    }

    /// Configured accumulation precision
    pub fn accumulation(&self) -> AccumulationPrecision {
        self.accumulation
    }

    /// Configured category limit
    pub fn max_categories(&self) -> usize {
        self.max_categories
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            accumulation: AccumulationPrecision::default(),
            max_categories: MAX_CATEGORIES,
        }
    }
}
