//! Weighted categorical (multinomial) sampling
//!
//! Per distribution row:
//!
//! 1. [`CumulativeDistribution::build`] validates the weights and builds a
//!    normalized cumulative distribution
//! 2. each sample maps one uniform draw to a category with [`lower_bound`]
//! 3. without replacement, [`CumulativeDistribution::remove`] takes the drawn
//!    category's mass out before the next draw
//!
//! [`multinomial_kernel`] drives this over a batch; [`CpuSampler`] is the
//! validated entry point implementing [`MultinomialOps`].

mod client;
mod config;
mod cumulative;
mod kernel;
mod search;

pub use client::{CpuSampler, MultinomialOps};
pub use config::{MAX_CATEGORIES, SamplerConfig};
pub use cumulative::{CumulativeDistribution, RowSupport};
pub use kernel::multinomial_kernel;
pub use search::lower_bound;
