//! # catdraw
//!
//! **Weighted categorical ("multinomial") sampling over strided float tensors.**
//!
//! Draws category indices from a batch of discrete distributions given as
//! unnormalized, non-negative weights, with or without replacement.
//!
//! - **Validated**: negative, infinite and NaN weights, zero-mass rows and
//!   rows with too little support are reported per row, never clamped
//! - **Layout agnostic**: inputs and outputs may be padded, transposed or
//!   otherwise strided
//! - **Reproducible**: a seedable, lock-protected [`random::Generator`]
//!   drives every draw
//!
//! ## Quick Start
//!
//! ```rust
//! use catdraw::prelude::*;
//!
//! let sampler = CpuSampler::seeded(42);
//!
//! let weights: FloatTensor = Tensor::from_slice(&[0.0f32, 1.0, 0.0], &[3])?.into();
//! let picks = sampler.multinomial(&weights, 4, true)?;
//! assert_eq!(picks.to_vec(), vec![1, 1, 1, 1]);
//! # Ok::<(), catdraw::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `f16`: Half-precision weights (F16, BF16)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod dtype;
pub mod error;
pub mod random;
pub mod sampling;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{AccumulationPrecision, DType};
    pub use crate::error::{Error, Result};
    pub use crate::random::{Generator, UniformSource};
    pub use crate::sampling::{CpuSampler, MultinomialOps, SamplerConfig};
    pub use crate::tensor::{FloatTensor, Layout, Tensor};
}
