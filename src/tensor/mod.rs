//! Tensor types
//!
//! A minimal host-memory tensor: owned storage plus a strided [`Layout`].
//! Enough to express batched, possibly non-contiguous weight matrices and
//! index outputs for the sampling kernels.

mod core;
mod float;
mod layout;
mod view;

pub use core::Tensor;
pub(crate) use float::dispatch_float;
pub use float::FloatTensor;
pub use layout::{Layout, Shape, Strides};
pub use view::{MatrixView, MatrixViewMut, StridedRow};
