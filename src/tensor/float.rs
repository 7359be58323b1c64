//! Runtime-typed floating point tensors

use super::Tensor;
use crate::dtype::DType;

/// A tensor whose floating point element type is chosen at runtime
///
/// Sampling kernels are generic; this enum is the dispatch point from a
/// caller-selected dtype to a concrete instantiation (see `dispatch_float!`).
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum FloatTensor {
    /// 64-bit weights
    F64(Tensor<f64>),
    /// 32-bit weights
    F32(Tensor<f32>),
    /// IEEE half precision weights
    #[cfg(feature = "f16")]
    F16(Tensor<half::f16>),
    /// bfloat16 weights
    #[cfg(feature = "f16")]
    BF16(Tensor<half::bf16>),
}

/// Run `$body` with `$t` bound to the concrete `Tensor<T>` inside a [`FloatTensor`]
macro_rules! dispatch_float {
    ($tensor:expr, $t:ident => $body:expr) => {
        match $tensor {
            $crate::tensor::FloatTensor::F64($t) => $body,
            $crate::tensor::FloatTensor::F32($t) => $body,
            #[cfg(feature = "f16")]
            $crate::tensor::FloatTensor::F16($t) => $body,
            #[cfg(feature = "f16")]
            $crate::tensor::FloatTensor::BF16($t) => $body,
        }
    };
}

pub(crate) use dispatch_float;

impl FloatTensor {
    /// Element type
    pub fn dtype(&self) -> DType {
        dispatch_float!(self, t => t.dtype())
    }

    /// Shape of the wrapped tensor
    pub fn shape(&self) -> &[usize] {
        dispatch_float!(self, t => t.shape())
    }

    /// Number of dimensions
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Whether the wrapped tensor is row-major with no offset
    pub fn is_contiguous(&self) -> bool {
        dispatch_float!(self, t => t.is_contiguous())
    }
}

impl From<Tensor<f64>> for FloatTensor {
    fn from(t: Tensor<f64>) -> Self {
        Self::F64(t)
    }
}

impl From<Tensor<f32>> for FloatTensor {
    fn from(t: Tensor<f32>) -> Self {
        Self::F32(t)
    }
}

#[cfg(feature = "f16")]
impl From<Tensor<half::f16>> for FloatTensor {
    fn from(t: Tensor<half::f16>) -> Self {
        Self::F16(t)
    }
}

#[cfg(feature = "f16")]
impl From<Tensor<half::bf16>> for FloatTensor {
    fn from(t: Tensor<half::bf16>) -> Self {
        Self::BF16(t)
    }
}
