//! Data type system for catdraw tensors
//!
//! `DType` names the element types a tensor can hold at runtime. The sampling
//! kernels are generic over [`FloatElement`]; dispatch from a runtime dtype to
//! a concrete Rust type happens through [`crate::tensor::FloatTensor`].

mod element;

pub use element::{Element, FloatElement};

use std::fmt;

/// Precision of the scratch cumulative distribution built per row.
///
/// Weights are read in their own element type and accumulated into a prefix
/// sum. Long rows accumulate rounding error, so callers sampling from very wide
/// f32 distributions may prefer to accumulate in f64.
///
/// # Default
///
/// `Native` matches the classic kernel: f64 rows accumulate in f64, f32 rows
/// in f32. Reduced-precision types (F16, BF16) always accumulate in at least
/// f32.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum AccumulationPrecision {
    /// Accumulate in the element's own accumulator type
    #[default]
    Native,
    /// Accumulate in f64 regardless of element type
    F64,
}

/// Data types supported by catdraw tensors
///
/// Discriminant values are stable and match numbering used for serialized
/// tensors: floats 0-9, signed integers 10-19.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum DType {
    /// 64-bit floating point
    F64 = 0,
    /// 32-bit floating point (most common)
    F32 = 1,
    /// 16-bit floating point (IEEE 754)
    F16 = 2,
    /// 16-bit brain floating point
    BF16 = 3,
    /// 64-bit signed integer (sampled indices)
    I64 = 10,
}

impl DType {
    /// Short name for display (e.g., "f32", "i64")
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::F16 => "f16",
            Self::BF16 => "bf16",
            Self::I64 => "i64",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}
