//! Layout: shape, strides, and offset for tensor memory layout

use crate::error::{Error, Result};
use smallvec::SmallVec;
use std::fmt;

/// Stack allocation threshold for dimensions
/// Sampling only ever sees 1-D and 2-D tensors, so 4 is plenty
const STACK_DIMS: usize = 4;

/// Shape type: dimensions of a tensor
pub type Shape = SmallVec<[usize; STACK_DIMS]>;

/// Strides type: element offsets between consecutive elements along each dimension
/// Signed to support negative strides
/// NOTE: Strides are in ELEMENTS, not bytes
pub type Strides = SmallVec<[isize; STACK_DIMS]>;

/// Layout describes the memory layout of a tensor
///
/// Address of element at indices [i0, i1, ..., in]:
///   offset + i0 * strides[0] + i1 * strides[1] + ... + in * strides[n]
#[derive(Clone, PartialEq, Eq)]
pub struct Layout {
    shape: Shape,
    strides: Strides,
    offset: usize,
}

impl Layout {
    /// Create a new contiguous (row-major/C-order) layout from a shape
    ///
    /// # Example
    /// ```
    /// use catdraw::tensor::Layout;
    /// let layout = Layout::contiguous(&[2, 3]);
    /// assert_eq!(layout.shape(), &[2, 3]);
    /// assert_eq!(layout.strides(), &[3, 1]);
    /// ```
    pub fn contiguous(shape: &[usize]) -> Self {
        let shape: Shape = shape.iter().copied().collect();
        let strides = Self::compute_contiguous_strides(&shape);
        Self {
            shape,
            strides,
            offset: 0,
        }
    }

    /// Create a layout with explicit shape, strides, and offset
    ///
    /// Not validated here; [`super::Tensor::from_parts`] rejects layouts whose
    /// rank or address range does not match its buffer.
    pub fn new(shape: &[usize], strides: &[isize], offset: usize) -> Self {
        Self {
            shape: shape.iter().copied().collect(),
            strides: strides.iter().copied().collect(),
            offset,
        }
    }

    fn compute_contiguous_strides(shape: &[usize]) -> Strides {
        let mut strides: Strides = SmallVec::with_capacity(shape.len());
        let mut stride = 1isize;

        for &dim in shape.iter().rev() {
            strides.push(stride);
            stride *= dim as isize;
        }

        strides.reverse();
        strides
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Get the offset
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.shape.iter().product()
    }

    /// Check if memory is contiguous (row-major order)
    pub fn is_contiguous(&self) -> bool {
        let expected = Self::compute_contiguous_strides(&self.shape);
        self.strides == expected && self.offset == 0
    }

    /// Normalize a dimension index (handle negative indices)
    pub fn normalize_dim(&self, d: isize) -> Option<usize> {
        let ndim = self.ndim() as isize;
        let idx = if d < 0 { ndim + d } else { d };
        if idx >= 0 && idx < ndim {
            Some(idx as usize)
        } else {
            None
        }
    }

    /// Compute the storage offset for given indices
    pub fn index(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.ndim() || self.strides.len() != self.ndim() {
            return None;
        }

        for (idx, &dim) in indices.iter().zip(self.shape.iter()) {
            if *idx >= dim {
                return None;
            }
        }

        let mut linear = isize::try_from(self.offset).ok()?;
        for (&idx, &stride) in indices.iter().zip(self.strides.iter()) {
            let step = isize::try_from(idx).ok()?.checked_mul(stride)?;
            linear = linear.checked_add(step)?;
        }

        usize::try_from(linear).ok()
    }

    /// Inclusive range of storage offsets this layout can address
    ///
    /// Returns `Ok(None)` for empty layouts (nothing is addressed). Fails with
    /// [`Error::InvalidLayout`] if the rank of shape and strides differ or the
    /// range does not fit in `isize`.
    pub fn storage_span(&self) -> Result<Option<(isize, isize)>> {
        if self.shape.len() != self.strides.len() {
            return Err(Error::InvalidLayout {
                reason: format!(
                    "shape has {} dimensions but strides has {}",
                    self.shape.len(),
                    self.strides.len()
                ),
            });
        }
        if self.shape.contains(&0) {
            return Ok(None);
        }

        let overflow = || Error::InvalidLayout {
            reason: format!("{:?} overflows the address range", self),
        };

        let start = isize::try_from(self.offset).map_err(|_| overflow())?;
        let (mut lo, mut hi) = (start, start);
        for (&dim, &stride) in self.shape.iter().zip(self.strides.iter()) {
            let reach = isize::try_from(dim - 1)
                .ok()
                .and_then(|d| d.checked_mul(stride))
                .ok_or_else(overflow)?;
            if reach < 0 {
                lo = lo.checked_add(reach).ok_or_else(overflow)?;
            } else {
                hi = hi.checked_add(reach).ok_or_else(overflow)?;
            }
        }
        Ok(Some((lo, hi)))
    }

    /// Whether every addressable element lies within a buffer of `len` elements
    pub fn fits_in(&self, len: usize) -> Result<bool> {
        Ok(match self.storage_span()? {
            Some((lo, hi)) => lo >= 0 && (hi as usize) < len,
            None => true,
        })
    }

    /// Create a transposed layout (swap two dimensions)
    pub fn transpose(&self, dim0: isize, dim1: isize) -> Option<Self> {
        let d0 = self.normalize_dim(dim0)?;
        let d1 = self.normalize_dim(dim1)?;

        let mut shape = self.shape.clone();
        let mut strides = self.strides.clone();

        shape.swap(d0, d1);
        strides.swap(d0, d1);

        Some(Self {
            shape,
            strides,
            offset: self.offset,
        })
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Layout {{ shape: {:?}, strides: {:?}, offset: {} }}",
            self.shape.as_slice(),
            self.strides.as_slice(),
            self.offset
        )
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.shape.as_slice())
    }
}
