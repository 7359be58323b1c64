//! Core Tensor type

use super::Layout;
use super::view::{MatrixView, MatrixViewMut};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use std::fmt;

/// N-dimensional array held in host memory
///
/// `Tensor` consists of:
/// - **Storage**: an owned, flat buffer of elements
/// - **Layout**: shape, strides, and offset defining the view into storage
///
/// Layouts are validated on construction, so every logical element maps to a
/// slot inside the buffer. Strides may be arbitrary (padded rows, transposed
/// or reversed views), which is how non-contiguous inputs and outputs are
/// represented.
///
/// # Example
///
/// ```
/// use catdraw::tensor::Tensor;
///
/// let a = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0], &[2, 2])?;
/// let b = a.transpose(-1, -2)?; // Same buffer, swapped strides
/// assert_eq!(b.to_vec(), vec![1.0, 3.0, 2.0, 4.0]);
/// # Ok::<(), catdraw::error::Error>(())
/// ```
#[derive(Clone)]
pub struct Tensor<T: Element> {
    storage: Vec<T>,
    layout: Layout,
}

impl<T: Element> Tensor<T> {
    /// Create a tensor from a storage buffer and an explicit layout
    ///
    /// Fails with [`Error::InvalidLayout`] if shape and strides differ in rank,
    /// the address range overflows, or any element lies outside of `storage`.
    pub fn from_parts(storage: Vec<T>, layout: Layout) -> Result<Self> {
        if !layout.fits_in(storage.len())? {
            return Err(Error::InvalidLayout {
                reason: format!(
                    "{:?} addresses elements outside a buffer of {} elements",
                    layout,
                    storage.len()
                ),
            });
        }
        Ok(Self { storage, layout })
    }

    /// Create a contiguous tensor by copying a slice
    pub fn from_slice(data: &[T], shape: &[usize]) -> Result<Self> {
        Self::from_vec(data.to_vec(), shape)
    }

    /// Create a contiguous tensor taking ownership of a buffer
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(Error::shape_mismatch(&[expected], &[data.len()]));
        }
        Ok(Self {
            storage: data,
            layout: Layout::contiguous(shape),
        })
    }

    /// Create a contiguous zero-filled tensor
    pub fn zeros(shape: &[usize]) -> Self {
        let numel: usize = shape.iter().product();
        Self {
            storage: vec![T::zero(); numel],
            layout: Layout::contiguous(shape),
        }
    }

    /// Get the layout
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Number of logical elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.layout.elem_count()
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Whether the layout is row-major with no offset
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.layout.is_contiguous()
    }

    /// Underlying storage buffer, including any padding between rows
    #[inline]
    pub fn storage(&self) -> &[T] {
        &self.storage
    }

    /// Swap two dimensions without moving data
    pub fn transpose(self, dim0: isize, dim1: isize) -> Result<Self> {
        let ndim = self.ndim();
        let layout = self
            .layout
            .transpose(dim0, dim1)
            .ok_or(Error::InvalidDimension {
                dim: if self.layout.normalize_dim(dim0).is_none() {
                    dim0
                } else {
                    dim1
                },
                ndim,
            })?;
        Ok(Self {
            storage: self.storage,
            layout,
        })
    }

    /// Read a single element
    pub fn get(&self, indices: &[usize]) -> Option<T> {
        let idx = self.layout.index(indices)?;
        self.storage.get(idx).copied()
    }

    /// Copy elements out in logical row-major order
    pub fn to_vec(&self) -> Vec<T> {
        let shape = self.shape();
        let numel = self.numel();
        let mut out = Vec::with_capacity(numel);
        if numel == 0 {
            return out;
        }
        if self.is_contiguous() {
            out.extend_from_slice(&self.storage[..numel]);
            return out;
        }

        let mut indices = vec![0usize; shape.len()];
        for _ in 0..numel {
            if let Some(v) = self.get(&indices) {
                out.push(v);
            }
            for d in (0..shape.len()).rev() {
                indices[d] += 1;
                if indices[d] < shape[d] {
                    break;
                }
                indices[d] = 0;
            }
        }
        out
    }

    /// View a 1-D or 2-D tensor as rows of its last dimension
    ///
    /// A 1-D tensor is a single row.
    pub fn matrix_view(&self) -> Result<MatrixView<'_, T>> {
        let (rows, cols, row_stride, col_stride) = self.matrix_geometry()?;
        Ok(MatrixView::new(
            &self.storage,
            self.layout.offset(),
            rows,
            cols,
            row_stride,
            col_stride,
        ))
    }

    /// Mutable counterpart of [`Self::matrix_view`]
    pub fn matrix_view_mut(&mut self) -> Result<MatrixViewMut<'_, T>> {
        let (rows, cols, row_stride, col_stride) = self.matrix_geometry()?;
        let offset = self.layout.offset();
        Ok(MatrixViewMut::new(
            &mut self.storage,
            offset,
            rows,
            cols,
            row_stride,
            col_stride,
        ))
    }

    fn matrix_geometry(&self) -> Result<(usize, usize, isize, isize)> {
        let shape = self.shape();
        let strides = self.strides();
        match shape.len() {
            1 => Ok((1, shape[0], 0, strides[0])),
            2 => Ok((shape[0], shape[1], strides[0], strides[1])),
            n => Err(Error::invalid_argument(
                "tensor",
                format!("expected a 1D or 2D tensor, got {}D", n),
            )),
        }
    }
}

impl<T: Element> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("dtype", &T::DTYPE)
            .field("layout", &self.layout)
            .finish()
    }
}

impl<T: Element> fmt::Display for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor({:?}, {})", self.to_vec(), T::DTYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_shape_mismatch() {
        let err = Tensor::from_slice(&[1.0f32, 2.0, 3.0], &[2, 2]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_from_parts_rejects_out_of_bounds_layout() {
        let layout = Layout::new(&[2, 3], &[4, 1], 0);
        let err = Tensor::from_parts(vec![0.0f64; 6], layout).unwrap_err();
        assert!(matches!(err, Error::InvalidLayout { .. }));
    }

    #[test]
    fn test_from_parts_rejects_rank_mismatch() {
        let err = Tensor::from_parts(vec![0.0f32; 6], Layout::new(&[2, 3], &[3], 0)).unwrap_err();
        assert!(matches!(err, Error::InvalidLayout { .. }));
    }

    #[test]
    fn test_from_parts_rejects_overflowing_strides() {
        let layout = Layout::new(&[3, 2], &[isize::MAX, 1], 0);
        let err = Tensor::from_parts(vec![1.0f64; 4], layout).unwrap_err();
        assert!(matches!(err, Error::InvalidLayout { .. }));
    }

    #[test]
    fn test_padded_to_vec() {
        // Row pitch 4, last column of each row is padding
        let data = vec![1.0f32, 2.0, 3.0, -9.0, 4.0, 5.0, 6.0, -9.0];
        let t = Tensor::from_parts(data, Layout::new(&[2, 3], &[4, 1], 0)).unwrap();
        assert!(!t.is_contiguous());
        assert_eq!(t.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(t.get(&[1, 0]), Some(4.0));
    }

    #[test]
    fn test_transpose_keeps_storage() {
        let t = Tensor::from_slice(&[1i64, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
        let tt = t.transpose(0, 1).unwrap();
        assert_eq!(tt.shape(), &[3, 2]);
        assert_eq!(tt.to_vec(), vec![1, 4, 2, 5, 3, 6]);
        assert_eq!(tt.storage(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_transpose_bad_dim() {
        let t = Tensor::<f32>::zeros(&[2, 2]);
        let err = t.transpose(0, 5).unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { dim: 5, ndim: 2 }));
    }

    #[test]
    fn test_matrix_view_rejects_3d() {
        let t = Tensor::<f64>::zeros(&[2, 2, 2]);
        assert!(t.matrix_view().is_err());
    }
}
