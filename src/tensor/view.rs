//! Strided row views over tensor storage
//!
//! These map a logical `(row, column)` coordinate to a storage offset:
//!
//! ```text
//! offset + row * row_stride + column * col_stride
//! ```
//!
//! A 1-D tensor is presented as one row with `row_stride = 0`. Kernels only
//! ever go through these views, so they never assume row-major packing.

/// Read-only 2-D view of a tensor's storage
#[derive(Clone, Copy)]
pub struct MatrixView<'a, T> {
    data: &'a [T],
    offset: isize,
    rows: usize,
    cols: usize,
    row_stride: isize,
    col_stride: isize,
}

impl<'a, T: Copy> MatrixView<'a, T> {
    pub(crate) fn new(
        data: &'a [T],
        offset: usize,
        rows: usize,
        cols: usize,
        row_stride: isize,
        col_stride: isize,
    ) -> Self {
        Self {
            data,
            offset: offset as isize,
            rows,
            cols,
            row_stride,
            col_stride,
        }
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (row length)
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Borrow one row
    #[inline]
    pub fn row(&self, i: usize) -> StridedRow<'a, T> {
        debug_assert!(i < self.rows);
        StridedRow {
            data: self.data,
            base: self.offset + i as isize * self.row_stride,
            stride: self.col_stride,
            len: self.cols,
        }
    }
}

/// One row of a [`MatrixView`]
#[derive(Clone, Copy)]
pub struct StridedRow<'a, T> {
    data: &'a [T],
    base: isize,
    stride: isize,
    len: usize,
}

impl<'a, T: Copy> StridedRow<'a, T> {
    /// Build a row directly over a slice with a unit stride
    pub fn contiguous(data: &'a [T]) -> Self {
        Self {
            data,
            base: 0,
            stride: 1,
            len: data.len(),
        }
    }

    /// Number of elements in the row
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the row has no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Element at column `j`
    #[inline]
    pub fn get(&self, j: usize) -> T {
        debug_assert!(j < self.len);
        self.data[(self.base + j as isize * self.stride) as usize]
    }

    /// Iterate the row in column order
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len).map(move |j| self.get(j))
    }
}

/// Mutable 2-D view of a tensor's storage
pub struct MatrixViewMut<'a, T> {
    data: &'a mut [T],
    offset: isize,
    rows: usize,
    cols: usize,
    row_stride: isize,
    col_stride: isize,
}

impl<'a, T: Copy> MatrixViewMut<'a, T> {
    pub(crate) fn new(
        data: &'a mut [T],
        offset: usize,
        rows: usize,
        cols: usize,
        row_stride: isize,
        col_stride: isize,
    ) -> Self {
        Self {
            data,
            offset: offset as isize,
            rows,
            cols,
            row_stride,
            col_stride,
        }
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (row length)
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Write `value` at `(i, j)`
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        debug_assert!(i < self.rows && j < self.cols);
        let idx = self.offset + i as isize * self.row_stride + j as isize * self.col_stride;
        self.data[idx as usize] = value;
    }
}
