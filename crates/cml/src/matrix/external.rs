use std::{
    fmt,
    ops::{Index, IndexMut},
};

use crate::{
    error::SizeError,
    expr::{MatrixExpr, MatrixStorage},
    operand::{impl_operators, MatrixKind, Operand},
    size::Dynamic,
    Scalar,
};

use super::{fmt_rows, ops::impl_matrix_assign_operators};

/// The order in which an [`ExternalMatrix`] expects the elements of its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Layout {
    /// Row by row: element `(row, col)` is at `row * cols + col`.
    #[default]
    RowMajor,
    /// Column by column: element `(row, col)` is at `col * rows + row`.
    ColMajor,
}

/// A matrix stored in a buffer owned by the caller.
///
/// Assignments write through to the borrowed buffer. The dimensions are fixed when the matrix is
/// created; it cannot be resized or cloned. The buffer is read row by row unless the matrix is
/// created with [`Layout::ColMajor`].
///
/// # Examples
///
/// ```
/// # use cml::*;
/// let mut buf = [0.0f32; 6];
/// {
///     let mut m = ExternalMatrix::new(&mut buf, 2, 3).unwrap();
///     m.assign(Matrix::from_rows([[1, 2, 3], [4, 5, 6]]));
///     m *= 0.5;
/// }
/// assert_eq!(buf, [0.5, 1.0, 1.5, 2.0, 2.5, 3.0]);
///
/// assert!(ExternalMatrix::new(&mut buf, 4, 2).is_err());
///
/// let mut cols = [[1, 4], [2, 5], [3, 6]];
/// let m = ExternalMatrix::from_cols(&mut cols);
/// assert_eq!((m.rows(), m.cols()), (2, 3));
/// assert_eq!(m[(0, 2)], 3);
/// ```
pub struct ExternalMatrix<'a, T> {
    data: &'a mut [T],
    rows: usize,
    cols: usize,
    layout: Layout,
}

impl<'a, T> ExternalMatrix<'a, T> {
    /// Wraps a caller-owned buffer holding exactly `rows * cols` elements, row by row.
    pub fn new(data: &'a mut [T], rows: usize, cols: usize) -> Result<Self, SizeError> {
        Self::with_layout(data, rows, cols, Layout::RowMajor)
    }

    /// Wraps a caller-owned buffer holding exactly `rows * cols` elements, column by column.
    pub fn new_col_major(data: &'a mut [T], rows: usize, cols: usize) -> Result<Self, SizeError> {
        Self::with_layout(data, rows, cols, Layout::ColMajor)
    }

    /// Wraps a caller-owned buffer holding exactly `rows * cols` elements in the given layout.
    pub fn with_layout(
        data: &'a mut [T],
        rows: usize,
        cols: usize,
        layout: Layout,
    ) -> Result<Self, SizeError> {
        SizeError::check_length(SizeError::element_count(rows, cols)?, data.len())?;
        Ok(Self {
            data,
            rows,
            cols,
            layout,
        })
    }

    /// Wraps a 2-dimensional array of `R` rows with `C` elements each.
    pub fn from_rows<const R: usize, const C: usize>(data: &'a mut [[T; C]; R]) -> Self {
        Self {
            data: data.as_flattened_mut(),
            rows: R,
            cols: C,
            layout: Layout::RowMajor,
        }
    }

    /// Wraps a 2-dimensional array of `C` columns with `R` elements each.
    pub fn from_cols<const R: usize, const C: usize>(data: &'a mut [[T; R]; C]) -> Self {
        Self {
            data: data.as_flattened_mut(),
            rows: R,
            cols: C,
            layout: Layout::ColMajor,
        }
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Returns the borrowed buffer, in the order given by [`ExternalMatrix::layout`].
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &*self.data
    }

    /// Returns a pointer to the first element of the borrowed buffer.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    #[inline]
    #[track_caller]
    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        match self.layout {
            Layout::RowMajor => row * self.cols + col,
            Layout::ColMajor => col * self.rows + row,
        }
    }
}

impl<'a, T> Index<(usize, usize)> for ExternalMatrix<'a, T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[self.offset(row, col)]
    }
}

impl<'a, T> IndexMut<(usize, usize)> for ExternalMatrix<'a, T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        let offset = self.offset(row, col);
        &mut self.data[offset]
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for ExternalMatrix<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_rows(self.rows, self.cols, f, |row, col, f| {
            fmt::Debug::fmt(&self[(row, col)], f)
        })
    }
}

impl<'a, T: Scalar> MatrixExpr for ExternalMatrix<'a, T> {
    type Elem = T;
    type Rows = Dynamic;
    type Cols = Dynamic;
    const ASSIGNABLE: bool = true;

    #[inline]
    fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> T {
        self[(row, col)]
    }
}

impl<'a, T: Scalar> MatrixStorage for ExternalMatrix<'a, T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self[(row, col)]
    }
}

impl<'r, 'a, T: Scalar> Operand for &'r ExternalMatrix<'a, T> {
    type Kind = MatrixKind;
    type Expr = Self;

    #[inline]
    fn into_expr(self) -> Self {
        self
    }
}

impl_operators!(['r, 'a, T: Scalar,] &'r ExternalMatrix<'a, T>);
impl_matrix_assign_operators!(['a, T: Scalar,] ExternalMatrix<'a, T>);
