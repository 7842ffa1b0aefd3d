use std::{
    fmt,
    ops::{Index, IndexMut},
};

use crate::{
    assign::assign_matrix,
    error::{unwrap_size, SizeError},
    expr::{MatrixExpr, MatrixStorage, OwnedMatrix},
    functor::{AssignFunctor, OpAssign},
    operand::{impl_operators, MatrixKind, MatrixOperand, Operand},
    size::Dynamic,
    Scalar,
};

use super::{fmt_rows, ops::impl_matrix_assign_operators};

/// A heap-allocated, row-major matrix whose dimensions are chosen at run time.
///
/// # Examples
///
/// ```
/// # use cml::*;
/// let mut m = DynMatrix::<f32>::zeros(2, 3);
/// m.set_row(0, [1, 2, 3]);
/// assert_eq!(m[(0, 2)], 3.0);
/// assert_eq!(m.as_slice(), [1.0, 2.0, 3.0, 0.0, 0.0, 0.0]);
///
/// m.resize(2, 2);
/// assert_eq!(m.as_slice(), [1.0, 2.0, 0.0, 0.0]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct DynMatrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> DynMatrix<T> {
    /// Creates an empty 0x0 matrix.
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            rows: 0,
            cols: 0,
        }
    }

    /// Creates a matrix by invoking a closure with the position (row and column) of each element.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows a `usize`.
    #[track_caller]
    pub fn from_fn<F>(rows: usize, cols: usize, mut cb: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(unwrap_size(SizeError::element_count(rows, cols)));
        for row in 0..rows {
            for col in 0..cols {
                data.push(cb(row, col));
            }
        }
        Self { data, rows, cols }
    }

    /// Takes ownership of `rows * cols` elements stored row by row.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, SizeError> {
        SizeError::check_length(SizeError::element_count(rows, cols)?, data.len())?;
        Ok(Self { data, rows, cols })
    }

    /// Creates a matrix from a 2-dimensional array of rows.
    ///
    /// ```
    /// # use cml::*;
    /// let m = DynMatrix::from_rows([[1, 2, 3], [4, 5, 6]]);
    /// assert_eq!((m.rows(), m.cols()), (2, 3));
    /// assert_eq!(m[(1, 0)], 4);
    /// ```
    pub fn from_rows<const R: usize, const C: usize>(rows: [[T; C]; R]) -> Self {
        Self {
            data: rows.into_iter().flatten().collect(),
            rows: R,
            cols: C,
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Returns a pointer to the first element. Elements are stored row by row.
    ///
    /// The pointer is invalidated when the matrix is resized.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Scalar> DynMatrix<T> {
    /// Creates a matrix with `rows` rows and `cols` columns, with every element set to 0.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows a `usize`.
    #[track_caller]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![T::ZERO; unwrap_size(SizeError::element_count(rows, cols))],
            rows,
            cols,
        }
    }

    /// Creates a matrix with ones on the main diagonal and zeros everywhere else.
    pub fn identity(rows: usize, cols: usize) -> Self {
        Self::from_fn(rows, cols, |row, col| if row == col { T::ONE } else { T::ZERO })
    }

    /// Copies `rows * cols` elements stored row by row.
    ///
    /// ```
    /// # use cml::*;
    /// let m = DynMatrix::from_row_slice(2, 2, &[1, 2, 3, 4]).unwrap();
    /// assert_eq!(m[(1, 0)], 3);
    ///
    /// let err = DynMatrix::from_row_slice(2, 2, &[1, 2, 3]).unwrap_err();
    /// assert_eq!(err, SizeError::Length { expected: 4, actual: 3 });
    /// ```
    pub fn from_row_slice(rows: usize, cols: usize, data: &[T]) -> Result<Self, SizeError> {
        Self::from_vec(rows, cols, data.to_vec())
    }

    /// Copies `rows * cols` elements stored column by column.
    ///
    /// The matrix itself still stores its elements row by row.
    ///
    /// ```
    /// # use cml::*;
    /// let m = DynMatrix::from_col_slice(2, 3, &[1, 4, 2, 5, 3, 6]).unwrap();
    /// assert_eq!(m, DynMatrix::from_rows([[1, 2, 3], [4, 5, 6]]));
    /// ```
    pub fn from_col_slice(rows: usize, cols: usize, data: &[T]) -> Result<Self, SizeError> {
        SizeError::check_length(SizeError::element_count(rows, cols)?, data.len())?;
        Ok(Self::from_fn(rows, cols, |row, col| data[col * rows + row]))
    }

    /// Returns the sum of the elements on the main diagonal.
    ///
    /// Returns an error if the matrix is not square.
    ///
    /// ```
    /// # use cml::*;
    /// let m = DynMatrix::from_rows([[1, 2], [3, 4]]);
    /// assert_eq!(m.trace(), Ok(5));
    /// assert!(DynMatrix::<i32>::zeros(2, 3).trace().is_err());
    /// ```
    pub fn trace(&self) -> Result<T, SizeError> {
        if self.rows != self.cols {
            log::debug!("trace of non-square {}x{} matrix", self.rows, self.cols);
            return Err(SizeError::Matrix {
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: self.cols,
                right_cols: self.rows,
            });
        }
        Ok((0..self.rows).fold(T::ZERO, |acc, i| acc + self[(i, i)]))
    }

    /// Changes the dimensions to `rows`x`cols`.
    ///
    /// Elements inside both the old and the new dimensions keep their position; new elements are
    /// set to zero.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows a `usize`.
    #[track_caller]
    pub fn resize(&mut self, rows: usize, cols: usize) {
        if (rows, cols) == (self.rows, self.cols) {
            return;
        }
        log::trace!(
            "resizing matrix from {}x{} to {rows}x{cols}",
            self.rows,
            self.cols
        );
        let len = unwrap_size(SizeError::element_count(rows, cols));
        if cols == self.cols {
            self.data.resize(len, T::ZERO);
        } else {
            let old = std::mem::take(&mut self.data);
            let old_cols = self.cols;
            let old_rows = self.rows;
            self.data = (0..len)
                .map(|i| {
                    let (row, col) = (i / cols, i % cols);
                    if row < old_rows && col < old_cols {
                        old[row * old_cols + col]
                    } else {
                        T::ZERO
                    }
                })
                .collect();
        }
        self.rows = rows;
        self.cols = cols;
    }

    /// Creates a matrix from the elements of a matrix expression or of another matrix.
    pub fn from_expr<S>(src: S) -> Self
    where
        S: MatrixOperand,
        OpAssign: AssignFunctor<T, <S::Expr as MatrixExpr>::Elem>,
    {
        let mut m = Self::new();
        m.assign_resizing(src);
        m
    }

    /// Resizes `self` to the dimensions of `src` and assigns its elements.
    ///
    /// This never fails, regardless of the `auto-resize` feature.
    pub fn assign_resizing<S>(&mut self, src: S)
    where
        S: MatrixOperand,
        OpAssign: AssignFunctor<T, <S::Expr as MatrixExpr>::Elem>,
    {
        let src = src.into_matrix_expr();
        self.resize(src.rows(), src.cols());
        unwrap_size(assign_matrix::<OpAssign, _, _>(self, &src));
    }
}

impl<T> Index<(usize, usize)> for DynMatrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            col < self.cols,
            "column index {col} out of bounds for matrix with {} columns",
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for DynMatrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            col < self.cols,
            "column index {col} out of bounds for matrix with {} columns",
            self.cols
        );
        &mut self.data[row * self.cols + col]
    }
}

impl<T: fmt::Debug> fmt::Debug for DynMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_rows(self.rows, self.cols, f, |row, col, f| {
            fmt::Debug::fmt(&self.data[row * self.cols + col], f)
        })
    }
}

impl<T: Scalar> MatrixExpr for DynMatrix<T> {
    type Elem = T;
    type Rows = Dynamic;
    type Cols = Dynamic;
    const ASSIGNABLE: bool = true;
    const RESIZABLE: bool = true;

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

impl<T: Scalar> MatrixStorage for DynMatrix<T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self[(row, col)]
    }

    fn resize_for_assign(&mut self, rows: usize, cols: usize) -> bool {
        self.resize(rows, cols);
        true
    }
}

impl<T: Scalar> OwnedMatrix<T> for DynMatrix<T> {
    fn with_size(rows: usize, cols: usize) -> Self {
        Self::zeros(rows, cols)
    }
}

impl<T: Scalar> Operand for DynMatrix<T> {
    type Kind = MatrixKind;
    type Expr = Self;

    #[inline]
    fn into_expr(self) -> Self {
        self
    }
}

impl<'a, T: Scalar> Operand for &'a DynMatrix<T> {
    type Kind = MatrixKind;
    type Expr = Self;

    #[inline]
    fn into_expr(self) -> Self {
        self
    }
}

impl_operators!([T: Scalar,] DynMatrix<T>);
impl_operators!(['a, T: Scalar,] &'a DynMatrix<T>);
impl_matrix_assign_operators!([T: Scalar,] DynMatrix<T>);

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn construction() {
        let m = DynMatrix::from_fn(2, 3, |row, col| (row * 10 + col) as i32);
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert_eq!(m.as_slice(), [0, 1, 2, 10, 11, 12]);
        assert_eq!(format!("{m:?}"), "[[0, 1, 2], [10, 11, 12]]");

        let f = DynMatrix::<f64>::from_expr(&Matrix::from_rows([[1, 2], [3, 4]]) * 0.5);
        assert_eq!(f.as_slice(), [0.5, 1.0, 1.5, 2.0]);

        assert!(DynMatrix::from_vec(3, 3, vec![0u8; 8]).is_err());
    }

    #[test]
    fn resize_keeps_overlap() {
        let mut m = DynMatrix::from_row_slice(2, 2, &[1, 2, 3, 4]).unwrap();
        m.resize(3, 3);
        assert_eq!(m.as_slice(), [1, 2, 0, 3, 4, 0, 0, 0, 0]);
        m.resize(1, 3);
        assert_eq!(m.as_slice(), [1, 2, 0]);
        m.resize(0, 0);
        assert!(m.as_slice().is_empty());
    }

    #[test]
    #[should_panic(expected = "column index 2 out of bounds")]
    fn index_checks_columns() {
        let m = DynMatrix::<i32>::zeros(2, 2);
        let _elem = m[(0, 2)];
    }

    #[test]
    fn assignment_requires_equal_dimensions() {
        let mut m = DynMatrix::<i32>::zeros(2, 2);
        let src = Matrix::from_rows([[1, 2, 3]]);
        let result = m.try_assign(&src);
        if cfg!(feature = "auto-resize") {
            assert_eq!(result, Ok(()));
            assert_eq!(m.as_slice(), [1, 2, 3]);
        } else {
            assert_eq!(
                result,
                Err(SizeError::Matrix {
                    left_rows: 2,
                    left_cols: 2,
                    right_rows: 1,
                    right_cols: 3,
                })
            );
            assert_eq!(m, DynMatrix::zeros(2, 2));
        }

        let mut n = DynMatrix::<i32>::zeros(2, 2);
        n.assign_resizing(&src);
        assert_eq!((n.rows(), n.cols()), (1, 3));
    }

    #[test]
    fn array_and_column_construction() {
        let rows = DynMatrix::from_rows([[1, 2, 3, 4], [5, 6, 7, 8], [9, 0, 0, 0]]);
        assert_eq!((rows.rows(), rows.cols()), (3, 4));
        assert_eq!(rows[(2, 0)], 9);

        let cols =
            DynMatrix::from_col_slice(3, 4, &[1, 5, 9, 2, 6, 0, 3, 7, 0, 4, 8, 0]).unwrap();
        assert_eq!(cols, rows);
        assert_eq!(
            DynMatrix::from_col_slice(2, 2, &[1, 2, 3]),
            Err(SizeError::Length {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn overflowing_dimensions() {
        assert_eq!(
            DynMatrix::<u8>::from_vec(usize::MAX, 2, Vec::new()),
            Err(SizeError::Overflow {
                rows: usize::MAX,
                cols: 2
            })
        );
        assert!(DynMatrix::<u8>::from_row_slice(2, usize::MAX, &[]).is_err());
        assert!(DynMatrix::<u8>::from_col_slice(usize::MAX, usize::MAX, &[]).is_err());
    }

    #[test]
    #[should_panic(expected = "overflow the element count")]
    fn zeros_with_overflowing_dimensions() {
        let _m = DynMatrix::<f32>::zeros(usize::MAX, 3);
    }

    #[test]
    fn trace() {
        let m = DynMatrix::from_rows([[1, 2, 3], [4, 5, 6], [7, 8, 9]]);
        assert_eq!(m.trace(), Ok(15));
        assert_eq!(DynMatrix::<f64>::new().trace(), Ok(0.0));
        assert_eq!(
            DynMatrix::<i32>::zeros(2, 3).trace(),
            Err(SizeError::Matrix {
                left_rows: 2,
                left_cols: 3,
                right_rows: 3,
                right_cols: 2,
            })
        );
    }

    #[test]
    fn self_assignment() {
        let mut m = DynMatrix::from_rows([[1.5f64, 2.0], [3.0, -4.0]]);
        let before = m.clone();
        m.assign(&m.clone());
        assert_eq!(m, before);
        m.assign_resizing(m.clone());
        assert_eq!(m, before);
    }

    #[test]
    fn from_row_slice_copies() {
        let src = [1, 2, 3, 4];
        let m = DynMatrix::from_row_slice(2, 2, &src).unwrap();
        assert_ne!(m.as_ptr(), src.as_ptr());
        assert_eq!(m.as_slice(), src);
    }

    #[test]
    fn compound_assignment() {
        let mut m = DynMatrix::<i32>::identity(2, 2);
        m += Mat2::<i32>::identity();
        m *= 3;
        assert_eq!(m.as_slice(), [6, 0, 0, 6]);

        let copy = m.clone();
        m -= &copy;
        assert_eq!(m, DynMatrix::zeros(2, 2));
    }
}
