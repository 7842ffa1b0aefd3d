use std::{array, fmt};

use crate::{
    error::SizeError,
    expr::{MatrixExpr, MatrixStorage, OwnedMatrix},
    functor::{AssignFunctor, OpAssign},
    operand::{MatrixKind, MatrixOperand, Operand},
    promote::SizePromote,
    size::Fixed,
    One, Scalar, Vector, Zero,
};

mod dynamic;
mod external;
mod nodes;
mod ops;

pub use dynamic::DynMatrix;
pub use external::{ExternalMatrix, Layout};
pub use nodes::*;

/// A 2x2 matrix.
pub type Mat2<T> = Matrix<T, 2, 2>;
/// A 2x2 matrix with [`f32`] elements.
pub type Mat2f = Mat2<f32>;
/// A 2x2 matrix with [`f64`] elements.
pub type Mat2d = Mat2<f64>;
/// A 3x3 matrix.
pub type Mat3<T> = Matrix<T, 3, 3>;
/// A 3x3 matrix with [`f32`] elements.
pub type Mat3f = Mat3<f32>;
/// A 3x3 matrix with [`f64`] elements.
pub type Mat3d = Mat3<f64>;
/// A 4x4 matrix.
pub type Mat4<T> = Matrix<T, 4, 4>;
/// A 4x4 matrix with [`f32`] elements.
pub type Mat4f = Mat4<f32>;
/// A 4x4 matrix with [`f64`] elements.
pub type Mat4d = Mat4<f64>;

/// A matrix with 2 rows and 3 columns.
pub type Mat2x3<T> = Matrix<T, 2, 3>;
/// A matrix with 3 rows and 2 columns.
pub type Mat3x2<T> = Matrix<T, 3, 2>;
/// A matrix with 3 rows and 4 columns.
pub type Mat3x4<T> = Matrix<T, 3, 4>;
/// A matrix with 4 rows and 3 columns.
pub type Mat4x3<T> = Matrix<T, 4, 3>;

/// A column-major matrix with `R` rows and `C` columns, and element type `T`.
///
/// # Construction
///
/// - [`Matrix::from_rows`] and [`Matrix::from_columns`] fill a matrix with raw elements, or create
///   it from an array of row or column vectors.
/// - [`Matrix::from_fn`] creates each element by invoking a closure with its row and column.
/// - [`Matrix::from_diagonal`] creates a square matrix with a specified diagonal.
/// - [`Matrix::from_expr`] evaluates a matrix expression or converts another matrix.
/// - [`Matrix::ZERO`] and [`Matrix::identity`] create the zero and identity matrix.
///
/// # Element Access
///
/// [`Matrix`] implements [`Index`] and [`IndexMut`] for tuples of `(usize, usize)`. The first
/// element of the tuple is the *row*, the second is the *column*, matching common mathematical
/// notation. Indices are 0-based.
///
/// ```
/// # use cml::*;
/// let mut mat = Matrix::from_rows([
///     [0, 1]
/// ]);
/// mat[(0, 0)] = 4;
/// assert_eq!(mat[(0, 0)], 4);
/// assert_eq!(mat[(0, 1)], 1);
/// ```
///
/// Indexing out of bounds will result in a panic, just like it does for slices.
///
/// # Arithmetic
///
/// Like vectors, matrices combine into expressions that are evaluated on assignment:
///
/// ```
/// # use cml::*;
/// let a = Matrix::from_rows([[1, 2], [3, 4]]);
/// let v = vec2(1, 1);
///
/// let mut out = Vec2::<i64>::ZERO;
/// out.assign(&a * &v);
/// assert_eq!(out, [3, 7]);
///
/// let sq: Mat2<i32> = (&a * &a).eval();
/// assert_eq!(sq, Matrix::from_rows([[7, 10], [15, 22]]));
/// ```
///
/// [`Index`]: std::ops::Index
/// [`IndexMut`]: std::ops::IndexMut
#[derive(Clone, Copy, Hash)]
#[repr(transparent)]
pub struct Matrix<T, const R: usize, const C: usize>([[T; R]; C]);

#[rustfmt::skip]
unsafe impl<T: bytemuck::Zeroable, const R: usize, const C: usize> bytemuck::Zeroable for Matrix<T, R, C> {}
unsafe impl<T: bytemuck::Pod, const R: usize, const C: usize> bytemuck::Pod for Matrix<T, R, C> {}

impl<T: Zero + Copy, const R: usize, const C: usize> Matrix<T, R, C> {
    /// A matrix with every element set to 0.
    pub const ZERO: Self = Self([[T::ZERO; R]; C]);
}

impl<T, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Creates a [`Matrix`] from an array of row vectors.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cml::*;
    /// let rows = Matrix::from_rows([
    ///     [0, 1],
    ///     [2, 3],
    /// ]);
    /// let columns = Matrix::from_columns([
    ///     [0, 2],
    ///     [1, 3],
    /// ]);
    /// assert_eq!(rows, columns);
    /// ```
    pub fn from_rows<U: Into<Vector<T, C>>>(rows: [U; R]) -> Self
    where
        T: Copy,
    {
        let rows = rows.map(|row| row.into());
        Self::from_fn(|row, col| rows[row][col])
    }

    /// Creates a [`Matrix`] from an array of column vectors.
    pub fn from_columns<U: Into<Vector<T, R>>>(columns: [U; C]) -> Self {
        Self(columns.map(|col| col.into().into_array()))
    }

    /// Creates a [`Matrix`] by invoking a closure with the position (row and column) of each
    /// element.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cml::*;
    /// let mat = Matrix::from_fn(|row, col| row * 10 + col);
    /// assert_eq!(mat, Matrix::from_rows([
    ///     [ 0,  1,  2],
    ///     [10, 11, 12],
    /// ]));
    /// ```
    pub fn from_fn<F>(mut cb: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        Self(array::from_fn(|col| array::from_fn(|row| cb(row, col))))
    }

    /// Applies a closure to each element, returning a new matrix.
    pub fn map<F, U>(self, mut f: F) -> Matrix<U, R, C>
    where
        F: FnMut(T) -> U,
    {
        Matrix(self.0.map(|column| column.map(&mut f)))
    }

    /// Returns a pointer to the first element.
    ///
    /// Elements are stored column by column, without padding.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.0.as_ptr().cast()
    }
}

impl<T: Scalar, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Returns a matrix with ones on the main diagonal and zeros everywhere else.
    ///
    /// ```
    /// # use cml::*;
    /// assert_eq!(Mat2::<i32>::identity(), Matrix::from_rows([[1, 0], [0, 1]]));
    /// assert_eq!(Mat2x3::<i32>::identity(), Matrix::from_rows([[1, 0, 0], [0, 1, 0]]));
    /// ```
    pub fn identity() -> Self {
        Self::from_fn(|row, col| if row == col { T::ONE } else { T::ZERO })
    }

    /// Creates a matrix from the elements of a matrix expression or of another matrix.
    ///
    /// # Panics
    ///
    /// Panics if `src` has run-time dimensions different from `R`x`C`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cml::*;
    /// let a = Matrix::from_rows([[1, 2], [3, 4]]);
    /// let m = Mat2f::from_expr(&a * 0.5);
    /// assert_eq!(m, Matrix::from_rows([[0.5, 1.0], [1.5, 2.0]]));
    /// ```
    #[track_caller]
    pub fn from_expr<S>(src: S) -> Self
    where
        S: MatrixOperand,
        Fixed<R>: SizePromote<<S::Expr as MatrixExpr>::Rows>,
        Fixed<C>: SizePromote<<S::Expr as MatrixExpr>::Cols>,
        OpAssign: AssignFunctor<T, <S::Expr as MatrixExpr>::Elem>,
    {
        let mut m = Self::ZERO;
        m.assign(src);
        m
    }

    /// Creates a matrix from the elements of a matrix expression, or reports a size mismatch.
    pub fn try_from_expr<S>(src: S) -> Result<Self, SizeError>
    where
        S: MatrixOperand,
        Fixed<R>: SizePromote<<S::Expr as MatrixExpr>::Rows>,
        Fixed<C>: SizePromote<<S::Expr as MatrixExpr>::Cols>,
        OpAssign: AssignFunctor<T, <S::Expr as MatrixExpr>::Elem>,
    {
        let mut m = Self::ZERO;
        m.try_assign(src)?;
        Ok(m)
    }

    /// Returns a copy of row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    pub fn row(&self, row: usize) -> Vector<T, C> {
        Vector::from_fn(|col| self[(row, col)])
    }

    /// Returns a copy of column `col`.
    ///
    /// # Panics
    ///
    /// Panics if `col` is out of bounds.
    pub fn col(&self, col: usize) -> Vector<T, R> {
        Vector::from(self.0[col])
    }
}

impl<T: Scalar, const N: usize> Matrix<T, N, N> {
    /// Creates a square matrix from its diagonal.
    ///
    /// Elements outside the diagonal are set to zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cml::*;
    /// let diag = Matrix::from_diagonal([1, 2, 3]);
    /// assert_eq!(diag, Matrix::from_rows([
    ///     [1, 0, 0],
    ///     [0, 2, 0],
    ///     [0, 0, 3],
    /// ]));
    /// ```
    pub fn from_diagonal<D: Into<Vector<T, N>>>(diag: D) -> Self {
        let diag = diag.into();
        Self::from_fn(|row, col| if row == col { diag[row] } else { T::ZERO })
    }

    /// Returns the *trace* of the matrix (the sum of all elements on the diagonal).
    ///
    /// # Examples
    ///
    /// ```
    /// # use cml::*;
    /// let diag = Matrix::from_diagonal([1, 2, 3]);
    /// assert_eq!(diag.trace(), 1 + 2 + 3);
    ///
    /// assert_eq!(Mat3f::identity().trace(), 3.0);
    /// ```
    pub fn trace(&self) -> T {
        (0..N).fold(T::ZERO, |acc, i| acc + self[(i, i)])
    }
}

impl<T, const R: usize, const C: usize> Default for Matrix<T, R, C>
where
    T: Zero + Copy,
{
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl<T: fmt::Debug, const R: usize, const C: usize> fmt::Debug for Matrix<T, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_rows(R, C, f, |row, col, f| fmt::Debug::fmt(&self.0[col][row], f))
    }
}

/// Formats a matrix as a list of rows, in natural writing order.
///
/// `#` prints each row on its own line, but not each individual element.
pub(crate) fn fmt_rows<F>(rows: usize, cols: usize, f: &mut fmt::Formatter<'_>, elem: F) -> fmt::Result
where
    F: Fn(usize, usize, &mut fmt::Formatter<'_>) -> fmt::Result,
{
    struct FormatRow<'a, F> {
        elem: &'a F,
        row: usize,
        cols: usize,
    }

    impl<'a, F> fmt::Debug for FormatRow<'a, F>
    where
        F: Fn(usize, usize, &mut fmt::Formatter<'_>) -> fmt::Result,
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "[")?;
            for col in 0..self.cols {
                if col != 0 {
                    write!(f, ", ")?;
                }
                (self.elem)(self.row, col, f)?;
            }
            write!(f, "]")
        }
    }

    let mut list = f.debug_list();
    for row in 0..rows {
        list.entry(&FormatRow {
            elem: &elem,
            row,
            cols,
        });
    }
    list.finish()
}

impl<T: Scalar, const R: usize, const C: usize> MatrixExpr for Matrix<T, R, C> {
    type Elem = T;
    type Rows = Fixed<R>;
    type Cols = Fixed<C>;
    const ASSIGNABLE: bool = true;

    #[inline]
    fn rows(&self) -> usize {
        R
    }

    #[inline]
    fn cols(&self) -> usize {
        C
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> T {
        self.0[col][row]
    }
}

impl<T: Scalar, const R: usize, const C: usize> MatrixStorage for Matrix<T, R, C> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.0[col][row]
    }
}

impl<T: Scalar, const R: usize, const C: usize> OwnedMatrix<T> for Matrix<T, R, C> {
    fn with_size(rows: usize, cols: usize) -> Self {
        debug_assert_eq!((rows, cols), (R, C));
        Self::ZERO
    }
}

impl<T: Scalar, const R: usize, const C: usize> Operand for Matrix<T, R, C> {
    type Kind = MatrixKind;
    type Expr = Self;

    #[inline]
    fn into_expr(self) -> Self {
        self
    }
}

impl<'a, T: Scalar, const R: usize, const C: usize> Operand for &'a Matrix<T, R, C> {
    type Kind = MatrixKind;
    type Expr = Self;

    #[inline]
    fn into_expr(self) -> Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn from_rows_columns() {
        assert_eq!(
            Mat2x3::from_rows([[1, 2, 3], [4, 5, 6]]),
            Mat2x3::from_columns([[1, 4], [2, 5], [3, 6]]),
        );
    }

    #[test]
    fn fmt() {
        let mat = Matrix::from_rows([[0, 1], [2, 3]]);

        // Natural writing order (row-wise) for debug output.
        assert_eq!(format!("{:?}", mat), "[[0, 1], [2, 3]]");

        assert_eq!(
            format!("{:#?}", mat),
            "
[
    [0, 1],
    [2, 3],
]
"
            .trim()
        );
    }

    #[test]
    fn constants() {
        assert_eq!(format!("{:?}", Mat2f::ZERO), "[[0.0, 0.0], [0.0, 0.0]]");
        assert_eq!(
            format!("{:?}", Mat2f::identity()),
            "[[1.0, 0.0], [0.0, 1.0]]"
        );
    }

    #[test]
    fn column_major_layout() {
        let mat = Matrix::from_rows([[1u8, 2], [3, 4]]);
        let bytes: &[u8] = bytemuck::bytes_of(&mat);
        assert_eq!(bytes, [1, 3, 2, 4]);
        assert_eq!(mat.as_ptr(), bytes.as_ptr());
    }

    #[test]
    fn rows_and_columns() {
        let mut mat = Matrix::from_rows([[1, 2, 3], [4, 5, 6]]);
        assert_eq!(mat.row(1), [4, 5, 6]);
        assert_eq!(mat.col(2), [3, 6]);

        mat.set_row(0, [7.9, 8.0, 9.0]);
        mat.set_col(1, vec2(0, 0));
        assert_eq!(mat, Matrix::from_rows([[7, 0, 9], [4, 0, 6]]));
    }

    #[test]
    #[should_panic(expected = "incompatible vector sizes: 3 and 2")]
    fn set_row_checks_length() {
        let mut mat = Mat2x3::<f32>::ZERO;
        mat.set_row(0, &DynVector::from_vec(vec![1.0, 2.0]));
    }

    #[test]
    #[should_panic(expected = "row index 2 out of bounds")]
    fn set_row_checks_index() {
        let mut mat = Mat2::<f32>::ZERO;
        mat.set_row(2, [1.0, 2.0]);
    }

    #[test]
    fn utilities() {
        let mut mat = Mat3::<i32>::ZERO;
        mat.identity();
        assert_eq!(mat, Mat3::<i32>::identity());
        assert_eq!(mat.trace(), 3);

        mat.random(-5, 5);
        for row in 0..3 {
            for col in 0..3 {
                assert!((-5..5).contains(&mat[(row, col)]));
            }
        }

        mat.zero();
        assert_eq!(mat, Mat3::<i32>::ZERO);
    }

    #[test]
    fn assignment() {
        let a = Matrix::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        let mut m = Mat2::<f32>::ZERO;
        m.assign(&a + &a);
        assert_eq!(m, Matrix::from_rows([[2.0, 4.0], [6.0, 8.0]]));

        let d = DynMatrix::<f32>::zeros(3, 2);
        assert_eq!(
            m.try_assign(&d),
            Err(SizeError::Matrix {
                left_rows: 2,
                left_cols: 2,
                right_rows: 3,
                right_cols: 2,
            })
        );
        assert_eq!(m, Matrix::from_rows([[2.0, 4.0], [6.0, 8.0]]));
    }

    #[test]
    fn fixed_evaluation() {
        let a = Matrix::from_rows([[1i32, 2, 3], [4, 5, 6]]);
        let doubled: Mat2x3<i32> = (&a * 2i32).eval();
        assert_eq!(doubled, Matrix::from_rows([[2, 4, 6], [8, 10, 12]]));

        let halved = Mat2x3::<f64>::from_expr(&a * 0.5);
        assert_eq!(halved, Matrix::from_rows([[0.5, 1.0, 1.5], [2.0, 2.5, 3.0]]));
        assert_eq!(Mat2x3::<u8>::from_expr(Mat2x3::<u8>::ZERO), Mat2x3::ZERO);
    }

    #[test]
    fn basis_elements() {
        let mut m = Matrix::<f64, 3, 4>::ZERO;
        m.set_basis_element(Basis::Col, 0, 0, 1.0);
        m.set_basis_element(Basis::Col, 0, 1, 2.0);
        m.set_basis_element(Basis::Col, 0, 2, 3.0);
        m.set_basis_element(Basis::Col, 3, 1, 8.0);
        assert_eq!(m.col(0), [1.0, 2.0, 3.0]);
        assert_eq!(m[(1, 3)], 8.0);
        assert_eq!(m.basis_element(Basis::Col, 0, 2), 3.0);
        assert_eq!(m.basis_element(Basis::Col, 3, 1), 8.0);

        let mut n = Matrix::<f64, 4, 3>::ZERO;
        n.set_basis_element(Basis::Row, 0, 0, 1.0);
        n.set_basis_element(Basis::Row, 0, 1, 2.0);
        n.set_basis_element(Basis::Row, 0, 2, 3.0);
        assert_eq!(n.row(0), [1.0, 2.0, 3.0]);
        assert_eq!(n.basis_element(Basis::Row, 0, 1), 2.0);

        // Reading through an expression node uses the same positions.
        assert_eq!(transpose(&m).basis_element(Basis::Row, 0, 2), 3.0);
    }

    #[test]
    fn self_assignment() {
        let mut m = Matrix::from_rows([[1.0f32, -2.0], [3.5, 4.0]]);
        let before = m;
        m.assign(m);
        assert_eq!(m, before);
    }
}
