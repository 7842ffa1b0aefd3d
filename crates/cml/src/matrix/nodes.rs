//! Matrix expression nodes.

use std::marker::PhantomData;

use crate::{
    assign::assign_matrix,
    error::{unwrap_size, SizeError},
    expr::{MatrixExpr, MatrixResult, OwnedMatrix, VectorExpr},
    functor::{BinaryFunctor, OpAssign, OpDot, UnaryFunctor},
    operand::{MatrixKind, MatrixOperand, Operand},
    promote::{MatrixShape, Promote, Promoted, SizePromote},
    Scalar, VectorXpr, Zero,
};

/// A matrix expression returned by an arithmetic operator or a matrix function.
///
/// Evaluation is deferred until the expression is assigned to a container or [`eval`]uated.
///
/// [`eval`]: MatrixXpr::eval
#[derive(Debug, Clone, Copy)]
pub struct MatrixXpr<E>(E);

impl<E> MatrixXpr<E> {
    #[inline]
    pub(crate) fn new(expr: E) -> Self {
        Self(expr)
    }

    /// Returns the wrapped expression node.
    #[inline]
    pub fn into_inner(self) -> E {
        self.0
    }
}

impl<E: MatrixExpr> MatrixXpr<E>
where
    E::Rows: MatrixShape<E::Cols>,
{
    /// Computes every element and stores the result in a new container.
    ///
    /// The result is a [`Matrix`][crate::Matrix] if both dimensions are known at compile time,
    /// and a [`DynMatrix`][crate::DynMatrix] otherwise.
    ///
    /// ```
    /// # use cml::*;
    /// let a = Matrix::from_rows([[1, 2], [3, 4]]);
    /// let d = DynMatrix::<i32>::identity(2, 2);
    ///
    /// let fixed: Mat2<i32> = (&a + &d).eval();
    /// let dynamic: DynMatrix<i32> = (&d * 3i32).eval();
    /// assert_eq!(fixed, Matrix::from_rows([[2, 2], [3, 5]]));
    /// assert_eq!(dynamic.as_slice(), [3, 0, 0, 3]);
    /// ```
    pub fn eval(&self) -> MatrixResult<E> {
        let mut out = <MatrixResult<E> as OwnedMatrix<E::Elem>>::with_size(
            self.0.rows(),
            self.0.cols(),
        );
        unwrap_size(assign_matrix::<OpAssign, _, _>(&mut out, &self.0));
        out
    }
}

impl<E: MatrixExpr> MatrixExpr for MatrixXpr<E> {
    type Elem = E::Elem;
    type Rows = E::Rows;
    type Cols = E::Cols;

    #[inline]
    fn rows(&self) -> usize {
        self.0.rows()
    }

    #[inline]
    fn cols(&self) -> usize {
        self.0.cols()
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> Self::Elem {
        self.0.get(row, col)
    }
}

impl<E: MatrixExpr> Operand for MatrixXpr<E> {
    type Kind = MatrixKind;
    type Expr = E;

    #[inline]
    fn into_expr(self) -> E {
        self.0
    }
}

/// Applies a [`UnaryFunctor`] to each element of a matrix expression.
#[derive(Debug, Clone, Copy)]
pub struct UnaryMatrixOp<E, Op> {
    expr: E,
    op: PhantomData<Op>,
}

impl<E, Op> UnaryMatrixOp<E, Op> {
    pub(crate) fn new(expr: E) -> Self {
        Self {
            expr,
            op: PhantomData,
        }
    }
}

impl<E, Op> MatrixExpr for UnaryMatrixOp<E, Op>
where
    E: MatrixExpr,
    Op: UnaryFunctor<E::Elem>,
{
    type Elem = Op::Output;
    type Rows = E::Rows;
    type Cols = E::Cols;

    #[inline]
    fn rows(&self) -> usize {
        self.expr.rows()
    }

    #[inline]
    fn cols(&self) -> usize {
        self.expr.cols()
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> Self::Elem {
        Op::apply(self.expr.get(row, col))
    }
}

/// Combines the elements of two equally sized matrix expressions with a [`BinaryFunctor`].
#[derive(Debug, Clone, Copy)]
pub struct BinaryMatrixOp<L, R, Op> {
    left: L,
    right: R,
    op: PhantomData<Op>,
}

impl<L: MatrixExpr, R: MatrixExpr, Op> BinaryMatrixOp<L, R, Op>
where
    L::Rows: SizePromote<R::Rows>,
    L::Cols: SizePromote<R::Cols>,
{
    pub(crate) fn try_new(left: L, right: R) -> Result<Self, SizeError> {
        SizeError::check_matrices((left.rows(), left.cols()), (right.rows(), right.cols()))?;
        Ok(Self {
            left,
            right,
            op: PhantomData,
        })
    }
}

impl<L, R, Op> MatrixExpr for BinaryMatrixOp<L, R, Op>
where
    L: MatrixExpr,
    R: MatrixExpr,
    L::Rows: SizePromote<R::Rows>,
    L::Cols: SizePromote<R::Cols>,
    Op: BinaryFunctor<L::Elem, R::Elem>,
{
    type Elem = Op::Output;
    type Rows = <L::Rows as SizePromote<R::Rows>>::Output;
    type Cols = <L::Cols as SizePromote<R::Cols>>::Output;

    #[inline]
    fn rows(&self) -> usize {
        self.left.rows()
    }

    #[inline]
    fn cols(&self) -> usize {
        self.left.cols()
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> Self::Elem {
        Op::apply(self.left.get(row, col), self.right.get(row, col))
    }
}

/// Combines each element of a matrix expression with a scalar.
#[derive(Debug, Clone, Copy)]
pub struct MatrixScalarOp<E, S, Op> {
    expr: E,
    scalar: S,
    op: PhantomData<Op>,
}

impl<E, S, Op> MatrixScalarOp<E, S, Op> {
    pub(crate) fn new(expr: E, scalar: S) -> Self {
        Self {
            expr,
            scalar,
            op: PhantomData,
        }
    }
}

impl<E, S, Op> MatrixExpr for MatrixScalarOp<E, S, Op>
where
    E: MatrixExpr,
    S: Scalar,
    Op: BinaryFunctor<E::Elem, S>,
{
    type Elem = Op::Output;
    type Rows = E::Rows;
    type Cols = E::Cols;

    #[inline]
    fn rows(&self) -> usize {
        self.expr.rows()
    }

    #[inline]
    fn cols(&self) -> usize {
        self.expr.cols()
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> Self::Elem {
        Op::apply(self.expr.get(row, col), self.scalar)
    }
}

/// The product of two matrix expressions.
///
/// Each element is the dot product of a row of the left operand and a column of the right
/// operand, recomputed on every read. Evaluate the product into a container before reading it
/// repeatedly.
#[derive(Debug, Clone, Copy)]
pub struct MatMulOp<L, R> {
    left: L,
    right: R,
}

impl<L: MatrixExpr, R: MatrixExpr> MatMulOp<L, R>
where
    L::Cols: SizePromote<R::Rows>,
{
    pub(crate) fn try_new(left: L, right: R) -> Result<Self, SizeError> {
        SizeError::check_inner(left.cols(), right.rows())?;
        Ok(Self { left, right })
    }
}

impl<L, R> MatrixExpr for MatMulOp<L, R>
where
    L: MatrixExpr,
    R: MatrixExpr,
    L::Cols: SizePromote<R::Rows>,
    L::Elem: Promote<R::Elem>,
{
    type Elem = Promoted<L::Elem, R::Elem>;
    type Rows = L::Rows;
    type Cols = R::Cols;

    #[inline]
    fn rows(&self) -> usize {
        self.left.rows()
    }

    #[inline]
    fn cols(&self) -> usize {
        self.right.cols()
    }

    fn get(&self, row: usize, col: usize) -> Self::Elem {
        (0..self.left.cols()).fold(Zero::ZERO, |acc, k| {
            OpDot::accumulate(acc, self.left.get(row, k), self.right.get(k, col))
        })
    }
}

/// A matrix expression with rows and columns swapped.
#[derive(Debug, Clone, Copy)]
pub struct TransposeOp<E> {
    expr: E,
}

impl<E: MatrixExpr> MatrixExpr for TransposeOp<E> {
    type Elem = E::Elem;
    type Rows = E::Cols;
    type Cols = E::Rows;

    #[inline]
    fn rows(&self) -> usize {
        self.expr.cols()
    }

    #[inline]
    fn cols(&self) -> usize {
        self.expr.rows()
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> Self::Elem {
        self.expr.get(col, row)
    }
}

/// One row of a matrix expression, as a vector expression.
#[derive(Debug, Clone, Copy)]
pub struct MatrixRowOp<E> {
    expr: E,
    row: usize,
}

impl<E: MatrixExpr> VectorExpr for MatrixRowOp<E> {
    type Elem = E::Elem;
    type Size = E::Cols;

    #[inline]
    fn size(&self) -> usize {
        self.expr.cols()
    }

    #[inline]
    fn get(&self, i: usize) -> Self::Elem {
        self.expr.get(self.row, i)
    }
}

/// One column of a matrix expression, as a vector expression.
#[derive(Debug, Clone, Copy)]
pub struct MatrixColOp<E> {
    expr: E,
    col: usize,
}

impl<E: MatrixExpr> VectorExpr for MatrixColOp<E> {
    type Elem = E::Elem;
    type Size = E::Rows;

    #[inline]
    fn size(&self) -> usize {
        self.expr.rows()
    }

    #[inline]
    fn get(&self, i: usize) -> Self::Elem {
        self.expr.get(i, self.col)
    }
}

/// The product of a matrix and a column vector.
#[derive(Debug, Clone, Copy)]
pub struct MatVecMulOp<M, V> {
    matrix: M,
    vector: V,
}

impl<M: MatrixExpr, V: VectorExpr> MatVecMulOp<M, V>
where
    M::Cols: SizePromote<V::Size>,
{
    pub(crate) fn try_new(matrix: M, vector: V) -> Result<Self, SizeError> {
        SizeError::check_inner(matrix.cols(), vector.size())?;
        Ok(Self { matrix, vector })
    }
}

impl<M, V> VectorExpr for MatVecMulOp<M, V>
where
    M: MatrixExpr,
    V: VectorExpr,
    M::Cols: SizePromote<V::Size>,
    M::Elem: Promote<V::Elem>,
{
    type Elem = Promoted<M::Elem, V::Elem>;
    type Size = M::Rows;

    #[inline]
    fn size(&self) -> usize {
        self.matrix.rows()
    }

    fn get(&self, i: usize) -> Self::Elem {
        (0..self.matrix.cols()).fold(Zero::ZERO, |acc, k| {
            OpDot::accumulate(acc, self.matrix.get(i, k), self.vector.get(k))
        })
    }
}

/// The product of a row vector and a matrix.
#[derive(Debug, Clone, Copy)]
pub struct VecMatMulOp<V, M> {
    vector: V,
    matrix: M,
}

impl<V: VectorExpr, M: MatrixExpr> VecMatMulOp<V, M>
where
    V::Size: SizePromote<M::Rows>,
{
    pub(crate) fn try_new(vector: V, matrix: M) -> Result<Self, SizeError> {
        SizeError::check_inner(vector.size(), matrix.rows())?;
        Ok(Self { vector, matrix })
    }
}

impl<V, M> VectorExpr for VecMatMulOp<V, M>
where
    V: VectorExpr,
    M: MatrixExpr,
    V::Size: SizePromote<M::Rows>,
    V::Elem: Promote<M::Elem>,
{
    type Elem = Promoted<V::Elem, M::Elem>;
    type Size = M::Cols;

    #[inline]
    fn size(&self) -> usize {
        self.matrix.cols()
    }

    fn get(&self, j: usize) -> Self::Elem {
        (0..self.vector.size()).fold(Zero::ZERO, |acc, k| {
            OpDot::accumulate(acc, self.vector.get(k), self.matrix.get(k, j))
        })
    }
}

/// Returns row `index` of a matrix as a vector expression.
///
/// # Panics
///
/// Panics if `index` is out of bounds.
///
/// # Examples
///
/// ```
/// # use cml::*;
/// let m = Matrix::from_rows([[1, 2, 3], [4, 5, 6]]);
/// assert_eq!(row(&m, 1).eval(), [4, 5, 6]);
/// assert_eq!(dot(row(&m, 0), row(&m, 1)), 4 + 10 + 18);
/// ```
#[track_caller]
pub fn row<M: MatrixOperand>(m: M, index: usize) -> VectorXpr<MatrixRowOp<M::Expr>> {
    let expr = m.into_matrix_expr();
    assert!(
        index < expr.rows(),
        "row index {index} out of bounds for matrix with {} rows",
        expr.rows()
    );
    VectorXpr::new(MatrixRowOp { expr, row: index })
}

/// Returns column `index` of a matrix as a vector expression.
///
/// # Panics
///
/// Panics if `index` is out of bounds.
#[track_caller]
pub fn col<M: MatrixOperand>(m: M, index: usize) -> VectorXpr<MatrixColOp<M::Expr>> {
    let expr = m.into_matrix_expr();
    assert!(
        index < expr.cols(),
        "column index {index} out of bounds for matrix with {} columns",
        expr.cols()
    );
    VectorXpr::new(MatrixColOp { expr, col: index })
}

/// Swaps the rows and columns of a matrix expression.
///
/// # Examples
///
/// ```
/// # use cml::*;
/// let mat = Matrix::from_rows([
///     [0, 1, 2],
///     [3, 4, 5],
/// ]);
/// let t: Mat3x2<i32> = transpose(&mat).eval();
/// assert_eq!(t, Matrix::from_rows([
///     [0, 3],
///     [1, 4],
///     [2, 5],
/// ]));
/// ```
pub fn transpose<M: MatrixOperand>(m: M) -> MatrixXpr<TransposeOp<M::Expr>> {
    MatrixXpr::new(TransposeOp {
        expr: m.into_matrix_expr(),
    })
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn mat_vec_mul() {
        let mat = Matrix::from_rows([[0, 1], [2, 3]]);
        let vec = vec2(4, 5);
        let out = (&mat * &vec).eval();
        assert_eq!(out, [4 * 0 + 5 * 1, 4 * 2 + 5 * 3]);

        let row_times: Vec2<i32> = (&vec * &mat).eval();
        assert_eq!(row_times, [4 * 0 + 5 * 2, 4 * 1 + 5 * 3]);
    }

    #[test]
    fn mat_mat_mul() {
        #[rustfmt::skip]
        let a = Matrix::from_rows([
            [1, 2],
            [3, 4],
            [5, 6],
            [7, 8],
        ]);
        #[rustfmt::skip]
        let b = Matrix::from_rows([
            [9, 10, 11],
            [12, 13, 14],
        ]);
        let c: Matrix<i32, 4, 3> = (&a * &b).eval();
        assert_eq!(c[(0, 1)], a[(0, 0)] * b[(0, 1)] + a[(0, 1)] * b[(1, 1)]);
        assert_eq!(c[(2, 2)], a[(2, 0)] * b[(0, 2)] + a[(2, 1)] * b[(1, 2)]);
    }

    #[test]
    fn products_promote() {
        let a = Matrix::from_rows([[1u8, 2], [3, 4]]);
        let v = vec2(0.5f32, 0.5);
        let out: Vec2f = (&a * &v).eval();
        assert_eq!(out, [1.5, 3.5]);

        let sq: Mat2<i32> = (&a * &a).eval();
        assert_eq!(sq, Matrix::from_rows([[7, 10], [15, 22]]));
    }

    #[test]
    fn dynamic_products_check_inner_dimensions() {
        let a = DynMatrix::<f64>::zeros(2, 3);
        let v = vec2(1.0, 1.0);
        assert_eq!(
            (&a).try_mul(&v).unwrap_err(),
            SizeError::Inner {
                left_cols: 3,
                right_rows: 2
            }
        );
        assert_eq!(
            (&v).try_mul(&a).map(|e| e.size()),
            Ok(3),
        );

        let b = Matrix::<f64, 3, 4>::ZERO;
        let p = &a * &b;
        assert_eq!((p.rows(), p.cols()), (2, 4));
        let out: DynMatrix<f64> = p.eval();
        assert_eq!(out, DynMatrix::zeros(2, 4));
    }

    #[test]
    #[should_panic(expected = "incompatible inner dimensions in product: 3 columns and 2 rows")]
    fn product_operator_panics() {
        let a = DynMatrix::<f64>::zeros(2, 3);
        let _ = &a * &a;
    }

    #[test]
    fn elementwise() {
        let a = Matrix::from_rows([[1, 2], [3, 4]]);
        let b = Matrix::from_rows([[4, 3], [2, 1]]);
        let sum: Mat2<i32> = ((&a + &b) * 2i32 - &a).eval();
        assert_eq!(sum, Matrix::from_rows([[9, 8], [7, 6]]));

        let neg: Mat2<i32> = (-&a).eval();
        assert_eq!(neg, Matrix::from_rows([[-1, -2], [-3, -4]]));

        let half: Mat2d = (&a / 2.0).eval();
        assert_eq!(half, Matrix::from_rows([[0.5, 1.0], [1.5, 2.0]]));
    }

    #[test]
    fn rows_columns_transpose() {
        let m = Matrix::from_rows([[1, 2, 3], [4, 5, 6]]);
        assert_eq!(row(&m, 0).eval(), [1, 2, 3]);
        assert_eq!(col(&m, 1).eval(), [2, 5]);
        assert_eq!(row(transpose(&m), 2).eval(), [3, 6]);

        let t = transpose(&m);
        assert_eq!((t.rows(), t.cols()), (3, 2));

        let d = DynMatrix::from_row_slice(2, 2, &[1, 2, 3, 4]).unwrap();
        let dt: DynMatrix<i32> = transpose(&d).eval();
        assert_eq!(dt.as_slice(), [1, 3, 2, 4]);
    }

    #[test]
    #[should_panic(expected = "column index 3 out of bounds for matrix with 3 columns")]
    fn col_out_of_bounds() {
        let m = Mat3::<f32>::ZERO;
        let _ = col(&m, 3);
    }
}
