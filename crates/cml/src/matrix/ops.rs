//! Implementations of `std::ops` and operator dispatch for matrix operands.

use std::ops::{Index, IndexMut};

use crate::{
    error::SizeError,
    expr::{MatrixExpr, VectorExpr},
    functor::{BinaryFunctor, OpAdd, OpDiv, OpMul, OpNeg, OpSub, UnaryFunctor},
    operand::{
        impl_operators, AddDispatch, DivDispatch, MatrixKind, MulDispatch, NegDispatch,
        ScalarKind, SubDispatch, VectorKind,
    },
    promote::{Promote, SizePromote},
    Scalar, VectorXpr,
};

use super::{
    BinaryMatrixOp, MatMulOp, MatVecMulOp, Matrix, MatrixScalarOp, MatrixXpr, UnaryMatrixOp,
    VecMatMulOp,
};

impl<T, const R: usize, const C: usize> Index<(usize, usize)> for Matrix<T, R, C> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.0[col][row]
    }
}

impl<T, const R: usize, const C: usize> IndexMut<(usize, usize)> for Matrix<T, R, C> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.0[col][row]
    }
}

// More general `PartialEq` impl than what the derive generates.
impl<T, U, const R: usize, const C: usize> PartialEq<Matrix<U, R, C>> for Matrix<T, R, C>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Matrix<U, R, C>) -> bool {
        self.0.eq(&other.0)
    }
}

impl<T, const R: usize, const C: usize> Eq for Matrix<T, R, C> where T: Eq {}

impl<L, R> AddDispatch<L, R> for (MatrixKind, MatrixKind)
where
    L: MatrixExpr,
    R: MatrixExpr,
    L::Rows: SizePromote<R::Rows>,
    L::Cols: SizePromote<R::Cols>,
    OpAdd: BinaryFunctor<L::Elem, R::Elem>,
{
    type Output = MatrixXpr<BinaryMatrixOp<L, R, OpAdd>>;

    fn try_add(left: L, right: R) -> Result<Self::Output, SizeError> {
        BinaryMatrixOp::try_new(left, right).map(MatrixXpr::new)
    }
}

impl<L, R> SubDispatch<L, R> for (MatrixKind, MatrixKind)
where
    L: MatrixExpr,
    R: MatrixExpr,
    L::Rows: SizePromote<R::Rows>,
    L::Cols: SizePromote<R::Cols>,
    OpSub: BinaryFunctor<L::Elem, R::Elem>,
{
    type Output = MatrixXpr<BinaryMatrixOp<L, R, OpSub>>;

    fn try_sub(left: L, right: R) -> Result<Self::Output, SizeError> {
        BinaryMatrixOp::try_new(left, right).map(MatrixXpr::new)
    }
}

/// Matrix * Scalar.
impl<E, S> MulDispatch<E, S> for (MatrixKind, ScalarKind)
where
    E: MatrixExpr,
    S: Scalar,
    OpMul: BinaryFunctor<E::Elem, S>,
{
    type Output = MatrixXpr<MatrixScalarOp<E, S, OpMul>>;

    fn try_mul(expr: E, scalar: S) -> Result<Self::Output, SizeError> {
        Ok(MatrixXpr::new(MatrixScalarOp::new(expr, scalar)))
    }
}

/// Matrix / Scalar.
impl<E, S> DivDispatch<E, S> for (MatrixKind, ScalarKind)
where
    E: MatrixExpr,
    S: Scalar,
    OpDiv: BinaryFunctor<E::Elem, S>,
{
    type Output = MatrixXpr<MatrixScalarOp<E, S, OpDiv>>;

    fn try_div(expr: E, scalar: S) -> Result<Self::Output, SizeError> {
        Ok(MatrixXpr::new(MatrixScalarOp::new(expr, scalar)))
    }
}

/// Matrix * Matrix.
impl<L, R> MulDispatch<L, R> for (MatrixKind, MatrixKind)
where
    L: MatrixExpr,
    R: MatrixExpr,
    L::Cols: SizePromote<R::Rows>,
    L::Elem: Promote<R::Elem>,
{
    type Output = MatrixXpr<MatMulOp<L, R>>;

    fn try_mul(left: L, right: R) -> Result<Self::Output, SizeError> {
        MatMulOp::try_new(left, right).map(MatrixXpr::new)
    }
}

/// Matrix * Column Vector.
impl<M, V> MulDispatch<M, V> for (MatrixKind, VectorKind)
where
    M: MatrixExpr,
    V: VectorExpr,
    M::Cols: SizePromote<V::Size>,
    M::Elem: Promote<V::Elem>,
{
    type Output = VectorXpr<MatVecMulOp<M, V>>;

    fn try_mul(matrix: M, vector: V) -> Result<Self::Output, SizeError> {
        MatVecMulOp::try_new(matrix, vector).map(VectorXpr::new)
    }
}

/// Row Vector * Matrix.
impl<V, M> MulDispatch<V, M> for (VectorKind, MatrixKind)
where
    V: VectorExpr,
    M: MatrixExpr,
    V::Size: SizePromote<M::Rows>,
    V::Elem: Promote<M::Elem>,
{
    type Output = VectorXpr<VecMatMulOp<V, M>>;

    fn try_mul(vector: V, matrix: M) -> Result<Self::Output, SizeError> {
        VecMatMulOp::try_new(vector, matrix).map(VectorXpr::new)
    }
}

impl<E> NegDispatch<E> for MatrixKind
where
    E: MatrixExpr,
    OpNeg: UnaryFunctor<E::Elem>,
{
    type Output = MatrixXpr<UnaryMatrixOp<E, OpNeg>>;

    fn neg(expr: E) -> Self::Output {
        MatrixXpr::new(UnaryMatrixOp::new(expr))
    }
}

impl_operators!([T: Scalar, const R: usize, const C: usize,] Matrix<T, R, C>);
impl_operators!(['a, T: Scalar, const R: usize, const C: usize,] &'a Matrix<T, R, C>);
impl_operators!([E: MatrixExpr,] MatrixXpr<E>);

/// Implements `+=` and `-=` (with a matrix operand) and `*=` and `/=` (with a scalar) for a
/// matrix container.
macro_rules! impl_matrix_assign_operators {
    ([$($generics:tt)*] $lhs:ty) => {
        $crate::matrix::ops::impl_matrix_assign_operators!(@matrix [$($generics)*] $lhs, AddAssign::add_assign, OpAddAssign);
        $crate::matrix::ops::impl_matrix_assign_operators!(@matrix [$($generics)*] $lhs, SubAssign::sub_assign, OpSubAssign);
        $crate::matrix::ops::impl_matrix_assign_operators!(@scalar [$($generics)*] $lhs, MulAssign::mul_assign, OpMulAssign);
        $crate::matrix::ops::impl_matrix_assign_operators!(@scalar [$($generics)*] $lhs, DivAssign::div_assign, OpDivAssign);
    };
    (@matrix [$($generics:tt)*] $lhs:ty, $op:ident::$method:ident, $functor:ident) => {
        impl<$($generics)* Rhs> ::std::ops::$op<Rhs> for $lhs
        where
            Rhs: $crate::operand::MatrixOperand,
            <$lhs as $crate::expr::MatrixExpr>::Rows: $crate::promote::SizePromote<
                <<Rhs as $crate::operand::MatrixOperand>::Expr as $crate::expr::MatrixExpr>::Rows,
            >,
            <$lhs as $crate::expr::MatrixExpr>::Cols: $crate::promote::SizePromote<
                <<Rhs as $crate::operand::MatrixOperand>::Expr as $crate::expr::MatrixExpr>::Cols,
            >,
            $crate::functor::$functor: $crate::functor::AssignFunctor<
                <$lhs as $crate::expr::MatrixExpr>::Elem,
                <<Rhs as $crate::operand::MatrixOperand>::Expr as $crate::expr::MatrixExpr>::Elem,
            >,
        {
            #[track_caller]
            fn $method(&mut self, rhs: Rhs) {
                $crate::error::unwrap_size($crate::expr::MatrixStorage::try_assign_with::<
                    $crate::functor::$functor,
                    Rhs,
                >(self, rhs))
            }
        }
    };
    (@scalar [$($generics:tt)*] $lhs:ty, $op:ident::$method:ident, $functor:ident) => {
        impl<$($generics)* S: $crate::Scalar> ::std::ops::$op<S> for $lhs
        where
            $crate::functor::$functor:
                $crate::functor::AssignFunctor<<$lhs as $crate::expr::MatrixExpr>::Elem, S>,
        {
            #[inline]
            fn $method(&mut self, scalar: S) {
                $crate::assign::apply_scalar_matrix::<$crate::functor::$functor, _, _>(self, scalar)
            }
        }
    };
}

pub(crate) use impl_matrix_assign_operators;

impl_matrix_assign_operators!([T: Scalar, const R: usize, const C: usize,] Matrix<T, R, C>);

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn compound_assignment() {
        let mut m = Mat2::<f64>::identity();
        m += Matrix::from_rows([[1, 2], [3, 4]]);
        assert_eq!(m, Matrix::from_rows([[2.0, 2.0], [3.0, 5.0]]));

        m *= 2;
        m -= &Mat2::<f64>::identity();
        assert_eq!(m, Matrix::from_rows([[3.0, 4.0], [6.0, 9.0]]));

        m /= 3.0;
        assert_eq!(m, Matrix::from_rows([[1.0, 4.0 / 3.0], [2.0, 3.0]]));
    }

    #[test]
    #[should_panic(expected = "incompatible matrix sizes: 2x2 and 2x3")]
    fn compound_assignment_checks_sizes() {
        let mut m = Mat2::<f32>::ZERO;
        m += &DynMatrix::<f32>::zeros(2, 3);
    }

    #[test]
    fn eq() {
        let a = Matrix::from_rows([[1, 2], [3, 4]]);
        assert_eq!(a, a);
        assert_ne!(a, Matrix::from_columns([[1, 2], [3, 4]]));
    }
}
