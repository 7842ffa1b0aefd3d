//! Implementations of `std::ops` and operator dispatch for vector operands.

use std::ops::{Index, IndexMut};

use crate::{
    error::SizeError,
    expr::VectorExpr,
    functor::{BinaryFunctor, OpAdd, OpDiv, OpMul, OpNeg, OpSub, UnaryFunctor},
    operand::{
        impl_operators, AddDispatch, DivDispatch, MulDispatch, NegDispatch, ScalarKind,
        SubDispatch, VectorKind,
    },
    promote::SizePromote,
    Scalar,
};

use super::{BinaryVectorOp, UnaryVectorOp, Vector, VectorScalarOp, VectorXpr};

impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

// More general impl than what the derive generates.
impl<T, U, const N: usize> PartialEq<Vector<U, N>> for Vector<T, N>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vector<U, N>) -> bool {
        self.0 == other.0
    }
}

impl<T, const N: usize> Eq for Vector<T, N> where T: Eq {}

impl<T, U, const N: usize> PartialEq<[U; N]> for Vector<T, N>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.0.eq(other)
    }
}

impl<T, U, const N: usize> PartialEq<Vector<U, N>> for [T; N]
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vector<U, N>) -> bool {
        *self == other.0
    }
}

impl<T, U, const N: usize> PartialEq<[U]> for Vector<T, N>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.0.eq(other)
    }
}

impl<L, R> AddDispatch<L, R> for (VectorKind, VectorKind)
where
    L: VectorExpr,
    R: VectorExpr,
    L::Size: SizePromote<R::Size>,
    OpAdd: BinaryFunctor<L::Elem, R::Elem>,
{
    type Output = VectorXpr<BinaryVectorOp<L, R, OpAdd>>;

    fn try_add(left: L, right: R) -> Result<Self::Output, SizeError> {
        BinaryVectorOp::try_new(left, right).map(VectorXpr::new)
    }
}

impl<L, R> SubDispatch<L, R> for (VectorKind, VectorKind)
where
    L: VectorExpr,
    R: VectorExpr,
    L::Size: SizePromote<R::Size>,
    OpSub: BinaryFunctor<L::Elem, R::Elem>,
{
    type Output = VectorXpr<BinaryVectorOp<L, R, OpSub>>;

    fn try_sub(left: L, right: R) -> Result<Self::Output, SizeError> {
        BinaryVectorOp::try_new(left, right).map(VectorXpr::new)
    }
}

impl<E, S> MulDispatch<E, S> for (VectorKind, ScalarKind)
where
    E: VectorExpr,
    S: Scalar,
    OpMul: BinaryFunctor<E::Elem, S>,
{
    type Output = VectorXpr<VectorScalarOp<E, S, OpMul>>;

    fn try_mul(expr: E, scalar: S) -> Result<Self::Output, SizeError> {
        Ok(VectorXpr::new(VectorScalarOp::new(expr, scalar)))
    }
}

impl<E, S> DivDispatch<E, S> for (VectorKind, ScalarKind)
where
    E: VectorExpr,
    S: Scalar,
    OpDiv: BinaryFunctor<E::Elem, S>,
{
    type Output = VectorXpr<VectorScalarOp<E, S, OpDiv>>;

    fn try_div(expr: E, scalar: S) -> Result<Self::Output, SizeError> {
        Ok(VectorXpr::new(VectorScalarOp::new(expr, scalar)))
    }
}

impl<E> NegDispatch<E> for VectorKind
where
    E: VectorExpr,
    OpNeg: UnaryFunctor<E::Elem>,
{
    type Output = VectorXpr<UnaryVectorOp<E, OpNeg>>;

    fn neg(expr: E) -> Self::Output {
        VectorXpr::new(UnaryVectorOp::new(expr))
    }
}

impl_operators!([T: Scalar, const N: usize,] Vector<T, N>);
impl_operators!(['a, T: Scalar, const N: usize,] &'a Vector<T, N>);
impl_operators!([E: VectorExpr,] VectorXpr<E>);

/// Implements `+=` and `-=` (with a vector operand) and `*=` and `/=` (with a scalar) for a
/// vector container.
macro_rules! impl_vector_assign_operators {
    ([$($generics:tt)*] $lhs:ty) => {
        $crate::vector::ops::impl_vector_assign_operators!(@vector [$($generics)*] $lhs, AddAssign::add_assign, OpAddAssign);
        $crate::vector::ops::impl_vector_assign_operators!(@vector [$($generics)*] $lhs, SubAssign::sub_assign, OpSubAssign);
        $crate::vector::ops::impl_vector_assign_operators!(@scalar [$($generics)*] $lhs, MulAssign::mul_assign, OpMulAssign);
        $crate::vector::ops::impl_vector_assign_operators!(@scalar [$($generics)*] $lhs, DivAssign::div_assign, OpDivAssign);
    };
    (@vector [$($generics:tt)*] $lhs:ty, $op:ident::$method:ident, $functor:ident) => {
        impl<$($generics)* Rhs> ::std::ops::$op<Rhs> for $lhs
        where
            Rhs: $crate::operand::VectorOperand,
            <$lhs as $crate::expr::VectorExpr>::Size: $crate::promote::SizePromote<
                <<Rhs as $crate::operand::VectorOperand>::Expr as $crate::expr::VectorExpr>::Size,
            >,
            $crate::functor::$functor: $crate::functor::AssignFunctor<
                <$lhs as $crate::expr::VectorExpr>::Elem,
                <<Rhs as $crate::operand::VectorOperand>::Expr as $crate::expr::VectorExpr>::Elem,
            >,
        {
            #[track_caller]
            fn $method(&mut self, rhs: Rhs) {
                $crate::error::unwrap_size($crate::expr::VectorStorage::try_assign_with::<
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
                $crate::functor::AssignFunctor<<$lhs as $crate::expr::VectorExpr>::Elem, S>,
        {
            #[inline]
            fn $method(&mut self, scalar: S) {
                $crate::assign::apply_scalar_vector::<$crate::functor::$functor, _, _>(self, scalar)
            }
        }
    };
}

pub(crate) use impl_vector_assign_operators;

impl_vector_assign_operators!([T: Scalar, const N: usize,] Vector<T, N>);

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn compound_assignment() {
        let mut v = vec3(1.0, 2.0, 3.0);
        v += vec3(1.0, 1.0, 1.0);
        assert_eq!(v, [2.0, 3.0, 4.0]);

        v -= &[0.5, 0.5, 0.5];
        assert_eq!(v, [1.5, 2.5, 3.5]);

        v *= 2;
        assert_eq!(v, [3.0, 5.0, 7.0]);

        v /= 2.0f32;
        assert_eq!(v, [1.5, 2.5, 3.5]);

        let w = vec3(1.0, 1.0, 1.0);
        v += &w * 2.0 - &w;
        assert_eq!(v, [2.5, 3.5, 4.5]);
    }

    #[test]
    fn compound_assignment_converts_to_destination_type() {
        let mut v = vec2(1, 2);
        v *= 1.5;
        assert_eq!(v, [1, 3]);

        v += [0.75, 0.75];
        assert_eq!(v, [1, 3]);
    }

    #[test]
    #[should_panic(expected = "incompatible vector sizes: 3 and 2")]
    fn compound_assignment_checks_sizes() {
        let mut v = vec3(1, 2, 3);
        let d = DynVector::from_vec(vec![1, 2]);
        v += &d;
    }

    #[test]
    fn negation() {
        let v = vec3(1i32, -2, 3);
        assert_eq!((-v).eval(), [-1, 2, -3]);
        assert_eq!((-(&v * 2i32)).eval(), [-2, 4, -6]);
    }

    #[test]
    fn eq() {
        assert_eq!(vec2(1, 2), [1, 2]);
        assert_eq!([1, 2], vec2(1, 2));
        assert_eq!(vec2(1, 2), vec2(1, 2));
        assert_ne!(vec2(1, 2), vec2(2, 1));
        assert!(vec2(1, 2) == *[1, 2].as_slice());
    }
}
