//! Implementations of `std::ops` and operator dispatch for quaternion operands.

use std::ops::{AddAssign, DivAssign, Index, IndexMut, MulAssign, SubAssign};

use crate::{
    assign::assign_quat,
    error::SizeError,
    expr::QuatExpr,
    functor::{
        AssignFunctor, BinaryFunctor, OpAdd, OpAddAssign, OpDiv, OpDivAssign, OpMul,
        OpMulAssign, OpNeg, OpSub, OpSubAssign, UnaryFunctor,
    },
    operand::{
        impl_operators, AddDispatch, DivDispatch, MulDispatch, NegDispatch, QuatKind,
        QuatOperand, ScalarKind, SubDispatch,
    },
    promote::Promote,
    QuatOrder, Scalar,
};

use super::{BinaryQuatOp, Quat, QuatMulOp, QuatScalarOp, QuatXpr, UnaryQuatOp};

/// Indexes the components in storage order.
impl<T, O: QuatOrder> Index<usize> for Quat<T, O> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T, O: QuatOrder> IndexMut<usize> for Quat<T, O> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl<L, R> AddDispatch<L, R> for (QuatKind, QuatKind)
where
    L: QuatExpr,
    R: QuatExpr<Order = L::Order>,
    OpAdd: BinaryFunctor<L::Elem, R::Elem>,
{
    type Output = QuatXpr<BinaryQuatOp<L, R, OpAdd>>;

    fn try_add(left: L, right: R) -> Result<Self::Output, SizeError> {
        Ok(QuatXpr::new(BinaryQuatOp::new(left, right)))
    }
}

impl<L, R> SubDispatch<L, R> for (QuatKind, QuatKind)
where
    L: QuatExpr,
    R: QuatExpr<Order = L::Order>,
    OpSub: BinaryFunctor<L::Elem, R::Elem>,
{
    type Output = QuatXpr<BinaryQuatOp<L, R, OpSub>>;

    fn try_sub(left: L, right: R) -> Result<Self::Output, SizeError> {
        Ok(QuatXpr::new(BinaryQuatOp::new(left, right)))
    }
}

/// Quaternion * Quaternion (Hamilton product).
impl<L, R> MulDispatch<L, R> for (QuatKind, QuatKind)
where
    L: QuatExpr,
    R: QuatExpr<Order = L::Order>,
    L::Elem: Promote<R::Elem>,
{
    type Output = QuatXpr<QuatMulOp<L, R>>;

    fn try_mul(left: L, right: R) -> Result<Self::Output, SizeError> {
        Ok(QuatXpr::new(QuatMulOp::new(left, right)))
    }
}

impl<E, S> MulDispatch<E, S> for (QuatKind, ScalarKind)
where
    E: QuatExpr,
    S: Scalar,
    OpMul: BinaryFunctor<E::Elem, S>,
{
    type Output = QuatXpr<QuatScalarOp<E, S, OpMul>>;

    fn try_mul(expr: E, scalar: S) -> Result<Self::Output, SizeError> {
        Ok(QuatXpr::new(QuatScalarOp::new(expr, scalar)))
    }
}

impl<E, S> DivDispatch<E, S> for (QuatKind, ScalarKind)
where
    E: QuatExpr,
    S: Scalar,
    OpDiv: BinaryFunctor<E::Elem, S>,
{
    type Output = QuatXpr<QuatScalarOp<E, S, OpDiv>>;

    fn try_div(expr: E, scalar: S) -> Result<Self::Output, SizeError> {
        Ok(QuatXpr::new(QuatScalarOp::new(expr, scalar)))
    }
}

impl<E> NegDispatch<E> for QuatKind
where
    E: QuatExpr,
    OpNeg: UnaryFunctor<E::Elem>,
{
    type Output = QuatXpr<UnaryQuatOp<E, OpNeg>>;

    fn neg(expr: E) -> Self::Output {
        QuatXpr::new(UnaryQuatOp::new(expr))
    }
}

impl_operators!([T: Scalar, O: QuatOrder,] Quat<T, O>);
impl_operators!(['a, T: Scalar, O: QuatOrder,] &'a Quat<T, O>);
impl_operators!([E: QuatExpr,] QuatXpr<E>);

macro_rules! quat_assign_ops {
    ($($op:ident::$method:ident => $functor:ident),+) => {
        $(
            impl<T, O, Rhs> $op<Rhs> for Quat<T, O>
            where
                T: Scalar,
                O: QuatOrder,
                Rhs: QuatOperand,
                Rhs::Expr: QuatExpr<Order = O>,
                $functor: AssignFunctor<T, <Rhs::Expr as QuatExpr>::Elem>,
            {
                #[inline]
                fn $method(&mut self, rhs: Rhs) {
                    assign_quat::<$functor, _, _, _>(self, &rhs.into_quat_expr());
                }
            }
        )+
    };
}

macro_rules! quat_scalar_assign_ops {
    ($($op:ident::$method:ident => $functor:ident),+) => {
        $(
            impl<T, O, S> $op<S> for Quat<T, O>
            where
                T: Scalar,
                O: QuatOrder,
                S: Scalar,
                $functor: AssignFunctor<T, S>,
            {
                #[inline]
                fn $method(&mut self, scalar: S) {
                    for c in &mut self.data {
                        <$functor as AssignFunctor<T, S>>::apply(c, scalar);
                    }
                }
            }
        )+
    };
}

quat_assign_ops!(AddAssign::add_assign => OpAddAssign, SubAssign::sub_assign => OpSubAssign);
quat_scalar_assign_ops!(MulAssign::mul_assign => OpMulAssign, DivAssign::div_assign => OpDivAssign);

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn elementwise() {
        let a = Quat::<i32>::from_wxyz(1, 2, 3, 4);
        let b = Quat::<i32>::from_wxyz(4, 3, 2, 1);

        assert_eq!((&a + &b).eval(), Quat::<i32>::from_wxyz(5, 5, 5, 5));
        assert_eq!((&a - &b).eval(), Quat::<i32>::from_wxyz(-3, -1, 1, 3));
        assert_eq!((-&a).eval(), Quat::<i32>::from_wxyz(-1, -2, -3, -4));
        assert_eq!((&a * 2i32).eval(), Quat::<i32>::from_wxyz(2, 4, 6, 8));
        assert_eq!((&a / 2.0).eval(), Quat::<f64>::from_wxyz(0.5, 1.0, 1.5, 2.0));

        // Nodes nest without evaluating in between.
        let e = (&a + &b) * 2i32 - &a;
        assert_eq!(e.eval(), Quat::<i32>::from_wxyz(9, 8, 7, 6));
    }

    #[test]
    fn compound_assignment() {
        let mut q = Quat::<f32, ScalarFirst>::from_wxyz(1.0, 2.0, 3.0, 4.0);
        let copy = q;
        q += &copy;
        assert_eq!(q, Quat::from_wxyz(2.0, 4.0, 6.0, 8.0));
        q /= 2;
        assert_eq!(q, copy);
        q *= 3.0;
        q -= copy * 2.0;
        assert_eq!(q, copy);

        let mut i = Quat::<i16>::from_wxyz(1, 1, 1, 1);
        i *= 2.5;
        assert_eq!(i, Quat::from_wxyz(2, 2, 2, 2));
    }

    #[test]
    fn index() {
        let mut q = Quat::<u8>::ZERO;
        q[3] = 7;
        assert_eq!(q.w(), 7);
        assert_eq!(q[3], 7);
    }

    #[test]
    fn try_ops_never_fail() {
        let a = Quat::<f64>::IDENTITY;
        assert!((&a).try_mul(&a).is_ok());
        assert!((&a).try_add(a).is_ok());
    }
}
