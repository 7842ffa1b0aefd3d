//! Quaternion expression nodes.

use std::{marker::PhantomData, ops::Neg};

use crate::{
    assign::assign_quat,
    expr::QuatExpr,
    functor::{BinaryFunctor, OpAssign, UnaryFunctor},
    operand::{Operand, QuatKind, QuatOperand},
    promote::{Promote, Promoted},
    QuatOrder, Scalar, Vector,
};

use super::Quat;

/// A quaternion expression returned by an arithmetic operator or by [`conjugate`].
#[derive(Debug, Clone, Copy)]
pub struct QuatXpr<E>(E);

impl<E> QuatXpr<E> {
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

impl<E: QuatExpr> QuatXpr<E> {
    /// Computes all 4 components and stores them in a new [`Quat`].
    pub fn eval(&self) -> Quat<E::Elem, E::Order> {
        let mut out = Quat::ZERO;
        assign_quat::<OpAssign, _, _, _>(&mut out, &self.0);
        out
    }

    /// Computes only the real part.
    #[inline]
    pub fn real(&self) -> E::Elem {
        self.0.get(<E::Order as QuatOrder>::W)
    }

    /// Computes only the imaginary parts.
    pub fn imaginary(&self) -> Vector<E::Elem, 3> {
        [
            self.0.get(<E::Order as QuatOrder>::X),
            self.0.get(<E::Order as QuatOrder>::Y),
            self.0.get(<E::Order as QuatOrder>::Z),
        ]
        .into()
    }
}

impl<E: QuatExpr> QuatExpr for QuatXpr<E> {
    type Elem = E::Elem;
    type Order = E::Order;

    #[inline]
    fn get(&self, i: usize) -> Self::Elem {
        self.0.get(i)
    }
}

impl<E: QuatExpr> Operand for QuatXpr<E> {
    type Kind = QuatKind;
    type Expr = E;

    #[inline]
    fn into_expr(self) -> E {
        self.0
    }
}

/// Applies a [`UnaryFunctor`] to each component of a quaternion expression.
#[derive(Debug, Clone, Copy)]
pub struct UnaryQuatOp<E, Op> {
    expr: E,
    op: PhantomData<Op>,
}

impl<E, Op> UnaryQuatOp<E, Op> {
    pub(crate) fn new(expr: E) -> Self {
        Self {
            expr,
            op: PhantomData,
        }
    }
}

impl<E, Op> QuatExpr for UnaryQuatOp<E, Op>
where
    E: QuatExpr,
    Op: UnaryFunctor<E::Elem>,
{
    type Elem = Op::Output;
    type Order = E::Order;

    #[inline]
    fn get(&self, i: usize) -> Self::Elem {
        Op::apply(self.expr.get(i))
    }
}

/// Combines the components of two quaternion expressions with a [`BinaryFunctor`].
///
/// Both sides must use the same storage order.
#[derive(Debug, Clone, Copy)]
pub struct BinaryQuatOp<L, R, Op> {
    left: L,
    right: R,
    op: PhantomData<Op>,
}

impl<L, R, Op> BinaryQuatOp<L, R, Op> {
    pub(crate) fn new(left: L, right: R) -> Self {
        Self {
            left,
            right,
            op: PhantomData,
        }
    }
}

impl<L, R, Op> QuatExpr for BinaryQuatOp<L, R, Op>
where
    L: QuatExpr,
    R: QuatExpr<Order = L::Order>,
    Op: BinaryFunctor<L::Elem, R::Elem>,
{
    type Elem = Op::Output;
    type Order = L::Order;

    #[inline]
    fn get(&self, i: usize) -> Self::Elem {
        Op::apply(self.left.get(i), self.right.get(i))
    }
}

/// Combines each component of a quaternion expression with a scalar.
#[derive(Debug, Clone, Copy)]
pub struct QuatScalarOp<E, S, Op> {
    expr: E,
    scalar: S,
    op: PhantomData<Op>,
}

impl<E, S, Op> QuatScalarOp<E, S, Op> {
    pub(crate) fn new(expr: E, scalar: S) -> Self {
        Self {
            expr,
            scalar,
            op: PhantomData,
        }
    }
}

impl<E, S, Op> QuatExpr for QuatScalarOp<E, S, Op>
where
    E: QuatExpr,
    S: Scalar,
    Op: BinaryFunctor<E::Elem, S>,
{
    type Elem = Op::Output;
    type Order = E::Order;

    #[inline]
    fn get(&self, i: usize) -> Self::Elem {
        Op::apply(self.expr.get(i), self.scalar)
    }
}

/// The Hamilton product of two quaternion expressions.
///
/// Every component reads all 4 components of both operands, so the product of two nested
/// expressions recomputes them. Evaluate large operands first if that matters.
#[derive(Debug, Clone, Copy)]
pub struct QuatMulOp<L, R> {
    left: L,
    right: R,
}

impl<L, R> QuatMulOp<L, R> {
    pub(crate) fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

impl<L, R> QuatExpr for QuatMulOp<L, R>
where
    L: QuatExpr,
    R: QuatExpr<Order = L::Order>,
    L::Elem: Promote<R::Elem>,
{
    type Elem = Promoted<L::Elem, R::Elem>;
    type Order = L::Order;

    fn get(&self, i: usize) -> Self::Elem {
        let (w, x, y, z) = (
            <L::Order as QuatOrder>::W,
            <L::Order as QuatOrder>::X,
            <L::Order as QuatOrder>::Y,
            <L::Order as QuatOrder>::Z,
        );
        let l = |n: usize| <L::Elem as Promote<R::Elem>>::promote(self.left.get(n));
        let r = |n: usize| <L::Elem as Promote<R::Elem>>::promote_rhs(self.right.get(n));

        if i == w {
            l(w) * r(w) - l(x) * r(x) - l(y) * r(y) - l(z) * r(z)
        } else if i == x {
            l(w) * r(x) + l(x) * r(w) + l(y) * r(z) - l(z) * r(y)
        } else if i == y {
            l(w) * r(y) - l(x) * r(z) + l(y) * r(w) + l(z) * r(x)
        } else if i == z {
            l(w) * r(z) + l(x) * r(y) - l(y) * r(x) + l(z) * r(w)
        } else {
            unreachable!("quaternion component index {i} out of range")
        }
    }
}

/// Negates the imaginary parts of a quaternion expression.
#[derive(Debug, Clone, Copy)]
pub struct ConjugateOp<E> {
    expr: E,
}

impl<E> QuatExpr for ConjugateOp<E>
where
    E: QuatExpr,
    E::Elem: Promote<E::Elem>,
    Promoted<E::Elem, E::Elem>: Neg<Output = Promoted<E::Elem, E::Elem>>,
{
    type Elem = Promoted<E::Elem, E::Elem>;
    type Order = E::Order;

    #[inline]
    fn get(&self, i: usize) -> Self::Elem {
        let value = <E::Elem as Promote<E::Elem>>::promote(self.expr.get(i));
        if i == <E::Order as QuatOrder>::W {
            value
        } else {
            -value
        }
    }
}

/// Returns the conjugate of a quaternion operand: the real part is kept and the imaginary parts
/// are negated.
///
/// ```
/// # use cml::*;
/// let q = Quat::<f64>::from_wxyz(1.0, 2.0, 3.0, 4.0);
///
/// // q * conj(q) = |q|^2
/// let n = (&q * conjugate(&q)).eval();
/// assert_eq!(n, Quat::<f64>::from_wxyz(q.length2(), 0.0, 0.0, 0.0));
/// ```
pub fn conjugate<Q: QuatOperand>(q: Q) -> QuatXpr<ConjugateOp<Q::Expr>> {
    QuatXpr::new(ConjugateOp {
        expr: q.into_quat_expr(),
    })
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn hamilton_product() {
        fn check<O: QuatOrder>() {
            let i = Quat::<i32, O>::from_wxyz(0, 1, 0, 0);
            let j = Quat::<i32, O>::from_wxyz(0, 0, 1, 0);
            let k = Quat::<i32, O>::from_wxyz(0, 0, 0, 1);
            let minus_one = Quat::<i32, O>::from_wxyz(-1, 0, 0, 0);

            assert_eq!((&i * &j).eval(), k);
            assert_eq!((&j * &k).eval(), i);
            assert_eq!((&k * &i).eval(), j);
            assert_eq!((&j * &i).eval(), Quat::<i32, O>::from_expr(-&k));
            assert_eq!((&i * &i).eval(), minus_one);
            assert_eq!((&i * &j * &k).eval(), minus_one);
        }

        check::<ScalarFirst>();
        check::<ScalarLast>();
    }

    #[test]
    fn product_with_identity() {
        let q = Quat::<f32>::from_wxyz(0.5, -1.0, 2.0, 4.0);
        assert_eq!((&q * Quat::<f32>::IDENTITY).eval(), q);
        assert_eq!((Quat::<f32>::IDENTITY * &q).eval(), q);

        let p = Quat::<f32>::from_wxyz(1.0, 2.0, 3.0, 4.0);
        let expected = Quat::<f32>::from_wxyz(
            0.5 * 1.0 - (-1.0) * 2.0 - 2.0 * 3.0 - 4.0 * 4.0,
            0.5 * 2.0 + (-1.0) * 1.0 + 2.0 * 4.0 - 4.0 * 3.0,
            0.5 * 3.0 - (-1.0) * 4.0 + 2.0 * 1.0 + 4.0 * 2.0,
            0.5 * 4.0 + (-1.0) * 3.0 - 2.0 * 2.0 + 4.0 * 1.0,
        );
        assert_eq!((&q * &p).eval(), expected);
    }

    #[test]
    fn products_promote() {
        let a = Quat::<i8>::from_wxyz(100, 0, 0, 0);
        let b = Quat::<i32>::from_wxyz(2, 0, 0, 0);
        let p: Quat<i32> = (&a * &b).eval();
        assert_eq!(p.w(), 200);

        let c = Quat::<f32>::from_wxyz(0.5, 0.0, 0.0, 0.0);
        let p: Quat<f32> = (&b * &c).eval();
        assert_eq!(p.w(), 1.0);
    }

    #[test]
    fn partial_evaluation() {
        let q = Quat::<i32>::from_wxyz(1, 2, 3, 4);
        let e = &q + conjugate(&q);
        assert_eq!(e.real(), 2);
        assert_eq!(e.imaginary(), [0, 0, 0]);

        let c = conjugate(&q).eval();
        assert_eq!(c, q.conjugate());
    }

    #[test]
    #[should_panic(expected = "quaternion component index 4 out of range")]
    fn invalid_component_index() {
        let q = Quat::<i32>::IDENTITY;
        (&q * &q).into_inner().get(4);
    }
}
