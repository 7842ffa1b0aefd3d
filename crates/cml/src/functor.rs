//! Element-wise operators.
//!
//! Each operator is a zero-sized marker type. Expression nodes store the marker as a type
//! parameter and call its `apply` function once per element.

use std::ops::{self, Add, Div, Mul, Sub};

use num_traits::AsPrimitive;

use crate::{
    promote::{Promote, Promoted},
    MinMax, Scalar,
};

/// An operator taking one element.
pub trait UnaryFunctor<T: Scalar> {
    type Output: Scalar;

    fn apply(value: T) -> Self::Output;
}

/// An operator combining two elements.
pub trait BinaryFunctor<L: Scalar, R: Scalar> {
    type Output: Scalar;

    fn apply(left: L, right: R) -> Self::Output;
}

/// An operator that updates a destination element with a source element.
///
/// The computation happens in the promoted type of both elements, and the result is converted
/// back to the destination type.
pub trait AssignFunctor<T: Scalar, S: Scalar> {
    /// Whether a resizable destination may be resized to fit the source (see the `auto-resize`
    /// feature). Only plain assignment replaces the destination contents.
    const RESIZES: bool = false;

    fn apply(dest: &mut T, src: S);
}

/// Negation (`-x`).
#[derive(Debug, Clone, Copy, Default)]
pub struct OpNeg;

/// Unary plus. Applies integral promotion and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpPos;

/// Addition.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpAdd;

/// Subtraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpSub;

/// Multiplication.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpMul;

/// Division.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpDiv;

/// Multiply-accumulate step of a dot product.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpDot;

/// `dest = src`
#[derive(Debug, Clone, Copy, Default)]
pub struct OpAssign;

/// `dest += src`
#[derive(Debug, Clone, Copy, Default)]
pub struct OpAddAssign;

/// `dest -= src`
#[derive(Debug, Clone, Copy, Default)]
pub struct OpSubAssign;

/// `dest *= src`
#[derive(Debug, Clone, Copy, Default)]
pub struct OpMulAssign;

/// `dest /= src`
#[derive(Debug, Clone, Copy, Default)]
pub struct OpDivAssign;

/// `dest = min(dest, src)`
#[derive(Debug, Clone, Copy, Default)]
pub struct OpMinAssign;

/// `dest = max(dest, src)`
#[derive(Debug, Clone, Copy, Default)]
pub struct OpMaxAssign;

impl<T> UnaryFunctor<T> for OpNeg
where
    T: Promote<T>,
    Promoted<T, T>: ops::Neg<Output = Promoted<T, T>>,
{
    type Output = Promoted<T, T>;

    #[inline]
    fn apply(value: T) -> Self::Output {
        -<T as Promote<T>>::promote(value)
    }
}

impl<T: Promote<T>> UnaryFunctor<T> for OpPos {
    type Output = Promoted<T, T>;

    #[inline]
    fn apply(value: T) -> Self::Output {
        <T as Promote<T>>::promote(value)
    }
}

macro_rules! binary_functors {
    ($($op:ident => $tr:ident::$method:ident),+) => {
        $(
            impl<L: Promote<R>, R: Scalar> BinaryFunctor<L, R> for $op {
                type Output = Promoted<L, R>;

                #[inline]
                fn apply(left: L, right: R) -> Self::Output {
                    $tr::$method(<L as Promote<R>>::promote(left), L::promote_rhs(right))
                }
            }
        )+
    };
}

binary_functors!(OpAdd => Add::add, OpSub => Sub::sub, OpMul => Mul::mul, OpDiv => Div::div);

impl<L: Promote<R>, R: Scalar> BinaryFunctor<L, R> for OpDot {
    type Output = Promoted<L, R>;

    #[inline]
    fn apply(left: L, right: R) -> Self::Output {
        <L as Promote<R>>::promote(left) * L::promote_rhs(right)
    }
}

impl OpDot {
    /// Adds the product of `left` and `right` to the running sum `acc`.
    #[inline]
    pub fn accumulate<L: Promote<R>, R: Scalar>(
        acc: Promoted<L, R>,
        left: L,
        right: R,
    ) -> Promoted<L, R> {
        acc + <Self as BinaryFunctor<L, R>>::apply(left, right)
    }
}

impl<T: Scalar, S: Scalar + AsPrimitive<T>> AssignFunctor<T, S> for OpAssign {
    const RESIZES: bool = true;

    #[inline]
    fn apply(dest: &mut T, src: S) {
        *dest = src.as_();
    }
}

macro_rules! compound_assign_functors {
    ($($op:ident => $tr:ident::$method:ident),+) => {
        $(
            impl<T, S> AssignFunctor<T, S> for $op
            where
                T: Promote<S>,
                S: Scalar,
                Promoted<T, S>: AsPrimitive<T>,
            {
                #[inline]
                fn apply(dest: &mut T, src: S) {
                    let value = $tr::$method(<T as Promote<S>>::promote(*dest), T::promote_rhs(src));
                    *dest = value.as_();
                }
            }
        )+
    };
}

compound_assign_functors!(
    OpAddAssign => Add::add,
    OpSubAssign => Sub::sub,
    OpMulAssign => Mul::mul,
    OpDivAssign => Div::div,
    OpMinAssign => MinMax::min,
    OpMaxAssign => MinMax::max
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_promotes() {
        let x: i32 = <OpAdd as BinaryFunctor<u8, u8>>::apply(200, 100);
        assert_eq!(x, 300);

        let y: f64 = <OpDiv as BinaryFunctor<i32, f64>>::apply(1, 4.0);
        assert_eq!(y, 0.25);

        let z: i64 = <OpSub as BinaryFunctor<u32, i32>>::apply(0, 1);
        assert_eq!(z, -1);

        let n: i32 = <OpNeg as UnaryFunctor<u8>>::apply(5);
        assert_eq!(n, -5);
    }

    #[test]
    fn assignment_converts_back() {
        let mut d = 3i32;
        <OpMulAssign as AssignFunctor<i32, f64>>::apply(&mut d, 1.5);
        assert_eq!(d, 4);

        let mut f = 1.0f32;
        <OpAddAssign as AssignFunctor<f32, f64>>::apply(&mut f, 0.5);
        assert_eq!(f, 1.5);

        let mut u = 0u8;
        <OpAssign as AssignFunctor<u8, i32>>::apply(&mut u, 7);
        assert_eq!(u, 7);

        let mut m = 4u16;
        <OpMinAssign as AssignFunctor<u16, f32>>::apply(&mut m, 2.5);
        assert_eq!(m, 2);
        <OpMaxAssign as AssignFunctor<u16, i64>>::apply(&mut m, -7);
        assert_eq!(m, 2);
    }

    #[test]
    fn dot_accumulates() {
        let acc = OpDot::accumulate::<i32, f32>(0.5, 2, 1.5);
        assert_eq!(acc, 3.5);
    }
}
