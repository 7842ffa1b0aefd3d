//! Operands of the arithmetic operators and their compile-time dispatch.
//!
//! Every value that may appear on either side of `+`, `-`, `*` or `/` implements [`Operand`],
//! which tags it with a *kind* (vector, matrix, quaternion or scalar) and converts it into the
//! expression that gets stored in the resulting node. Containers passed by reference are stored
//! by reference, nodes and containers passed by value are moved into the node, and expression
//! wrappers ([`VectorXpr`][crate::VectorXpr] etc.) are unwrapped so that nodes nest directly.
//!
//! The operator traits are implemented once per operand form (see `impl_operators!`) and forward
//! to a dispatch trait implemented on the pair of operand kinds. The pair selects the node type,
//! so `matrix * vector` and `matrix * scalar` never overlap.

use crate::{
    error::SizeError,
    expr::{MatrixExpr, QuatExpr, VectorExpr},
};

/// Kind of vector operands.
#[derive(Debug, Clone, Copy)]
pub struct VectorKind;

/// Kind of matrix operands.
#[derive(Debug, Clone, Copy)]
pub struct MatrixKind;

/// Kind of quaternion operands.
#[derive(Debug, Clone, Copy)]
pub struct QuatKind;

/// Kind of scalar operands.
#[derive(Debug, Clone, Copy)]
pub struct ScalarKind;

/// A value that can be used as an operand of the arithmetic operators.
pub trait Operand {
    /// One of [`VectorKind`], [`MatrixKind`], [`QuatKind`] or [`ScalarKind`].
    type Kind;

    /// The expression stored in a node built from this operand.
    type Expr;

    fn into_expr(self) -> Self::Expr;
}

/// Operands that evaluate to vectors.
///
/// Accepted by [`dot`][crate::dot], [`cross`][crate::cross], assignment and the other functions
/// taking vector arguments.
pub trait VectorOperand {
    type Expr: VectorExpr;

    fn into_vector_expr(self) -> Self::Expr;
}

impl<O> VectorOperand for O
where
    O: Operand<Kind = VectorKind>,
    O::Expr: VectorExpr,
{
    type Expr = O::Expr;

    #[inline]
    fn into_vector_expr(self) -> Self::Expr {
        self.into_expr()
    }
}

/// Operands that evaluate to matrices.
pub trait MatrixOperand {
    type Expr: MatrixExpr;

    fn into_matrix_expr(self) -> Self::Expr;
}

impl<O> MatrixOperand for O
where
    O: Operand<Kind = MatrixKind>,
    O::Expr: MatrixExpr,
{
    type Expr = O::Expr;

    #[inline]
    fn into_matrix_expr(self) -> Self::Expr {
        self.into_expr()
    }
}

/// Operands that evaluate to quaternions.
pub trait QuatOperand {
    type Expr: QuatExpr;

    fn into_quat_expr(self) -> Self::Expr;
}

impl<O> QuatOperand for O
where
    O: Operand<Kind = QuatKind>,
    O::Expr: QuatExpr,
{
    type Expr = O::Expr;

    #[inline]
    fn into_quat_expr(self) -> Self::Expr {
        self.into_expr()
    }
}

macro_rules! scalar_operands {
    ($($t:ty),+) => {
        $(
            impl Operand for $t {
                type Kind = ScalarKind;
                type Expr = $t;

                #[inline]
                fn into_expr(self) -> $t {
                    self
                }
            }
        )+
    };
}

scalar_operands!(i8, i16, i32, i64, i128, u8, u16, u32, u64, f32, f64);

macro_rules! dispatch_traits {
    ($($(#[$attr:meta])* $dispatch:ident, $user:ident :: $method:ident;)+) => {
        $(
            /// Builds the node for one pair of operand kinds.
            ///
            /// Implemented on `(LeftKind, RightKind)`.
            pub trait $dispatch<L, R> {
                type Output;

                fn $method(left: L, right: R) -> Result<Self::Output, SizeError>;
            }

            $(#[$attr])*
            pub trait $user<Rhs>: Operand {
                type Output;

                fn $method(self, rhs: Rhs) -> Result<Self::Output, SizeError>;
            }

            impl<L: Operand, R: Operand> $user<R> for L
            where
                (L::Kind, R::Kind): $dispatch<L::Expr, R::Expr>,
            {
                type Output = <(L::Kind, R::Kind) as $dispatch<L::Expr, R::Expr>>::Output;

                #[inline]
                fn $method(self, rhs: R) -> Result<Self::Output, SizeError> {
                    <(L::Kind, R::Kind) as $dispatch<L::Expr, R::Expr>>::$method(
                        self.into_expr(),
                        rhs.into_expr(),
                    )
                }
            }
        )+
    };
}

dispatch_traits! {
    /// Fallible `+`: reports a run-time size mismatch instead of panicking.
    ///
    /// ```
    /// # use cml::*;
    /// let a = DynVector::from_vec(vec![1.0, 2.0]);
    /// let b = DynVector::from_vec(vec![1.0, 2.0, 3.0]);
    /// assert_eq!((&a).try_add(&b).unwrap_err(), SizeError::Vector { left: 2, right: 3 });
    /// ```
    AddDispatch, TryAdd::try_add;
    /// Fallible `-`.
    SubDispatch, TrySub::try_sub;
    /// Fallible `*`.
    ///
    /// Matrix products check the inner dimensions:
    ///
    /// ```
    /// # use cml::*;
    /// let a = DynMatrix::<f32>::zeros(2, 3);
    /// let b = DynMatrix::<f32>::zeros(2, 3);
    /// assert_eq!(
    ///     (&a).try_mul(&b).unwrap_err(),
    ///     SizeError::Inner { left_cols: 3, right_rows: 2 },
    /// );
    /// ```
    MulDispatch, TryMul::try_mul;
    /// Fallible `/`.
    DivDispatch, TryDiv::try_div;
}

/// Builds the negation node for one operand kind.
pub trait NegDispatch<E> {
    type Output;

    fn neg(expr: E) -> Self::Output;
}

/// Implements the arithmetic operators for one operand form.
///
/// The operator impls forward to the `Try*` traits and panic with the [`SizeError`] message on a
/// run-time size mismatch.
macro_rules! impl_operators {
    ([$($generics:tt)*] $lhs:ty) => {
        $crate::operand::impl_operators!(@binary [$($generics)*] $lhs, Add::add, TryAdd::try_add);
        $crate::operand::impl_operators!(@binary [$($generics)*] $lhs, Sub::sub, TrySub::try_sub);
        $crate::operand::impl_operators!(@binary [$($generics)*] $lhs, Mul::mul, TryMul::try_mul);
        $crate::operand::impl_operators!(@binary [$($generics)*] $lhs, Div::div, TryDiv::try_div);

        impl<$($generics)*> ::std::ops::Neg for $lhs
        where
            <$lhs as $crate::operand::Operand>::Kind:
                $crate::operand::NegDispatch<<$lhs as $crate::operand::Operand>::Expr>,
        {
            type Output = <<$lhs as $crate::operand::Operand>::Kind as $crate::operand::NegDispatch<
                <$lhs as $crate::operand::Operand>::Expr,
            >>::Output;

            #[inline]
            fn neg(self) -> Self::Output {
                <<$lhs as $crate::operand::Operand>::Kind as $crate::operand::NegDispatch<_>>::neg(
                    $crate::operand::Operand::into_expr(self),
                )
            }
        }
    };
    (@binary [$($generics:tt)*] $lhs:ty, $op:ident::$method:ident, $fallible:ident::$fallible_method:ident) => {
        impl<$($generics)* Rhs> ::std::ops::$op<Rhs> for $lhs
        where
            $lhs: $crate::operand::$fallible<Rhs>,
        {
            type Output = <$lhs as $crate::operand::$fallible<Rhs>>::Output;

            #[inline]
            #[track_caller]
            fn $method(self, rhs: Rhs) -> Self::Output {
                $crate::error::unwrap_size($crate::operand::$fallible::$fallible_method(self, rhs))
            }
        }
    };
}

pub(crate) use impl_operators;
