//! Type promotion of elements and containers.
//!
//! When two operands with different element types are combined, the result element type is
//! determined in two steps:
//!
//! 1. each side is promoted on its own ([`Scalar::Promoted`]): `i8`, `i16`, `u8` and `u16` become
//!    `i32`, everything else stays unchanged;
//! 2. the two promoted types are joined ([`Join`]). Floating-point types dominate integers, `f64`
//!    dominates `f32`, and a signed/unsigned pair widens to a signed type that can represent both
//!    (`i32` and `u32` join to `i64`).
//!
//! The join is a semilattice, so promoting `a` with `b` and the result with `c` gives the same
//! type as promoting `a` with the promotion of `b` and `c`.
//!
//! Containers are promoted by their size descriptor ([`SizePromote`]) and, for matrices, by both
//! dimensions ([`MatrixShape`]).

use num_traits::AsPrimitive;

use crate::{
    expr::OwnedMatrix,
    size::{Dynamic, Fixed, Size},
    DynMatrix, Matrix, Scalar,
};

/// Least upper bound of two *promoted* element types.
pub trait Join<Rhs> {
    type Output: Scalar;
}

macro_rules! join_self {
    ($($t:ty),+) => {
        $(
            impl Join<$t> for $t {
                type Output = $t;
            }
        )+
    };
}

macro_rules! join {
    ($($a:ty, $b:ty => $out:ty;)+) => {
        $(
            impl Join<$b> for $a {
                type Output = $out;
            }

            impl Join<$a> for $b {
                type Output = $out;
            }
        )+
    };
}

join_self!(i32, u32, i64, u64, i128, f32, f64);

join! {
    i32, u32 => i64;
    i32, i64 => i64;
    i32, u64 => i128;
    i32, i128 => i128;
    i32, f32 => f32;
    i32, f64 => f64;
    u32, i64 => i64;
    u32, u64 => u64;
    u32, i128 => i128;
    u32, f32 => f32;
    u32, f64 => f64;
    i64, u64 => i128;
    i64, i128 => i128;
    i64, f32 => f32;
    i64, f64 => f64;
    u64, i128 => i128;
    u64, f32 => f32;
    u64, f64 => f64;
    i128, f32 => f32;
    i128, f64 => f64;
    f32, f64 => f64;
}

/// Element types that can be combined with `Rhs` in an arithmetic operation.
///
/// Implemented for every pair of [`Scalar`] types; the [`Output`][Promote::Output] is the type the
/// operation is computed in.
///
/// ```
/// # use cml::*;
/// let x: Promoted<u8, i16> = 7;
/// let y: Promoted<i32, f32> = 0.5;
/// let z: Promoted<u32, i32> = -1_i64;
/// ```
pub trait Promote<Rhs: Scalar>: Scalar {
    type Output: Scalar;

    /// Converts `self` to the promoted type.
    fn promote(self) -> <Self as Promote<Rhs>>::Output;

    /// Converts the right-hand side to the promoted type.
    fn promote_rhs(rhs: Rhs) -> <Self as Promote<Rhs>>::Output;
}

/// The element type resulting from combining `L` and `R`.
pub type Promoted<L, R> = <L as Promote<R>>::Output;

/// The join of the integral promotions of `L` and `R`.
pub type Joined<L, R> = <<L as Scalar>::Promoted as Join<<R as Scalar>::Promoted>>::Output;

impl<L, R> Promote<R> for L
where
    L: Scalar + AsPrimitive<Joined<L, R>>,
    R: Scalar + AsPrimitive<Joined<L, R>>,
    <L as Scalar>::Promoted: Join<<R as Scalar>::Promoted>,
{
    type Output = Joined<L, R>;

    #[inline]
    fn promote(self) -> <Self as Promote<R>>::Output {
        self.as_()
    }

    #[inline]
    fn promote_rhs(rhs: R) -> <Self as Promote<R>>::Output {
        rhs.as_()
    }
}

/// Size descriptors that can be combined with `Rhs` in an element-wise operation.
///
/// Two fixed sizes only combine if they are equal; combining `Fixed<3>` with `Fixed<4>` is a
/// compile-time error. A fixed size combined with [`Dynamic`] stays fixed (the dynamic side is
/// checked at run time).
///
/// ```compile_fail
/// # use cml::*;
/// let a = vec3(1.0, 2.0, 3.0);
/// let b = vec4(1.0, 2.0, 3.0, 4.0);
/// let _ = &a + &b;
/// ```
pub trait SizePromote<Rhs> {
    type Output: Size;
}

impl<const N: usize> SizePromote<Fixed<N>> for Fixed<N> {
    type Output = Fixed<N>;
}

impl<const N: usize> SizePromote<Dynamic> for Fixed<N> {
    type Output = Fixed<N>;
}

impl<const N: usize> SizePromote<Fixed<N>> for Dynamic {
    type Output = Fixed<N>;
}

impl SizePromote<Dynamic> for Dynamic {
    type Output = Dynamic;
}

/// Selects the owned storage of a matrix expression from its row and column descriptors.
///
/// Implemented on the row descriptor: both dimensions fixed give a [`Matrix`], anything else a
/// [`DynMatrix`].
pub trait MatrixShape<Cols: Size>: Size {
    type Storage<T: Scalar>: OwnedMatrix<T>;
}

impl<const R: usize, const C: usize> MatrixShape<Fixed<C>> for Fixed<R> {
    type Storage<T: Scalar> = Matrix<T, R, C>;
}

impl<const R: usize> MatrixShape<Dynamic> for Fixed<R> {
    type Storage<T: Scalar> = DynMatrix<T>;
}

impl<const C: usize> MatrixShape<Fixed<C>> for Dynamic {
    type Storage<T: Scalar> = DynMatrix<T>;
}

impl MatrixShape<Dynamic> for Dynamic {
    type Storage<T: Scalar> = DynMatrix<T>;
}

#[cfg(test)]
mod tests {
    use std::any::TypeId;

    use super::*;
    use crate::{vec2, Vector};

    fn promoted<L: Promote<R>, R: Scalar>() -> TypeId {
        TypeId::of::<Promoted<L, R>>()
    }

    fn size_of<L: SizePromote<R>, R>() -> Option<usize> {
        <L::Output as Size>::FIXED
    }

    #[test]
    fn scalar_promotion() {
        assert_eq!(promoted::<f64, i32>(), TypeId::of::<f64>());
        assert_eq!(promoted::<i32, f64>(), TypeId::of::<f64>());
        assert_eq!(promoted::<f32, f64>(), TypeId::of::<f64>());
        assert_eq!(promoted::<u64, f32>(), TypeId::of::<f32>());
        assert_eq!(promoted::<i32, u32>(), TypeId::of::<i64>());
        assert_eq!(promoted::<i64, u64>(), TypeId::of::<i128>());
        assert_eq!(promoted::<u8, u8>(), TypeId::of::<i32>());
        assert_eq!(promoted::<u8, u32>(), TypeId::of::<i64>());
        assert_eq!(promoted::<i16, i64>(), TypeId::of::<i64>());
        assert_eq!(promoted::<u16, u64>(), TypeId::of::<i128>());
        assert_eq!(promoted::<u32, u64>(), TypeId::of::<u64>());
    }

    #[test]
    fn promotion_is_symmetric_and_associative() {
        fn check<A, B, C>()
        where
            A: Promote<B> + Promote<C> + Promote<Promoted<B, C>>,
            B: Promote<C> + Promote<A>,
            C: Scalar,
            Promoted<A, B>: Promote<C>,
        {
            assert_eq!(promoted::<A, B>(), promoted::<B, A>());
            assert_eq!(
                promoted::<Promoted<A, B>, C>(),
                promoted::<A, Promoted<B, C>>()
            );
        }

        check::<i32, u32, i64>();
        check::<u8, i64, u64>();
        check::<i16, u32, f32>();
        check::<u64, i32, u32>();
        check::<f32, i128, f64>();
        check::<u16, u32, u64>();
    }

    #[test]
    fn promotion_in_expressions() {
        let a = vec2(1u8, 200);
        let b = vec2(100u8, 100);
        let sum = (&a + &b).eval();
        assert_eq!(TypeId::of::<Vector<i32, 2>>(), type_id_of(&sum));
        assert_eq!(sum, [101, 300]);

        let mixed = (&a * 0.5f32).eval();
        assert_eq!(TypeId::of::<Vector<f32, 2>>(), type_id_of(&mixed));
        assert_eq!(mixed, [0.5, 100.0]);

        assert_eq!(<i32 as Promote<f64>>::promote(3), 3.0);
        assert_eq!(<i32 as Promote<f64>>::promote_rhs(1.5), 1.5);
    }

    fn type_id_of<T: 'static>(_: &T) -> TypeId {
        TypeId::of::<T>()
    }

    #[test]
    fn size_promotion() {
        assert_eq!(size_of::<Fixed<3>, Fixed<3>>(), Some(3));
        assert_eq!(size_of::<Fixed<3>, Dynamic>(), Some(3));
        assert_eq!(size_of::<Dynamic, Fixed<2>>(), Some(2));
        assert_eq!(size_of::<Dynamic, Dynamic>(), None);
    }

    #[test]
    fn matrix_shape() {
        assert_eq!(
            TypeId::of::<<Fixed<2> as MatrixShape<Fixed<3>>>::Storage<f32>>(),
            TypeId::of::<Matrix<f32, 2, 3>>()
        );
        assert_eq!(
            TypeId::of::<<Fixed<2> as MatrixShape<Dynamic>>::Storage<f32>>(),
            TypeId::of::<DynMatrix<f32>>()
        );
    }
}
