//! Size descriptors.
//!
//! Every vector expression carries a size descriptor as an associated type: [`Fixed<N>`] when the
//! length is known at compile time, [`Dynamic`] when it is only known at run time. Matrix
//! expressions carry one descriptor per dimension.

use std::fmt;

use crate::{expr::OwnedVector, DynVector, Scalar, Vector};

/// Describes whether a length is known at compile time.
pub trait Size: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// The compile-time length, or `None` if the length is a run-time value.
    const FIXED: Option<usize>;

    /// Owned vector type used to store the evaluated result of an expression of this size.
    type Storage<T: Scalar>: OwnedVector<T>;
}

/// A length that is known at compile time.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct Fixed<const N: usize>;

/// A length that is only known at run time.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct Dynamic;

impl<const N: usize> Size for Fixed<N> {
    const FIXED: Option<usize> = Some(N);
    type Storage<T: Scalar> = Vector<T, N>;
}

impl Size for Dynamic {
    const FIXED: Option<usize> = None;
    type Storage<T: Scalar> = DynVector<T>;
}

/// Sizes that can lose one element (the size of a [`subvector`][crate::subvector]).
///
/// Stable Rust cannot compute `N - 1` in a const generic, so this is implemented for
/// `Fixed<1>` through `Fixed<16>` and for [`Dynamic`].
pub trait Shrink: Size {
    type Output: Size;
}

impl Shrink for Dynamic {
    type Output = Dynamic;
}

macro_rules! shrink {
    ($($n:literal => $m:literal),+ $(,)?) => {
        $(
            impl Shrink for Fixed<$n> {
                type Output = Fixed<$m>;
            }
        )+
    };
}

shrink!(
    1 => 0, 2 => 1, 3 => 2, 4 => 3, 5 => 4, 6 => 5, 7 => 6, 8 => 7,
    9 => 8, 10 => 9, 11 => 10, 12 => 11, 13 => 12, 14 => 13, 15 => 14, 16 => 15,
);

/// Sizes that may hold exactly 3 elements: `Fixed<3>`, and [`Dynamic`] (checked at run time).
///
/// Used to reject cross products of fixed-size vectors with any other length at compile time.
pub trait Length3: Size {}

impl Length3 for Fixed<3> {}
impl Length3 for Dynamic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_lengths() {
        assert_eq!(Fixed::<3>::FIXED, Some(3));
        assert_eq!(<<Fixed<3> as Shrink>::Output as Size>::FIXED, Some(2));
        assert_eq!(<<Fixed<16> as Shrink>::Output as Size>::FIXED, Some(15));
        assert_eq!(<Dynamic as Size>::FIXED, None);
        assert_eq!(<<Dynamic as Shrink>::Output as Size>::FIXED, None);
    }
}
