//! Element type traits.

use std::{fmt, ops};

use num_traits::AsPrimitive;

/// Types that support computing their square root.
pub trait Sqrt {
    fn sqrt(self) -> Self;
}

/// Types that support a `min` and `max` operation.
///
/// [`f32`] and [`f64`] implement this trait in terms of the [`f32::min`] and [`f32::max`] functions
/// ([`f64::min`] and [`f64::max`] respectively), so a NaN operand is ignored. Built-in integer
/// types implement it in terms of [`Ord::min`] and [`Ord::max`].
pub trait MinMax: Sized {
    fn min(self, other: Self) -> Self;
    fn max(self, other: Self) -> Self;
    fn clamp(self, min: Self, max: Self) -> Self {
        self.max(min).min(max)
    }
}

/// Types that have a "zero" value (an additive identity).
pub trait Zero {
    /// The *0* value of this type.
    const ZERO: Self;
}

/// Types that have a "one" value (a multiplicative identity).
pub trait One {
    /// The *1* value of this type.
    const ONE: Self;
}

/// Element types of vectors, matrices and quaternions.
///
/// Implemented for the built-in integer types up to 128 bits (except `u128`) and for [`f32`] and
/// [`f64`]. `usize` and `isize` are deliberately left out: their width is platform-dependent, so
/// they have no fixed place in the promotion table (see [`Promote`][crate::Promote]).
///
/// Unsigned types are valid elements but cannot be negated.
pub trait Scalar:
    Zero
    + One
    + MinMax
    + ops::Add<Output = Self>
    + ops::Sub<Output = Self>
    + ops::Mul<Output = Self>
    + ops::Div<Output = Self>
    + PartialEq
    + PartialOrd
    + Default
    + Copy
    + fmt::Debug
    + fmt::Display
    + AsPrimitive<Self>
    + Send
    + Sync
    + 'static
{
    /// The type this one is converted to before taking part in arithmetic.
    ///
    /// Narrow integers (`i8`, `i16`, `u8`, `u16`) become `i32`; every other type stays the same.
    type Promoted: Scalar;

    /// Whether this is a floating-point type.
    const IS_FLOAT: bool;

    /// Returns a uniformly distributed value in the half-open range `low..high`.
    ///
    /// # Panics
    ///
    /// Integer types panic if the range is empty.
    fn random(low: Self, high: Self) -> Self;
}

macro_rules! integer_scalar {
    ($($t:ident => $promoted:ty),+ $(,)?) => {
        $(
            impl Zero for $t {
                const ZERO: Self = 0;
            }

            impl One for $t {
                const ONE: Self = 1;
            }

            impl MinMax for $t {
                fn min(self, other: Self) -> Self {
                    Ord::min(self, other)
                }

                fn max(self, other: Self) -> Self {
                    Ord::max(self, other)
                }
            }

            impl Scalar for $t {
                type Promoted = $promoted;
                const IS_FLOAT: bool = false;

                fn random(low: Self, high: Self) -> Self {
                    fastrand::$t(low..high)
                }
            }
        )+
    };
}

integer_scalar!(
    i8 => i32,
    i16 => i32,
    i32 => i32,
    i64 => i64,
    i128 => i128,
    u8 => i32,
    u16 => i32,
    u32 => u32,
    u64 => u64,
);

macro_rules! float_scalar {
    ($($t:ident),+) => {
        $(
            impl Zero for $t {
                const ZERO: Self = 0.0;
            }

            impl One for $t {
                const ONE: Self = 1.0;
            }

            impl MinMax for $t {
                fn min(self, other: Self) -> Self {
                    self.min(other)
                }

                fn max(self, other: Self) -> Self {
                    self.max(other)
                }
            }

            impl Sqrt for $t {
                fn sqrt(self) -> Self {
                    self.sqrt()
                }
            }

            impl Scalar for $t {
                type Promoted = $t;
                const IS_FLOAT: bool = true;

                fn random(low: Self, high: Self) -> Self {
                    low + (high - low) * fastrand::$t()
                }
            }
        )+
    };
}

float_scalar!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_stays_in_range() {
        for _ in 0..100 {
            let i = i32::random(-3, 3);
            assert!((-3..3).contains(&i));

            let u = u8::random(10, 12);
            assert!(u == 10 || u == 11);

            let f = f64::random(1.0, 2.0);
            assert!((1.0..2.0).contains(&f));
        }
    }

    #[test]
    fn float_min_max_ignores_nan() {
        assert_eq!(MinMax::min(f32::NAN, 1.0), 1.0);
        assert_eq!(MinMax::max(2.0f64, f64::NAN), 2.0);
        assert_eq!(MinMax::clamp(5i16, 0, 3), 3);
    }
}
