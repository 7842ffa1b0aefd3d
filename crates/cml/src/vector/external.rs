use std::{
    fmt,
    ops::{Index, IndexMut},
};

use crate::{
    error::SizeError,
    expr::{VectorExpr, VectorStorage},
    operand::{impl_operators, Operand, VectorKind},
    size::{Dynamic, Fixed},
    Scalar,
};

use super::{fmt_elements, ops::impl_vector_assign_operators};

/// A fixed-size vector stored in a buffer owned by the caller.
///
/// Assignments write through to the borrowed buffer. An [`ExternalVector`] cannot be cloned,
/// since that would alias the buffer; evaluate an expression of it into a [`Vector`][crate::Vector]
/// to get an owned copy.
///
/// # Examples
///
/// ```
/// # use cml::*;
/// let mut buf = [0.0f32; 3];
/// {
///     let mut v = ExternalVector::new(&mut buf);
///     v.assign(vec3(1.0, 2.0, 3.0));
///     v *= 2.0;
/// }
/// assert_eq!(buf, [2.0, 4.0, 6.0]);
/// ```
pub struct ExternalVector<'a, T, const N: usize> {
    data: &'a mut [T; N],
}

impl<'a, T, const N: usize> ExternalVector<'a, T, N> {
    /// Wraps a caller-owned array.
    #[inline]
    pub fn new(data: &'a mut [T; N]) -> Self {
        Self { data }
    }

    /// Wraps a caller-owned slice of exactly `N` elements.
    pub fn from_slice(data: &'a mut [T]) -> Result<Self, SizeError> {
        let actual = data.len();
        match <&mut [T; N]>::try_from(data) {
            Ok(data) => Ok(Self { data }),
            Err(_) => Err(SizeError::Length {
                expected: N,
                actual,
            }),
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data[..]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data[..]
    }

    /// Returns a pointer to the first element of the borrowed buffer.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }
}

/// A vector stored in a caller-owned slice whose length is known at run time.
///
/// Unlike [`DynVector`][crate::DynVector] it cannot be resized, so assigning an expression of a
/// different length always fails.
///
/// # Examples
///
/// ```
/// # use cml::*;
/// let mut buf = vec![1, 2, 3, 4];
/// let mut v = ExternalDynVector::new(&mut buf[1..]);
/// v += [10, 10, 10];
/// assert!(v.try_assign([0, 0]).is_err());
/// assert_eq!(buf, [1, 12, 13, 14]);
/// ```
pub struct ExternalDynVector<'a, T> {
    data: &'a mut [T],
}

impl<'a, T> ExternalDynVector<'a, T> {
    /// Wraps a caller-owned slice.
    #[inline]
    pub fn new(data: &'a mut [T]) -> Self {
        Self { data }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &*self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut *self.data
    }

    /// Returns a pointer to the first element of the borrowed buffer.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }
}

macro_rules! external_common {
    ([$($generics:tt)*] $ty:ty, $size:ty) => {
        impl<$($generics)*> Index<usize> for $ty {
            type Output = T;

            #[inline]
            fn index(&self, index: usize) -> &T {
                &self.data[index]
            }
        }

        impl<$($generics)*> IndexMut<usize> for $ty {
            #[inline]
            fn index_mut(&mut self, index: usize) -> &mut T {
                &mut self.data[index]
            }
        }

        impl<$($generics)* U> PartialEq<[U]> for $ty
        where
            T: PartialEq<U>,
        {
            fn eq(&self, other: &[U]) -> bool {
                self.data[..] == *other
            }
        }

        impl<$($generics)* U, const M: usize> PartialEq<[U; M]> for $ty
        where
            T: PartialEq<U>,
        {
            fn eq(&self, other: &[U; M]) -> bool {
                self.data[..] == other[..]
            }
        }

        impl<$($generics)*> fmt::Debug for $ty
        where
            T: fmt::Debug,
        {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt_elements(&self.data[..], f, |elem, f| fmt::Debug::fmt(elem, f))
            }
        }

        impl<$($generics)*> fmt::Display for $ty
        where
            T: fmt::Display,
        {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt_elements(&self.data[..], f, |elem, f| fmt::Display::fmt(elem, f))
            }
        }

        impl<$($generics)*> VectorExpr for $ty
        where
            T: Scalar,
        {
            type Elem = T;
            type Size = $size;
            const ASSIGNABLE: bool = true;

            #[inline]
            fn size(&self) -> usize {
                self.data.len()
            }

            #[inline]
            fn get(&self, i: usize) -> T {
                self.data[i]
            }
        }

        impl<$($generics)*> VectorStorage for $ty
        where
            T: Scalar,
        {
            #[inline]
            fn get_mut(&mut self, i: usize) -> &mut T {
                &mut self.data[i]
            }
        }

        impl<'r, $($generics)*> Operand for &'r $ty
        where
            T: Scalar,
        {
            type Kind = VectorKind;
            type Expr = Self;

            #[inline]
            fn into_expr(self) -> Self {
                self
            }
        }

        impl_operators!(['r, $($generics)*] &'r $ty);
        impl_vector_assign_operators!([$($generics)*] $ty);
    };
}

external_common!(['a, T: Scalar, const N: usize,] ExternalVector<'a, T, N>, Fixed<N>);
external_common!(['a, T: Scalar,] ExternalDynVector<'a, T>, Dynamic);

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn writes_through() {
        let mut buf = [1, 2, 3];
        let ptr = buf.as_ptr();
        {
            let mut v = ExternalVector::new(&mut buf);
            let doubled: Vector<i32, 3> = (&v * 2i32 + [1, 1, 1]).eval();
            v.assign(doubled);
            assert_eq!(v, [3, 5, 7]);
            assert_eq!(v.as_ptr(), ptr);
        }
        assert_eq!(buf, [3, 5, 7]);
    }

    #[test]
    fn from_slice_checks_length() {
        let mut data = [0.0; 4];
        assert_eq!(
            ExternalVector::<f64, 3>::from_slice(&mut data[..]).err(),
            Some(SizeError::Length {
                expected: 3,
                actual: 4
            })
        );
        let v = ExternalVector::<f64, 3>::from_slice(&mut data[1..]).unwrap();
        assert_eq!(v.size(), 3);
    }

    #[test]
    fn dynamic_external_cannot_resize() {
        let mut buf = vec![0.0f32; 2];
        let mut v = ExternalDynVector::new(&mut buf[..]);
        assert_eq!(
            v.try_assign(vec3(1.0, 2.0, 3.0)),
            Err(SizeError::Vector { left: 2, right: 3 })
        );
        v.assign(vec2(1.0, 2.0));
        assert_eq!(format!("{v:?}"), "(1.0, 2.0)");
    }

    #[test]
    fn mixes_with_owned_vectors() {
        let mut a = [1.0, 2.0, 3.0];
        let mut b = vec![1.0, 1.0, 1.0];
        let ea = ExternalVector::new(&mut a);
        let eb = ExternalDynVector::new(&mut b[..]);

        let sum: Vec3d = (&ea + &eb).eval();
        assert_eq!(sum, [2.0, 3.0, 4.0]);
        assert_eq!(dot(&ea, &eb), 6.0);
    }
}
