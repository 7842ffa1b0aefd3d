use std::{
    fmt,
    ops::{Index, IndexMut},
};

use crate::{
    assign::assign_vector,
    error::unwrap_size,
    expr::{OwnedVector, VectorExpr, VectorStorage},
    functor::{AssignFunctor, OpAssign},
    operand::{impl_operators, Operand, VectorKind, VectorOperand},
    size::Dynamic,
    Scalar,
};

use super::{fmt_elements, ops::impl_vector_assign_operators};

/// A heap-allocated vector whose length is chosen at run time.
///
/// Combining a [`DynVector`] with other vectors checks the lengths when the expression is built,
/// and assigning to it checks the length before anything is written. The length only changes
/// through [`DynVector::resize`], [`DynVector::assign_resizing`], or plain assignment when the
/// `auto-resize` feature is enabled.
///
/// # Examples
///
/// ```
/// # use cml::*;
/// let mut v = DynVector::<f32>::zeros(3);
/// v.assign(vec3(1, 2, 3));
/// assert_eq!(v, [1.0, 2.0, 3.0]);
///
/// v.resize(4);
/// assert_eq!(v, [1.0, 2.0, 3.0, 0.0]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct DynVector<T> {
    data: Vec<T>,
}

impl<T> DynVector<T> {
    /// Creates an empty vector.
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Takes ownership of the elements of `data`.
    #[inline]
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Creates a vector of length `len`, initializing each element by invoking a closure with its
    /// index.
    pub fn from_fn<F>(len: usize, cb: F) -> Self
    where
        F: FnMut(usize) -> T,
    {
        Self {
            data: (0..len).map(cb).collect(),
        }
    }

    /// Returns the number of elements.
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
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Returns a pointer to the first element.
    ///
    /// The pointer is invalidated when the vector is resized.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Scalar> DynVector<T> {
    /// Creates a vector containing `len` zeroes.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![T::ZERO; len],
        }
    }

    /// Changes the length to `len`.
    ///
    /// New elements are set to zero; elements past `len` are dropped.
    pub fn resize(&mut self, len: usize) {
        if len != self.data.len() {
            log::trace!("resizing vector from {} to {len} elements", self.data.len());
        }
        self.data.resize(len, T::ZERO);
    }

    /// Creates a vector from the elements of an expression or of another vector.
    ///
    /// ```
    /// # use cml::*;
    /// let a = vec2(1, 2);
    /// let v = DynVector::<f64>::from_expr(&a * 0.5);
    /// assert_eq!(v, [0.5, 1.0]);
    /// ```
    pub fn from_expr<S>(src: S) -> Self
    where
        S: VectorOperand,
        OpAssign: AssignFunctor<T, <S::Expr as VectorExpr>::Elem>,
    {
        let mut v = Self::new();
        v.assign_resizing(src);
        v
    }

    /// Resizes `self` to the length of `src` and assigns its elements.
    ///
    /// This never fails, regardless of the `auto-resize` feature.
    ///
    /// ```
    /// # use cml::*;
    /// let mut v = DynVector::<i32>::zeros(1);
    /// v.assign_resizing([1, 2, 3]);
    /// assert_eq!(v, [1, 2, 3]);
    /// ```
    pub fn assign_resizing<S>(&mut self, src: S)
    where
        S: VectorOperand,
        OpAssign: AssignFunctor<T, <S::Expr as VectorExpr>::Elem>,
    {
        let src = src.into_vector_expr();
        self.resize(src.size());
        unwrap_size(assign_vector::<OpAssign, _, _>(self, &src));
    }
}

impl<T: Copy> From<&[T]> for DynVector<T> {
    fn from(slice: &[T]) -> Self {
        Self {
            data: slice.to_vec(),
        }
    }
}

impl<T> From<Vec<T>> for DynVector<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T, const N: usize> From<[T; N]> for DynVector<T> {
    fn from(array: [T; N]) -> Self {
        Self {
            data: array.into(),
        }
    }
}

impl<T> Index<usize> for DynVector<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for DynVector<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for DynVector<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.data[..] == other[..]
    }
}

impl<T, U> PartialEq<[U]> for DynVector<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.data[..] == *other
    }
}

impl<T: fmt::Debug> fmt::Debug for DynVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_elements(&self.data, f, |elem, f| fmt::Debug::fmt(elem, f))
    }
}

impl<T: fmt::Display> fmt::Display for DynVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_elements(&self.data, f, |elem, f| fmt::Display::fmt(elem, f))
    }
}

impl<T: Scalar> VectorExpr for DynVector<T> {
    type Elem = T;
    type Size = Dynamic;
    const ASSIGNABLE: bool = true;
    const RESIZABLE: bool = true;

    #[inline]
    fn size(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn get(&self, i: usize) -> T {
        self.data[i]
    }
}

impl<T: Scalar> VectorStorage for DynVector<T> {
    #[inline]
    fn get_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }

    fn resize_for_assign(&mut self, len: usize) -> bool {
        self.resize(len);
        true
    }
}

impl<T: Scalar> OwnedVector<T> for DynVector<T> {
    fn with_size(len: usize) -> Self {
        Self::zeros(len)
    }
}

impl<T: Scalar> Operand for DynVector<T> {
    type Kind = VectorKind;
    type Expr = Self;

    #[inline]
    fn into_expr(self) -> Self {
        self
    }
}

impl<'a, T: Scalar> Operand for &'a DynVector<T> {
    type Kind = VectorKind;
    type Expr = Self;

    #[inline]
    fn into_expr(self) -> Self {
        self
    }
}

impl_operators!([T: Scalar,] DynVector<T>);
impl_operators!(['a, T: Scalar,] &'a DynVector<T>);
impl_vector_assign_operators!([T: Scalar,] DynVector<T>);

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn construction() {
        let v = DynVector::from_fn(3, |i| i as i64 * 2);
        assert_eq!(v, [0, 2, 4]);
        assert_eq!(v.len(), 3);

        let s = DynVector::from(&[1u8, 2][..]);
        assert_eq!(s, [1, 2]);

        let f = DynVector::<f32>::from_expr(&vec2(1.0f32, 2.0) * 2.0);
        assert_eq!(f, [2.0, 4.0]);
    }

    #[test]
    fn from_slice_copies() {
        let src = vec![1i32, 2, 3];
        let v = DynVector::from(&src[..]);
        assert_ne!(v.as_ptr(), src.as_ptr());
        assert_eq!(v, [1, 2, 3]);
    }

    #[test]
    fn self_assignment() {
        let mut v = DynVector::from_vec(vec![1.0f64, -2.0, 3.0]);
        v.assign(&v.clone());
        assert_eq!(v, [1.0, -2.0, 3.0]);
        v.assign_resizing(v.clone());
        assert_eq!(v, [1.0, -2.0, 3.0]);
    }

    #[test]
    fn clone_copies_storage() {
        let a = DynVector::from_vec(vec![1, 2, 3]);
        let mut b = a.clone();
        b[0] = 7;
        assert_eq!(a, [1, 2, 3]);
        assert_eq!(b, [7, 2, 3]);
        assert_ne!(a.as_ptr(), b.as_ptr());
    }

    #[test]
    fn move_keeps_storage() {
        let a = DynVector::from_vec(vec![1.0, 2.0]);
        let ptr = a.as_ptr();
        let b = a;
        assert_eq!(b.as_ptr(), ptr);
    }

    #[test]
    fn assignment_requires_equal_length() {
        let mut v = DynVector::<f64>::zeros(2);
        assert_eq!(
            v.try_assign(&[1.0, 2.0, 3.0]),
            if cfg!(feature = "auto-resize") {
                Ok(())
            } else {
                Err(SizeError::Vector { left: 2, right: 3 })
            }
        );

        let mut w = DynVector::<f64>::zeros(2);
        w.assign_resizing(&[1.0, 2.0, 3.0]);
        assert_eq!(w, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn compound_assignment() {
        let mut v = DynVector::from_vec(vec![1, 2, 3]);
        v += vec3(1, 1, 1);
        v *= 3;
        assert_eq!(v, [6, 9, 12]);

        let copy = v.clone();
        v -= &copy;
        assert_eq!(v, [0, 0, 0]);
    }

    #[test]
    fn fmt() {
        let v = DynVector::from_vec(vec![1.5, -2.0]);
        assert_eq!(format!("{v}"), "(1.5, -2)");
        assert_eq!(format!("{v:?}"), "(1.5, -2.0)");
    }
}
