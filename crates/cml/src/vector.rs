use std::{array, fmt};

use crate::{
    error::SizeError,
    expr::{OwnedVector, VectorExpr, VectorStorage},
    functor::{AssignFunctor, OpAssign},
    operand::{Operand, VectorKind, VectorOperand},
    promote::SizePromote,
    size::Fixed,
    One, Scalar, Sqrt, Zero,
};

mod dynamic;
mod external;
mod nodes;
mod ops;

pub use dynamic::DynVector;
pub use external::{ExternalDynVector, ExternalVector};
pub use nodes::*;

/// A 2-dimensional vector.
pub type Vec2<T> = Vector<T, 2>;
/// A 2-dimensional vector with [`f32`] elements.
pub type Vec2f = Vec2<f32>;
/// A 2-dimensional vector with [`f64`] elements.
pub type Vec2d = Vec2<f64>;
/// A 3-dimensional vector.
pub type Vec3<T> = Vector<T, 3>;
/// A 3-dimensional vector with [`f32`] elements.
pub type Vec3f = Vec3<f32>;
/// A 3-dimensional vector with [`f64`] elements.
pub type Vec3d = Vec3<f64>;
/// A 4-dimensional vector.
pub type Vec4<T> = Vector<T, 4>;
/// A 4-dimensional vector with [`f32`] elements.
pub type Vec4f = Vec4<f32>;
/// A 4-dimensional vector with [`f64`] elements.
pub type Vec4d = Vec4<f64>;

/// An `N`-element column vector storing elements of type `T`.
///
/// # Construction
///
/// - The freestanding [`vec2`], [`vec3`] and [`vec4`] functions directly create vectors from
///   provided values.
/// - [`Vector::splat`] creates a vector by copying the given value into each element.
/// - [`Vector::from_fn`] creates a vector by invoking a closure with the index of each element.
/// - Vectors can be created from arrays using their [`From`] implementation, and from slices
///   using [`TryFrom`] (which fails if the slice has the wrong length).
/// - [`Vector::from_expr`] evaluates an expression or converts another vector, promoting or
///   converting the element type as needed.
/// - [`Vector::ZERO`] is a vector containing all-zeroes.
///
/// # Arithmetic
///
/// Arithmetic operators do not compute anything right away. They build an expression
/// ([`VectorXpr`]) that is evaluated when it is assigned to a container, or when
/// [`VectorXpr::eval`] is called:
///
/// ```
/// # use cml::*;
/// let a = vec3(1.0, 2.0, 3.0);
/// let b = vec3(0.5, 0.5, 0.5);
///
/// let mut c = Vec3d::ZERO;
/// c.assign(&a + &b * 2.0);
/// assert_eq!(c, [2.0, 3.0, 4.0]);
/// assert_eq!((&a - &b).eval(), [0.5, 1.5, 2.5]);
/// ```
///
/// Combining fixed-size vectors of different lengths is rejected at compile time:
///
/// ```compile_fail
/// # use cml::*;
/// let mut v = Vec3d::ZERO;
/// v.assign([1.0, 2.0, 3.0, 4.0]);
/// ```
///
/// # Element Access
///
/// - The [`Index`] and [`IndexMut`] impls can be used just like on arrays.
/// - [`Vector::as_array`], [`Vector::as_slice`], and [`Vector::into_array`] give access to the
///   underlying elements.
/// - [`bytemuck::Zeroable`] and [`bytemuck::Pod`] are implemented to allow safe transmutation when
///   the element type `T` also allows this.
///
/// [`Index`]: std::ops::Index
/// [`IndexMut`]: std::ops::IndexMut
#[derive(Clone, Copy, Hash)]
#[repr(transparent)]
pub struct Vector<T, const N: usize>([T; N]);

unsafe impl<T: bytemuck::Zeroable, const N: usize> bytemuck::Zeroable for Vector<T, N> {}
unsafe impl<T: bytemuck::Pod, const N: usize> bytemuck::Pod for Vector<T, N> {}

impl<T: Zero, const N: usize> Vector<T, N> {
    /// A vector with each element initialized to 0.
    ///
    /// This uses [`T::ZERO`][Zero::ZERO] as the value for all elements.
    pub const ZERO: Self = Self([T::ZERO; N]);
}

impl<T: Zero + One> Vector<T, 2> {
    /// A unit vector pointing in the X direction.
    pub const X: Self = Self([T::ONE, T::ZERO]);
    /// A unit vector pointing in the Y direction.
    pub const Y: Self = Self([T::ZERO, T::ONE]);
}

impl<T: Zero + One> Vector<T, 3> {
    /// A unit vector pointing in the X direction.
    pub const X: Self = Self([T::ONE, T::ZERO, T::ZERO]);
    /// A unit vector pointing in the Y direction.
    pub const Y: Self = Self([T::ZERO, T::ONE, T::ZERO]);
    /// A unit vector pointing in the Z direction.
    pub const Z: Self = Self([T::ZERO, T::ZERO, T::ONE]);
}

impl<T, const N: usize> Vector<T, N> {
    /// Creates a vector with each element initialized to `elem`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cml::*;
    /// let v = Vector::splat(2);
    /// assert_eq!(v, vec3(2, 2, 2));
    /// ```
    #[inline]
    pub fn splat(elem: T) -> Self
    where
        T: Copy,
    {
        Self(array::from_fn(|_| elem))
    }

    /// Creates a vector where each element is initialized by invoking a closure with its index.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cml::*;
    /// let v = Vector::from_fn(|i| i as u32 + 100);
    /// assert_eq!(v, vec3(100, 101, 102));
    /// ```
    pub fn from_fn<F>(cb: F) -> Self
    where
        F: FnMut(usize) -> T,
    {
        Self(array::from_fn(cb))
    }

    /// Applies a closure to each element, returning a new vector.
    ///
    /// Unlike arithmetic operators, this evaluates the closure immediately.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cml::*;
    /// let v = vec3(1, 2, 3).map(|i| i * 10);
    /// assert_eq!(v, vec3(10, 20, 30));
    /// ```
    pub fn map<F, U>(self, f: F) -> Vector<U, N>
    where
        F: FnMut(T) -> U,
    {
        Vector(self.0.map(f))
    }

    /// Returns a reference to the underlying elements as an array of length `N`.
    #[inline]
    pub const fn as_array(&self) -> &[T; N] {
        &self.0
    }

    /// Returns a mutable reference to the underlying elements as an array of length `N`.
    #[inline]
    pub fn as_mut_array(&mut self) -> &mut [T; N] {
        &mut self.0
    }

    /// Returns a reference to the underlying elements as a slice.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cml::*;
    /// assert_eq!(vec3(1, 2, 3).as_slice(), &[1, 2, 3]);
    /// ```
    #[inline]
    pub const fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Returns a mutable reference to the underlying elements as a slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.0
    }

    /// Returns a pointer to the first element.
    #[inline]
    pub const fn as_ptr(&self) -> *const T {
        self.0.as_ptr()
    }

    /// Converts this [`Vector`] into an `N`-element array.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cml::*;
    /// assert_eq!(vec3(1, 2, 3).into_array(), [1, 2, 3]);
    /// ```
    #[inline]
    pub fn into_array(self) -> [T; N] {
        self.0
    }
}

impl<T: Scalar, const N: usize> Vector<T, N> {
    /// Creates a vector from the elements of an expression or of another vector.
    ///
    /// Elements are converted to `T` with `as` semantics.
    ///
    /// # Panics
    ///
    /// Panics if `src` has a run-time length different from `N`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cml::*;
    /// let a = vec3(1, 2, 3);
    /// let v = Vec3f::from_expr(&a * 2);
    /// assert_eq!(v, [2.0, 4.0, 6.0]);
    /// ```
    #[track_caller]
    pub fn from_expr<S>(src: S) -> Self
    where
        S: VectorOperand,
        Fixed<N>: SizePromote<<S::Expr as VectorExpr>::Size>,
        OpAssign: AssignFunctor<T, <S::Expr as VectorExpr>::Elem>,
    {
        let mut v = Self::ZERO;
        v.assign(src);
        v
    }

    /// Creates a vector from the elements of an expression, or reports a length mismatch.
    pub fn try_from_expr<S>(src: S) -> Result<Self, SizeError>
    where
        S: VectorOperand,
        Fixed<N>: SizePromote<<S::Expr as VectorExpr>::Size>,
        OpAssign: AssignFunctor<T, <S::Expr as VectorExpr>::Elem>,
    {
        let mut v = Self::ZERO;
        v.try_assign(src)?;
        Ok(v)
    }

    /// Returns the squared length of this [`Vector`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use cml::*;
    /// assert_eq!(vec2(4, 0).length2(), 16);
    /// ```
    pub fn length2(&self) -> T {
        self.0.iter().fold(T::ZERO, |acc, &x| acc + x * x)
    }

    /// Returns the length of this [`Vector`].
    pub fn length(&self) -> T
    where
        T: Sqrt,
    {
        self.length2().sqrt()
    }

    /// Divides this vector by its length, resulting in a unit vector.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cml::*;
    /// let z = vec3(0.0, 0.0, 4.0).normalize();
    /// assert_eq!(z, vec3(0.0, 0.0, 1.0));
    /// ```
    pub fn normalize(self) -> Self
    where
        T: Sqrt,
    {
        let len = self.length();
        self.map(|x| x / len)
    }
}

impl<T> Vector<T, 2> {
    /// Appends another value to the vector, yielding a vector with 3 dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cml::*;
    /// let v = vec2(-1.0, 2.0).extend(5.0);
    /// assert_eq!(v, vec3(-1.0, 2.0, 5.0));
    /// ```
    pub fn extend(self, value: T) -> Vector<T, 3> {
        let [x, y] = self.into_array();
        [x, y, value].into()
    }
}

impl<T> Vector<T, 3> {
    /// Removes the last element of this vector, yielding a vector with 2 elements.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cml::*;
    /// let v = vec3(-1.0, 2.0, 3.5).truncate();
    /// assert_eq!(v, vec2(-1.0, 2.0));
    /// ```
    pub fn truncate(self) -> Vector<T, 2> {
        let [x, y, ..] = self.into_array();
        [x, y].into()
    }

    /// Appends another value to the vector, yielding a vector with 4 dimensions.
    pub fn extend(self, value: T) -> Vector<T, 4> {
        let [x, y, z] = self.into_array();
        [x, y, z, value].into()
    }
}

impl<T> Vector<T, 4> {
    /// Removes the last element of this vector, yielding a vector with 3 elements.
    pub fn truncate(self) -> Vector<T, 3> {
        let [x, y, z, _] = self.into_array();
        [x, y, z].into()
    }
}

impl<T, const N: usize> Default for Vector<T, N>
where
    T: Default,
{
    #[inline]
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T, N> {
    #[inline]
    fn from(value: [T; N]) -> Self {
        Self(value)
    }
}

impl<T, const N: usize> From<Vector<T, N>> for [T; N] {
    #[inline]
    fn from(value: Vector<T, N>) -> Self {
        value.0
    }
}

/// Copies the elements of a slice into a new vector.
///
/// ```
/// # use cml::*;
/// let data = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(Vec3d::try_from(&data[..3]), Ok(vec3(1.0, 2.0, 3.0)));
/// assert_eq!(
///     Vec3d::try_from(&data[..]),
///     Err(SizeError::Length { expected: 3, actual: 4 }),
/// );
/// ```
impl<T: Copy, const N: usize> TryFrom<&[T]> for Vector<T, N> {
    type Error = SizeError;

    fn try_from(slice: &[T]) -> Result<Self, SizeError> {
        SizeError::check_length(N, slice.len())?;
        Ok(Self::from_fn(|i| slice[i]))
    }
}

impl<T, const N: usize> fmt::Debug for Vector<T, N>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_elements(&self.0, f, |elem, f| fmt::Debug::fmt(elem, f))
    }
}

impl<T, const N: usize> fmt::Display for Vector<T, N>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_elements(&self.0, f, |elem, f| fmt::Display::fmt(elem, f))
    }
}

/// Formats elements as a tuple: `(1, 2, 3)`.
pub(crate) fn fmt_elements<T>(
    elems: &[T],
    f: &mut fmt::Formatter<'_>,
    fmt_elem: fn(&T, &mut fmt::Formatter<'_>) -> fmt::Result,
) -> fmt::Result {
    struct Elem<'a, T>(&'a T, fn(&T, &mut fmt::Formatter<'_>) -> fmt::Result);
    impl<T> fmt::Debug for Elem<'_, T> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            (self.1)(self.0, f)
        }
    }

    let mut tup = f.debug_tuple("");
    for elem in elems {
        tup.field(&Elem(elem, fmt_elem));
    }
    tup.finish()
}

impl<T, const N: usize> AsRef<[T]> for Vector<T, N> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        &self.0
    }
}

impl<T, const N: usize> AsMut<[T]> for Vector<T, N> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        &mut self.0
    }
}

impl<T: Scalar, const N: usize> VectorExpr for Vector<T, N> {
    type Elem = T;
    type Size = Fixed<N>;
    const ASSIGNABLE: bool = true;

    #[inline]
    fn size(&self) -> usize {
        N
    }

    #[inline]
    fn get(&self, i: usize) -> T {
        self.0[i]
    }
}

impl<T: Scalar, const N: usize> VectorStorage for Vector<T, N> {
    #[inline]
    fn get_mut(&mut self, i: usize) -> &mut T {
        &mut self.0[i]
    }
}

impl<T: Scalar, const N: usize> OwnedVector<T> for Vector<T, N> {
    fn with_size(len: usize) -> Self {
        debug_assert_eq!(len, N);
        Self::ZERO
    }
}

impl<T: Scalar, const N: usize> Operand for Vector<T, N> {
    type Kind = VectorKind;
    type Expr = Self;

    #[inline]
    fn into_expr(self) -> Self {
        self
    }
}

impl<'a, T: Scalar, const N: usize> Operand for &'a Vector<T, N> {
    type Kind = VectorKind;
    type Expr = Self;

    #[inline]
    fn into_expr(self) -> Self {
        self
    }
}

impl<S: Scalar, const N: usize> Operand for [S; N] {
    type Kind = VectorKind;
    type Expr = Self;

    #[inline]
    fn into_expr(self) -> Self {
        self
    }
}

impl<'a, S: Scalar, const N: usize> Operand for &'a [S; N] {
    type Kind = VectorKind;
    type Expr = Self;

    #[inline]
    fn into_expr(self) -> Self {
        self
    }
}

impl<'a, S: Scalar> Operand for &'a [S] {
    type Kind = VectorKind;
    type Expr = Self;

    #[inline]
    fn into_expr(self) -> Self {
        self
    }
}

/// Constructs a [`Vec2`] from its two elements.
#[inline]
pub const fn vec2<T>(x: T, y: T) -> Vec2<T> {
    Vector([x, y])
}

/// Constructs a [`Vec3`] from its three elements.
#[inline]
pub const fn vec3<T>(x: T, y: T, z: T) -> Vec3<T> {
    Vector([x, y, z])
}

/// Constructs a [`Vec4`] from its four elements.
#[inline]
pub const fn vec4<T>(x: T, y: T, z: T, w: T) -> Vec4<T> {
    Vector([x, y, z, w])
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn fmt() {
        assert_eq!(format!("{}", vec4(0.0, 0.0, 0.0, 1.0)), "(0, 0, 0, 1)");
        assert_eq!(format!("{:?}", vec4(0.0, 0.0, 0.0, 1.0)), "(0.0, 0.0, 0.0, 1.0)");
    }

    #[test]
    fn assign_copies_elements() {
        let mut v = Vec3::<i32>::ZERO;
        v.assign([1, 2, 3]);
        assert_eq!(v, [1, 2, 3]);

        let mut w = Vec3d::ZERO;
        w.assign(&v);
        assert_eq!(w, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn assign_from_list_of_wrong_length() {
        let mut v = Vec3f::splat(7.0);
        let list: &[f64] = &[1.0, 2.0, 3.0, 4.0];
        assert_eq!(
            v.try_assign(list),
            Err(SizeError::Vector { left: 3, right: 4 })
        );
        assert_eq!(v, [7.0; 3]);
    }

    #[test]
    #[should_panic(expected = "incompatible vector sizes: 3 and 2")]
    fn assign_panics_on_mismatch() {
        let mut v = Vec3f::ZERO;
        let list: &[f32] = &[1.0, 2.0];
        v.assign(list);
    }

    #[test]
    fn aliasing_assignment() {
        let mut a = vec3(1, 2, 3);
        a.assign(a + a);
        assert_eq!(a, [2, 4, 6]);

        a.assign(a * 2 - a);
        assert_eq!(a, [2, 4, 6]);
    }

    #[test]
    fn length_and_normalize() {
        let v = vec3(3.0f32, 0.0, 4.0);
        assert_eq!(v.length2(), 25.0);
        assert_eq!(v.length(), 5.0);

        let n = v.normalize();
        assert_relative_eq!(n[0], 0.6);
        assert_relative_eq!(n[2], 0.8);
        assert_relative_eq!(n.length(), 1.0);
    }

    #[test]
    fn utilities() {
        let mut v = vec4(1, -2, 3, -4);
        v.maximize(&[0; 4]);
        assert_eq!(v, [1, 0, 3, 0]);
        v.minimize(vec4(2, 2, 2, 2));
        assert_eq!(v, [1, 0, 2, 0]);

        v.random(10, 20);
        assert!(v.as_slice().iter().all(|x| (10..20).contains(x)));

        v.zero();
        assert_eq!(v, [0; 4]);
    }

    #[test]
    fn from_slice_copies() {
        let src = [1.5f32, 2.5, 3.5];
        let v = Vec3f::try_from(&src[..]).unwrap();
        assert_ne!(v.as_ptr(), src.as_ptr());
        assert_eq!(v, src);

        let mut w = Vec3f::ZERO;
        w.assign(&src[..]);
        assert_ne!(w.as_ptr(), src.as_ptr());
        assert_eq!(w, src);
    }

    #[test]
    fn self_assignment() {
        let mut v = vec4(1, -2, 3, -4);
        v.assign(v);
        assert_eq!(v, [1, -2, 3, -4]);
    }

    #[test]
    fn data_pointer_is_stable() {
        let mut v = vec3(1.0, 2.0, 3.0);
        let ptr = v.as_ptr();
        v.assign([4.0, 5.0, 6.0]);
        assert_eq!(v.as_ptr(), ptr);
        assert_eq!(v.as_slice().as_ptr(), ptr);
    }
}
