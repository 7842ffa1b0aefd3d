use std::{fmt, marker::PhantomData};

use crate::{
    assign::assign_quat,
    expr::QuatExpr,
    functor::{AssignFunctor, OpAssign},
    operand::{Operand, QuatKind, QuatOperand},
    One, Scalar, Sqrt, Vector, Zero,
};

mod nodes;
mod ops;
mod order;

pub use nodes::*;
pub use order::{QuatOrder, ScalarFirst, ScalarLast};

/// A quaternion consisting of 3 imaginary numbers and a real number.
///
/// Unit-length quaternions ("*versors*") are commonly used to represent rotations in 3D space.
///
/// The `O` parameter selects where the real part `w` is stored relative to the imaginary parts
/// `x`, `y` and `z` (see [`ScalarFirst`] and [`ScalarLast`]). It only affects the memory layout:
/// accessors, constructors and products behave the same for both orders. Quaternions with
/// different orders cannot be combined with each other.
///
/// # Examples
///
/// ```
/// # use cml::*;
/// let i = Quat::<f32>::from_wxyz(0.0, 1.0, 0.0, 0.0);
/// let j = Quat::<f32>::from_wxyz(0.0, 0.0, 1.0, 0.0);
///
/// // i * j = k
/// let k = (&i * &j).eval();
/// assert_eq!(k, Quat::<f32>::from_wxyz(0.0, 0.0, 0.0, 1.0));
/// assert_eq!(k.as_array(), &[0.0, 0.0, 1.0, 0.0]);
///
/// let k = Quat::<f32, ScalarFirst>::from_wxyz(0.0, 0.0, 0.0, 1.0);
/// assert_eq!(k.as_array(), &[0.0, 0.0, 0.0, 1.0]);
/// ```
///
/// Mixing storage orders does not compile:
///
/// ```compile_fail
/// # use cml::*;
/// let a = Quat::<f32, ScalarFirst>::identity();
/// let b = Quat::<f32, ScalarLast>::identity();
/// let _ = &a + &b;
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quat<T, O: QuatOrder = ScalarLast> {
    data: [T; 4],
    order: PhantomData<O>,
}

impl<T: Zero, O: QuatOrder> Quat<T, O> {
    /// A quaternion with all components set to zero.
    pub const ZERO: Self = Self {
        data: [T::ZERO, T::ZERO, T::ZERO, T::ZERO],
        order: PhantomData,
    };
}

impl<T: Zero + One, O: QuatOrder> Quat<T, O> {
    /// The multiplicative identity.
    ///
    /// This is a unit quaternion that will not change a vector it is multiplied with.
    pub const IDENTITY: Self = Self {
        data: [
            if O::W == 0 { T::ONE } else { T::ZERO },
            if O::W == 1 { T::ONE } else { T::ZERO },
            if O::W == 2 { T::ONE } else { T::ZERO },
            if O::W == 3 { T::ONE } else { T::ZERO },
        ],
        order: PhantomData,
    };
}

impl<T, O: QuatOrder> Quat<T, O> {
    /// Creates a quaternion from its components, in storage order.
    #[inline]
    pub const fn from_array(data: [T; 4]) -> Self {
        Self {
            data,
            order: PhantomData,
        }
    }

    /// Returns the components in storage order.
    #[inline]
    pub const fn as_array(&self) -> &[T; 4] {
        &self.data
    }

    #[inline]
    pub fn into_array(self) -> [T; 4] {
        self.data
    }

    /// Returns a pointer to the first component.
    #[inline]
    pub const fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    /// Returns a mutable reference to the real part.
    #[inline]
    pub fn w_mut(&mut self) -> &mut T {
        &mut self.data[O::W]
    }

    #[inline]
    pub fn x_mut(&mut self) -> &mut T {
        &mut self.data[O::X]
    }

    #[inline]
    pub fn y_mut(&mut self) -> &mut T {
        &mut self.data[O::Y]
    }

    #[inline]
    pub fn z_mut(&mut self) -> &mut T {
        &mut self.data[O::Z]
    }
}

impl<T: Copy, O: QuatOrder> Quat<T, O> {
    /// Creates a quaternion from its real part `w` and its imaginary parts `x`, `y` and `z`.
    pub fn from_wxyz(w: T, x: T, y: T, z: T) -> Self {
        let mut data = [w; 4];
        data[O::X] = x;
        data[O::Y] = y;
        data[O::Z] = z;
        Self::from_array(data)
    }

    /// Combines a real part and a 3-dimensional imaginary part.
    ///
    /// ```
    /// # use cml::*;
    /// let q = Quat::<i32>::from_parts(4, vec3(1, 2, 3));
    /// assert_eq!(q.as_array(), &[1, 2, 3, 4]);
    /// assert_eq!(q.imaginary(), [1, 2, 3]);
    /// ```
    pub fn from_parts(real: T, imaginary: impl Into<Vector<T, 3>>) -> Self {
        let [x, y, z] = imaginary.into().into_array();
        Self::from_wxyz(real, x, y, z)
    }

    /// Replaces the real part and the imaginary parts, keeping the storage order.
    ///
    /// ```
    /// # use cml::*;
    /// let mut q = Quat::<i32, ScalarFirst>::IDENTITY;
    /// q.set_parts(5, [6, 7, 8]);
    /// assert_eq!(q.as_array(), &[5, 6, 7, 8]);
    /// ```
    pub fn set_parts(&mut self, real: T, imaginary: impl Into<Vector<T, 3>>) {
        *self = Self::from_parts(real, imaginary);
    }

    /// Returns the real part.
    #[inline]
    pub fn w(&self) -> T {
        self.data[O::W]
    }

    #[inline]
    pub fn x(&self) -> T {
        self.data[O::X]
    }

    #[inline]
    pub fn y(&self) -> T {
        self.data[O::Y]
    }

    #[inline]
    pub fn z(&self) -> T {
        self.data[O::Z]
    }

    /// Returns the real part. Alias of [`Quat::w`].
    #[inline]
    pub fn real(&self) -> T {
        self.w()
    }

    /// Returns the imaginary parts `x`, `y` and `z` as a vector.
    #[inline]
    pub fn imaginary(&self) -> Vector<T, 3> {
        [self.x(), self.y(), self.z()].into()
    }
}

impl<T: Scalar, O: QuatOrder> Quat<T, O> {
    /// Returns the identity quaternion.
    ///
    /// Same as [`Quat::IDENTITY`].
    #[inline]
    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Creates a quaternion from a quaternion expression with the same storage order.
    ///
    /// Components are converted to `T` with `as` semantics.
    pub fn from_expr<S>(src: S) -> Self
    where
        S: QuatOperand,
        S::Expr: QuatExpr<Order = O>,
        OpAssign: AssignFunctor<T, <S::Expr as QuatExpr>::Elem>,
    {
        let mut q = Self::ZERO;
        q.assign(src);
        q
    }

    /// Assigns the components of a quaternion expression.
    ///
    /// Quaternions always have 4 components, so unlike vectors and matrices this cannot fail.
    ///
    /// ```
    /// # use cml::*;
    /// let a = Quat::<f64>::from_wxyz(1.0, 2.0, 3.0, 4.0);
    /// let mut q = Quat::<f64>::ZERO;
    /// q.assign(&a * 2.0 - &a);
    /// assert_eq!(q, a);
    /// ```
    pub fn assign<S>(&mut self, src: S)
    where
        S: QuatOperand,
        S::Expr: QuatExpr<Order = O>,
        OpAssign: AssignFunctor<T, <S::Expr as QuatExpr>::Elem>,
    {
        let src = src.into_quat_expr();
        assign_quat::<OpAssign, _, _, _>(self, &src);
    }

    /// Sets every component to zero.
    pub fn zero(&mut self) {
        self.data = [T::ZERO; 4];
    }

    /// Sets every component to a random value in `low..high`.
    pub fn random(&mut self, low: T, high: T) {
        for c in &mut self.data {
            *c = T::random(low, high);
        }
    }

    /// Returns the conjugate, which negates the imaginary parts.
    ///
    /// Unlike the [`conjugate`] function, this evaluates immediately.
    pub fn conjugate(self) -> Self
    where
        T: std::ops::Neg<Output = T>,
    {
        let mut data = self.data.map(|c| -c);
        data[O::W] = self.data[O::W];
        Self::from_array(data)
    }

    /// Returns the squared length of this quaternion.
    ///
    /// If the squared length is not equal to one, multiplying a vector with this quaternion will
    /// scale the vector in addition to rotating it. When using quaternions to model rotations, it
    /// is advisable to ensure that quaternions are always of length one.
    pub fn length2(&self) -> T {
        self.data.iter().fold(T::ZERO, |acc, &c| acc + c * c)
    }

    /// Returns the length of this quaternion.
    #[doc(alias = "norm", alias = "magnitude")]
    pub fn length(&self) -> T
    where
        T: Sqrt,
    {
        self.length2().sqrt()
    }

    /// Returns a normalized copy of this quaternion (whose length equals one).
    pub fn normalize(self) -> Self
    where
        T: Sqrt,
    {
        let len = self.length();
        Self::from_array(self.data.map(|c| c / len))
    }
}

impl<T: Default, O: QuatOrder> Default for Quat<T, O> {
    fn default() -> Self {
        Self::from_array(Default::default())
    }
}

impl<T: fmt::Debug, O: QuatOrder> fmt::Debug for Quat<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quat")
            .field("w", &self.data[O::W])
            .field("x", &self.data[O::X])
            .field("y", &self.data[O::Y])
            .field("z", &self.data[O::Z])
            .finish()
    }
}

impl<T: Scalar, O: QuatOrder> QuatExpr for Quat<T, O> {
    type Elem = T;
    type Order = O;
    const ASSIGNABLE: bool = true;

    #[inline]
    fn get(&self, i: usize) -> T {
        self.data[i]
    }
}

impl<T: Scalar, O: QuatOrder> Operand for Quat<T, O> {
    type Kind = QuatKind;
    type Expr = Self;

    #[inline]
    fn into_expr(self) -> Self {
        self
    }
}

impl<'a, T: Scalar, O: QuatOrder> Operand for &'a Quat<T, O> {
    type Kind = QuatKind;
    type Expr = Self;

    #[inline]
    fn into_expr(self) -> Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::*;

    #[test]
    fn component_order() {
        let last = Quat::<i32>::from_wxyz(1, 2, 3, 4);
        assert_eq!(last.as_array(), &[2, 3, 4, 1]);
        assert_eq!((last.w(), last.x(), last.y(), last.z()), (1, 2, 3, 4));

        let first = Quat::<i32, ScalarFirst>::from_wxyz(1, 2, 3, 4);
        assert_eq!(first.as_array(), &[1, 2, 3, 4]);
        assert_eq!(first.real(), 1);
        assert_eq!(first.imaginary(), [2, 3, 4]);

        assert_eq!(format!("{last:?}"), format!("{first:?}"));
        assert_eq!(format!("{first:?}"), "Quat { w: 1, x: 2, y: 3, z: 4 }");
    }

    #[test]
    fn constants() {
        assert_eq!(Quat::<f32>::IDENTITY.as_array(), &[0.0, 0.0, 0.0, 1.0]);
        assert_eq!(
            Quat::<f32, ScalarFirst>::IDENTITY.as_array(),
            &[1.0, 0.0, 0.0, 0.0]
        );
        assert_eq!(Quat::<u8>::ZERO.as_array(), &[0; 4]);
        assert_eq!(Quat::<i32>::default(), Quat::ZERO);
    }

    #[test]
    fn length() {
        let q = Quat::<f64>::from_wxyz(2.0, 0.0, 0.0, 0.0);
        assert_eq!(q.length2(), 4.0);
        assert_eq!(q.length(), 2.0);
        assert_eq!(q.normalize(), Quat::IDENTITY);

        let n = Quat::<f32>::from_wxyz(1.0, -2.0, 3.0, 0.5).normalize();
        assert_relative_eq!(n.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(n.x() / n.w(), -2.0, epsilon = 1e-6);
    }

    #[test]
    fn utilities() {
        let mut q = Quat::<i32, ScalarFirst>::from_wxyz(1, 2, 3, 4);
        assert_eq!(q.conjugate(), Quat::from_wxyz(1, -2, -3, -4));

        q.random(-3, 4);
        assert!(q.as_array().iter().all(|c| (-3..=3).contains(c)));
        q.zero();
        assert_eq!(q, Quat::ZERO);
    }

    #[test]
    fn component_setters() {
        let mut last = Quat::<i32>::ZERO;
        *last.w_mut() = 1;
        *last.x_mut() = 2;
        *last.y_mut() = 3;
        *last.z_mut() = 4;
        assert_eq!(last.as_array(), &[2, 3, 4, 1]);

        let mut first = Quat::<i32, ScalarFirst>::ZERO;
        *first.w_mut() = 1;
        *first.x_mut() = 2;
        *first.y_mut() = 3;
        *first.z_mut() = 4;
        assert_eq!(first.as_array(), &[1, 2, 3, 4]);

        last.set_parts(-1, vec3(-2, -3, -4));
        assert_eq!(last.as_array(), &[-2, -3, -4, -1]);
        first.set_parts(-1, [-2, -3, -4]);
        assert_eq!(first.as_array(), &[-1, -2, -3, -4]);
        assert_eq!((first.real(), first.imaginary()), (last.real(), last.imaginary()));
    }

    #[test]
    fn self_assignment() {
        let mut q = Quat::<f64>::from_wxyz(1.0, 2.0, 3.0, 4.0);
        let before = q;
        q.assign(q);
        assert_eq!(q, before);
    }

    #[test]
    fn from_expr_converts() {
        let a = Quat::<i32>::from_wxyz(1, 2, 3, 4);
        let q = Quat::<f32>::from_expr(&a / 2);
        // Integer division happens before the conversion.
        assert_eq!(q, Quat::from_wxyz(0.0, 1.0, 1.0, 2.0));
    }
}
