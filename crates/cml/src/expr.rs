//! Expression traits.
//!
//! Containers and expression nodes implement the same traits: [`VectorExpr`], [`MatrixExpr`] or
//! [`QuatExpr`]. A node reads elements from its operands on demand, so `&a + &b * 2.0` computes
//! nothing until it is assigned to a container or [`eval`][crate::VectorXpr::eval]uated.
//!
//! Containers additionally implement a storage trait ([`VectorStorage`], [`MatrixStorage`]),
//! which gives the assignment engine write access.

use std::fmt;

use crate::{
    assign::{assign_matrix, assign_vector},
    error::{unwrap_size, SizeError},
    functor::{AssignFunctor, OpAssign, OpMaxAssign, OpMinAssign},
    operand::{MatrixOperand, VectorOperand},
    promote::{MatrixShape, SizePromote},
    quat::QuatOrder,
    size::{Dynamic, Fixed, Size},
    One, Scalar, Zero,
};

/// An expression that produces a sequence of elements.
pub trait VectorExpr {
    /// The element type.
    type Elem: Scalar;

    /// Whether the length is fixed at compile time ([`Fixed<N>`]) or a run-time value
    /// ([`Dynamic`]).
    type Size: Size;

    /// Whether this is a container that can be written to (as opposed to a computed node).
    const ASSIGNABLE: bool = false;

    /// Whether this is a container that can change its length.
    const RESIZABLE: bool = false;

    /// Returns the number of elements.
    fn size(&self) -> usize;

    /// Computes the element at index `i`.
    ///
    /// # Panics
    ///
    /// May panic if `i` is out of bounds.
    fn get(&self, i: usize) -> Self::Elem;
}

impl<E: VectorExpr + ?Sized> VectorExpr for &E {
    type Elem = E::Elem;
    type Size = E::Size;
    const ASSIGNABLE: bool = E::ASSIGNABLE;
    const RESIZABLE: bool = E::RESIZABLE;

    #[inline]
    fn size(&self) -> usize {
        (**self).size()
    }

    #[inline]
    fn get(&self, i: usize) -> Self::Elem {
        (**self).get(i)
    }
}

impl<S: Scalar, const N: usize> VectorExpr for [S; N] {
    type Elem = S;
    type Size = Fixed<N>;

    #[inline]
    fn size(&self) -> usize {
        N
    }

    #[inline]
    fn get(&self, i: usize) -> S {
        self[i]
    }
}

impl<S: Scalar> VectorExpr for [S] {
    type Elem = S;
    type Size = Dynamic;

    #[inline]
    fn size(&self) -> usize {
        self.len()
    }

    #[inline]
    fn get(&self, i: usize) -> S {
        self[i]
    }
}

/// Vector containers that can be written to.
///
/// Implemented by [`Vector`][crate::Vector], [`DynVector`][crate::DynVector] and the external
/// vectors.
pub trait VectorStorage: VectorExpr {
    /// Returns a mutable reference to the element at index `i`.
    fn get_mut(&mut self, i: usize) -> &mut Self::Elem;

    /// Hook used by the `auto-resize` feature. Only resizable containers resize.
    #[doc(hidden)]
    fn resize_for_assign(&mut self, len: usize) -> bool {
        let _ = len;
        false
    }

    /// Assigns the elements of `src` to `self`, converting them to the element type of `self`.
    ///
    /// # Panics
    ///
    /// Panics if the length of `src` differs from the length of `self`. Use
    /// [`VectorStorage::try_assign`] to handle that case.
    ///
    /// # Example
    ///
    /// ```
    /// # use cml::*;
    /// let a = vec3(1.0, 2.0, 3.0);
    /// let mut v = Vec3d::ZERO;
    /// v.assign(&a * 2.0);
    /// assert_eq!(v, [2.0, 4.0, 6.0]);
    /// ```
    #[track_caller]
    fn assign<S>(&mut self, src: S)
    where
        Self: Sized,
        S: VectorOperand,
        Self::Size: SizePromote<<S::Expr as VectorExpr>::Size>,
        OpAssign: AssignFunctor<Self::Elem, <S::Expr as VectorExpr>::Elem>,
    {
        unwrap_size(self.try_assign(src))
    }

    /// Assigns the elements of `src` to `self`, or reports a size mismatch without writing.
    ///
    /// ```
    /// # use cml::*;
    /// let mut v = Vec3d::ZERO;
    /// let err = v.try_assign(&[1.0, 2.0, 3.0, 4.0][..]).unwrap_err();
    /// assert_eq!(err, SizeError::Vector { left: 3, right: 4 });
    /// assert_eq!(v, [0.0; 3]);
    /// ```
    fn try_assign<S>(&mut self, src: S) -> Result<(), SizeError>
    where
        Self: Sized,
        S: VectorOperand,
        Self::Size: SizePromote<<S::Expr as VectorExpr>::Size>,
        OpAssign: AssignFunctor<Self::Elem, <S::Expr as VectorExpr>::Elem>,
    {
        self.try_assign_with::<OpAssign, S>(src)
    }

    /// Combines each element of `self` with the matching element of `src`, using the assignment
    /// functor `Op`.
    fn try_assign_with<Op, S>(&mut self, src: S) -> Result<(), SizeError>
    where
        Self: Sized,
        S: VectorOperand,
        Self::Size: SizePromote<<S::Expr as VectorExpr>::Size>,
        Op: AssignFunctor<Self::Elem, <S::Expr as VectorExpr>::Elem>,
    {
        assign_vector::<Op, Self, S::Expr>(self, &src.into_vector_expr())
    }

    /// Sets every element to zero.
    fn zero(&mut self) {
        for i in 0..self.size() {
            *self.get_mut(i) = <Self::Elem as Zero>::ZERO;
        }
    }

    /// Fills `self` with uniformly distributed values in `low..high`.
    ///
    /// # Panics
    ///
    /// Integer element types panic if the range is empty.
    fn random(&mut self, low: Self::Elem, high: Self::Elem) {
        for i in 0..self.size() {
            *self.get_mut(i) = Scalar::random(low, high);
        }
    }

    /// Replaces each element with the minimum of itself and the matching element of `other`.
    ///
    /// The comparison happens in the promoted element type.
    ///
    /// ```
    /// # use cml::*;
    /// let mut v = vec3(1, 5, 3);
    /// v.minimize(&[2.5, 2.5, 2.5]);
    /// assert_eq!(v, [1, 2, 2]);
    /// ```
    #[track_caller]
    fn minimize<S>(&mut self, other: S)
    where
        Self: Sized,
        S: VectorOperand,
        Self::Size: SizePromote<<S::Expr as VectorExpr>::Size>,
        OpMinAssign: AssignFunctor<Self::Elem, <S::Expr as VectorExpr>::Elem>,
    {
        unwrap_size(self.try_assign_with::<OpMinAssign, S>(other))
    }

    /// Replaces each element with the maximum of itself and the matching element of `other`.
    #[track_caller]
    fn maximize<S>(&mut self, other: S)
    where
        Self: Sized,
        S: VectorOperand,
        Self::Size: SizePromote<<S::Expr as VectorExpr>::Size>,
        OpMaxAssign: AssignFunctor<Self::Elem, <S::Expr as VectorExpr>::Elem>,
    {
        unwrap_size(self.try_assign_with::<OpMaxAssign, S>(other))
    }
}

/// Vector containers that own their elements and can be created by the library.
///
/// Evaluating an expression produces the owned vector selected by its [`Size`].
pub trait OwnedVector<T: Scalar>: VectorStorage<Elem = T> + Clone + fmt::Debug {
    /// Creates a zeroed vector of length `len`.
    ///
    /// Fixed-size vectors ignore `len`.
    fn with_size(len: usize) -> Self;
}

/// The owned vector type an expression evaluates to.
pub type VectorResult<E> = <<E as VectorExpr>::Size as Size>::Storage<<E as VectorExpr>::Elem>;

/// How a matrix is read as a set of basis vectors.
///
/// ```
/// # use cml::*;
/// let m = Matrix::from_rows([[1, 2], [3, 4]]);
/// // With column basis vectors, the second basis vector is the second column.
/// assert_eq!(m.basis_element(Basis::Col, 1, 0), 2);
/// assert_eq!(m.basis_element(Basis::Row, 1, 0), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Basis {
    /// Basis vector `i` is column `i`.
    #[default]
    Col,
    /// Basis vector `i` is row `i`.
    Row,
}

impl Basis {
    /// Returns the `(row, col)` position of element `j` of basis vector `i`.
    #[inline]
    pub fn position(self, i: usize, j: usize) -> (usize, usize) {
        match self {
            Basis::Col => (j, i),
            Basis::Row => (i, j),
        }
    }
}

/// An expression that produces a 2-dimensional grid of elements.
pub trait MatrixExpr {
    type Elem: Scalar;
    type Rows: Size;
    type Cols: Size;

    const ASSIGNABLE: bool = false;
    const RESIZABLE: bool = false;

    /// Returns the number of rows.
    fn rows(&self) -> usize;

    /// Returns the number of columns.
    fn cols(&self) -> usize;

    /// Computes the element at `row` and `col`.
    fn get(&self, row: usize, col: usize) -> Self::Elem;

    /// Computes element `j` of basis vector `i`.
    fn basis_element(&self, basis: Basis, i: usize, j: usize) -> Self::Elem {
        let (row, col) = basis.position(i, j);
        self.get(row, col)
    }
}

impl<E: MatrixExpr + ?Sized> MatrixExpr for &E {
    type Elem = E::Elem;
    type Rows = E::Rows;
    type Cols = E::Cols;
    const ASSIGNABLE: bool = E::ASSIGNABLE;
    const RESIZABLE: bool = E::RESIZABLE;

    #[inline]
    fn rows(&self) -> usize {
        (**self).rows()
    }

    #[inline]
    fn cols(&self) -> usize {
        (**self).cols()
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> Self::Elem {
        (**self).get(row, col)
    }
}

/// Matrix containers that can be written to.
pub trait MatrixStorage: MatrixExpr {
    /// Returns a mutable reference to the element at `row` and `col`.
    fn get_mut(&mut self, row: usize, col: usize) -> &mut Self::Elem;

    #[doc(hidden)]
    fn resize_for_assign(&mut self, rows: usize, cols: usize) -> bool {
        let _ = (rows, cols);
        false
    }

    /// Assigns the elements of `src` to `self`.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions of `src` differ from those of `self`.
    #[track_caller]
    fn assign<S>(&mut self, src: S)
    where
        Self: Sized,
        S: MatrixOperand,
        Self::Rows: SizePromote<<S::Expr as MatrixExpr>::Rows>,
        Self::Cols: SizePromote<<S::Expr as MatrixExpr>::Cols>,
        OpAssign: AssignFunctor<Self::Elem, <S::Expr as MatrixExpr>::Elem>,
    {
        unwrap_size(self.try_assign(src))
    }

    /// Assigns the elements of `src` to `self`, or reports a size mismatch without writing.
    fn try_assign<S>(&mut self, src: S) -> Result<(), SizeError>
    where
        Self: Sized,
        S: MatrixOperand,
        Self::Rows: SizePromote<<S::Expr as MatrixExpr>::Rows>,
        Self::Cols: SizePromote<<S::Expr as MatrixExpr>::Cols>,
        OpAssign: AssignFunctor<Self::Elem, <S::Expr as MatrixExpr>::Elem>,
    {
        self.try_assign_with::<OpAssign, S>(src)
    }

    /// Combines each element of `self` with the matching element of `src`, using `Op`.
    fn try_assign_with<Op, S>(&mut self, src: S) -> Result<(), SizeError>
    where
        Self: Sized,
        S: MatrixOperand,
        Self::Rows: SizePromote<<S::Expr as MatrixExpr>::Rows>,
        Self::Cols: SizePromote<<S::Expr as MatrixExpr>::Cols>,
        Op: AssignFunctor<Self::Elem, <S::Expr as MatrixExpr>::Elem>,
    {
        assign_matrix::<Op, Self, S::Expr>(self, &src.into_matrix_expr())
    }

    /// Sets every element to zero.
    fn zero(&mut self) {
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                *self.get_mut(i, j) = <Self::Elem as Zero>::ZERO;
            }
        }
    }

    /// Turns `self` into an identity matrix: ones on the main diagonal, zeros everywhere else.
    ///
    /// Non-square matrices get ones on the diagonal of their largest square sub-matrix.
    fn identity(&mut self) {
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                *self.get_mut(i, j) = if i == j {
                    <Self::Elem as One>::ONE
                } else {
                    <Self::Elem as Zero>::ZERO
                };
            }
        }
    }

    /// Fills `self` with uniformly distributed values in `low..high`.
    fn random(&mut self, low: Self::Elem, high: Self::Elem) {
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                *self.get_mut(i, j) = Scalar::random(low, high);
            }
        }
    }

    /// Sets element `j` of basis vector `i` to `value`.
    ///
    /// ```
    /// # use cml::*;
    /// let mut m = DynMatrix::<f64>::zeros(3, 4);
    /// m.set_basis_element(Basis::Col, 3, 1, 2.0);
    /// m.set_basis_element(Basis::Row, 2, 0, 1.0);
    /// assert_eq!((m[(1, 3)], m[(2, 0)]), (2.0, 1.0));
    /// ```
    #[track_caller]
    fn set_basis_element(&mut self, basis: Basis, i: usize, j: usize, value: Self::Elem) {
        let (row, col) = basis.position(i, j);
        *self.get_mut(row, col) = value;
    }

    /// Overwrites row `row` with the elements of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds or if the length of `src` differs from the number of
    /// columns.
    #[track_caller]
    fn set_row<S>(&mut self, row: usize, src: S)
    where
        Self: Sized,
        S: VectorOperand,
        Self::Cols: SizePromote<<S::Expr as VectorExpr>::Size>,
        OpAssign: AssignFunctor<Self::Elem, <S::Expr as VectorExpr>::Elem>,
    {
        assert!(
            row < self.rows(),
            "row index {row} out of bounds for matrix with {} rows",
            self.rows()
        );
        let src = src.into_vector_expr();
        unwrap_size(SizeError::check_vectors(self.cols(), src.size()));
        for j in 0..self.cols() {
            <OpAssign as AssignFunctor<_, _>>::apply(self.get_mut(row, j), src.get(j));
        }
    }

    /// Overwrites column `col` with the elements of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `col` is out of bounds or if the length of `src` differs from the number of
    /// rows.
    #[track_caller]
    fn set_col<S>(&mut self, col: usize, src: S)
    where
        Self: Sized,
        S: VectorOperand,
        Self::Rows: SizePromote<<S::Expr as VectorExpr>::Size>,
        OpAssign: AssignFunctor<Self::Elem, <S::Expr as VectorExpr>::Elem>,
    {
        assert!(
            col < self.cols(),
            "column index {col} out of bounds for matrix with {} columns",
            self.cols()
        );
        let src = src.into_vector_expr();
        unwrap_size(SizeError::check_vectors(self.rows(), src.size()));
        for i in 0..self.rows() {
            <OpAssign as AssignFunctor<_, _>>::apply(self.get_mut(i, col), src.get(i));
        }
    }
}

/// Matrix containers that own their elements.
pub trait OwnedMatrix<T: Scalar>: MatrixStorage<Elem = T> + Clone + fmt::Debug {
    /// Creates a zeroed matrix with `rows` rows and `cols` columns.
    ///
    /// Fixed-size matrices ignore the arguments.
    fn with_size(rows: usize, cols: usize) -> Self;
}

/// The owned matrix type an expression evaluates to.
pub type MatrixResult<E> = <<E as MatrixExpr>::Rows as MatrixShape<<E as MatrixExpr>::Cols>>::Storage<
    <E as MatrixExpr>::Elem,
>;

/// An expression that produces the 4 components of a quaternion.
///
/// Components are addressed by storage index; the [`Order`][QuatExpr::Order] determines which
/// index holds the real part.
pub trait QuatExpr {
    type Elem: Scalar;
    type Order: QuatOrder;

    const ASSIGNABLE: bool = false;

    /// Computes the component at storage index `i` (`0..4`).
    fn get(&self, i: usize) -> Self::Elem;
}

impl<E: QuatExpr + ?Sized> QuatExpr for &E {
    type Elem = E::Elem;
    type Order = E::Order;
    const ASSIGNABLE: bool = E::ASSIGNABLE;

    #[inline]
    fn get(&self, i: usize) -> Self::Elem {
        (**self).get(i)
    }
}
