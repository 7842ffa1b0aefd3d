//! Vector expression nodes.

use std::marker::PhantomData;

use crate::{
    assign::assign_vector,
    error::{unwrap_size, SizeError},
    expr::{OwnedVector, VectorExpr, VectorResult},
    functor::{BinaryFunctor, OpAssign, OpDot, UnaryFunctor},
    operand::{Operand, VectorKind, VectorOperand},
    promote::{Promote, Promoted, SizePromote},
    size::{Fixed, Length3, Shrink},
    Scalar, Zero,
};

/// A vector expression returned by an arithmetic operator or a vector function.
///
/// Evaluation is deferred until the expression is assigned to a container or [`eval`]uated.
/// Combining it with another operand nests the wrapped node directly in the new node.
///
/// [`eval`]: VectorXpr::eval
#[derive(Debug, Clone, Copy)]
pub struct VectorXpr<E>(E);

impl<E> VectorXpr<E> {
    #[inline]
    pub(crate) fn new(expr: E) -> Self {
        Self(expr)
    }

    /// Returns the wrapped expression node.
    #[inline]
    pub fn into_inner(self) -> E {
        self.0
    }
}

impl<E: VectorExpr> VectorXpr<E> {
    /// Computes every element and stores the result in a new container.
    ///
    /// The result is a [`Vector`][crate::Vector] if the size of the expression is known at
    /// compile time, and a [`DynVector`][crate::DynVector] otherwise.
    ///
    /// ```
    /// # use cml::*;
    /// let a = vec2(1, 2);
    /// let b = DynVector::from_vec(vec![0.5, 0.5]);
    ///
    /// let fixed: Vec2d = (&a + &b).eval();
    /// let dynamic: DynVector<f64> = (&b * 2i32).eval();
    /// assert_eq!(fixed, [1.5, 2.5]);
    /// assert_eq!(dynamic, [1.0, 1.0]);
    /// ```
    pub fn eval(&self) -> VectorResult<E> {
        let mut out = <VectorResult<E> as OwnedVector<E::Elem>>::with_size(self.0.size());
        unwrap_size(assign_vector::<OpAssign, _, _>(&mut out, &self.0));
        out
    }
}

impl<E: VectorExpr> VectorExpr for VectorXpr<E> {
    type Elem = E::Elem;
    type Size = E::Size;

    #[inline]
    fn size(&self) -> usize {
        self.0.size()
    }

    #[inline]
    fn get(&self, i: usize) -> Self::Elem {
        self.0.get(i)
    }
}

impl<E: VectorExpr> Operand for VectorXpr<E> {
    type Kind = VectorKind;
    type Expr = E;

    #[inline]
    fn into_expr(self) -> E {
        self.0
    }
}

/// Applies a [`UnaryFunctor`] to each element of a vector expression.
#[derive(Debug, Clone, Copy)]
pub struct UnaryVectorOp<E, Op> {
    expr: E,
    op: PhantomData<Op>,
}

impl<E, Op> UnaryVectorOp<E, Op> {
    pub(crate) fn new(expr: E) -> Self {
        Self {
            expr,
            op: PhantomData,
        }
    }
}

impl<E, Op> VectorExpr for UnaryVectorOp<E, Op>
where
    E: VectorExpr,
    Op: UnaryFunctor<E::Elem>,
{
    type Elem = Op::Output;
    type Size = E::Size;

    #[inline]
    fn size(&self) -> usize {
        self.expr.size()
    }

    #[inline]
    fn get(&self, i: usize) -> Self::Elem {
        Op::apply(self.expr.get(i))
    }
}

/// Combines the elements of two equally sized vector expressions with a [`BinaryFunctor`].
#[derive(Debug, Clone, Copy)]
pub struct BinaryVectorOp<L, R, Op> {
    left: L,
    right: R,
    op: PhantomData<Op>,
}

impl<L: VectorExpr, R: VectorExpr, Op> BinaryVectorOp<L, R, Op>
where
    L::Size: SizePromote<R::Size>,
{
    /// Creates the node, checking run-time sizes.
    pub(crate) fn try_new(left: L, right: R) -> Result<Self, SizeError> {
        SizeError::check_vectors(left.size(), right.size())?;
        Ok(Self {
            left,
            right,
            op: PhantomData,
        })
    }
}

impl<L, R, Op> VectorExpr for BinaryVectorOp<L, R, Op>
where
    L: VectorExpr,
    R: VectorExpr,
    L::Size: SizePromote<R::Size>,
    Op: BinaryFunctor<L::Elem, R::Elem>,
{
    type Elem = Op::Output;
    type Size = <L::Size as SizePromote<R::Size>>::Output;

    #[inline]
    fn size(&self) -> usize {
        self.left.size()
    }

    #[inline]
    fn get(&self, i: usize) -> Self::Elem {
        Op::apply(self.left.get(i), self.right.get(i))
    }
}

/// Combines each element of a vector expression with a scalar.
#[derive(Debug, Clone, Copy)]
pub struct VectorScalarOp<E, S, Op> {
    expr: E,
    scalar: S,
    op: PhantomData<Op>,
}

impl<E, S, Op> VectorScalarOp<E, S, Op> {
    pub(crate) fn new(expr: E, scalar: S) -> Self {
        Self {
            expr,
            scalar,
            op: PhantomData,
        }
    }
}

impl<E, S, Op> VectorExpr for VectorScalarOp<E, S, Op>
where
    E: VectorExpr,
    S: Scalar,
    Op: BinaryFunctor<E::Elem, S>,
{
    type Elem = Op::Output;
    type Size = E::Size;

    #[inline]
    fn size(&self) -> usize {
        self.expr.size()
    }

    #[inline]
    fn get(&self, i: usize) -> Self::Elem {
        Op::apply(self.expr.get(i), self.scalar)
    }
}

/// A vector expression with one element removed.
#[derive(Debug, Clone, Copy)]
pub struct SubvectorOp<E> {
    expr: E,
    skip: usize,
}

impl<E> VectorExpr for SubvectorOp<E>
where
    E: VectorExpr,
    E::Size: Shrink,
{
    type Elem = E::Elem;
    type Size = <E::Size as Shrink>::Output;

    #[inline]
    fn size(&self) -> usize {
        self.expr.size() - 1
    }

    #[inline]
    fn get(&self, i: usize) -> Self::Elem {
        self.expr.get(if i < self.skip { i } else { i + 1 })
    }
}

/// The cross product of two 3-element vector expressions.
#[derive(Debug, Clone, Copy)]
pub struct CrossOp<L, R> {
    left: L,
    right: R,
}

impl<L, R> VectorExpr for CrossOp<L, R>
where
    L: VectorExpr,
    R: VectorExpr,
    L::Elem: Promote<R::Elem>,
{
    type Elem = Promoted<L::Elem, R::Elem>;
    type Size = Fixed<3>;

    #[inline]
    fn size(&self) -> usize {
        3
    }

    fn get(&self, i: usize) -> Self::Elem {
        let a = |k| <L::Elem as Promote<R::Elem>>::promote(self.left.get(k));
        let b = |k| <L::Elem as Promote<R::Elem>>::promote_rhs(self.right.get(k));
        match i {
            0 => a(1) * b(2) - a(2) * b(1),
            1 => a(2) * b(0) - a(0) * b(2),
            2 => a(0) * b(1) - a(1) * b(0),
            _ => unreachable!("cross product component index {i} out of range"),
        }
    }
}

/// Computes the dot product of two vectors.
///
/// The products are summed in the promoted element type.
///
/// # Panics
///
/// Panics if the vectors have different run-time lengths. Use [`try_dot`] to handle that case.
///
/// # Examples
///
/// ```
/// # use cml::*;
/// let a = vec3(1, 3, -5);
/// let b = vec3(4.0, -2.0, -1.0);
/// assert_eq!(dot(&a, &b), 3.0);
/// assert_eq!(dot(&a + &a, [1, 1, 1]), -2);
/// ```
#[track_caller]
pub fn dot<L, R>(
    left: L,
    right: R,
) -> Promoted<<L::Expr as VectorExpr>::Elem, <R::Expr as VectorExpr>::Elem>
where
    L: VectorOperand,
    R: VectorOperand,
    <L::Expr as VectorExpr>::Size: SizePromote<<R::Expr as VectorExpr>::Size>,
    <L::Expr as VectorExpr>::Elem: Promote<<R::Expr as VectorExpr>::Elem>,
{
    unwrap_size(try_dot(left, right))
}

/// Computes the dot product of two vectors, or reports a length mismatch.
pub fn try_dot<L, R>(
    left: L,
    right: R,
) -> Result<Promoted<<L::Expr as VectorExpr>::Elem, <R::Expr as VectorExpr>::Elem>, SizeError>
where
    L: VectorOperand,
    R: VectorOperand,
    <L::Expr as VectorExpr>::Size: SizePromote<<R::Expr as VectorExpr>::Size>,
    <L::Expr as VectorExpr>::Elem: Promote<<R::Expr as VectorExpr>::Elem>,
{
    let (left, right) = (left.into_vector_expr(), right.into_vector_expr());
    SizeError::check_vectors(left.size(), right.size())?;
    let mut acc = Zero::ZERO;
    for i in 0..left.size() {
        acc = OpDot::accumulate(acc, left.get(i), right.get(i));
    }
    Ok(acc)
}

/// Computes the cross product of two 3-element vectors.
///
/// Fixed-size vectors of any other length are rejected at compile time.
///
/// # Panics
///
/// Panics if a dynamically sized operand does not have 3 elements. Use [`try_cross`] to handle
/// that case.
///
/// # Examples
///
/// ```
/// # use cml::*;
/// let x = Vec3f::X;
/// let y = Vec3f::Y;
/// assert_eq!(cross(&x, &y).eval(), Vec3f::Z);
/// assert_eq!(cross(&y, &x).eval(), [0.0, 0.0, -1.0]);
/// ```
///
/// ```compile_fail
/// # use cml::*;
/// let _ = cross(vec2(1.0, 0.0), vec2(0.0, 1.0));
/// ```
#[track_caller]
pub fn cross<L, R>(left: L, right: R) -> VectorXpr<CrossOp<L::Expr, R::Expr>>
where
    L: VectorOperand,
    R: VectorOperand,
    <L::Expr as VectorExpr>::Size: Length3,
    <R::Expr as VectorExpr>::Size: Length3,
    <L::Expr as VectorExpr>::Elem: Promote<<R::Expr as VectorExpr>::Elem>,
{
    unwrap_size(try_cross(left, right))
}

/// Computes the cross product of two vectors, or reports that one of them does not have 3
/// elements.
pub fn try_cross<L, R>(left: L, right: R) -> Result<VectorXpr<CrossOp<L::Expr, R::Expr>>, SizeError>
where
    L: VectorOperand,
    R: VectorOperand,
    <L::Expr as VectorExpr>::Size: Length3,
    <R::Expr as VectorExpr>::Size: Length3,
    <L::Expr as VectorExpr>::Elem: Promote<<R::Expr as VectorExpr>::Elem>,
{
    let (left, right) = (left.into_vector_expr(), right.into_vector_expr());
    for size in [left.size(), right.size()] {
        if size != 3 {
            log::debug!("cross product of a {size}-element vector");
            return Err(SizeError::Cross { size });
        }
    }
    Ok(VectorXpr::new(CrossOp { left, right }))
}

/// Returns an expression containing all elements of `v` except the one at index `skip`.
///
/// # Panics
///
/// Panics if `skip` is out of bounds.
///
/// # Examples
///
/// ```
/// # use cml::*;
/// let v = vec4(1, 2, 3, 4);
/// assert_eq!(subvector(&v, 1).eval(), [1, 3, 4]);
/// assert_eq!(subvector(&v, 3).eval(), [1, 2, 3]);
/// ```
#[track_caller]
pub fn subvector<V>(v: V, skip: usize) -> VectorXpr<SubvectorOp<V::Expr>>
where
    V: VectorOperand,
    <V::Expr as VectorExpr>::Size: Shrink,
{
    let expr = v.into_vector_expr();
    assert!(
        skip < expr.size(),
        "subvector index {skip} out of bounds for vector of length {}",
        expr.size()
    );
    VectorXpr::new(SubvectorOp { expr, skip })
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn nested_expression() {
        let a = vec3(1.0f64, 2.0, 3.0);
        let b = vec3(4.0f64, 5.0, 6.0);
        let c = vec3(-1.0f64, 0.0, 1.0);

        let expr = (&a + &b) * 2.0f64 - &c;
        assert_eq!(expr.size(), 3);
        assert_eq!(expr.get(0), 11.0);
        assert_eq!(expr.eval(), [11.0, 14.0, 17.0]);
    }

    #[test]
    fn promotion_in_expressions() {
        let a = vec3(1, 2, 3);
        let b = vec3(0.5f32, 0.5, 0.5);
        let sum = &a + &b;
        let v: Vec3f = sum.eval();
        assert_eq!(v, [1.5, 2.5, 3.5]);

        let bytes = vec2(200u8, 100);
        let wide: Vec2<i32> = (&bytes + &bytes).eval();
        assert_eq!(wide, [400, 200]);

        let neg: Vec2<i32> = (-&bytes).eval();
        assert_eq!(neg, [-200, -100]);
    }

    #[test]
    fn mixed_fixed_and_dynamic() {
        let a = vec3(1, 2, 3);
        let d = DynVector::from_vec(vec![1, 1, 1]);

        let sum: Vec3<i32> = (&a + &d).eval();
        assert_eq!(sum, [2, 3, 4]);

        let short = DynVector::from_vec(vec![1, 1]);
        assert_eq!(
            (&a).try_add(&short).unwrap_err(),
            SizeError::Vector { left: 3, right: 2 }
        );
    }

    #[test]
    #[should_panic(expected = "incompatible vector sizes: 2 and 3")]
    fn operator_panics_on_mismatch() {
        let a = DynVector::from_vec(vec![1.0, 2.0]);
        let b = DynVector::from_vec(vec![1.0, 2.0, 3.0]);
        let _ = &a + &b;
    }

    #[test]
    fn dot_products() {
        assert_eq!(dot(vec3(1, 3, -5), vec3(4, -2, -1)), 3);
        assert_eq!(dot(&[1u8, 2], &[3u8, 4]), 11i32);

        let a = DynVector::from_vec(vec![1.0, 2.0]);
        assert_eq!(dot(&a, &a), 5.0);
        assert_eq!(
            try_dot(&a, &[1.0, 2.0, 3.0][..]),
            Err(SizeError::Vector { left: 2, right: 3 })
        );
    }

    #[test]
    fn cross_products() {
        let x = vec3(1, 0, 0);
        let y = vec3(0, 1, 0);
        assert_eq!(cross(&x, &y).eval(), [0, 0, 1]);
        assert_eq!(cross(&y, &x).eval(), [0, 0, -1]);

        let d = DynVector::from_vec(vec![0.0, 0.0, 2.0]);
        assert_eq!(cross(&x, &d).eval(), [0.0, -2.0, 0.0]);

        let bad = DynVector::from_vec(vec![1.0, 2.0]);
        assert_eq!(
            try_cross(&bad, &d).unwrap_err(),
            SizeError::Cross { size: 2 }
        );
    }

    #[test]
    #[should_panic(expected = "cross product component index 3 out of range")]
    fn cross_product_has_three_components() {
        let c = cross(vec3(1, 0, 0), vec3(0, 1, 0));
        let _ = c.get(3);
    }

    #[test]
    fn subvectors() {
        let v = DynVector::from_vec(vec![1, 2, 3]);
        let s = subvector(&v, 0);
        assert_eq!(s.size(), 2);
        assert_eq!(s.eval(), [2, 3]);

        let nested = subvector(subvector(vec4(1, 2, 3, 4), 0), 0);
        assert_eq!(nested.eval(), [3, 4]);
    }

    #[test]
    #[should_panic(expected = "subvector index 3 out of bounds")]
    fn subvector_out_of_bounds() {
        let _ = subvector(vec3(1, 2, 3), 3);
    }

    #[test]
    fn expression_wrappers_are_hoisted() {
        let a = vec2(1, 2);
        let inner = &a + &a;
        let outer = inner + &a;
        let node: BinaryVectorOp<BinaryVectorOp<&Vec2<i32>, &Vec2<i32>, OpAdd>, &Vec2<i32>, OpAdd> =
            outer.into_inner();
        assert_eq!(node.get(1), 6);
    }
}
