//! The assignment engine.
//!
//! Writes an expression into a container, one element at a time. Every destination element is
//! written exactly once, in index order, and the source element is computed before it is written.
//! Sizes are checked up front, so a mismatch leaves the destination untouched.

use crate::{
    error::SizeError,
    expr::{MatrixExpr, MatrixStorage, VectorExpr, VectorStorage},
    functor::AssignFunctor,
    quat::Quat,
    size::Size,
    QuatExpr, QuatOrder, Scalar,
};

/// Fixed sizes up to this length are assigned with a straight-line sequence of element
/// operations instead of a loop.
pub const UNROLL_LIMIT: usize = 4;

/// Calls `f` for every index in `0..len`.
///
/// `len` must match the compile-time length of `Z` if it has one.
#[inline(always)]
pub(crate) fn for_each_index<Z: Size>(len: usize, mut f: impl FnMut(usize)) {
    match Z::FIXED {
        Some(n) if n <= UNROLL_LIMIT => {
            debug_assert_eq!(n, len);
            unrolled(n, f);
        }
        _ => {
            for i in 0..len {
                f(i);
            }
        }
    }
}

#[inline(always)]
fn unrolled(n: usize, mut f: impl FnMut(usize)) {
    match n {
        0 => {}
        1 => f(0),
        2 => {
            f(0);
            f(1);
        }
        3 => {
            f(0);
            f(1);
            f(2);
        }
        4 => {
            f(0);
            f(1);
            f(2);
            f(3);
        }
        _ => {
            for i in 0..n {
                f(i);
            }
        }
    }
}

/// Assigns `src` to `dest` element by element, combining the elements with `Op`.
///
/// Both sizes must match. With the `auto-resize` feature, a resizable destination is resized to
/// the source length by plain assignment instead of reporting an error.
pub fn assign_vector<Op, D, S>(dest: &mut D, src: &S) -> Result<(), SizeError>
where
    D: VectorStorage + ?Sized,
    S: VectorExpr + ?Sized,
    Op: AssignFunctor<D::Elem, S::Elem>,
{
    let (len, src_len) = (dest.size(), src.size());
    if len != src_len {
        if cfg!(feature = "auto-resize") && Op::RESIZES && dest.resize_for_assign(src_len) {
            log::trace!("resized assignment destination from {len} to {src_len} elements");
        } else {
            log::debug!("vector size mismatch on assignment: {len} and {src_len}");
            return Err(SizeError::Vector {
                left: len,
                right: src_len,
            });
        }
    }

    for_each_index::<D::Size>(src_len, |i| {
        let value = src.get(i);
        Op::apply(dest.get_mut(i), value);
    });
    Ok(())
}

/// Assigns `src` to `dest` element by element, row by row.
pub fn assign_matrix<Op, D, S>(dest: &mut D, src: &S) -> Result<(), SizeError>
where
    D: MatrixStorage + ?Sized,
    S: MatrixExpr + ?Sized,
    Op: AssignFunctor<D::Elem, S::Elem>,
{
    let dims = (dest.rows(), dest.cols());
    let src_dims = (src.rows(), src.cols());
    if dims != src_dims {
        if cfg!(feature = "auto-resize")
            && Op::RESIZES
            && dest.resize_for_assign(src_dims.0, src_dims.1)
        {
            log::trace!("resized assignment destination from {dims:?} to {src_dims:?}");
        } else {
            log::debug!("matrix size mismatch on assignment: {dims:?} and {src_dims:?}");
            return Err(SizeError::Matrix {
                left_rows: dims.0,
                left_cols: dims.1,
                right_rows: src_dims.0,
                right_cols: src_dims.1,
            });
        }
    }

    let (rows, cols) = src_dims;
    for_each_index::<D::Rows>(rows, |i| {
        for_each_index::<D::Cols>(cols, |j| {
            let value = src.get(i, j);
            Op::apply(dest.get_mut(i, j), value);
        });
    });
    Ok(())
}

/// Assigns the components of `src` to `dest`.
///
/// Quaternions always have 4 components, so this cannot fail.
pub fn assign_quat<Op, T, O, S>(dest: &mut Quat<T, O>, src: &S)
where
    T: Scalar,
    O: QuatOrder,
    S: QuatExpr<Order = O> + ?Sized,
    Op: AssignFunctor<T, S::Elem>,
{
    unrolled(4, |i| {
        let value = src.get(i);
        Op::apply(&mut dest[i], value);
    });
}

/// Combines every element of `dest` with `value`, using `Op`.
pub(crate) fn apply_scalar_vector<Op, D, S>(dest: &mut D, value: S)
where
    D: VectorStorage + ?Sized,
    S: Scalar,
    Op: AssignFunctor<D::Elem, S>,
{
    let len = dest.size();
    for_each_index::<D::Size>(len, |i| Op::apply(dest.get_mut(i), value));
}

pub(crate) fn apply_scalar_matrix<Op, D, S>(dest: &mut D, value: S)
where
    D: MatrixStorage + ?Sized,
    S: Scalar,
    Op: AssignFunctor<D::Elem, S>,
{
    let (rows, cols) = (dest.rows(), dest.cols());
    for_each_index::<D::Rows>(rows, |i| {
        for_each_index::<D::Cols>(cols, |j| Op::apply(dest.get_mut(i, j), value));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{functor::*, size::Fixed, DynVector, Vector};

    #[test]
    fn visits_every_index_once_in_order() {
        fn visited<Z: Size>(len: usize) -> Vec<usize> {
            let mut out = Vec::new();
            for_each_index::<Z>(len, |i| out.push(i));
            out
        }

        assert_eq!(visited::<Fixed<0>>(0), Vec::<usize>::new());
        assert_eq!(visited::<Fixed<3>>(3), [0, 1, 2]);
        assert_eq!(visited::<Fixed<4>>(4), [0, 1, 2, 3]);
        assert_eq!(visited::<Fixed<6>>(6), [0, 1, 2, 3, 4, 5]);
        assert_eq!(visited::<crate::size::Dynamic>(5), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn unrolled_and_looped_paths_agree() {
        let mut small = Vector::<i32, 4>::ZERO;
        assign_vector::<OpAssign, _, _>(&mut small, &[1, 2, 3, 4]).unwrap();
        assign_vector::<OpAddAssign, _, _>(&mut small, &[10, 10, 10, 10]).unwrap();
        assert_eq!(small, [11, 12, 13, 14]);

        let mut big = Vector::<i32, 6>::ZERO;
        assign_vector::<OpAssign, _, _>(&mut big, &[1, 2, 3, 4, 5, 6]).unwrap();
        assign_vector::<OpAddAssign, _, _>(&mut big, &[10; 6]).unwrap();
        assert_eq!(big, [11, 12, 13, 14, 15, 16]);
    }

    #[test]
    fn mismatch_leaves_destination_untouched() {
        let mut v = DynVector::from_vec(vec![1.0, 2.0]);
        let err = assign_vector::<OpAddAssign, _, _>(&mut v, &[1.0, 2.0, 3.0][..]).unwrap_err();
        assert_eq!(err, SizeError::Vector { left: 2, right: 3 });
        assert_eq!(v, [1.0, 2.0]);
    }

    #[cfg(not(feature = "auto-resize"))]
    #[test]
    fn plain_assignment_does_not_resize() {
        let mut v = DynVector::<f32>::zeros(2);
        assert!(assign_vector::<OpAssign, _, _>(&mut v, &[1.0, 2.0, 3.0][..]).is_err());
        assert_eq!(v.size(), 2);
    }

    #[cfg(feature = "auto-resize")]
    #[test]
    fn plain_assignment_resizes() {
        let mut v = DynVector::<f32>::zeros(2);
        assign_vector::<OpAssign, _, _>(&mut v, &[1.0, 2.0, 3.0][..]).unwrap();
        assert_eq!(v, [1.0, 2.0, 3.0]);

        // compound assignment still requires matching sizes
        assert!(assign_vector::<OpAddAssign, _, _>(&mut v, &[1.0][..]).is_err());
    }

    #[test]
    fn scalar_updates() {
        let mut v = Vector::from([1, 2, 3]);
        apply_scalar_vector::<OpMulAssign, _, _>(&mut v, 2.5);
        assert_eq!(v, [2, 5, 7]);
    }
}
