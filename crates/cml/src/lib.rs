//! An expression-template linear algebra library.
//!
//! # Motivation
//!
//! Arithmetic on vectors and matrices is usually written as a chain of operators, like
//! `a + b * 2.0 - c`. Evaluating each operator eagerly allocates (or at least writes) a temporary
//! for every intermediate result. This library instead makes every operator return a lightweight
//! *expression node* that describes the computation. Nothing is computed until the expression is
//! assigned to a container, at which point every element is computed exactly once, in a single
//! pass, straight into the destination.
//!
//! ```
//! # use cml::*;
//! let a = vec3(1.0, 2.0, 3.0);
//! let b = vec3(4.0, 5.0, 6.0);
//!
//! let mut out = Vec3d::ZERO;
//! out.assign(&a + &b * 2.0 - &a);
//! assert_eq!(out, [8.0, 10.0, 12.0]);
//! ```
//!
//! # Containers
//!
//! - [`Vector`], [`Matrix`] and [`Quat`] have their size fixed at compile time and are [`Copy`].
//! - [`DynVector`] and [`DynMatrix`] store their elements on the heap and are sized at run time.
//! - [`ExternalVector`], [`ExternalDynVector`] and [`ExternalMatrix`] wrap a buffer owned by the
//!   caller and write results through to it.
//! - Arrays and slices can be used as read-only vector operands.
//!
//! Fixed-size matrices store their elements column by column. Dynamic and external matrices store
//! them row by row.
//!
//! # Element Types
//!
//! Elements are [`Scalar`]s. Mixing element types in an expression promotes both operands to a
//! common type first (see [`Promote`]), so `i8 + i8` is computed as `i32` and `i32 * f32` as `f32`.
//! Assigning to a container converts the result to the container's element type.
//!
//! # Sizes
//!
//! Combining two operands whose sizes are both fixed is checked at compile time. When at least
//! one size is only known at run time, operators check it when building the expression node and
//! panic on a mismatch. The `try_*` methods ([`TryAdd`], [`TrySub`], [`TryMul`], [`TryDiv`]) and
//! [`VectorStorage::try_assign`] report a [`SizeError`] instead.
//!
//! With the `auto-resize` cargo feature, plain assignment to a [`DynVector`] or [`DynMatrix`]
//! resizes the destination instead of failing. Without it, [`DynVector::assign_resizing`] and
//! [`DynMatrix::assign_resizing`] opt into resizing for a single assignment.
//!
//! # Goals & Non-Goals
//!
//! - Be generic over the element type, but don't try to support non-[`Copy`] numeric types (eg.
//!   "big decimals").
//! - Report every size mismatch before anything is written, so a failed assignment leaves the
//!   destination untouched.
//! - Don't do geometry. Rotations, projections and matrix inversion can be built on top of this
//!   library, but are not part of it.
//! - Single-threaded only. Containers are [`Send`] and [`Sync`] when their elements are, but no
//!   operation is parallelized.
//! - Put at least some effort into designing an ergonomic API that adheres to the
//!   [Rust API Guidelines].
//!
//! [Rust API Guidelines]: https://rust-lang.github.io/api-guidelines/

pub mod assign;
mod error;
mod expr;
mod functor;
mod matrix;
mod operand;
mod promote;
mod quat;
mod size;
mod traits;
mod vector;

pub use error::SizeError;
pub use expr::*;
pub use functor::*;
pub use matrix::*;
pub use operand::*;
pub use promote::*;
pub use quat::*;
pub use size::*;
pub use traits::*;
pub use vector::*;
