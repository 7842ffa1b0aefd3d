use std::{fmt, hash::Hash};

/// Storage order of the components of a [`Quat`][crate::Quat].
///
/// Each constant is the storage index of one component. The imaginary parts `x`, `y` and `z`
/// always keep their relative order.
pub trait QuatOrder: Copy + Default + fmt::Debug + Eq + Hash + Send + Sync + 'static {
    /// Index of the real part.
    const W: usize;
    /// Index of the `i` part.
    const X: usize;
    /// Index of the `j` part.
    const Y: usize;
    /// Index of the `k` part.
    const Z: usize;
}

/// The real part is stored first: `w, x, y, z`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScalarFirst;

/// The real part is stored last: `x, y, z, w`.
///
/// This is the default order, and the layout commonly used by graphics APIs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScalarLast;

impl QuatOrder for ScalarFirst {
    const W: usize = 0;
    const X: usize = 1;
    const Y: usize = 2;
    const Z: usize = 3;
}

impl QuatOrder for ScalarLast {
    const X: usize = 0;
    const Y: usize = 1;
    const Z: usize = 2;
    const W: usize = 3;
}
