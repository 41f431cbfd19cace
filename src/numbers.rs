//! Mathematical constants at the precision of the working float type.

use num_traits::{Float, FloatConst};

/// π, to the full precision of `T`.
#[inline]
pub fn pi<T: FloatConst>() -> T {
    T::PI()
}

/// √2, to the full precision of `T`.
#[inline]
pub fn sqrt2<T: FloatConst>() -> T {
    T::SQRT_2()
}

/// `x * x`.
#[inline]
pub fn squared<T: Float>(x: T) -> T {
    x * x
}

// Small integer constants used by the discretization formulas.
#[inline]
pub(crate) fn two<T: Float>() -> T {
    T::one() + T::one()
}

#[inline]
pub(crate) fn four<T: Float>() -> T {
    two::<T>() + two::<T>()
}
