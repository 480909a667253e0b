//! Numeric contracts for polynomial coefficients and the time field.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_traits::Float;

/// Coefficient ring of a truncated Taylor polynomial.
///
/// Implemented for plain floating-point scalars (the ordinary case) and for
/// [`crate::core::mpoly::MPoly`] (jet transport, where every Taylor
/// coefficient is itself a multivariate polynomial in the initial-condition
/// perturbations).
///
/// Structured coefficient types carry shape information (variable count,
/// truncation order), so zero and one are produced from a witness value
/// rather than from thin air.
pub trait Ring:
    Clone
    + Debug
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// Additive identity with the same shape as `self`.
    fn zero_like(&self) -> Self;

    /// Multiplicative identity with the same shape as `self`.
    fn one_like(&self) -> Self;

    fn is_zero(&self) -> bool;

    /// Exact division by a positive integer, as used by the Taylor
    /// integration recurrence x[k+1] = f(x)[k] / (k+1).
    fn div_order(&self, k: usize) -> Self;

    /// Magnitude of the coefficient as consumed by step-size control.
    ///
    /// For structured coefficients this is the infinity norm over the
    /// underlying scalars.
    fn inf_norm(&self) -> f64;
}

/// Ring elements that scale by the time field `F`.
///
/// Linking a coefficient type to its time field is what lets a polynomial
/// with structured coefficients be evaluated at a scalar time offset.
pub trait Coeff<F>: Ring {
    fn scale(&self, s: &F) -> Self;
}

/// The ordered scalar field used for time, step sizes, and tolerances.
///
/// Shipped implementations cover `f32` and `f64`; arbitrary-precision
/// scalars participate by implementing this trait (and [`Elementary`] when
/// the right-hand side uses transcendental functions).
pub trait Real: Coeff<Self> + PartialOrd + Div<Output = Self> {
    fn from_f64(v: f64) -> Self;

    /// Nearest-f64 image of the value. Only used where full precision is
    /// irrelevant (step-size selection, diagnostics).
    fn to_f64(&self) -> f64;

    fn abs(&self) -> Self;
}

/// Scalars with the elementary functions required by the polynomial
/// recurrences (exp, log, sqrt, sin/cos) and by Gram–Schmidt.
pub trait Elementary: Real {
    fn exp(&self) -> Self;
    fn ln(&self) -> Self;
    fn sqrt(&self) -> Self;
    fn sin_cos(&self) -> (Self, Self);
}

impl<T: Float + Debug> Ring for T {
    fn zero_like(&self) -> Self {
        T::zero()
    }

    fn one_like(&self) -> Self {
        T::one()
    }

    fn is_zero(&self) -> bool {
        *self == T::zero()
    }

    fn div_order(&self, k: usize) -> Self {
        *self / T::from(k).unwrap()
    }

    fn inf_norm(&self) -> f64 {
        num_traits::ToPrimitive::to_f64(&Float::abs(*self)).unwrap_or(f64::NAN)
    }
}

impl<T: Float + Debug> Coeff<T> for T {
    fn scale(&self, s: &T) -> Self {
        *self * *s
    }
}

impl<T: Float + Debug> Real for T {
    fn from_f64(v: f64) -> Self {
        T::from(v).unwrap()
    }

    fn to_f64(&self) -> f64 {
        num_traits::ToPrimitive::to_f64(self).unwrap_or(f64::NAN)
    }

    fn abs(&self) -> Self {
        Float::abs(*self)
    }
}

impl<T: Float + Debug> Elementary for T {
    fn exp(&self) -> Self {
        Float::exp(*self)
    }

    fn ln(&self) -> Self {
        Float::ln(*self)
    }

    fn sqrt(&self) -> Self {
        Float::sqrt(*self)
    }

    fn sin_cos(&self) -> (Self, Self) {
        Float::sin_cos(*self)
    }
}
