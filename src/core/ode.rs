//! User-supplied ODE systems.

use crate::core::poly::Poly;
use crate::core::scalar::{Coeff, Real};

/// Right-hand side of a scalar ODE x' = f(x, t).
///
/// Implement this trait for your problem struct; parameters of the system
/// live as fields of the implementing type. The integrator calls `rhs` with
/// truncated polynomials and expects the derivative as a new polynomial.
///
/// # Example
///
/// ```ignore
/// struct Logistic { r: f64 }
/// impl ScalarOde<f64, f64> for Logistic {
///     fn rhs(&self, x: &Poly<f64>, _t: &Poly<f64>) -> Poly<f64> {
///         (&(&x.one_like() - x) * x).scale(&self.r)
///     }
/// }
/// ```
pub trait ScalarOde<F: Real, T: Coeff<F>> {
    fn rhs(&self, x: &Poly<T>, t: &Poly<F>) -> Poly<T>;
}

/// Right-hand side of a vector ODE x' = f(x, t), filling a preallocated
/// derivative buffer.
///
/// The derivative polynomials arrive zeroed to the working degree; `rhs`
/// must assign every component.
pub trait VectorOde<F: Real, T: Coeff<F>> {
    fn rhs(&self, dx: &mut [Poly<T>], x: &[Poly<T>], t: &Poly<F>);

    /// Specialized coefficient routine for this system, if one exists.
    ///
    /// When provided (and `parse_eqs` is enabled), the integrator probes it
    /// once at setup and uses it instead of the generic order-by-order
    /// recursion. Any failure falls back to the generic path for the rest
    /// of the run and records a warning on the solution. The routine must
    /// produce coefficients numerically identical to the generic recursion.
    fn parsed(&self) -> Option<Box<dyn ParsedRhs<F, T>>> {
        None
    }
}

/// One-pass coefficient routine specialized to a particular right-hand side.
///
/// `jet_coeffs` receives the state with coefficient 0 set to the current
/// value and must fill coefficients 1..=N. Implementations own whatever
/// preallocated intermediates they need.
pub trait ParsedRhs<F: Real, T: Coeff<F>> {
    fn jet_coeffs(&mut self, x: &mut [Poly<T>], t: &Poly<F>) -> Result<(), ParsedFailure>;
}

/// Failure signal from a specialized routine; triggers the generic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedFailure;

/// User-supplied Jacobian ∂f_i/∂x_j along the trajectory, as a row-major
/// D×D matrix of time polynomials.
///
/// Optional for Lyapunov-spectrum integration; when absent the Jacobian is
/// derived by automatic differentiation over the perturbation variables.
pub trait Jacobian<F: Real> {
    fn jacobian(&self, jac: &mut [Poly<F>], x: &[Poly<F>], t: &Poly<F>);
}
