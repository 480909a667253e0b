//! Taylor coefficient recursion ("jet computation").
//!
//! Given the state polynomials with coefficient 0 set to the current value,
//! fill coefficients 1..=N by repeatedly evaluating the right-hand side on
//! the truncated expansion: if x' = f(x, t) then
//! x[k+1] = f(x, t)[k] / (k+1), and coefficient k of f depends only on
//! coefficients 0..=k of x. The state's higher coefficients start at zero,
//! so evaluating f at full degree each order yields exactly the truncated
//! prefix the recurrence needs.

use crate::core::ode::{ParsedRhs, ScalarOde, VectorOde};
use crate::core::poly::Poly;
use crate::core::scalar::{Coeff, Real, Ring};
use crate::core::status::{record_warning, Warning};

/// Derivative scratch for the vector recursion, owned by the solver and
/// borrowed exclusively for the duration of one step.
pub struct JetScratch<T> {
    dx: Vec<Poly<T>>,
}

impl<T: Ring> JetScratch<T> {
    pub fn new(state: &[Poly<T>]) -> Self {
        Self {
            dx: state.iter().map(|x| x.zero_like()).collect(),
        }
    }
}

/// Fill coefficients 1..=N of a scalar state.
pub fn jet_coeffs_scalar<F, T, S>(f: &S, x: &mut Poly<T>, t: &Poly<F>)
where
    F: Real,
    T: Coeff<F>,
    S: ScalarOde<F, T>,
{
    let degree = x.degree();
    for ord in 0..degree {
        let taux = t.prefix(ord + 1);
        let dx = f.rhs(x, &taux);
        x.set_coeff(ord + 1, dx.coeff(ord).div_order(ord + 1));
    }
}

/// Fill coefficients 1..=N of a vector state using the generic recursion.
pub fn jet_coeffs_vector<F, T, S>(f: &S, x: &mut [Poly<T>], t: &Poly<F>, scratch: &mut JetScratch<T>)
where
    F: Real,
    T: Coeff<F>,
    S: VectorOde<F, T>,
{
    let degree = x[0].degree();
    for ord in 0..degree {
        let taux = t.prefix(ord + 1);
        for d in scratch.dx.iter_mut() {
            d.clear();
        }
        f.rhs(&mut scratch.dx, x, &taux);
        for (j, xj) in x.iter_mut().enumerate() {
            xj.set_coeff(ord + 1, scratch.dx[j].coeff(ord).div_order(ord + 1));
        }
    }
}

/// Coefficient engine selected at solver setup.
///
/// When the system registers a specialized routine and `parse_eqs` is on,
/// the routine is exercised once on a copy of the initial state; a probe
/// failure (or any later failure) substitutes the generic recursion for the
/// remainder of the run and records a single warning.
pub enum CoeffEngine<F: Real, T: Coeff<F>> {
    Generic,
    Parsed(Box<dyn ParsedRhs<F, T>>),
}

impl<F: Real, T: Coeff<F>> CoeffEngine<F, T> {
    pub fn probe<S: VectorOde<F, T>>(
        f: &S,
        x: &[Poly<T>],
        t: &Poly<F>,
        enabled: bool,
        warnings: &mut Vec<Warning>,
    ) -> Self {
        if !enabled {
            return CoeffEngine::Generic;
        }
        match f.parsed() {
            None => CoeffEngine::Generic,
            Some(mut routine) => {
                let mut trial: Vec<Poly<T>> = x.to_vec();
                match routine.jet_coeffs(&mut trial, t) {
                    Ok(()) => CoeffEngine::Parsed(routine),
                    Err(_) => {
                        record_warning(warnings, Warning::ParsedFallback);
                        CoeffEngine::Generic
                    }
                }
            }
        }
    }

    /// Take a routine without the setup probe; the first real step doubles
    /// as the probe. Used where each sub-solution owns an independent copy
    /// of the specialized routine's preallocation record.
    pub fn fresh<S: VectorOde<F, T>>(f: &S, enabled: bool) -> Self {
        if !enabled {
            return CoeffEngine::Generic;
        }
        match f.parsed() {
            Some(routine) => CoeffEngine::Parsed(routine),
            None => CoeffEngine::Generic,
        }
    }

    /// Compute one step's coefficients, degrading to the generic recursion
    /// if the specialized routine fails mid-run.
    pub fn run<S: VectorOde<F, T>>(
        &mut self,
        f: &S,
        x: &mut [Poly<T>],
        t: &Poly<F>,
        scratch: &mut JetScratch<T>,
        warnings: &mut Vec<Warning>,
    ) {
        let failed = match self {
            CoeffEngine::Generic => {
                jet_coeffs_vector(f, x, t, scratch);
                false
            }
            CoeffEngine::Parsed(routine) => routine.jet_coeffs(x, t).is_err(),
        };
        if failed {
            record_warning(warnings, Warning::ParsedFallback);
            *self = CoeffEngine::Generic;
            // The generic recursion assigns every coefficient from order 0
            // upward, so a partial write by the failed routine is harmless.
            jet_coeffs_vector(f, x, t, scratch);
        }
    }
}
