//! Step-size selection from the magnitudes of the top Taylor coefficients.
//!
//! The primary rule bounds the local truncation error by the absolute
//! tolerance using the last two coefficients. The fallback rule (Jorba–Zou)
//! recovers a finite step from lower-order coefficients when the top of the
//! polynomial vanishes identically; it does not depend on the tolerance.
//!
//! Step sizes are computed in f64 regardless of the coefficient type: they
//! feed the clamp against the final time and the evaluation offset, neither
//! of which needs more precision than the norms themselves.

use crate::core::poly::Poly;
use crate::core::scalar::Ring;

/// Primary rule for one component:
/// h = min over k in {N-1, N} of (abstol / ‖c_k‖)^(1/k),
/// skipping k whose coefficient is exactly zero. Both zero gives +∞.
pub fn step_size_component<T: Ring>(x: &Poly<T>, abstol: f64) -> f64 {
    let n = x.degree();
    let mut h = f64::INFINITY;
    for k in [n - 1, n] {
        let norm = x.coeff(k).inf_norm();
        if norm == 0.0 {
            continue;
        }
        h = h.min((abstol / norm).powf(1.0 / k as f64));
    }
    h
}

/// Fallback rule for one component:
/// h' = max over k in 1..=N-2 of (1 / ‖c_k‖)^(1/k), omitting zero
/// coefficients. Returns 0 when every such coefficient vanishes.
pub fn fallback_step_size_component<T: Ring>(x: &Poly<T>) -> f64 {
    let n = x.degree();
    let mut h = 0.0_f64;
    for k in 1..=n.saturating_sub(2) {
        let norm = x.coeff(k).inf_norm();
        if norm == 0.0 {
            continue;
        }
        h = h.max((1.0 / norm).powf(1.0 / k as f64));
    }
    h
}

/// Step size for a vector state: the minimum of the per-component primary
/// steps; when that is +∞ for every component, the maximum of the
/// per-component fallback steps.
///
/// Returns +∞ when the state polynomials are constant (a stationary point);
/// the integrator then advances to the final time in a single step.
pub fn step_size<T: Ring>(state: &[Poly<T>], abstol: f64) -> f64 {
    let mut h = f64::INFINITY;
    for x in state {
        h = h.min(step_size_component(x, abstol));
    }
    if h.is_finite() {
        return h;
    }
    let mut h = 0.0_f64;
    for x in state {
        h = h.max(fallback_step_size_component(x));
    }
    if h == 0.0 {
        // Identically-constant polynomials: treat as stationary.
        f64::INFINITY
    } else {
        h
    }
}
