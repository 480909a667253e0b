//! tivp: Adaptive Taylor-series initial value problem solvers for ODEs.
//!
//! This crate integrates systems x' = f(x, t) by expanding every state
//! component as a truncated Taylor polynomial in time, computing the
//! coefficients recursively from the right-hand side, and choosing each
//! step from the magnitudes of the top two coefficients against an absolute
//! tolerance.
//!
//! Highlights
//! - Generic over the coefficient type: `f64`/`f32` out of the box, jet
//!   transport through multivariate polynomial coefficients, and an open
//!   trait surface for arbitrary-precision scalars
//! - Sampling: internal accepted steps by default, or a prescribed time grid
//! - Dense output: per-step polynomials with `sol(t)` evaluation
//! - Lyapunov spectra via the variational equations with per-step
//!   Gram–Schmidt renormalization
//! - Automatic domain splitting: adaptive bisection of an initial-condition
//!   box organized as a binary tree of sub-solutions
//!
//! Quick start
//! ```rust,no_run
//! use tivp::prelude::*;
//!
//! struct Sho;
//! impl VectorOde<f64, f64> for Sho {
//!     fn rhs(&self, dx: &mut [Poly<f64>], x: &[Poly<f64>], _t: &Poly<f64>) {
//!         dx[0] = x[1].clone();
//!         dx[1] = -&x[0];
//!     }
//! }
//!
//! fn main() {
//!     let opts = Options::builder().max_steps(1000).build();
//!     let tend = 2.0 * std::f64::consts::PI; // one period
//!     let sol = integrate(&Sho, &[1.0, 0.0], 0.0, tend, 20, 1e-15, opts).unwrap();
//!
//!     // Discrete samples
//!     for (t, y) in sol.iter() {
//!         // use t and y (slice)
//!     }
//!
//!     // Continuous evaluation within the solution span
//!     if let Some(y) = sol.sol(&1.5) {
//!         // y was evaluated from the covering step polynomial
//!     }
//! }
//! ```
//!
//! See the demos folder for more usage patterns.

mod core;
mod error;
mod solve;

pub mod methods;
pub mod prelude;
