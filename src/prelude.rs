//! Convenient prelude: import the most commonly used traits, types, and functions.
//!
//! Bring this into scope with:
//!
//! ```rust
//! use tivp::prelude::*;
//! ```
//!
//! Re-exports included:
//! - Polynomial algebra: `Poly`, `MPoly`, `MonomialBasis`.
//! - Numeric contracts: `Ring`, `Coeff`, `Real`, `Elementary`.
//! - System traits: `ScalarOde`, `VectorOde`, `Jacobian`, `ParsedRhs`.
//! - High-level API: the `integrate*`, `lyapunov*`, and `ads` entry points
//!   with their `Options`, solution types, `Status`, and `Error`.

pub use crate::core::{
    mpoly::{MPoly, MonomialBasis},
    ode::{Jacobian, ParsedFailure, ParsedRhs, ScalarOde, VectorOde},
    poly::Poly,
    scalar::{Coeff, Elementary, Real, Ring},
    status::{Status, Warning},
};
pub use crate::error::Error;
pub use crate::methods::ads::{collect_leaves, AdsHandle, AdsNode};
pub use crate::solve::{
    ads, integrate, integrate_grid, integrate_scalar, integrate_scalar_grid, lyapunov,
    lyapunov_grid, lyapunov_grid_with_jacobian, lyapunov_with_jacobian, AdsSummary,
    LyapSolution, Options, ScalarSolution, Solution,
};
