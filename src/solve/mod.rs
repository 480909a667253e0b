//! High-level solve module: entry points, options, and solution types.

pub mod ads;
pub mod integrate;
pub mod lyapunov;
pub mod options;
pub mod solution;

// Required exports for the integration entry points
pub use ads::{ads, AdsSummary};
pub use integrate::{integrate, integrate_grid, integrate_scalar, integrate_scalar_grid};
pub use lyapunov::{
    lyapunov, lyapunov_grid, lyapunov_grid_with_jacobian, lyapunov_with_jacobian,
};
pub use options::Options;
pub use solution::{LyapSolution, ScalarSolution, Solution};
