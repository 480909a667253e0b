//! Options for the Taylor integration entry points

use bon::Builder;

/// Run options shared by the integration entry points.
///
/// ```
/// use tivp::prelude::*;
///
/// let opts = Options::builder().max_steps(2000).dense(false).build();
/// assert_eq!(opts.max_steps, 2000);
/// assert!(opts.parse_eqs);
/// ```
#[derive(Builder, Debug, Clone)]
pub struct Options {
    /// Upper bound on accepted steps per run. Exhausting it ends the run
    /// with a warning and a well-formed partial result.
    #[builder(default = 500)]
    pub max_steps: usize,
    /// Use a specialized coefficient routine registered by the system,
    /// when one is available.
    #[builder(default = true)]
    pub parse_eqs: bool,
    /// Keep the per-step polynomials: on the solution for dense evaluation,
    /// or on the tree nodes in a domain-splitting run.
    #[builder(default = true)]
    pub dense: bool,
    /// Upper bound on box bisections in a domain-splitting run.
    #[builder(default = 10)]
    pub max_splits: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options::builder().build()
    }
}
