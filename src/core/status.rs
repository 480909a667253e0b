//! Status codes and non-fatal warnings for integration runs.

/// Terminal status of an integration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The integration reached the final time.
    Success,
    /// The step budget was exhausted; the returned data covers the time
    /// span actually integrated.
    StepLimitReached,
}

/// Non-fatal conditions recorded on the solution, at most once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    /// `max_steps` accepted steps were taken before reaching the final time.
    StepLimitReached,
    /// The specialized coefficient routine failed its probe or a step and
    /// the generic recursion was substituted for the rest of the run.
    ParsedFallback,
}

/// Record a warning kind at most once.
pub(crate) fn record_warning(warnings: &mut Vec<Warning>, w: Warning) {
    if !warnings.contains(&w) {
        warnings.push(w);
    }
}
