//! Errors for the Taylor integration entry points

/// Errors for validation of inputs and configuration
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The state vector is empty.
    EmptyState,
    /// The expansion order must be at least 2 for the step-size rules.
    OrderTooLow(usize),
    /// The absolute tolerance must be positive and finite.
    InvalidTolerance(f64),
    /// `max_steps` must be positive.
    MaxStepsMustBePositive,
    /// `max_splits` must be positive.
    MaxSplitsMustBePositive,
    /// A prescribed time grid must be strictly monotonic.
    GridNotMonotonic,
    /// A prescribed time grid needs at least two points.
    GridTooShort(usize),
    /// The perturbation basis has the wrong number of variables for the
    /// automatic-differentiation Jacobian (it must equal the number of
    /// degrees of freedom).
    VariableCountMismatch { vars: usize, dof: usize },
    /// A column of the fundamental matrix collapsed to zero norm during
    /// reorthonormalization.
    DegenerateColumn(usize),
    /// A sub-domain box has an empty or inverted side.
    EmptyBox(usize),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::EmptyState => write!(f, "state vector must have at least one component"),
            Error::OrderTooLow(n) => write!(f, "expansion order must be >= 2 (got {})", n),
            Error::InvalidTolerance(v) => {
                write!(f, "abstol must be positive and finite (got {})", v)
            }
            Error::MaxStepsMustBePositive => write!(f, "max_steps must be positive"),
            Error::MaxSplitsMustBePositive => write!(f, "max_splits must be positive"),
            Error::GridNotMonotonic => write!(f, "time grid is not strictly monotonic"),
            Error::GridTooShort(n) => {
                write!(f, "time grid needs at least two points (got {})", n)
            }
            Error::VariableCountMismatch { vars, dof } => write!(
                f,
                "perturbation variables ({}) must match degrees of freedom ({})",
                vars, dof
            ),
            Error::DegenerateColumn(i) => write!(
                f,
                "column {} of the fundamental matrix has zero norm; cannot orthonormalize",
                i
            ),
            Error::EmptyBox(i) => write!(f, "box side {} is empty or inverted", i),
        }
    }
}

impl std::error::Error for Error {}
