//! Solution types: sampled trajectories plus dense per-step evaluation.

use crate::core::poly::Poly;
use crate::core::scalar::{Coeff, Real};
use crate::core::status::{Status, Warning};

/// Sampled trajectory of a vector integration run.
///
/// `t[k]` and `y[k]` are the accepted-step samples (or the prescribed grid
/// in grid mode). When dense output was requested, `polys[k]` holds the
/// Taylor polynomials of the step from `t[k]` to `t[k+1]`, centered at
/// `t[k]`.
#[derive(Debug, Clone)]
pub struct Solution<F, T> {
    pub t: Vec<F>,
    pub y: Vec<Vec<T>>,
    pub polys: Option<Vec<Vec<Poly<T>>>>,
    /// Number of accepted steps.
    pub nsteps: usize,
    pub status: Status,
    pub warnings: Vec<Warning>,
}

impl<F: Real, T: Coeff<F>> Solution<F, T> {
    /// Evaluate the continuous solution at `t`.
    ///
    /// Returns `None` when dense output was disabled or `t` lies outside
    /// the integrated span.
    pub fn sol(&self, t: &F) -> Option<Vec<T>> {
        let polys = self.polys.as_ref()?;
        let k = self.find_segment(t)?;
        let dt = t.clone() - self.t[k].clone();
        Some(polys[k].iter().map(|p| p.eval(&dt)).collect())
    }

    /// Evaluate the continuous solution at many times; entries outside the
    /// span (or with dense output disabled) are `None`.
    pub fn sol_many(&self, ts: &[F]) -> Vec<Option<Vec<T>>> {
        ts.iter().map(|t| self.sol(t)).collect()
    }

    /// Span covered by the dense output, in integration order.
    pub fn sol_span(&self) -> Option<(F, F)> {
        self.polys.as_ref()?;
        match (self.t.first(), self.t.last()) {
            (Some(a), Some(b)) => Some((a.clone(), b.clone())),
            _ => None,
        }
    }

    /// Iterate over stored sample pairs (t_k, y_k).
    pub fn iter(&self) -> SolutionIter<'_, F, T> {
        SolutionIter {
            t_iter: self.t.iter(),
            y_iter: self.y.iter(),
        }
    }

    fn find_segment(&self, t: &F) -> Option<usize> {
        let n = self.polys.as_ref()?.len();
        let forward = match (self.t.first(), self.t.last()) {
            (Some(a), Some(b)) => b >= a,
            _ => return None,
        };
        for k in 0..n {
            let (a, b) = (&self.t[k], &self.t[k + 1]);
            let inside = if forward {
                a <= t && t <= b
            } else {
                b <= t && t <= a
            };
            if inside {
                return Some(k);
            }
        }
        None
    }
}

/// Iterator over (t, y) pairs of stored samples in a [`Solution`].
pub struct SolutionIter<'a, F, T> {
    t_iter: std::slice::Iter<'a, F>,
    y_iter: std::slice::Iter<'a, Vec<T>>,
}

impl<'a, F, T> Iterator for SolutionIter<'a, F, T> {
    type Item = (&'a F, &'a [T]);

    fn next(&mut self) -> Option<Self::Item> {
        match (self.t_iter.next(), self.y_iter.next()) {
            (Some(t), Some(y)) => Some((t, y.as_slice())),
            _ => None,
        }
    }
}

/// Sampled trajectory of a scalar integration run.
#[derive(Debug, Clone)]
pub struct ScalarSolution<F, T> {
    pub t: Vec<F>,
    pub y: Vec<T>,
    pub polys: Option<Vec<Poly<T>>>,
    pub nsteps: usize,
    pub status: Status,
    pub warnings: Vec<Warning>,
}

impl<F: Real, T: Coeff<F>> ScalarSolution<F, T> {
    /// Evaluate the continuous solution at `t`; `None` outside the span or
    /// without dense output.
    pub fn sol(&self, t: &F) -> Option<T> {
        let polys = self.polys.as_ref()?;
        let forward = match (self.t.first(), self.t.last()) {
            (Some(a), Some(b)) => b >= a,
            _ => return None,
        };
        for k in 0..polys.len() {
            let (a, b) = (&self.t[k], &self.t[k + 1]);
            let inside = if forward {
                a <= t && t <= b
            } else {
                b <= t && t <= a
            };
            if inside {
                let dt = t.clone() - self.t[k].clone();
                return Some(polys[k].eval(&dt));
            }
        }
        None
    }
}

/// Trajectory plus time-averaged Lyapunov exponents.
///
/// `exponents[k][i]` is λ_i at time `t[k]`; the row at t_0 is zero by
/// convention (no elapsed time to average over).
#[derive(Debug, Clone)]
pub struct LyapSolution<F> {
    pub t: Vec<F>,
    pub y: Vec<Vec<F>>,
    pub exponents: Vec<Vec<F>>,
    pub nsteps: usize,
    pub status: Status,
    pub warnings: Vec<Warning>,
}
