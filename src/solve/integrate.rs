//! Taylor-series integration drivers: natural-grid and prescribed-grid.
//!
//! Each accepted step computes the state jet to the working order, derives
//! the step from the top-coefficient norms against `abstol`, clamps it so
//! the run does not overshoot the final time, and advances by evaluating
//! the step polynomials at the step offset. Backward integration follows
//! from the sign of `tmax - t0`; internally the step magnitude is kept
//! non-negative until the clamp applies the direction.

use crate::core::ode::{ScalarOde, VectorOde};
use crate::core::poly::Poly;
use crate::core::scalar::{Coeff, Real};
use crate::core::status::{record_warning, Status, Warning};
use crate::error::Error;
use crate::methods::jet::{jet_coeffs_scalar, CoeffEngine, JetScratch};
use crate::methods::stepsize::step_size;
use crate::solve::options::Options;
use crate::solve::solution::{ScalarSolution, Solution};

pub(crate) fn validate_run(order: usize, abstol: f64, options: &Options) -> Result<(), Error> {
    if order < 2 {
        return Err(Error::OrderTooLow(order));
    }
    if !(abstol > 0.0) || !abstol.is_finite() {
        return Err(Error::InvalidTolerance(abstol));
    }
    if options.max_steps == 0 {
        return Err(Error::MaxStepsMustBePositive);
    }
    Ok(())
}

pub(crate) fn reached<F: Real>(t: &F, tmax: &F, forward: bool) -> bool {
    if forward {
        t >= tmax
    } else {
        t <= tmax
    }
}

/// Signed step toward `tmax`: the tolerance-derived magnitude `h` unless the
/// remaining interval is shorter (or `h` is infinite, the stationary case),
/// in which case the step lands on `tmax` exactly.
pub(crate) fn clamp_step<F: Real>(h: f64, t: &F, tmax: &F, forward: bool) -> (F, bool) {
    let remaining = if forward {
        tmax.clone() - t.clone()
    } else {
        t.clone() - tmax.clone()
    };
    if !h.is_finite() {
        let dt = if forward { remaining } else { -remaining };
        return (dt, true);
    }
    let hf = F::from_f64(h);
    if hf >= remaining {
        let dt = if forward { remaining } else { -remaining };
        (dt, true)
    } else {
        (if forward { hf } else { -hf }, false)
    }
}

/// Validate a prescribed grid and return its direction.
pub(crate) fn grid_direction<F: Real>(grid: &[F]) -> Result<bool, Error> {
    if grid.len() < 2 {
        return Err(Error::GridTooShort(grid.len()));
    }
    let forward = grid[1] > grid[0];
    for pair in grid.windows(2) {
        let ok = if forward {
            pair[1] > pair[0]
        } else {
            pair[1] < pair[0]
        };
        if !ok {
            return Err(Error::GridNotMonotonic);
        }
    }
    Ok(forward)
}

fn nan_row<F: Real, T: Coeff<F>>(x0: &[T]) -> Vec<T> {
    let nan = F::from_f64(f64::NAN);
    x0.iter().map(|c| c.zero_like().scale(&nan)).collect()
}

/// Integrate the vector system x' = f(x, t) from `t0` to `tmax`, sampling
/// at the accepted steps.
pub fn integrate<F, T, S>(
    f: &S,
    x0: &[T],
    t0: F,
    tmax: F,
    order: usize,
    abstol: f64,
    options: Options,
) -> Result<Solution<F, T>, Error>
where
    F: Real,
    T: Coeff<F>,
    S: VectorOde<F, T>,
{
    validate_run(order, abstol, &options)?;
    if x0.is_empty() {
        return Err(Error::EmptyState);
    }
    let forward = tmax >= t0;
    let mut warnings = Vec::new();
    let mut x: Vec<Poly<T>> = x0
        .iter()
        .map(|c| Poly::constant(c.clone(), order))
        .collect();
    let mut tpoly = Poly::variable(t0.clone(), order);
    let mut scratch = JetScratch::new(&x);
    let mut engine = CoeffEngine::probe(f, &x, &tpoly, options.parse_eqs, &mut warnings);

    let mut ts = vec![t0.clone()];
    let mut ys = vec![x0.to_vec()];
    let mut polys: Option<Vec<Vec<Poly<T>>>> = if options.dense { Some(Vec::new()) } else { None };
    let mut t = t0;
    let mut nsteps = 0usize;
    let mut status = Status::Success;

    while !reached(&t, &tmax, forward) {
        if nsteps >= options.max_steps {
            status = Status::StepLimitReached;
            record_warning(&mut warnings, Warning::StepLimitReached);
            break;
        }
        engine.run(f, &mut x, &tpoly, &mut scratch, &mut warnings);
        let h = step_size(&x, abstol);
        let (dt, clamped) = clamp_step(h, &t, &tmax, forward);
        let xnew: Vec<T> = x.iter().map(|p| p.eval(&dt)).collect();
        if let Some(ps) = polys.as_mut() {
            ps.push(x.clone());
        }
        for (p, c) in x.iter_mut().zip(&xnew) {
            p.reset_to(c.clone());
        }
        t = if clamped { tmax.clone() } else { t + dt };
        tpoly.set_coeff(0, t.clone());
        ts.push(t.clone());
        ys.push(xnew);
        nsteps += 1;
    }

    Ok(Solution {
        t: ts,
        y: ys,
        polys,
        nsteps,
        status,
        warnings,
    })
}

/// Integrate the scalar ODE x' = f(x, t) from `t0` to `tmax`, sampling at
/// the accepted steps.
pub fn integrate_scalar<F, T, S>(
    f: &S,
    x0: T,
    t0: F,
    tmax: F,
    order: usize,
    abstol: f64,
    options: Options,
) -> Result<ScalarSolution<F, T>, Error>
where
    F: Real,
    T: Coeff<F>,
    S: ScalarOde<F, T>,
{
    validate_run(order, abstol, &options)?;
    let forward = tmax >= t0;
    let mut warnings = Vec::new();
    let mut x = Poly::constant(x0.clone(), order);
    let mut tpoly = Poly::variable(t0.clone(), order);

    let mut ts = vec![t0.clone()];
    let mut ys = vec![x0];
    let mut polys: Option<Vec<Poly<T>>> = if options.dense { Some(Vec::new()) } else { None };
    let mut t = t0;
    let mut nsteps = 0usize;
    let mut status = Status::Success;

    while !reached(&t, &tmax, forward) {
        if nsteps >= options.max_steps {
            status = Status::StepLimitReached;
            record_warning(&mut warnings, Warning::StepLimitReached);
            break;
        }
        jet_coeffs_scalar(f, &mut x, &tpoly);
        let h = step_size(std::slice::from_ref(&x), abstol);
        let (dt, clamped) = clamp_step(h, &t, &tmax, forward);
        let xnew = x.eval(&dt);
        if let Some(ps) = polys.as_mut() {
            ps.push(x.clone());
        }
        x.reset_to(xnew.clone());
        t = if clamped { tmax.clone() } else { t + dt };
        tpoly.set_coeff(0, t.clone());
        ts.push(t.clone());
        ys.push(xnew);
        nsteps += 1;
    }

    Ok(ScalarSolution {
        t: ts,
        y: ys,
        polys,
        nsteps,
        status,
        warnings,
    })
}

/// Integrate the vector system and return the state evaluated on a
/// prescribed strictly monotonic grid.
///
/// The first grid point is the initial time and the last is the final
/// time; the grid's direction selects forward or backward integration.
/// Values at points the run never reaches (step-limit exhaustion) are
/// NaN-filled.
pub fn integrate_grid<F, T, S>(
    f: &S,
    x0: &[T],
    grid: &[F],
    order: usize,
    abstol: f64,
    options: Options,
) -> Result<Solution<F, T>, Error>
where
    F: Real,
    T: Coeff<F>,
    S: VectorOde<F, T>,
{
    validate_run(order, abstol, &options)?;
    if x0.is_empty() {
        return Err(Error::EmptyState);
    }
    let forward = grid_direction(grid)?;
    let t0 = grid[0].clone();
    let tmax = grid[grid.len() - 1].clone();

    let mut warnings = Vec::new();
    let mut x: Vec<Poly<T>> = x0
        .iter()
        .map(|c| Poly::constant(c.clone(), order))
        .collect();
    let mut tpoly = Poly::variable(t0.clone(), order);
    let mut scratch = JetScratch::new(&x);
    let mut engine = CoeffEngine::probe(f, &x, &tpoly, options.parse_eqs, &mut warnings);

    let mut ys: Vec<Vec<T>> = vec![nan_row(x0); grid.len()];
    ys[0] = x0.to_vec();
    let mut next_idx = 1usize;
    let mut t = t0;
    let mut nsteps = 0usize;
    let mut status = Status::Success;

    while next_idx < grid.len() {
        if nsteps >= options.max_steps {
            status = Status::StepLimitReached;
            record_warning(&mut warnings, Warning::StepLimitReached);
            break;
        }
        engine.run(f, &mut x, &tpoly, &mut scratch, &mut warnings);
        let h = step_size(&x, abstol);
        let (dt, clamped) = clamp_step(h, &t, &tmax, forward);
        let t_new = if clamped { tmax.clone() } else { t.clone() + dt.clone() };
        // Emit every grid point inside (t, t_new] from the step polynomial
        // centered at t.
        while next_idx < grid.len() {
            let g = &grid[next_idx];
            let inside = if forward { g <= &t_new } else { g >= &t_new };
            if !inside {
                break;
            }
            let offset = g.clone() - t.clone();
            ys[next_idx] = x.iter().map(|p| p.eval(&offset)).collect();
            next_idx += 1;
        }
        let xnew: Vec<T> = x.iter().map(|p| p.eval(&dt)).collect();
        for (p, c) in x.iter_mut().zip(&xnew) {
            p.reset_to(c.clone());
        }
        t = t_new;
        tpoly.set_coeff(0, t.clone());
        nsteps += 1;
    }

    Ok(Solution {
        t: grid.to_vec(),
        y: ys,
        polys: None,
        nsteps,
        status,
        warnings,
    })
}

/// Scalar variant of [`integrate_grid`].
pub fn integrate_scalar_grid<F, T, S>(
    f: &S,
    x0: T,
    grid: &[F],
    order: usize,
    abstol: f64,
    options: Options,
) -> Result<ScalarSolution<F, T>, Error>
where
    F: Real,
    T: Coeff<F>,
    S: ScalarOde<F, T>,
{
    validate_run(order, abstol, &options)?;
    let forward = grid_direction(grid)?;
    let t0 = grid[0].clone();
    let tmax = grid[grid.len() - 1].clone();

    let mut warnings = Vec::new();
    let mut x = Poly::constant(x0.clone(), order);
    let mut tpoly = Poly::variable(t0.clone(), order);

    let nan = F::from_f64(f64::NAN);
    let mut ys: Vec<T> = (0..grid.len())
        .map(|_| x0.zero_like().scale(&nan))
        .collect();
    ys[0] = x0;
    let mut next_idx = 1usize;
    let mut t = t0;
    let mut nsteps = 0usize;
    let mut status = Status::Success;

    while next_idx < grid.len() {
        if nsteps >= options.max_steps {
            status = Status::StepLimitReached;
            record_warning(&mut warnings, Warning::StepLimitReached);
            break;
        }
        jet_coeffs_scalar(f, &mut x, &tpoly);
        let h = step_size(std::slice::from_ref(&x), abstol);
        let (dt, clamped) = clamp_step(h, &t, &tmax, forward);
        let t_new = if clamped { tmax.clone() } else { t.clone() + dt.clone() };
        while next_idx < grid.len() {
            let g = &grid[next_idx];
            let inside = if forward { g <= &t_new } else { g >= &t_new };
            if !inside {
                break;
            }
            let offset = g.clone() - t.clone();
            ys[next_idx] = x.eval(&offset);
            next_idx += 1;
        }
        let xnew = x.eval(&dt);
        x.reset_to(xnew);
        t = t_new;
        tpoly.set_coeff(0, t.clone());
        nsteps += 1;
    }

    Ok(ScalarSolution {
        t: grid.to_vec(),
        y: ys,
        polys: None,
        nsteps,
        status,
        warnings,
    })
}
