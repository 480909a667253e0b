//! Lyapunov-spectrum integration entry points.
//!
//! The trajectory and the fundamental matrix advance in lock step; after
//! every accepted step the matrix is reorthonormalized by modified
//! Gram–Schmidt and the log-diagonal of the triangular factor accumulates
//! into the time-averaged exponents λ_i(t) = Σ ln R_ii / (t - t_0).
//!
//! The Jacobian along the trajectory comes from the caller when a
//! [`Jacobian`] implementation is supplied, and otherwise from automatic
//! differentiation over first-order perturbation polynomials, which
//! requires the right-hand side to be implemented for both coefficient
//! types (`VectorOde<F, F>` and `VectorOde<F, MPoly<F>>`).

use crate::core::mpoly::MPoly;
use crate::core::ode::{Jacobian, VectorOde};
use crate::core::poly::Poly;
use crate::core::scalar::Elementary;
use crate::core::status::{record_warning, Status, Warning};
use crate::error::Error;
use crate::methods::jet::CoeffEngine;
use crate::methods::lyap::{
    identity_phi, renormalize, stability_matrix_ad, variational_coeffs, LyapScratch,
};
use crate::methods::stepsize::step_size;
use crate::solve::integrate::{clamp_step, grid_direction, reached, validate_run};
use crate::solve::options::Options;
use crate::solve::solution::LyapSolution;

/// Lyapunov spectrum over the natural step grid, with the Jacobian derived
/// by automatic differentiation.
pub fn lyapunov<F, S>(
    f: &S,
    x0: &[F],
    t0: F,
    tmax: F,
    order: usize,
    abstol: f64,
    options: Options,
) -> Result<LyapSolution<F>, Error>
where
    F: Elementary,
    S: VectorOde<F, F> + VectorOde<F, MPoly<F>>,
{
    lyap_driver(
        f, x0, t0, tmax, None, order, abstol, options, true,
        |f, x, t, scratch| stability_matrix_ad(f, x, t, scratch),
    )
}

/// Lyapunov spectrum sampled on a prescribed strictly monotonic grid (the
/// first point is the initial time); steps are clamped so that
/// renormalization coincides with every grid point.
pub fn lyapunov_grid<F, S>(
    f: &S,
    x0: &[F],
    grid: &[F],
    order: usize,
    abstol: f64,
    options: Options,
) -> Result<LyapSolution<F>, Error>
where
    F: Elementary,
    S: VectorOde<F, F> + VectorOde<F, MPoly<F>>,
{
    grid_direction(grid)?;
    let t0 = grid[0].clone();
    let tmax = grid[grid.len() - 1].clone();
    lyap_driver(
        f, x0, t0, tmax, Some(grid), order, abstol, options, true,
        |f, x, t, scratch| stability_matrix_ad(f, x, t, scratch),
    )
}

/// Natural-grid variant using a caller-supplied Jacobian.
pub fn lyapunov_with_jacobian<F, S, J>(
    f: &S,
    jac: &J,
    x0: &[F],
    t0: F,
    tmax: F,
    order: usize,
    abstol: f64,
    options: Options,
) -> Result<LyapSolution<F>, Error>
where
    F: Elementary,
    S: VectorOde<F, F>,
    J: Jacobian<F>,
{
    lyap_driver(
        f, x0, t0, tmax, None, order, abstol, options, false,
        |_f: &S, x, t, scratch: &mut LyapScratch<F>| {
            for p in scratch.jac.iter_mut() {
                p.clear();
            }
            jac.jacobian(&mut scratch.jac, x, t);
            Ok(())
        },
    )
}

/// Prescribed-grid variant using a caller-supplied Jacobian.
pub fn lyapunov_grid_with_jacobian<F, S, J>(
    f: &S,
    jac: &J,
    x0: &[F],
    grid: &[F],
    order: usize,
    abstol: f64,
    options: Options,
) -> Result<LyapSolution<F>, Error>
where
    F: Elementary,
    S: VectorOde<F, F>,
    J: Jacobian<F>,
{
    grid_direction(grid)?;
    let t0 = grid[0].clone();
    let tmax = grid[grid.len() - 1].clone();
    lyap_driver(
        f, x0, t0, tmax, Some(grid), order, abstol, options, false,
        |_f: &S, x, t, scratch: &mut LyapScratch<F>| {
            for p in scratch.jac.iter_mut() {
                p.clear();
            }
            jac.jacobian(&mut scratch.jac, x, t);
            Ok(())
        },
    )
}

fn lyap_driver<F, S, J>(
    f: &S,
    x0: &[F],
    t0: F,
    tmax: F,
    grid: Option<&[F]>,
    order: usize,
    abstol: f64,
    options: Options,
    with_ad: bool,
    mut fill_jac: J,
) -> Result<LyapSolution<F>, Error>
where
    F: Elementary,
    S: VectorOde<F, F>,
    J: FnMut(&S, &[Poly<F>], &Poly<F>, &mut LyapScratch<F>) -> Result<(), Error>,
{
    validate_run(order, abstol, &options)?;
    if x0.is_empty() {
        return Err(Error::EmptyState);
    }
    let dof = x0.len();
    let forward = tmax >= t0;

    let mut warnings = Vec::new();
    let mut x: Vec<Poly<F>> = x0
        .iter()
        .map(|c| Poly::constant(c.clone(), order))
        .collect();
    let mut tpoly = Poly::variable(t0.clone(), order);
    let mut scratch = LyapScratch::new(&x, with_ad);
    let mut engine = CoeffEngine::probe(f, &x, &tpoly, options.parse_eqs, &mut warnings);
    let mut phi = identity_phi::<F>(dof, order);
    let mut log_diag = vec![F::from_f64(0.0); dof];
    let zero_row = vec![F::from_f64(0.0); dof];

    // Natural mode grows its sample vectors; grid mode fills NaN-initialized
    // rows so an exhausted step budget still returns well-formed output.
    let nan = F::from_f64(f64::NAN);
    let (mut ts, mut ys, mut lams) = match grid {
        None => (
            vec![t0.clone()],
            vec![x0.to_vec()],
            vec![zero_row.clone()],
        ),
        Some(g) => {
            let mut ys = vec![vec![nan.clone(); dof]; g.len()];
            let mut lams = vec![vec![nan.clone(); dof]; g.len()];
            ys[0] = x0.to_vec();
            lams[0] = zero_row.clone();
            (g.to_vec(), ys, lams)
        }
    };

    let mut next_idx = 1usize;
    let mut t = t0.clone();
    let mut nsteps = 0usize;
    let mut status = Status::Success;

    loop {
        let done = match grid {
            None => reached(&t, &tmax, forward),
            Some(g) => next_idx >= g.len(),
        };
        if done {
            break;
        }
        if nsteps >= options.max_steps {
            status = Status::StepLimitReached;
            record_warning(&mut warnings, Warning::StepLimitReached);
            break;
        }
        engine.run(f, &mut x, &tpoly, &mut scratch.jet, &mut warnings);
        fill_jac(f, &x, &tpoly, &mut scratch)?;
        variational_coeffs(&scratch.jac, &mut phi, dof);
        // The step is governed by the trajectory components alone.
        let h = step_size(&x, abstol);
        let target = match grid {
            None => &tmax,
            Some(g) => &g[next_idx],
        };
        let (dt, clamped) = clamp_step(h, &t, target, forward);
        let xnew: Vec<F> = x.iter().map(|p| p.eval(&dt)).collect();
        renormalize(&mut phi, &dt, &mut log_diag, dof)?;
        for (p, c) in x.iter_mut().zip(&xnew) {
            p.reset_to(c.clone());
        }
        t = if clamped { target.clone() } else { t + dt };
        tpoly.set_coeff(0, t.clone());
        nsteps += 1;

        let elapsed = t.clone() - t0.clone();
        let lam_row: Vec<F> = log_diag
            .iter()
            .map(|s| s.clone() / elapsed.clone())
            .collect();
        match grid {
            None => {
                ts.push(t.clone());
                ys.push(xnew);
                lams.push(lam_row);
            }
            Some(_) => {
                if clamped {
                    ys[next_idx] = xnew;
                    lams[next_idx] = lam_row;
                    next_idx += 1;
                }
            }
        }
    }

    Ok(LyapSolution {
        t: ts,
        y: ys,
        exponents: lams,
        nsteps,
        status,
        warnings,
    })
}
