//! Domain-splitting integration entry point.
//!
//! Advances every live leaf of the sub-solution tree by one Taylor step per
//! outer iteration, splitting a leaf's box when the extrapolated truncation
//! estimate of its freshly advanced state exceeds the split tolerance. The
//! tree is mutated in place; the returned summary carries the run counters
//! and status.

use crate::core::mpoly::MPoly;
use crate::core::ode::VectorOde;
use crate::core::poly::Poly;
use crate::core::scalar::Real;
use crate::core::status::{record_warning, Status, Warning};
use crate::error::Error;
use crate::methods::ads::{
    collect_leaves, extend_leaf, split_direction, split_leaf, AdsHandle,
};
use crate::methods::jet::{CoeffEngine, JetScratch};
use crate::methods::stepsize::step_size;
use crate::solve::integrate::{clamp_step, reached, validate_run};
use crate::solve::options::Options;

/// Counters and outcome of a domain-splitting run.
#[derive(Debug, Clone)]
pub struct AdsSummary {
    /// Outer lock-step iterations performed.
    pub nsteps: usize,
    /// Box bisections performed.
    pub nsplits: usize,
    /// Leaves in the final tree.
    pub nleaves: usize,
    pub status: Status,
    pub warnings: Vec<Warning>,
}

/// Integrate a jet-transported system over the sub-domain tree rooted at
/// `root`, from `t0` until every leaf reaches `tmax`.
///
/// Every outer iteration sweeps a frozen snapshot of the live leaves; each
/// leaf is advanced by one Taylor step on its own scratch, then either
/// extended with a same-box child or bisected along the direction with the
/// largest extrapolated truncation estimate. Children enter the sweep on
/// the next iteration. Bisection stops once `max_splits` boxes have been
/// split; the step budget counts outer iterations.
pub fn ads<F, S>(
    f: &S,
    root: &AdsHandle<F>,
    t0: F,
    tmax: F,
    order: usize,
    stol: f64,
    abstol: f64,
    options: Options,
) -> Result<AdsSummary, Error>
where
    F: Real,
    S: VectorOde<F, MPoly<F>>,
{
    validate_run(order, abstol, &options)?;
    if options.max_splits == 0 {
        return Err(Error::MaxSplitsMustBePositive);
    }
    if stol < 0.0 || stol.is_nan() {
        return Err(Error::InvalidTolerance(stol));
    }
    root.borrow_mut().t = t0.clone();
    let forward = tmax >= t0;

    let mut warnings = Vec::new();
    let mut nsplits = 0usize;
    let mut outer = 0usize;
    let mut status = Status::Success;

    loop {
        // Freeze the leaf list before stepping: children attached during
        // the sweep are first visited on the next iteration.
        let snapshot = collect_leaves(root);
        let mut live: Vec<AdsHandle<F>> = Vec::with_capacity(snapshot.len());
        for leaf in snapshot {
            let mut node = leaf.borrow_mut();
            if !node.is_active() {
                continue;
            }
            if reached(&node.t, &tmax, forward) {
                node.active = false;
                continue;
            }
            drop(node);
            live.push(leaf);
        }
        if live.is_empty() {
            break;
        }
        if outer >= options.max_steps {
            status = Status::StepLimitReached;
            record_warning(&mut warnings, Warning::StepLimitReached);
            break;
        }

        for leaf in live {
            step_leaf(
                f, &leaf, &tmax, forward, order, stol, abstol, &options,
                &mut nsplits, &mut warnings,
            );
        }
        outer += 1;
    }

    let nleaves = collect_leaves(root).len();
    Ok(AdsSummary {
        nsteps: outer,
        nsplits,
        nleaves,
        status,
        warnings,
    })
}

/// Advance one leaf by one Taylor step and attach its successor node(s).
///
/// Each leaf owns an independent scratch set (time polynomial, state and
/// derivative polynomials, coefficient engine), so the order of leaf visits
/// within a sweep cannot influence the results.
fn step_leaf<F, S>(
    f: &S,
    leaf: &AdsHandle<F>,
    tmax: &F,
    forward: bool,
    order: usize,
    stol: f64,
    abstol: f64,
    options: &Options,
    nsplits: &mut usize,
    warnings: &mut Vec<Warning>,
) where
    F: Real,
    S: VectorOde<F, MPoly<F>>,
{
    let (t_leaf, mut x) = {
        let node = leaf.borrow();
        let x: Vec<Poly<MPoly<F>>> = node
            .state
            .iter()
            .map(|c| Poly::constant(c.clone(), order))
            .collect();
        (node.t.clone(), x)
    };
    let tpoly = Poly::variable(t_leaf.clone(), order);
    let mut scratch = JetScratch::new(&x);
    let mut engine = CoeffEngine::fresh(f, options.parse_eqs);
    engine.run(f, &mut x, &tpoly, &mut scratch, warnings);

    let h = step_size(&x, abstol);
    let (dt, clamped) = clamp_step(h, &t_leaf, tmax, forward);
    let t_new = if clamped {
        tmax.clone()
    } else {
        t_leaf + dt.clone()
    };
    let state_new: Vec<MPoly<F>> = x.iter().map(|p| p.eval(&dt)).collect();
    let flow = if options.dense { Some(x) } else { None };

    let dir = if *nsplits < options.max_splits {
        split_direction(&state_new, stol)
    } else {
        None
    };
    match dir {
        Some(dir) => {
            split_leaf(leaf, dir, t_new, state_new, flow);
            *nsplits += 1;
        }
        None => {
            extend_leaf(leaf, t_new, state_new, flow);
        }
    }
}
