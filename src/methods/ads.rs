//! Automatic domain splitting: the sub-solution tree and its algebra.
//!
//! Each node covers a box of the initial-perturbation space and carries the
//! state as multivariate polynomials parameterized on the canonical box
//! [-1, 1]^V. Stepping extends a leaf with a same-box child; an excessive
//! truncation estimate instead bisects the box and attaches two children
//! holding the re-parameterized state. Nodes own their children and hold a
//! weak back-reference to their parent; nothing is removed from the tree
//! while a run is in progress.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::core::mpoly::MPoly;
use crate::core::poly::Poly;
use crate::core::scalar::Real;
use crate::error::Error;
use crate::methods::expfit::predict;

pub type AdsHandle<F> = Rc<RefCell<AdsNode<F>>>;

/// One sub-domain of the perturbation space at one time.
pub struct AdsNode<F: Real> {
    pub depth: usize,
    pub t: F,
    /// Box bounds in the user's coordinates, one pair per variable.
    pub lo: Vec<F>,
    pub hi: Vec<F>,
    /// State components as polynomials over the canonical box.
    pub state: Vec<MPoly<F>>,
    /// Time polynomial of the step that produced this node, kept when dense
    /// output is requested.
    pub flow: Option<Vec<Poly<MPoly<F>>>>,
    pub(crate) active: bool,
    parent: Weak<RefCell<AdsNode<F>>>,
    left: Option<AdsHandle<F>>,
    right: Option<AdsHandle<F>>,
}

impl<F: Real> AdsNode<F> {
    /// Root of a new tree from the user's box and polynomial state.
    pub fn root(
        lo: Vec<F>,
        hi: Vec<F>,
        state: Vec<MPoly<F>>,
        t: F,
    ) -> Result<AdsHandle<F>, Error> {
        if state.is_empty() {
            return Err(Error::EmptyState);
        }
        for (i, (l, h)) in lo.iter().zip(&hi).enumerate() {
            if !(h > l) {
                return Err(Error::EmptyBox(i));
            }
        }
        Ok(Rc::new(RefCell::new(Self {
            depth: 0,
            t,
            lo,
            hi,
            state,
            flow: None,
            active: true,
            parent: Weak::new(),
            left: None,
            right: None,
        })))
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn left(&self) -> Option<AdsHandle<F>> {
        self.left.clone()
    }

    pub fn right(&self) -> Option<AdsHandle<F>> {
        self.right.clone()
    }

    pub fn parent(&self) -> Option<AdsHandle<F>> {
        self.parent.upgrade()
    }
}

/// Snapshot of the current leaves, in tree order. The lock-step sweep
/// freezes this list before stepping so that children created mid-sweep
/// are first visited on the next iteration.
pub fn collect_leaves<F: Real>(root: &AdsHandle<F>) -> Vec<AdsHandle<F>> {
    let mut leaves = Vec::new();
    let mut stack = vec![Rc::clone(root)];
    while let Some(node) = stack.pop() {
        let n = node.borrow();
        if n.is_leaf() {
            drop(n);
            leaves.push(node);
        } else {
            if let Some(r) = &n.right {
                stack.push(Rc::clone(r));
            }
            if let Some(l) = &n.left {
                stack.push(Rc::clone(l));
            }
        }
    }
    leaves
}

/// Split decision for a freshly advanced state.
///
/// The trigger compares the exponential extrapolation of each component's
/// per-order 1-norms, one order past the truncation, against `stol`. The
/// direction maximizes the same extrapolation of the per-variable sums,
/// accumulated over components.
pub fn split_direction<F: Real>(state: &[MPoly<F>], stol: f64) -> Option<usize> {
    let basis = state[0].basis();
    let next = (basis.order() + 1) as f64;
    let triggered = state
        .iter()
        .any(|p| predict(&p.order_norms(), next) > stol);
    if !triggered {
        return None;
    }
    let mut best = 0;
    let mut best_total = f64::NEG_INFINITY;
    for v in 0..basis.vars() {
        let total: f64 = state
            .iter()
            .map(|p| predict(&p.variable_norms(v), next))
            .sum();
        if total > best_total {
            best_total = total;
            best = v;
        }
    }
    Some(best)
}

/// Extend a leaf with a single same-box child carrying the advanced time
/// and state.
pub fn extend_leaf<F: Real>(
    leaf: &AdsHandle<F>,
    t: F,
    state: Vec<MPoly<F>>,
    flow: Option<Vec<Poly<MPoly<F>>>>,
) -> AdsHandle<F> {
    let mut parent = leaf.borrow_mut();
    let child = Rc::new(RefCell::new(AdsNode {
        depth: parent.depth + 1,
        t,
        lo: parent.lo.clone(),
        hi: parent.hi.clone(),
        state,
        flow,
        active: true,
        parent: Rc::downgrade(leaf),
        left: None,
        right: None,
    }));
    parent.active = false;
    parent.left = Some(Rc::clone(&child));
    child
}

/// Bisect a leaf's box along `dir` and attach two children holding the
/// advanced state re-parameterized onto each half.
///
/// The canonical interval [-1, 1] of the split variable maps onto the
/// halves via ξ ↦ (ξ - 1)/2 (left) and ξ ↦ (ξ + 1)/2 (right); dense step
/// polynomials are recomposed coefficient-wise the same way.
pub fn split_leaf<F: Real>(
    leaf: &AdsHandle<F>,
    dir: usize,
    t: F,
    state: Vec<MPoly<F>>,
    flow: Option<Vec<Poly<MPoly<F>>>>,
) -> (AdsHandle<F>, AdsHandle<F>) {
    let mut parent = leaf.borrow_mut();
    let two = F::from_f64(2.0);
    let mid = (parent.lo[dir].clone() + parent.hi[dir].clone()) / two;
    let half = F::from_f64(0.5);

    let make_child = |offset: f64, lo: Vec<F>, hi: Vec<F>| {
        let shift = F::from_f64(offset);
        let sub_state: Vec<MPoly<F>> = state
            .iter()
            .map(|p| p.substitute_affine(dir, &half, &shift))
            .collect();
        let sub_flow = flow.as_ref().map(|polys| {
            polys
                .iter()
                .map(|p| {
                    Poly::from_coeffs(
                        p.coeffs()
                            .iter()
                            .map(|c| c.substitute_affine(dir, &half, &shift))
                            .collect(),
                    )
                })
                .collect()
        });
        Rc::new(RefCell::new(AdsNode {
            depth: parent.depth + 1,
            t: t.clone(),
            lo,
            hi,
            state: sub_state,
            flow: sub_flow,
            active: true,
            parent: Rc::downgrade(leaf),
            left: None,
            right: None,
        }))
    };

    let mut left_hi = parent.hi.clone();
    left_hi[dir] = mid.clone();
    let left = make_child(-0.5, parent.lo.clone(), left_hi);

    let mut right_lo = parent.lo.clone();
    right_lo[dir] = mid;
    let right = make_child(0.5, right_lo, parent.hi.clone());

    parent.active = false;
    parent.left = Some(Rc::clone(&left));
    parent.right = Some(Rc::clone(&right));
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mpoly::MonomialBasis;
    use crate::core::scalar::Coeff;

    fn linear_state(w: f64) -> (Vec<MPoly<f64>>, Vec<f64>, Vec<f64>) {
        let basis = MonomialBasis::new(2, 3);
        let x = MPoly::<f64>::variable(&basis, 0);
        let y = MPoly::<f64>::variable(&basis, 1);
        let state = vec![
            MPoly::constant(&basis, 0.25) + x.scale(&w),
            MPoly::constant(&basis, -0.5) + y.scale(&w),
        ];
        (state, vec![-1.0, -1.0], vec![1.0, 1.0])
    }

    #[test]
    fn root_rejects_inverted_box() {
        let (state, lo, _) = linear_state(0.1);
        let err = AdsNode::root(lo.clone(), vec![1.0, -2.0], state, 0.0);
        assert_eq!(err.err(), Some(Error::EmptyBox(1)));
    }

    #[test]
    fn split_preserves_pointwise_values() {
        let (state, lo, hi) = linear_state(0.1);
        let root = AdsNode::root(lo, hi, state.clone(), 0.0).unwrap();
        let (left, right) = split_leaf(&root, 0, 0.0, state.clone(), None);
        // A canonical point ξ of the left child is the parent's (ξ-1)/2.
        for &xi in &[-1.0, -0.25, 0.0, 1.0] {
            for comp in 0..2 {
                let l = left.borrow().state[comp].eval_point(&[xi, 0.3]);
                let p = state[comp].eval_point(&[0.5 * xi - 0.5, 0.3]);
                assert!((l - p).abs() < 1e-15);
                let r = right.borrow().state[comp].eval_point(&[xi, 0.3]);
                let p = state[comp].eval_point(&[0.5 * xi + 0.5, 0.3]);
                assert!((r - p).abs() < 1e-15);
            }
        }
        // Boxes partition the parent along the split direction.
        assert_eq!(left.borrow().hi[0], 0.0);
        assert_eq!(right.borrow().lo[0], 0.0);
        assert_eq!(left.borrow().depth, 1);
        assert!(!root.borrow().is_active());
        assert!(root.borrow().parent().is_none());
        assert!(left.borrow().parent().is_some());
    }

    #[test]
    fn leaves_snapshot_after_split_and_extend() {
        let (state, lo, hi) = linear_state(0.1);
        let root = AdsNode::root(lo, hi, state.clone(), 0.0).unwrap();
        let (left, _right) = split_leaf(&root, 1, 0.1, state.clone(), None);
        let child = extend_leaf(&left, 0.2, state.clone(), None);
        let leaves = collect_leaves(&root);
        assert_eq!(leaves.len(), 2);
        assert!(Rc::ptr_eq(&leaves[0], &child));
        assert!(!left.borrow().is_active());
    }

    #[test]
    fn no_split_below_threshold() {
        let (state, _, _) = linear_state(0.1);
        // A linear state predicts a tiny tail; a loose threshold keeps the
        // box whole and a zero threshold forces the split.
        assert_eq!(split_direction(&state, 1.0), None);
        assert!(split_direction(&state, 0.0).is_some());
    }
}
