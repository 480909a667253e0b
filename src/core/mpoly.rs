//! Truncated multivariate polynomials for jet transport.
//!
//! `MPoly<F>` is a dense polynomial in V perturbation variables truncated at
//! total degree K, used as the coefficient type of `Poly` when propagating a
//! neighborhood of initial conditions. All instances participating in one
//! computation share a `MonomialBasis`, which fixes the monomial enumeration
//! (graded, lexicographic within each degree) and the exponent-to-index map.

use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::core::scalar::{Coeff, Real, Ring};

/// Shared monomial enumeration for a fixed variable count and truncation order.
#[derive(Debug)]
pub struct MonomialBasis {
    vars: usize,
    order: usize,
    exps: Vec<Vec<u32>>,
    index: FxHashMap<Vec<u32>, usize>,
    degree_start: Vec<usize>,
}

impl MonomialBasis {
    /// Enumerate all monomials in `vars` variables of total degree <= `order`.
    pub fn new(vars: usize, order: usize) -> Arc<Self> {
        assert!(vars > 0, "a perturbation basis needs at least one variable");
        let mut exps: Vec<Vec<u32>> = Vec::new();
        let mut degree_start = Vec::with_capacity(order + 2);
        let mut scratch = vec![0u32; vars];
        for degree in 0..=order {
            degree_start.push(exps.len());
            enumerate_degree(vars, degree as u32, 0, &mut scratch, &mut exps);
        }
        degree_start.push(exps.len());
        let mut index = FxHashMap::default();
        for (i, e) in exps.iter().enumerate() {
            index.insert(e.clone(), i);
        }
        Arc::new(Self {
            vars,
            order,
            exps,
            index,
            degree_start,
        })
    }

    pub fn vars(&self) -> usize {
        self.vars
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Total number of monomials, C(vars + order, order).
    pub fn len(&self) -> usize {
        self.exps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exps.is_empty()
    }

    pub fn exponents(&self, i: usize) -> &[u32] {
        &self.exps[i]
    }

    pub fn total_degree(&self, i: usize) -> u32 {
        self.exps[i].iter().sum()
    }

    pub fn index_of(&self, exps: &[u32]) -> Option<usize> {
        self.index.get(exps).copied()
    }

    /// Index range of the homogeneous block of total degree `k`.
    pub fn degree_range(&self, k: usize) -> std::ops::Range<usize> {
        self.degree_start[k]..self.degree_start[k + 1]
    }
}

/// Fill `out` with all exponent tuples of the given remaining degree,
/// assigning variables from `var` onward (lexicographic within a degree).
fn enumerate_degree(
    vars: usize,
    remaining: u32,
    var: usize,
    scratch: &mut [u32],
    out: &mut Vec<Vec<u32>>,
) {
    if var == vars - 1 {
        scratch[var] = remaining;
        out.push(scratch.to_vec());
        return;
    }
    for e in (0..=remaining).rev() {
        scratch[var] = e;
        enumerate_degree(vars, remaining - e, var + 1, scratch, out);
    }
    scratch[var] = 0;
}

/// A dense multivariate polynomial over the scalar field `F`, truncated at
/// the total degree of its basis.
#[derive(Debug, Clone)]
pub struct MPoly<F> {
    basis: Arc<MonomialBasis>,
    coeffs: Vec<F>,
}

impl<F: Real> MPoly<F> {
    pub fn constant(basis: &Arc<MonomialBasis>, c: F) -> Self {
        let mut coeffs = vec![F::from_f64(0.0); basis.len()];
        coeffs[0] = c;
        Self {
            basis: Arc::clone(basis),
            coeffs,
        }
    }

    /// The perturbation variable ξ_i (coefficient one on its monomial).
    pub fn variable(basis: &Arc<MonomialBasis>, i: usize) -> Self {
        assert!(i < basis.vars());
        let mut e = vec![0u32; basis.vars()];
        e[i] = 1;
        let idx = basis
            .index_of(&e)
            .expect("degree-1 monomial missing from basis");
        let mut out = Self::constant(basis, F::from_f64(0.0));
        out.coeffs[idx] = F::from_f64(1.0);
        out
    }

    pub fn basis(&self) -> &Arc<MonomialBasis> {
        &self.basis
    }

    pub fn coeff(&self, i: usize) -> &F {
        &self.coeffs[i]
    }

    pub fn coeff_mut(&mut self, i: usize) -> &mut F {
        &mut self.coeffs[i]
    }

    /// Value at the center of the perturbation box.
    pub fn constant_term(&self) -> &F {
        &self.coeffs[0]
    }

    /// Coefficient of the degree-1 monomial in variable `j` (the (i, j)
    /// entry of a Jacobian when `self` is the i-th component of a lifted
    /// right-hand side).
    pub fn linear_coeff(&self, j: usize) -> F {
        let mut e = vec![0u32; self.basis.vars()];
        e[j] = 1;
        match self.basis.index_of(&e) {
            Some(idx) => self.coeffs[idx].clone(),
            None => F::from_f64(0.0),
        }
    }

    /// Evaluate at a point of the perturbation space.
    pub fn eval_point(&self, point: &[F]) -> F {
        assert_eq!(point.len(), self.basis.vars());
        let mut acc = F::from_f64(0.0);
        for (i, c) in self.coeffs.iter().enumerate() {
            if c.is_zero() {
                continue;
            }
            let mut term = c.clone();
            for (v, &e) in self.basis.exps[i].iter().enumerate() {
                for _ in 0..e {
                    term = term * point[v].clone();
                }
            }
            acc = acc + term;
        }
        acc
    }

    /// Substitute `ξ_j := a·ξ_j + b`, truncating at the basis order.
    ///
    /// This is the re-parameterization applied when a perturbation box is
    /// bisected: the canonical interval of the split variable is mapped
    /// onto each half while the other variables are untouched.
    pub fn substitute_affine(&self, j: usize, a: &F, b: &F) -> Self {
        assert!(j < self.basis.vars());
        let mut out = self.zero_like();
        let mut new_e = vec![0u32; self.basis.vars()];
        for (i, c) in self.coeffs.iter().enumerate() {
            if c.is_zero() {
                continue;
            }
            let e = &self.basis.exps[i];
            let ej = e[j];
            new_e.copy_from_slice(e);
            // (a ξ + b)^ej expanded binomially; every term keeps total
            // degree <= |e|, so no truncation loss occurs here.
            for m in 0..=ej {
                let mut factor = F::from_f64(binomial(ej, m));
                for _ in 0..m {
                    factor = factor * a.clone();
                }
                for _ in 0..(ej - m) {
                    factor = factor * b.clone();
                }
                new_e[j] = m;
                let idx = self
                    .basis
                    .index_of(&new_e)
                    .expect("substituted monomial missing from basis");
                out.coeffs[idx] = out.coeffs[idx].clone() + c.clone() * factor;
            }
        }
        out
    }

    /// Per-order 1-norms: entry k is the sum of |coefficient| over the
    /// homogeneous block of total degree k.
    pub fn order_norms(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.basis.order + 1];
        for k in 0..=self.basis.order {
            for i in self.basis.degree_range(k) {
                out[k] += self.coeffs[i].inf_norm();
            }
        }
        out
    }

    /// Per-variable sums: entry k is the sum of |coefficient| over the
    /// monomials whose exponent in `v` equals k.
    pub fn variable_norms(&self, v: usize) -> Vec<f64> {
        let mut out = vec![0.0; self.basis.order + 1];
        for (i, c) in self.coeffs.iter().enumerate() {
            out[self.basis.exps[i][v] as usize] += c.inf_norm();
        }
        out
    }

    fn assert_compatible(&self, other: &Self) {
        debug_assert!(
            self.basis.vars == other.basis.vars && self.basis.order == other.basis.order,
            "mixing polynomials from different bases"
        );
    }
}

fn binomial(n: u32, k: u32) -> f64 {
    let mut out = 1.0;
    for i in 0..k {
        out = out * (n - i) as f64 / (i + 1) as f64;
    }
    out
}

impl<F: Real> PartialEq for MPoly<F> {
    fn eq(&self, other: &Self) -> bool {
        self.basis.vars == other.basis.vars
            && self.basis.order == other.basis.order
            && self.coeffs == other.coeffs
    }
}

impl<F: Real> Add for MPoly<F> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.assert_compatible(&rhs);
        for (a, b) in self.coeffs.iter_mut().zip(rhs.coeffs) {
            *a = a.clone() + b;
        }
        self
    }
}

impl<F: Real> Sub for MPoly<F> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self.assert_compatible(&rhs);
        for (a, b) in self.coeffs.iter_mut().zip(rhs.coeffs) {
            *a = a.clone() - b;
        }
        self
    }
}

impl<F: Real> Neg for MPoly<F> {
    type Output = Self;

    fn neg(mut self) -> Self {
        for c in self.coeffs.iter_mut() {
            *c = -c.clone();
        }
        self
    }
}

impl<F: Real> Mul for MPoly<F> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.assert_compatible(&rhs);
        let basis = &self.basis;
        let mut out = self.zero_like();
        let order = basis.order as u32;
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            let da = basis.total_degree(i);
            let mut e = vec![0u32; basis.vars];
            for (j, b) in rhs.coeffs.iter().enumerate() {
                if b.is_zero() {
                    continue;
                }
                if da + basis.total_degree(j) > order {
                    continue;
                }
                for (v, x) in e.iter_mut().enumerate() {
                    *x = basis.exps[i][v] + basis.exps[j][v];
                }
                let idx = basis
                    .index_of(&e)
                    .expect("product monomial missing from basis");
                out.coeffs[idx] = out.coeffs[idx].clone() + a.clone() * b.clone();
            }
        }
        out
    }
}

impl<F: Real> Ring for MPoly<F> {
    fn zero_like(&self) -> Self {
        Self {
            basis: Arc::clone(&self.basis),
            coeffs: vec![F::from_f64(0.0); self.coeffs.len()],
        }
    }

    fn one_like(&self) -> Self {
        MPoly::constant(&self.basis, F::from_f64(1.0))
    }

    fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_zero())
    }

    fn div_order(&self, k: usize) -> Self {
        let kf = F::from_f64(k as f64);
        Self {
            basis: Arc::clone(&self.basis),
            coeffs: self.coeffs.iter().map(|c| c.clone() / kf.clone()).collect(),
        }
    }

    fn inf_norm(&self) -> f64 {
        self.coeffs.iter().fold(0.0, |m, c| m.max(c.inf_norm()))
    }
}

impl<F: Real> Coeff<F> for MPoly<F> {
    fn scale(&self, s: &F) -> Self {
        Self {
            basis: Arc::clone(&self.basis),
            coeffs: self.coeffs.iter().map(|c| c.clone() * s.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_counts() {
        // C(2 + 3, 3) = 10 monomials in 2 vars up to degree 3.
        let basis = MonomialBasis::new(2, 3);
        assert_eq!(basis.len(), 10);
        assert_eq!(basis.degree_range(0), 0..1);
        assert_eq!(basis.degree_range(1), 1..3);
        assert_eq!(basis.degree_range(2), 3..6);
        assert_eq!(basis.degree_range(3), 6..10);
    }

    #[test]
    fn product_truncates_at_order() {
        let basis = MonomialBasis::new(2, 2);
        let x = MPoly::<f64>::variable(&basis, 0);
        let y = MPoly::<f64>::variable(&basis, 1);
        let p = (x.clone() + y.clone()) * (x.clone() - y.clone());
        // x^2 - y^2
        assert_eq!(p.eval_point(&[2.0, 1.0]), 3.0);
        // Cubing truncates to zero at order 2.
        let cube = p.clone() * x;
        assert!(cube.is_zero());
    }

    #[test]
    fn linear_coeff_reads_jacobian_entry() {
        let basis = MonomialBasis::new(2, 2);
        let x = MPoly::<f64>::variable(&basis, 0);
        let y = MPoly::<f64>::variable(&basis, 1);
        let p = MPoly::constant(&basis, 3.0) + x.scale(&2.0) - y.scale(&0.5);
        assert_eq!(p.linear_coeff(0), 2.0);
        assert_eq!(p.linear_coeff(1), -0.5);
        assert_eq!(*p.constant_term(), 3.0);
    }

    #[test]
    fn affine_substitution_matches_pointwise() {
        let basis = MonomialBasis::new(2, 3);
        let x = MPoly::<f64>::variable(&basis, 0);
        let y = MPoly::<f64>::variable(&basis, 1);
        // p = 1 + x + x*y + y^3
        let p = MPoly::constant(&basis, 1.0)
            + x.clone()
            + x.clone() * y.clone()
            + y.clone() * y.clone() * y.clone();
        let q = p.substitute_affine(1, &0.5, &-0.5);
        for &(u, v) in &[(0.3, -0.8), (-1.0, 1.0), (0.0, 0.25)] {
            let direct = p.eval_point(&[u, 0.5 * v - 0.5]);
            let composed = q.eval_point(&[u, v]);
            assert!((direct - composed).abs() < 1e-14);
        }
    }

    #[test]
    fn norms_by_order_and_variable() {
        let basis = MonomialBasis::new(2, 2);
        let x = MPoly::<f64>::variable(&basis, 0);
        let y = MPoly::<f64>::variable(&basis, 1);
        let p = MPoly::constant(&basis, 2.0) + x.scale(&-3.0) + (x.clone() * y).scale(&4.0);
        let by_order = p.order_norms();
        assert_eq!(by_order, vec![2.0, 3.0, 4.0]);
        let by_x = p.variable_norms(0);
        assert_eq!(by_x, vec![2.0, 7.0, 0.0]);
        let by_y = p.variable_norms(1);
        assert_eq!(by_y, vec![5.0, 4.0, 0.0]);
    }
}
