//! Variational-equation machinery for Lyapunov-spectrum integration.
//!
//! The joint system couples the trajectory x' = f(x, t) with the
//! fundamental matrix Φ' = J(x, t)·Φ, Φ(t_0) = I. The trajectory jet is
//! computed by the ordinary recursion; the Jacobian is either supplied by
//! the caller as time polynomials or derived automatically by lifting the
//! state to first-order multivariate polynomials; and the Φ coefficients
//! follow the matrix-vector recurrence below.

use std::sync::Arc;

use crate::core::mpoly::{MPoly, MonomialBasis};
use crate::core::ode::VectorOde;
use crate::core::poly::Poly;
use crate::core::scalar::{Elementary, Real};
use crate::error::Error;
use crate::methods::gram::modified_gram_schmidt;
use crate::methods::jet::JetScratch;

/// Scratch owned by a Lyapunov solver: the trajectory-jet buffers, the
/// Jacobian time polynomials, and (on the automatic-differentiation path)
/// the lifted state and derivative polynomials.
pub struct LyapScratch<F: Real> {
    pub(crate) jet: JetScratch<F>,
    pub(crate) jac: Vec<Poly<F>>,
    lifted: Option<LiftedScratch<F>>,
}

struct LiftedScratch<F: Real> {
    basis: Arc<MonomialBasis>,
    x: Vec<Poly<MPoly<F>>>,
    dx: Vec<Poly<MPoly<F>>>,
}

impl<F: Real> LyapScratch<F> {
    /// Build scratch for a state of `dof` components with the given degree.
    /// `with_ad` allocates the lifted buffers used when no user Jacobian is
    /// supplied, with one perturbation variable per degree of freedom.
    pub fn new(state: &[Poly<F>], with_ad: bool) -> Self {
        if with_ad {
            Self::with_basis(state, MonomialBasis::new(state.len(), 1))
        } else {
            Self {
                jet: JetScratch::new(state),
                jac: vec![state[0].zero_like(); state.len() * state.len()],
                lifted: None,
            }
        }
    }

    /// Build automatic-differentiation scratch over a caller-supplied
    /// perturbation basis. The basis must carry one variable per degree of
    /// freedom; [`stability_matrix_ad`] rejects any other shape.
    pub fn with_basis(state: &[Poly<F>], basis: Arc<MonomialBasis>) -> Self {
        let dof = state.len();
        let degree = state[0].degree();
        let zero: Poly<MPoly<F>> =
            Poly::constant(MPoly::constant(&basis, F::from_f64(0.0)), degree);
        Self {
            jet: JetScratch::new(state),
            jac: vec![state[0].zero_like(); dof * dof],
            lifted: Some(LiftedScratch {
                basis,
                x: vec![zero.clone(); dof],
                dx: vec![zero; dof],
            }),
        }
    }
}

/// Fill the Jacobian time polynomials by automatic differentiation: each
/// state component is perturbed by its own first-order variable, the
/// right-hand side is evaluated on the lifted polynomials, and the (i, j)
/// entry is read off as the ξ_j-linear part of component i.
///
/// Fails when the perturbation basis does not carry one variable per
/// degree of freedom.
pub fn stability_matrix_ad<F, S>(
    f: &S,
    x: &[Poly<F>],
    t: &Poly<F>,
    scratch: &mut LyapScratch<F>,
) -> Result<(), Error>
where
    F: Real,
    S: VectorOde<F, MPoly<F>>,
{
    let dof = x.len();
    let lifted = scratch
        .lifted
        .as_mut()
        .expect("automatic-differentiation scratch was not allocated");
    if lifted.basis.vars() != dof {
        return Err(Error::VariableCountMismatch {
            vars: lifted.basis.vars(),
            dof,
        });
    }
    let degree = x[0].degree();
    for i in 0..dof {
        for k in 0..=degree {
            let mut c = MPoly::constant(&lifted.basis, x[i].coeff(k).clone());
            if k == 0 {
                c = c + MPoly::variable(&lifted.basis, i);
            }
            lifted.x[i].set_coeff(k, c);
        }
        lifted.dx[i].clear();
    }
    f.rhs(&mut lifted.dx, &lifted.x, t);
    for i in 0..dof {
        for k in 0..=degree {
            let c = lifted.dx[i].coeff(k);
            for j in 0..dof {
                scratch.jac[i * dof + j].set_coeff(k, c.linear_coeff(j));
            }
        }
    }
    Ok(())
}

/// Matrix-vector Taylor recurrence for the fundamental matrix: with the
/// Jacobian entries and Φ held as degree-N time polynomials,
///
/// Φ_ab[ord+1] = (Σ_c J_ac ⊗ Φ_cb)[ord] / (ord+1),
///
/// where ⊗ is the truncated product. Coefficients of Φ up to `ord` are
/// already known when order `ord+1` is assigned, so the accumulation runs
/// in place over the Φ polynomials.
pub fn variational_coeffs<F: Real>(jac: &[Poly<F>], phi: &mut [Poly<F>], dof: usize) {
    let degree = phi[0].degree();
    for ord in 0..degree {
        for a in 0..dof {
            for b in 0..dof {
                let mut sum = F::from_f64(0.0);
                for c in 0..dof {
                    let j_ac = &jac[a * dof + c];
                    let phi_cb = &phi[c * dof + b];
                    for k in 0..=ord {
                        sum = sum + j_ac.coeff(k).clone() * phi_cb.coeff(ord - k).clone();
                    }
                }
                phi[a * dof + b].set_coeff(ord + 1, sum.div_order(ord + 1));
            }
        }
    }
}

/// Advance Φ across an accepted step: evaluate the Φ polynomials at the
/// step offset, orthonormalize the resulting matrix with modified
/// Gram–Schmidt, accumulate ln R_ii, and restart the polynomials from the
/// rotated matrix.
pub fn renormalize<F: Elementary>(
    phi: &mut [Poly<F>],
    dt: &F,
    log_diag: &mut [F],
    dof: usize,
) -> Result<(), Error> {
    let mut m: Vec<F> = phi.iter().map(|p| p.eval(dt)).collect();
    modified_gram_schmidt(&mut m, log_diag, dof)?;
    for (p, q) in phi.iter_mut().zip(m) {
        p.reset_to(q);
    }
    Ok(())
}

/// Φ(t_0) = I as degree-N polynomials, row-major.
pub fn identity_phi<F: Real>(dof: usize, degree: usize) -> Vec<Poly<F>> {
    let mut phi = Vec::with_capacity(dof * dof);
    for i in 0..dof {
        for j in 0..dof {
            let v = if i == j { 1.0 } else { 0.0 };
            phi.push(Poly::constant(F::from_f64(v), degree));
        }
    }
    phi
}

#[cfg(test)]
mod tests {
    use super::*;

    // x' = A x with constant A; the Jacobian polynomials must be the
    // constant entries of A.
    struct LinearSystem;

    const A: [f64; 4] = [0.5, -1.25, 2.0, 0.75];

    impl<T: crate::core::scalar::Coeff<f64>> VectorOde<f64, T> for LinearSystem {
        fn rhs(&self, dx: &mut [Poly<T>], x: &[Poly<T>], _t: &Poly<f64>) {
            dx[0] = &x[0].scale(&A[0]) + &x[1].scale(&A[1]);
            dx[1] = &x[0].scale(&A[2]) + &x[1].scale(&A[3]);
        }
    }

    #[test]
    fn ad_jacobian_of_linear_system_is_constant() {
        let x = vec![Poly::constant(0.3_f64, 5), Poly::constant(-0.7_f64, 5)];
        let t = Poly::variable(0.0_f64, 5);
        let mut scratch = LyapScratch::new(&x, true);
        stability_matrix_ad(&LinearSystem, &x, &t, &mut scratch).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                let p = &scratch.jac[i * 2 + j];
                assert!((p.coeff(0) - A[i * 2 + j]).abs() < 1e-15);
                for k in 1..=5 {
                    assert_eq!(*p.coeff(k), 0.0);
                }
            }
        }
    }

    #[test]
    fn variational_coeffs_scalar_exponential() {
        // dof = 1, J = a constant: Φ coefficients must be a^k/k!.
        let a = 0.8_f64;
        let jac = vec![Poly::constant(a, 6)];
        let mut phi = identity_phi::<f64>(1, 6);
        variational_coeffs(&jac, &mut phi, 1);
        let mut expect = 1.0;
        for k in 0..=6 {
            if k > 0 {
                expect *= a / k as f64;
            }
            assert!((phi[0].coeff(k) - expect).abs() < 1e-15);
        }
    }

    #[test]
    fn renormalize_keeps_orthonormal_columns() {
        // Φ = I + t·A evaluated at dt, then orthonormalized.
        let mut phi = identity_phi::<f64>(2, 3);
        for i in 0..2 {
            for j in 0..2 {
                phi[i * 2 + j].set_coeff(1, A[i * 2 + j]);
            }
        }
        let mut logs = vec![0.0_f64; 2];
        renormalize(&mut phi, &0.4, &mut logs, 2).unwrap();
        let q: Vec<f64> = phi.iter().map(|p| *p.constant_term()).collect();
        for p in 0..2 {
            for r in 0..2 {
                let dot: f64 = (0..2).map(|i| q[i * 2 + p] * q[i * 2 + r]).sum();
                let target = if p == r { 1.0 } else { 0.0 };
                assert!((dot - target).abs() < 1e-14);
            }
        }
        // Higher coefficients are cleared for the next step.
        assert_eq!(*phi[1].coeff(1), 0.0);
    }
}
