use tivp::prelude::*;

/// Decoupled saddle: x' = 0.8 x, y' = -0.3 y, with exactly known spectrum.
struct Saddle;

impl<T: Coeff<f64>> VectorOde<f64, T> for Saddle {
    fn rhs(&self, dx: &mut [Poly<T>], x: &[Poly<T>], _t: &Poly<f64>) {
        dx[0] = x[0].scale(&0.8);
        dx[1] = x[1].scale(&-0.3);
    }
}

struct SaddleJacobian;

impl Jacobian<f64> for SaddleJacobian {
    fn jacobian(&self, jac: &mut [Poly<f64>], _x: &[Poly<f64>], _t: &Poly<f64>) {
        jac[0].set_coeff(0, 0.8);
        jac[3].set_coeff(0, -0.3);
    }
}

#[test]
fn saddle_spectrum_is_exact() {
    let sol = lyapunov(&Saddle, &[1.0, 1.0], 0.0, 5.0, 20, 1e-15, Options::default()).unwrap();
    assert_eq!(sol.status, Status::Success);
    let lam = sol.exponents.last().unwrap();
    assert!((lam[0] - 0.8).abs() < 1e-10);
    assert!((lam[1] + 0.3).abs() < 1e-10);
    // The trajectory itself is exponential growth/decay.
    let y = sol.y.last().unwrap();
    assert!((y[0] - (0.8_f64 * 5.0).exp()).abs() < 1e-9);
    assert!((y[1] - (-0.3_f64 * 5.0).exp()).abs() < 1e-12);
}

#[test]
fn user_jacobian_agrees_with_automatic_differentiation() {
    let ad = lyapunov(&Saddle, &[1.0, 1.0], 0.0, 5.0, 20, 1e-15, Options::default()).unwrap();
    let user = lyapunov_with_jacobian(
        &Saddle,
        &SaddleJacobian,
        &[1.0, 1.0],
        0.0,
        5.0,
        20,
        1e-15,
        Options::default(),
    )
    .unwrap();
    assert_eq!(ad.t.len(), user.t.len());
    let a = ad.exponents.last().unwrap();
    let b = user.exponents.last().unwrap();
    assert!((a[0] - b[0]).abs() < 1e-12);
    assert!((a[1] - b[1]).abs() < 1e-12);
}

#[test]
fn grid_variant_samples_at_grid_times() {
    let grid = [0.0, 1.0, 2.5, 5.0];
    let sol = lyapunov_grid(&Saddle, &[1.0, 1.0], &grid, 20, 1e-15, Options::default()).unwrap();
    assert_eq!(sol.t, grid);
    assert_eq!(sol.exponents[0], vec![0.0, 0.0]);
    for k in 1..grid.len() {
        assert!((sol.exponents[k][0] - 0.8).abs() < 1e-10);
        assert!((sol.exponents[k][1] + 0.3).abs() < 1e-10);
        assert!((sol.y[k][0] - (0.8 * grid[k]).exp()).abs() < 1e-9);
    }
}

/// Hénon–Heiles: H = (p1² + p2²)/2 + (q1² + q2²)/2 + q1²q2 - q2³/3.
struct HenonHeiles;

impl<T: Coeff<f64>> VectorOde<f64, T> for HenonHeiles {
    fn rhs(&self, dx: &mut [Poly<T>], x: &[Poly<T>], _t: &Poly<f64>) {
        // x = (q1, q2, p1, p2)
        dx[0] = x[2].clone();
        dx[1] = x[3].clone();
        dx[2] = -&(&x[0] + &(&x[0] * &x[1]).scale(&2.0));
        dx[3] = &(&x[1].square() - &x[0].square()) - &x[1];
    }
}

#[test]
fn henon_heiles_spectrum_properties() {
    // Energy 0.125 initial condition: kinetic only.
    let x0 = [0.0, 0.0, 0.5, 0.0];
    let sol = lyapunov(&HenonHeiles, &x0, 0.0, 150.0, 20, 1e-12, Options::default()).unwrap();
    assert_eq!(sol.status, Status::Success);

    let lam = sol.exponents.last().unwrap();
    // The leading exponent settles at a small magnitude at this energy.
    assert!(lam[0].abs() < 0.1);
    // Hamiltonian flow preserves phase-space volume: the exponents sum to
    // zero up to the accumulated orthonormalization error.
    let total: f64 = lam.iter().sum();
    assert!(total.abs() < 1e-6);

    // The trajectory conserves the energy it started with.
    let energy = |y: &[f64]| {
        0.5 * (y[2] * y[2] + y[3] * y[3])
            + 0.5 * (y[0] * y[0] + y[1] * y[1])
            + y[0] * y[0] * y[1]
            - y[1] * y[1] * y[1] / 3.0
    };
    let e_end = energy(sol.y.last().unwrap());
    assert!((e_end - 0.125).abs() < 1e-8);
}

#[test]
fn mismatched_perturbation_basis_is_rejected() {
    use tivp::methods::lyap::{stability_matrix_ad, LyapScratch};

    let x = vec![Poly::constant(0.1_f64, 6), Poly::constant(0.2_f64, 6)];
    let t = Poly::variable(0.0_f64, 6);
    // Three perturbation variables for two degrees of freedom.
    let mut scratch = LyapScratch::with_basis(&x, MonomialBasis::new(3, 1));
    let err = stability_matrix_ad(&Saddle, &x, &t, &mut scratch);
    assert_eq!(err, Err(Error::VariableCountMismatch { vars: 3, dof: 2 }));
}
