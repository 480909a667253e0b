//! Librational pendulum round trip over one period, with the period
//! obtained by Taylor integration of the complete elliptic integral kernel.

use tivp::prelude::*;

mod common;
use common::{sup_distance, Pendulum};

/// Kernel of K(m): x' = 1 / sqrt(1 - m sin^2 t).
struct EllipticKernel {
    m: f64,
}

impl ScalarOde<f64, f64> for EllipticKernel {
    fn rhs(&self, x: &Poly<f64>, t: &Poly<f64>) -> Poly<f64> {
        let s2 = t.sin().square();
        let one = x.one_like();
        (&one - &s2.scale(&self.m)).sqrt().recip()
    }
}

/// K(m) by the arithmetic-geometric mean, as an independent reference.
fn elliptic_k_agm(m: f64) -> f64 {
    let mut a = 1.0_f64;
    let mut b = (1.0 - m).sqrt();
    while (a - b).abs() > 1e-17 {
        let an = 0.5 * (a + b);
        b = (a * b).sqrt();
        a = an;
    }
    std::f64::consts::PI / (2.0 * a)
}

#[test]
fn elliptic_integral_by_taylor_matches_agm() {
    let m = (0.65_f64).sin().powi(2);
    let sol = integrate_scalar(
        &EllipticKernel { m },
        0.0_f64,
        0.0,
        std::f64::consts::FRAC_PI_2,
        25,
        1e-20,
        Options::default(),
    )
    .unwrap();
    let k = *sol.y.last().unwrap();
    assert!((k - elliptic_k_agm(m)).abs() < 1e-13);
    // The dense scalar solution covers the whole quarter period.
    let at_end = sol.sol(&std::f64::consts::FRAC_PI_2).unwrap();
    assert!((at_end - k).abs() < 1e-14);
}

#[test]
fn one_librational_period_returns_the_state() {
    let amplitude = 1.3_f64;
    let m = (amplitude / 2.0).sin().powi(2);
    let ksol = integrate_scalar(
        &EllipticKernel { m },
        0.0_f64,
        0.0,
        std::f64::consts::FRAC_PI_2,
        25,
        1e-20,
        Options::default(),
    )
    .unwrap();
    let period = 4.0 * *ksol.y.last().unwrap();

    let x0 = [amplitude, 0.0];
    let sol = integrate(&Pendulum, &x0, 0.0, period, 25, 1e-20, Options::default()).unwrap();
    assert_eq!(sol.status, Status::Success);
    assert!(sol.nsteps <= 500);
    assert!(sup_distance(sol.y.last().unwrap(), &x0) < 1e-12);
}

#[test]
fn pendulum_energy_is_conserved_along_samples() {
    let energy = |q: f64, p: f64| 0.5 * p * p - q.cos();
    let x0 = [1.3, 0.0];
    let e0 = energy(x0[0], x0[1]);
    let sol = integrate(&Pendulum, &x0, 0.0, 20.0, 24, 1e-18, Options::default()).unwrap();
    for (_, y) in sol.iter() {
        assert!((energy(y[0], y[1]) - e0).abs() < 1e-12);
    }
}
