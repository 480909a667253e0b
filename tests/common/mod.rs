//! Shared systems and helpers for the integration tests.
#![allow(dead_code)]

use tivp::prelude::*;

/// x' = x, scalar or componentwise.
pub struct Exponential;

impl ScalarOde<f64, f64> for Exponential {
    fn rhs(&self, x: &Poly<f64>, _t: &Poly<f64>) -> Poly<f64> {
        x.clone()
    }
}

impl<T: Coeff<f64>> VectorOde<f64, T> for Exponential {
    fn rhs(&self, dx: &mut [Poly<T>], x: &[Poly<T>], _t: &Poly<f64>) {
        for (d, xi) in dx.iter_mut().zip(x) {
            *d = xi.clone();
        }
    }
}

/// Pendulum: q' = p, p' = -sin q.
pub struct Pendulum;

impl VectorOde<f64, f64> for Pendulum {
    fn rhs(&self, dx: &mut [Poly<f64>], x: &[Poly<f64>], _t: &Poly<f64>) {
        dx[0] = x[1].clone();
        dx[1] = -&x[0].sin();
    }
}

pub fn sup_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .fold(0.0_f64, |m, (x, y)| m.max((x - y).abs()))
}
