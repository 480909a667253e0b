//! Example of a librating pendulum: energy drift over many periods

use tivp::prelude::*;

struct Pendulum;

impl VectorOde<f64, f64> for Pendulum {
    fn rhs(&self, dx: &mut [Poly<f64>], x: &[Poly<f64>], _t: &Poly<f64>) {
        dx[0] = x[1].clone();
        dx[1] = -&x[0].sin();
    }
}

fn main() {
    let x0 = [1.3, 0.0];
    let energy = |q: f64, p: f64| 0.5 * p * p - q.cos();
    let e0 = energy(x0[0], x0[1]);

    match integrate(&Pendulum, &x0, 0.0, 50.0, 25, 1e-20, Options::default()) {
        Ok(sol) => {
            for (t, y) in sol.iter() {
                let drift = (energy(y[0], y[1]) - e0).abs();
                println!("t = {:8.4}, q = {:+.12}, p = {:+.12}, |dE| = {:.2e}", t, y[0], y[1], drift);
            }
            println!("steps: {}, status: {:?}", sol.nsteps, sol.status);
        }
        Err(e) => println!("integration failed: {}", e),
    }
}
