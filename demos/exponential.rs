//! Example of integrating exponential growth with dense output

use tivp::prelude::*;

struct Growth;

impl VectorOde<f64, f64> for Growth {
    fn rhs(&self, dx: &mut [Poly<f64>], x: &[Poly<f64>], _t: &Poly<f64>) {
        for (d, xi) in dx.iter_mut().zip(x) {
            *d = xi.clone();
        }
    }
}

fn main() {
    let opts = Options::builder().max_steps(100).build();
    match integrate(&Growth, &[0.5], 0.0, 1.0, 25, 1e-20, opts) {
        Ok(sol) => {
            for (t, y) in sol.iter() {
                println!("t = {:.6}, x = {:.15}", t, y[0]);
            }
            let exact = 0.5 * 1.0_f64.exp();
            let last = sol.y.last().unwrap()[0];
            println!("steps: {}, error vs 0.5*e: {:.3e}", sol.nsteps, (last - exact).abs());
            // Dense evaluation between the accepted steps
            if let Some(y) = sol.sol(&0.5) {
                println!("x(0.5) = {:.15} (exact {:.15})", y[0], 0.5 * 0.5_f64.exp());
            }
        }
        Err(e) => println!("integration failed: {}", e),
    }
}
