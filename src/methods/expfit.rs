//! Exponential growth-law fit behind the domain-splitting estimate.
//!
//! The split criterion models a polynomial's per-order coefficient norms as
//! y_k ≈ A·exp(B·k) and extrapolates one order past the truncation to
//! estimate the discarded tail. The fit minimizes the squared residuals of
//! the nonzero samples with a damped Gauss–Newton iteration on (A, B),
//! Jacobian columns ∂y/∂A = e^{Bk} and ∂y/∂B = k·A·e^{Bk}, seeded by the
//! closed-form log-linear regression.

/// Fit `y_k ≈ a·exp(b·k)` to the nonzero entries of `ys`, where k is the
/// sample index. Returns `None` when fewer than two samples are nonzero
/// (the growth law is underdetermined).
pub fn fit_exponential(ys: &[f64]) -> Option<(f64, f64)> {
    let pts: Vec<(f64, f64)> = ys
        .iter()
        .enumerate()
        .filter(|(_, y)| **y != 0.0)
        .map(|(k, y)| (k as f64, y.abs()))
        .collect();
    if pts.len() < 2 {
        return None;
    }

    // Log-linear seed: ln y = ln a + b k by ordinary least squares.
    let n = pts.len() as f64;
    let (mut sk, mut sl, mut skk, mut skl) = (0.0, 0.0, 0.0, 0.0);
    for (k, y) in &pts {
        let l = y.ln();
        sk += k;
        sl += l;
        skk += k * k;
        skl += k * l;
    }
    let denom = n * skk - sk * sk;
    let mut b = (n * skl - sk * sl) / denom;
    let mut a = ((sl - b * sk) / n).exp();

    // Damped Gauss-Newton polish on the untransformed residuals.
    let cost_of = |a: f64, b: f64| -> f64 {
        pts.iter()
            .map(|(k, y)| {
                let r = a * (b * k).exp() - y;
                r * r
            })
            .sum::<f64>()
            * 0.5
    };
    let mut cost = cost_of(a, b);
    let mut mu = 1e-3;
    for _ in 0..60 {
        let (mut j11, mut j12, mut j22, mut g1, mut g2) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for (k, y) in &pts {
            let e = (b * k).exp();
            let r = a * e - y;
            let d_b = k * a * e;
            j11 += e * e;
            j12 += e * d_b;
            j22 += d_b * d_b;
            g1 += e * r;
            g2 += d_b * r;
        }
        if (g1 * g1 + g2 * g2).sqrt() < 1e-14 * (1.0 + cost) {
            break;
        }
        // Solve (J^T J + mu I) delta = -g for the 2x2 system.
        let m11 = j11 + mu;
        let m22 = j22 + mu;
        let det = m11 * m22 - j12 * j12;
        if det == 0.0 || !det.is_finite() {
            break;
        }
        let da = (-g1 * m22 + g2 * j12) / det;
        let db = (-g2 * m11 + g1 * j12) / det;
        let (a_new, b_new) = (a + da, b + db);
        let cost_new = cost_of(a_new, b_new);
        if cost_new.is_finite() && cost_new < cost {
            let shrunk = (da * da + db * db).sqrt() < 1e-14 * (1.0 + a.abs() + b.abs());
            a = a_new;
            b = b_new;
            cost = cost_new;
            mu *= 0.1;
            if shrunk {
                break;
            }
        } else {
            mu *= 10.0;
            if mu > 1e12 {
                break;
            }
        }
    }
    Some((a, b))
}

/// Predicted magnitude at sample index `k_next` under the fitted growth
/// law, or 0 when the fit is underdetermined.
pub fn predict(ys: &[f64], k_next: f64) -> f64 {
    match fit_exponential(ys) {
        Some((a, b)) => a * (b * k_next).exp(),
        None => 0.0,
    }
}
