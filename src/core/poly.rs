//! Truncated univariate polynomials in time.
//!
//! `Poly<T>` holds the Taylor coefficients c_0..c_N of one state component
//! expanded around the current time. The degree N is fixed per instance and
//! all arithmetic truncates at N. Coefficients are normalized, i.e.
//! c_k = x^(k)(t_0) / k!, so the integration recurrence is a plain division
//! by the order.

use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub};

use crate::core::scalar::{Coeff, Elementary, Ring};

/// A truncated univariate polynomial with coefficients of type `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct Poly<T> {
    coeffs: Vec<T>,
}

impl<T: Ring> Poly<T> {
    /// Constant polynomial of the given degree: `[c, 0, ..., 0]`.
    pub fn constant(c: T, degree: usize) -> Self {
        let mut coeffs = vec![c.zero_like(); degree + 1];
        coeffs[0] = c;
        Self { coeffs }
    }

    /// Identity-plus-offset polynomial `c + τ`: `[c, 1, 0, ..., 0]`.
    ///
    /// The time polynomial of an expansion centered at `c`.
    pub fn variable(c: T, degree: usize) -> Self {
        let mut coeffs = vec![c.zero_like(); degree + 1];
        coeffs[1] = c.one_like();
        coeffs[0] = c;
        Self { coeffs }
    }

    /// Build from explicit coefficients (degree = `coeffs.len() - 1`).
    pub fn from_coeffs(coeffs: Vec<T>) -> Self {
        assert!(!coeffs.is_empty(), "a polynomial needs at least one coefficient");
        Self { coeffs }
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn coeff(&self, k: usize) -> &T {
        &self.coeffs[k]
    }

    pub fn coeff_mut(&mut self, k: usize) -> &mut T {
        &mut self.coeffs[k]
    }

    pub fn set_coeff(&mut self, k: usize, c: T) {
        self.coeffs[k] = c;
    }

    pub fn coeffs(&self) -> &[T] {
        &self.coeffs
    }

    /// Constant term c_0, the current value of the component.
    pub fn constant_term(&self) -> &T {
        &self.coeffs[0]
    }

    /// Reset to a constant polynomial around a new expansion point.
    ///
    /// Used when advancing a step: the evaluated state becomes the new c_0
    /// and every higher coefficient is cleared for the next jet computation.
    pub fn reset_to(&mut self, c: T) {
        for k in 1..self.coeffs.len() {
            self.coeffs[k] = c.zero_like();
        }
        self.coeffs[0] = c;
    }

    /// Clear every coefficient in place.
    pub fn clear(&mut self) {
        for k in 0..self.coeffs.len() {
            self.coeffs[k] = self.coeffs[k].zero_like();
        }
    }

    /// Copy of `self` with coefficients at index >= `len` cleared.
    ///
    /// The jet recursion hands the right-hand side a view of the time
    /// polynomial valid to the current order only.
    pub fn prefix(&self, len: usize) -> Self {
        let mut out = self.clone();
        for k in len..out.coeffs.len() {
            out.coeffs[k] = out.coeffs[k].zero_like();
        }
        out
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_zero())
    }

    /// Zero polynomial of the same degree and coefficient shape.
    pub fn zero_like(&self) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(|c| c.zero_like()).collect(),
        }
    }

    /// Constant-one polynomial of the same degree and coefficient shape.
    pub fn one_like(&self) -> Self {
        let mut out = self.zero_like();
        out.coeffs[0] = self.coeffs[0].one_like();
        out
    }

    /// Truncated product of two polynomials (Cauchy product up to the
    /// common degree).
    fn mul_trunc(&self, rhs: &Self) -> Self {
        let n = self.coeffs.len().min(rhs.coeffs.len());
        let mut out = Vec::with_capacity(n);
        for k in 0..n {
            let mut sum = self.coeffs[0].zero_like();
            for j in 0..=k {
                sum = sum + self.coeffs[j].clone() * rhs.coeffs[k - j].clone();
            }
            out.push(sum);
        }
        Self { coeffs: out }
    }

    pub fn square(&self) -> Self {
        self.mul_trunc(self)
    }

    /// `self + c` on the constant term only.
    pub fn add_constant(&self, c: &T) -> Self {
        let mut out = self.clone();
        out.coeffs[0] = out.coeffs[0].clone() + c.clone();
        out
    }

    /// Coefficient-wise scaling by a time-field scalar.
    pub fn scale<F>(&self, s: &F) -> Self
    where
        T: Coeff<F>,
    {
        Self {
            coeffs: self.coeffs.iter().map(|c| c.scale(s)).collect(),
        }
    }

    /// Horner evaluation at the scalar offset `dt` from the expansion point.
    pub fn eval<F>(&self, dt: &F) -> T
    where
        T: Coeff<F>,
    {
        let n = self.coeffs.len();
        let mut acc = self.coeffs[n - 1].clone();
        for k in (0..n - 1).rev() {
            acc = acc.scale(dt) + self.coeffs[k].clone();
        }
        acc
    }
}

impl<T: Ring> Add<&Poly<T>> for &Poly<T> {
    type Output = Poly<T>;

    fn add(self, rhs: &Poly<T>) -> Poly<T> {
        let n = self.coeffs.len().min(rhs.coeffs.len());
        Poly {
            coeffs: (0..n)
                .map(|k| self.coeffs[k].clone() + rhs.coeffs[k].clone())
                .collect(),
        }
    }
}

impl<T: Ring> Sub<&Poly<T>> for &Poly<T> {
    type Output = Poly<T>;

    fn sub(self, rhs: &Poly<T>) -> Poly<T> {
        let n = self.coeffs.len().min(rhs.coeffs.len());
        Poly {
            coeffs: (0..n)
                .map(|k| self.coeffs[k].clone() - rhs.coeffs[k].clone())
                .collect(),
        }
    }
}

impl<T: Ring> Mul<&Poly<T>> for &Poly<T> {
    type Output = Poly<T>;

    fn mul(self, rhs: &Poly<T>) -> Poly<T> {
        self.mul_trunc(rhs)
    }
}

impl<T: Ring> Neg for &Poly<T> {
    type Output = Poly<T>;

    fn neg(self) -> Poly<T> {
        Poly {
            coeffs: self.coeffs.iter().map(|c| -c.clone()).collect(),
        }
    }
}

impl<T: Ring> AddAssign<&Poly<T>> for Poly<T> {
    fn add_assign(&mut self, rhs: &Poly<T>) {
        let n = self.coeffs.len().min(rhs.coeffs.len());
        for k in 0..n {
            self.coeffs[k] = self.coeffs[k].clone() + rhs.coeffs[k].clone();
        }
    }
}

impl<T: Ring> MulAssign<&Poly<T>> for Poly<T> {
    fn mul_assign(&mut self, rhs: &Poly<T>) {
        *self = self.mul_trunc(rhs);
    }
}

/// Elementary functions via coefficient recurrences.
///
/// These require scalar coefficients: the recurrences divide by the leading
/// coefficient and apply the transcendental function to it.
impl<T: Elementary> Poly<T> {
    /// `1 / self`, requiring a nonzero constant term.
    ///
    /// c[k] = -(Σ_{j=1..k} a[j] c[k-j]) / a[0]
    pub fn recip(&self) -> Self {
        let n = self.coeffs.len();
        let a = &self.coeffs;
        let inv_a0 = a[0].one_like() / a[0].clone();
        let mut c = Vec::with_capacity(n);
        c.push(inv_a0.clone());
        for k in 1..n {
            let mut sum = a[0].zero_like();
            for j in 1..=k {
                sum = sum + a[j].clone() * c[k - j].clone();
            }
            c.push(-(sum * inv_a0.clone()));
        }
        Self { coeffs: c }
    }

    /// Taylor division `self / rhs`, requiring `rhs` to have a nonzero
    /// constant term.
    pub fn div(&self, rhs: &Self) -> Self {
        let n = self.coeffs.len().min(rhs.coeffs.len());
        let a = &self.coeffs;
        let b = &rhs.coeffs;
        let inv_b0 = b[0].one_like() / b[0].clone();
        let mut c: Vec<T> = Vec::with_capacity(n);
        for k in 0..n {
            let mut sum = a[k].clone();
            for j in 1..=k {
                sum = sum - b[j].clone() * c[k - j].clone();
            }
            c.push(sum * inv_b0.clone());
        }
        Self { coeffs: c }
    }

    /// c[k] = (1/k) Σ_{j=1..k} j a[j] c[k-j], c[0] = exp(a[0])
    pub fn exp(&self) -> Self {
        let n = self.coeffs.len();
        let a = &self.coeffs;
        let mut c = Vec::with_capacity(n);
        c.push(Elementary::exp(&a[0]));
        for k in 1..n {
            let mut sum = a[0].zero_like();
            for j in 1..=k {
                sum = sum + a[j].scale(&T::from_f64(j as f64)) * c[k - j].clone();
            }
            c.push(sum / T::from_f64(k as f64));
        }
        Self { coeffs: c }
    }

    /// c[k] = (a[k] - (1/k) Σ_{j=1..k-1} j c[j] a[k-j]) / a[0], c[0] = ln(a[0])
    pub fn ln(&self) -> Self {
        let n = self.coeffs.len();
        let a = &self.coeffs;
        let inv_a0 = a[0].one_like() / a[0].clone();
        let mut c = Vec::with_capacity(n);
        c.push(Elementary::ln(&a[0]));
        for k in 1..n {
            let mut sum = a[0].zero_like();
            for j in 1..k {
                sum = sum + c[j].scale(&T::from_f64(j as f64)) * a[k - j].clone();
            }
            c.push((a[k].clone() - sum / T::from_f64(k as f64)) * inv_a0.clone());
        }
        Self { coeffs: c }
    }

    /// c[k] = (a[k] - Σ_{j=1..k-1} c[j] c[k-j]) / (2 c[0]), c[0] = sqrt(a[0])
    pub fn sqrt(&self) -> Self {
        let n = self.coeffs.len();
        let a = &self.coeffs;
        let c0 = Elementary::sqrt(&a[0]);
        let inv_2c0 = c0.one_like() / (c0.clone() + c0.clone());
        let mut c = Vec::with_capacity(n);
        c.push(c0);
        for k in 1..n {
            let mut sum = a[0].zero_like();
            for j in 1..k {
                sum = sum + c[j].clone() * c[k - j].clone();
            }
            c.push((a[k].clone() - sum) * inv_2c0.clone());
        }
        Self { coeffs: c }
    }

    /// Coupled sine/cosine recurrence:
    ///
    /// s[k] =  (1/k) Σ_{j=1..k} j a[j] co[k-j]
    /// co[k] = -(1/k) Σ_{j=1..k} j a[j] s[k-j]
    pub fn sin_cos(&self) -> (Self, Self) {
        let n = self.coeffs.len();
        let a = &self.coeffs;
        let (s0, c0) = Elementary::sin_cos(&a[0]);
        let mut s = Vec::with_capacity(n);
        let mut co = Vec::with_capacity(n);
        s.push(s0);
        co.push(c0);
        for k in 1..n {
            let mut sum_s = a[0].zero_like();
            let mut sum_c = a[0].zero_like();
            for j in 1..=k {
                let aj = a[j].scale(&T::from_f64(j as f64));
                sum_s = sum_s + aj.clone() * co[k - j].clone();
                sum_c = sum_c + aj * s[k - j].clone();
            }
            let kf = T::from_f64(k as f64);
            s.push(sum_s / kf.clone());
            co.push(-(sum_c / kf));
        }
        (Self { coeffs: s }, Self { coeffs: co })
    }

    pub fn sin(&self) -> Self {
        self.sin_cos().0
    }

    pub fn cos(&self) -> Self {
        self.sin_cos().1
    }

    /// Integer power by repeated truncated multiplication.
    pub fn powi(&self, n: usize) -> Self {
        let mut out = self.one_like();
        for _ in 0..n {
            out = out.mul_trunc(self);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tpoly(t0: f64, degree: usize) -> Poly<f64> {
        Poly::variable(t0, degree)
    }

    #[test]
    fn exp_series_at_zero() {
        let e = tpoly(0.0, 6).exp();
        let mut fact = 1.0;
        for k in 0..=6 {
            if k > 0 {
                fact *= k as f64;
            }
            assert!((e.coeff(k) - 1.0 / fact).abs() < 1e-15);
        }
    }

    #[test]
    fn sin_cos_series_at_zero() {
        let (s, c) = tpoly(0.0, 7).sin_cos();
        assert!((s.coeff(1) - 1.0).abs() < 1e-15);
        assert!((s.coeff(3) + 1.0 / 6.0).abs() < 1e-15);
        assert!((s.coeff(5) - 1.0 / 120.0).abs() < 1e-15);
        assert!((c.coeff(0) - 1.0).abs() < 1e-15);
        assert!((c.coeff(2) + 0.5).abs() < 1e-15);
        assert!((c.coeff(4) - 1.0 / 24.0).abs() < 1e-15);
        // Pythagorean identity holds coefficient-wise.
        let ident = &s.square() + &c.square();
        assert!((ident.coeff(0) - 1.0).abs() < 1e-15);
        for k in 1..=7 {
            assert!(ident.coeff(k).abs() < 1e-14);
        }
    }

    #[test]
    fn division_round_trip() {
        let a = Poly::<f64>::from_coeffs(vec![1.5, -0.3, 0.25, 0.0, 1.0]);
        let b = Poly::<f64>::from_coeffs(vec![2.0, 1.0, -0.5, 0.125, 0.75]);
        let q = a.div(&b);
        let back = &q * &b;
        for k in 0..=4 {
            assert!((back.coeff(k) - a.coeff(k)).abs() < 1e-14);
        }
    }

    #[test]
    fn sqrt_recip_consistency() {
        let a = Poly::<f64>::from_coeffs(vec![4.0, 1.0, 0.5, -0.25]);
        let r = a.sqrt();
        let back = r.square();
        for k in 0..=3 {
            assert!((back.coeff(k) - a.coeff(k)).abs() < 1e-14);
        }
        let inv = a.recip();
        let prod = &inv * &a;
        assert!((prod.coeff(0) - 1.0).abs() < 1e-14);
        for k in 1..=3 {
            assert!(prod.coeff(k).abs() < 1e-14);
        }
    }

    #[test]
    fn log_of_exp_recovers_the_argument() {
        let a = Poly::<f64>::from_coeffs(vec![0.25, -1.0, 0.5, 2.0, -0.125]);
        let back = a.exp().ln();
        for k in 0..=4 {
            assert!((back.coeff(k) - a.coeff(k)).abs() < 1e-13);
        }
    }

    #[test]
    fn powi_matches_repeated_multiplication() {
        let a = Poly::from_coeffs(vec![1.0, 2.0, -0.5, 0.25]);
        let cubed = a.powi(3);
        let manual = &(&a * &a) * &a;
        assert_eq!(cubed, manual);
        assert_eq!(a.powi(0), a.one_like());
    }

    #[test]
    fn in_place_addition_and_multiplication() {
        let a = Poly::from_coeffs(vec![1.0, 1.0, 0.0]);
        let mut acc = a.clone();
        acc += &a;
        assert_eq!(acc, a.scale(&2.0));
        acc *= &a;
        // (2 + 2t)(1 + t) = 2 + 4t + 2t^2
        assert_eq!(acc, Poly::from_coeffs(vec![2.0, 4.0, 2.0]));
        let shifted = a.add_constant(&5.0);
        assert_eq!(shifted, Poly::from_coeffs(vec![6.0, 1.0, 0.0]));
    }

    #[test]
    fn horner_eval() {
        // 1 + 2t + 3t^2 at t = 0.5
        let p = Poly::<f64>::from_coeffs(vec![1.0, 2.0, 3.0]);
        assert!((p.eval(&0.5) - 2.75).abs() < 1e-15);
    }

    #[test]
    fn variable_and_reset() {
        let mut t = Poly::variable(1.25, 4);
        assert_eq!(*t.coeff(0), 1.25);
        assert_eq!(*t.coeff(1), 1.0);
        t.reset_to(2.5);
        assert_eq!(*t.coeff(0), 2.5);
        assert_eq!(*t.coeff(1), 0.0);
    }
}
