//! Column orthonormalization of the fundamental matrix.
//!
//! Both variants factor a row-major D×D matrix A into Q·R with orthonormal
//! columns Q and upper-triangular R with positive diagonal, overwrite A with
//! Q, and accumulate ln R_ii into the caller's running totals (the raw
//! material of the Lyapunov exponents). The modified variant reorthogonalizes
//! against already-updated columns and is the one used on the live step; the
//! classical variant projects against the original column and is adequate
//! when the columns are far from linear dependence.

use crate::core::scalar::Elementary;
use crate::error::Error;

fn column_norm<F: Elementary>(a: &[F], dim: usize, j: usize) -> F {
    let mut sum = F::from_f64(0.0);
    for i in 0..dim {
        let v = a[i * dim + j].clone();
        sum = sum + v.clone() * v;
    }
    sum.sqrt()
}

/// Modified Gram–Schmidt. Overwrites `a` with Q and adds ln R_ii to
/// `log_diag[i]`.
pub fn modified_gram_schmidt<F: Elementary>(
    a: &mut [F],
    log_diag: &mut [F],
    dim: usize,
) -> Result<(), Error> {
    debug_assert_eq!(a.len(), dim * dim);
    debug_assert_eq!(log_diag.len(), dim);
    for j in 0..dim {
        let nrm = column_norm(a, dim, j);
        if nrm.is_zero() {
            return Err(Error::DegenerateColumn(j));
        }
        log_diag[j] = log_diag[j].clone() + nrm.ln();
        for i in 0..dim {
            a[i * dim + j] = a[i * dim + j].clone() / nrm.clone();
        }
        for k in (j + 1)..dim {
            let mut dot = F::from_f64(0.0);
            for i in 0..dim {
                dot = dot + a[i * dim + j].clone() * a[i * dim + k].clone();
            }
            for i in 0..dim {
                a[i * dim + k] =
                    a[i * dim + k].clone() - dot.clone() * a[i * dim + j].clone();
            }
        }
    }
    Ok(())
}

/// Classical Gram–Schmidt: projections are taken against the unmodified
/// column. Same contract as [`modified_gram_schmidt`].
pub fn classical_gram_schmidt<F: Elementary>(
    a: &mut [F],
    log_diag: &mut [F],
    dim: usize,
) -> Result<(), Error> {
    debug_assert_eq!(a.len(), dim * dim);
    debug_assert_eq!(log_diag.len(), dim);
    let mut column = vec![F::from_f64(0.0); dim];
    for j in 0..dim {
        for (i, c) in column.iter_mut().enumerate() {
            *c = a[i * dim + j].clone();
        }
        for q in 0..j {
            let mut dot = F::from_f64(0.0);
            for (i, c) in column.iter().enumerate() {
                dot = dot + a[i * dim + q].clone() * c.clone();
            }
            for i in 0..dim {
                a[i * dim + j] = a[i * dim + j].clone() - dot.clone() * a[i * dim + q].clone();
            }
        }
        let nrm = column_norm(a, dim, j);
        if nrm.is_zero() {
            return Err(Error::DegenerateColumn(j));
        }
        log_diag[j] = log_diag[j].clone() + nrm.ln();
        for i in 0..dim {
            a[i * dim + j] = a[i * dim + j].clone() / nrm.clone();
        }
    }
    Ok(())
}
