//! Crout's compact LU scheme.
//!
//! The factorization `A = L U` is packed into a single buffer: `L` occupies the lower
//! triangle including the diagonal, `U` the strict upper triangle. The diagonal of `U`
//! is an implicit 1 and is not stored.

use super::{checked_dim, checked_pivot, checked_system, solver_divisor};
use crate::{error::DecompositionError, matrix::DenseMatrix};

/// Overwrites `a` with its Crout factorization.
///
/// For every step `k`, column `k` of `L` (diagonal included, not divided) is computed
/// first; its diagonal then becomes the divisor for row `k` of `U`.
///
/// # Errors
/// Returns `SingularPivot` as soon as a diagonal of `L` has magnitude not above
/// `pivot_tolerance` (an exact zero with the default of `0.0`). The contents of `a`
/// are then partially factorized.
pub fn crout_in_place(a: &mut DenseMatrix, pivot_tolerance: f64) -> Result<(), DecompositionError> {
    let d = checked_dim(a)?;
    for k in 0..d {
        for i in k..d {
            let sum: f64 = (0..k).map(|p| a[(i, p)] * a[(p, k)]).sum();
            a[(i, k)] -= sum;
        }
        let pivot = checked_pivot(k, a[(k, k)], pivot_tolerance)?;
        for j in (k + 1)..d {
            let sum: f64 = (0..k).map(|p| a[(k, p)] * a[(p, j)]).sum();
            a[(k, j)] = (a[(k, j)] - sum) / pivot;
        }
    }
    Ok(())
}

/// Writes the Crout factorization of `src` into `dst`, leaving `src` untouched.
pub fn crout(
    src: &DenseMatrix,
    dst: &mut DenseMatrix,
    pivot_tolerance: f64,
) -> Result<(), DecompositionError> {
    dst.copy_from(src)?;
    crout_in_place(dst, pivot_tolerance)
}

/// Solves `A x = b` given the packed Crout factorization `lu` of `A`.
///
/// Forward substitution divides by the explicit diagonal of `L`; backward
/// substitution uses the unit diagonal of `U`.
pub fn crout_solve(lu: &DenseMatrix, b: &[f64], x: &mut [f64]) -> Result<(), DecompositionError> {
    let d = checked_system(lu, b, x)?;

    let mut y = vec![0.0; d];
    for i in 0..d {
        let sum: f64 = (0..i).map(|k| lu[(i, k)] * y[k]).sum();
        y[i] = (b[i] - sum) / solver_divisor(lu, i)?;
    }

    for i in (0..d).rev() {
        let sum: f64 = ((i + 1)..d).map(|k| lu[(i, k)] * x[k]).sum();
        x[i] = y[i] - sum;
    }
    Ok(())
}
