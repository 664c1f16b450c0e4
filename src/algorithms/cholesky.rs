//! Cholesky factorization `A = L Lᵀ` of a symmetric positive-definite matrix.
//!
//! Only the lower triangle (diagonal included) of the packed buffer holds `L`; the
//! upper factor `Lᵀ` is read through transposed indexing and the strict upper triangle
//! of the buffer keeps its source values. Symmetry is not verified here: only the lower
//! triangle of the source is ever read.
//!
//! Two orderings are provided. [`cholesky_in_place`] works column by column,
//! [`cholesky_row_in_place`] row by row, which touches memory contiguously in a
//! row-major buffer. Both evaluate the same products in the same order, so their
//! outputs are bit-identical and either can be passed to [`cholesky_solve`].

use super::{checked_dim, checked_pivot, checked_system, solver_divisor};
use crate::{
    error::{DecompositionError, DecompositionErrorKind},
    matrix::DenseMatrix,
};

/// Takes the square root of a diagonal update, rejecting non-positive arguments.
#[inline]
fn diagonal_root(k: usize, argument: f64, pivot_tolerance: f64) -> Result<f64, DecompositionError> {
    if !(argument > 0.0) {
        return Err(DecompositionErrorKind::NotPositiveDefinite { k, value: argument }.into());
    }
    checked_pivot(k, argument.sqrt(), pivot_tolerance)
}

/// Overwrites the lower triangle of `a` with its Cholesky factor, column by column.
///
/// # Errors
/// Returns `NotPositiveDefinite` when a diagonal square-root argument is not strictly
/// positive, and `SingularPivot` when a diagonal of `L` is not above
/// `pivot_tolerance`.
pub fn cholesky_in_place(
    a: &mut DenseMatrix,
    pivot_tolerance: f64,
) -> Result<(), DecompositionError> {
    let d = checked_dim(a)?;
    for k in 0..d {
        let sum: f64 = (0..k).map(|p| a[(k, p)] * a[(k, p)]).sum();
        let pivot = diagonal_root(k, a[(k, k)] - sum, pivot_tolerance)?;
        a[(k, k)] = pivot;
        for i in (k + 1)..d {
            let sum: f64 = (0..k).map(|p| a[(i, p)] * a[(k, p)]).sum();
            a[(i, k)] = (a[(i, k)] - sum) / pivot;
        }
    }
    Ok(())
}

/// Overwrites the lower triangle of `a` with its Cholesky factor, row by row.
///
/// Row `k` is completed left to right: the off-diagonal entries first, each divided
/// by an already finished diagonal of an earlier row, then the diagonal itself.
pub fn cholesky_row_in_place(
    a: &mut DenseMatrix,
    pivot_tolerance: f64,
) -> Result<(), DecompositionError> {
    let d = checked_dim(a)?;
    for k in 0..d {
        for j in 0..k {
            let sum: f64 = (0..j).map(|p| a[(k, p)] * a[(j, p)]).sum();
            a[(k, j)] = (a[(k, j)] - sum) / a[(j, j)];
        }
        let sum: f64 = (0..k).map(|p| a[(k, p)] * a[(k, p)]).sum();
        a[(k, k)] = diagonal_root(k, a[(k, k)] - sum, pivot_tolerance)?;
    }
    Ok(())
}

/// Writes the column-oriented Cholesky factorization of `src` into `dst`.
pub fn cholesky(
    src: &DenseMatrix,
    dst: &mut DenseMatrix,
    pivot_tolerance: f64,
) -> Result<(), DecompositionError> {
    dst.copy_from(src)?;
    cholesky_in_place(dst, pivot_tolerance)
}

/// Writes the row-oriented Cholesky factorization of `src` into `dst`.
pub fn cholesky_row(
    src: &DenseMatrix,
    dst: &mut DenseMatrix,
    pivot_tolerance: f64,
) -> Result<(), DecompositionError> {
    dst.copy_from(src)?;
    cholesky_row_in_place(dst, pivot_tolerance)
}

/// Solves `A x = b` given the Cholesky factor `L` of `A` stored in the lower triangle
/// of `lu`. The backward pass reads column `i` of `L` as row `i` of `Lᵀ`.
pub fn cholesky_solve(
    lu: &DenseMatrix,
    b: &[f64],
    x: &mut [f64],
) -> Result<(), DecompositionError> {
    let d = checked_system(lu, b, x)?;

    let mut y = vec![0.0; d];
    for i in 0..d {
        let sum: f64 = (0..i).map(|k| lu[(i, k)] * y[k]).sum();
        y[i] = (b[i] - sum) / solver_divisor(lu, i)?;
    }

    for i in (0..d).rev() {
        let sum: f64 = ((i + 1)..d).map(|k| lu[(k, i)] * x[k]).sum();
        x[i] = (y[i] - sum) / solver_divisor(lu, i)?;
    }
    Ok(())
}
