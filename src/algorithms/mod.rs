//! Compact factorization kernels and their substitution solvers.
//!
//! ** NOTE: We recommend using the high-level API in [`crate::solvers`] instead. This
//! module is intended for callers that manage their own buffers.
//!
//! Each scheme comes in three pieces:
//!
//! - an in-place decomposition (`*_in_place`), where the source matrix is overwritten
//!   by its packed factorization;
//! - an out-of-place decomposition, which copies the source into the destination and
//!   then runs the in-place kernel;
//! - a forward/backward substitution solver writing into a caller-owned solution slice.
//!
//! Every kernel reads an element of the source before it writes that same element, so
//! the two decomposition forms produce bit-identical buffers. Elements that a scheme
//! does not compute (the strict upper triangle for Cholesky) keep their source values.
//!
//! No pivoting is performed. A zero pivot is reported as
//! [`DecompositionErrorKind::SingularPivot`] instead of producing `NaN`/`Inf`.

pub mod cholesky;
pub mod crout;
pub mod doolittle;

use crate::{
    error::{DecompositionError, DecompositionErrorKind},
    matrix::DenseMatrix,
};

/// Checks that `a` has at least one row and returns its dimension.
pub(crate) fn checked_dim(a: &DenseMatrix) -> Result<usize, DecompositionError> {
    match a.dim() {
        0 => Err(DecompositionErrorKind::InputError(
            "The matrix dimension must be at least 1.".to_string(),
        )
        .into()),
        d => Ok(d),
    }
}

/// Checks the shapes of a factorization, a right-hand side and a solution buffer
/// against each other and returns the dimension.
pub(crate) fn checked_system(
    lu: &DenseMatrix,
    b: &[f64],
    x: &[f64],
) -> Result<usize, DecompositionError> {
    let d = checked_dim(lu)?;
    for (param_name, len) in [("b", b.len()), ("x", x.len())] {
        if len != d {
            return Err(DecompositionErrorKind::DimensionMismatch {
                param_name: param_name.to_string(),
                expected: d,
                actual: len,
            }
            .into());
        }
    }
    Ok(d)
}

/// Rejects a pivot whose magnitude is not strictly above `tolerance`. NaN pivots
/// are rejected as well.
#[inline]
pub(crate) fn checked_pivot(k: usize, pivot: f64, tolerance: f64) -> Result<f64, DecompositionError> {
    if pivot.abs() > tolerance {
        Ok(pivot)
    } else {
        Err(DecompositionErrorKind::SingularPivot { k, value: pivot }.into())
    }
}

/// Diagonal entry `i` of a factorization a solver is about to divide by.
#[inline]
pub(crate) fn solver_divisor(lu: &DenseMatrix, i: usize) -> Result<f64, DecompositionError> {
    checked_pivot(i, lu[(i, i)], 0.0)
}
