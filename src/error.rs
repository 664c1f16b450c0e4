//! This module defines the error types for the library.
//!
//! Every failure a decomposition or a substitution solver can report is collected
//! into a single enum, [`DecompositionErrorKind`], wrapped by the opaque public
//! [`DecompositionError`]. None of these errors is recovered from internally: there
//! is no pivoting or scaling strategy to fall back on, so they are returned to the
//! immediate caller as soon as they are detected.
use thiserror::Error;

/// Represents all possible errors that can occur while factorizing a matrix or
/// solving with a factorization.
#[derive(Error, Debug, Clone)]
#[error(transparent)]
pub struct DecompositionError(#[from] DecompositionErrorKind);

impl DecompositionError {
    /// Returns the kind of failure, for callers that need to branch on it.
    pub fn kind(&self) -> &DecompositionErrorKind {
        &self.0
    }
}

/// The distinct kinds of errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecompositionErrorKind {
    /// A pivot (diagonal element used as a divisor) is zero, NaN, or not above the
    /// configured tolerance. No pivoting is performed, so the factorization cannot
    /// proceed.
    #[error("Singular pivot at step {k}: diagonal value {value:e} cannot be used as a divisor.")]
    SingularPivot { k: usize, value: f64 },

    /// The argument of a Cholesky diagonal square root is not strictly positive,
    /// meaning the source matrix is not positive-definite.
    #[error(
        "Matrix is not positive-definite: square-root argument at step {k} is {value:e}."
    )]
    NotPositiveDefinite { k: usize, value: f64 },

    /// A buffer's length disagrees with the matrix dimension.
    #[error("Dimension mismatch: `{param_name}` has length {actual}, expected {expected}.")]
    DimensionMismatch {
        param_name: String,
        expected: usize,
        actual: usize,
    },

    /// The opt-in symmetry check for a Cholesky factorization failed.
    #[error(
        "Matrix is not symmetric: entries ({row}, {col}) and ({col}, {row}) differ by {difference:e}."
    )]
    NotSymmetric {
        row: usize,
        col: usize,
        difference: f64,
    },

    /// Indicates that an invalid input parameter was provided to a function.
    #[error("Invalid input parameter: {0}")]
    InputError(String),
}

impl PartialEq for DecompositionError {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
