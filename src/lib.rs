//! Compact LU and Cholesky factorizations of dense square matrices.
//!
//! This crate factorizes a `d x d` matrix stored as a single row-major buffer into a
//! packed pair of triangular factors, then solves `A x = b` by forward and backward
//! substitution. Three classical compact schemes are implemented:
//!
//! - **Crout**: `L` keeps its diagonal, `U` has an implicit unit diagonal.
//! - **Doolittle**: `L` has an implicit unit diagonal, `U` keeps its diagonal.
//! - **Cholesky**: `A = L Lᵀ` for symmetric positive-definite `A`, in a column-oriented
//!   and a row-oriented variant that produce bit-identical factors.
//!
//! Every decomposition can run in place, overwriting the source matrix with its
//! factorization, or out of place into a separate destination; both forms give the same
//! result. No pivoting is performed: a zero pivot is reported as an error, and callers
//! are expected to supply matrices that factorize without row exchanges (for instance
//! diagonally dominant or positive-definite ones).
//!
//! ## Example Usage
//!
//! ```rust
//! use compact_lu::{DenseMatrix, FactorOptions, Scheme, factorize};
//!
//! let a = DenseMatrix::from_rows(&[
//!     [4.0, 1.0, 0.0],
//!     [1.0, 3.0, 1.0],
//!     [0.0, 1.0, 2.0],
//! ])
//! .unwrap();
//!
//! // Factorize once...
//! let cholesky = factorize(&a, Scheme::Cholesky, &FactorOptions::default()).unwrap();
//!
//! // ...and reuse the factorization for several right-hand sides.
//! for b in [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]] {
//!     let x = cholesky.solve(&b).unwrap();
//!     assert!(compact_lu::matrix::residual_norm(&a, &x, &b) < 1e-12);
//! }
//!
//! // The LU schemes agree with it.
//! let x_crout = compact_lu::solve(&a, &[1.0, 2.0, 3.0], Scheme::Crout, &FactorOptions::default())
//!     .unwrap();
//! let x_cholesky = cholesky.solve(&[1.0, 2.0, 3.0]).unwrap();
//! for (u, v) in x_crout.iter().zip(&x_cholesky) {
//!     assert!((u - v).abs() < 1e-12);
//! }
//! ```
//!
//! Callers managing their own buffers can use the kernels in [`algorithms`] directly.

pub mod algorithms;
pub mod error;
pub mod matrix;
pub mod options;
pub mod solvers;
pub mod utils;

// Re-export the main API for convenient access.
pub use error::{DecompositionError, DecompositionErrorKind};
pub use matrix::{DenseMatrix, DisplayVector, LinearOperator};
pub use options::FactorOptions;
pub use solvers::{Factorization, Scheme, factorize, factorize_in_place, solve};
