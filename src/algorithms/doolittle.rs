//! Doolittle's compact LU scheme.
//!
//! The mirror image of Crout's scheme: `U` occupies the upper triangle including the
//! diagonal, `L` the strict lower triangle, and the diagonal of `L` is an implicit 1.

use super::{checked_dim, checked_pivot, checked_system, solver_divisor};
use crate::{error::DecompositionError, matrix::DenseMatrix};

/// Overwrites `a` with its Doolittle factorization.
///
/// Each step computes row `k` of `U` (diagonal included, not divided) and then uses
/// its diagonal as the divisor for column `k` of `L`.
///
/// # Errors
/// Returns `SingularPivot` when a diagonal of `U` has magnitude not above
/// `pivot_tolerance`.
pub fn doolittle_in_place(
    a: &mut DenseMatrix,
    pivot_tolerance: f64,
) -> Result<(), DecompositionError> {
    let d = checked_dim(a)?;
    for k in 0..d {
        for j in k..d {
            let sum: f64 = (0..k).map(|p| a[(k, p)] * a[(p, j)]).sum();
            a[(k, j)] -= sum;
        }
        let pivot = checked_pivot(k, a[(k, k)], pivot_tolerance)?;
        for i in (k + 1)..d {
            let sum: f64 = (0..k).map(|p| a[(i, p)] * a[(p, k)]).sum();
            a[(i, k)] = (a[(i, k)] - sum) / pivot;
        }
    }
    Ok(())
}

/// Writes the Doolittle factorization of `src` into `dst`.
pub fn doolittle(
    src: &DenseMatrix,
    dst: &mut DenseMatrix,
    pivot_tolerance: f64,
) -> Result<(), DecompositionError> {
    dst.copy_from(src)?;
    doolittle_in_place(dst, pivot_tolerance)
}

/// Solves `A x = b` given the packed Doolittle factorization `lu` of `A`.
pub fn doolittle_solve(
    lu: &DenseMatrix,
    b: &[f64],
    x: &mut [f64],
) -> Result<(), DecompositionError> {
    let d = checked_system(lu, b, x)?;

    // Unit lower diagonal: no division on the way down.
    let mut y = vec![0.0; d];
    for i in 0..d {
        let sum: f64 = (0..i).map(|k| lu[(i, k)] * y[k]).sum();
        y[i] = b[i] - sum;
    }

    for i in (0..d).rev() {
        let sum: f64 = ((i + 1)..d).map(|k| lu[(i, k)] * x[k]).sum();
        x[i] = (y[i] - sum) / solver_divisor(lu, i)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::test_support::{assert_close, mathews_system};
    use crate::error::DecompositionErrorKind;

    #[test]
    fn test_doolittle_solves_reference_system() {
        let (a, b, expected) = mathews_system();
        let mut lu = DenseMatrix::zeros(5);
        doolittle(&a, &mut lu, 0.0).unwrap();

        let mut x = vec![0.0; 5];
        doolittle_solve(&lu, &b, &mut x).unwrap();
        assert_close(&x, &expected, 1e-12);
    }

    #[test]
    fn test_doolittle_pivots() {
        // Gaussian elimination without row exchanges yields the same pivots.
        let (a, _, _) = mathews_system();
        let mut lu = a.clone();
        doolittle_in_place(&mut lu, 0.0).unwrap();
        let pivots: Vec<f64> = (0..5).map(|k| lu[(k, k)]).collect();
        assert_close(&pivots, &[2.0, 1.5, 7.0, 7.0 / 3.0, 2.0], 1e-12);
    }

    #[test]
    fn test_doolittle_packed_values() {
        let a = DenseMatrix::from_rows(&[[4.0, 2.0], [6.0, 7.0]]).unwrap();
        let mut lu = DenseMatrix::zeros(2);
        doolittle(&a, &mut lu, 0.0).unwrap();
        // L = [[1, 0], [1.5, 1]], U = [[4, 2], [0, 4]]
        assert_eq!(lu.as_slice(), &[4.0, 2.0, 1.5, 4.0]);
    }

    #[test]
    fn test_in_place_matches_out_of_place() {
        let (a, _, _) = mathews_system();
        let mut out_of_place = DenseMatrix::zeros(5);
        doolittle(&a, &mut out_of_place, 0.0).unwrap();

        let mut in_place = a.clone();
        doolittle_in_place(&mut in_place, 0.0).unwrap();
        assert_eq!(in_place, out_of_place);
    }

    #[test]
    fn test_zero_leading_pivot_is_reported() {
        let a = DenseMatrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap();
        let mut lu = DenseMatrix::zeros(2);
        let err = doolittle(&a, &mut lu, 0.0).unwrap_err();
        assert_eq!(
            err.kind(),
            &DecompositionErrorKind::SingularPivot { k: 0, value: 0.0 }
        );
    }

    #[test]
    fn test_solver_rejects_zero_diagonal() {
        // A hand-built factorization with a zero on U's diagonal.
        let lu = DenseMatrix::from_rows(&[[1.0, 2.0], [0.5, 0.0]]).unwrap();
        let mut x = vec![0.0; 2];
        let err = doolittle_solve(&lu, &[1.0, 1.0], &mut x).unwrap_err();
        assert!(matches!(
            err.kind(),
            DecompositionErrorKind::SingularPivot { k: 1, .. }
        ));
    }

    #[test]
    fn test_mismatched_destination_is_rejected() {
        let a = DenseMatrix::identity(3);
        let mut lu = DenseMatrix::zeros(2);
        let err = doolittle(&a, &mut lu, 0.0).unwrap_err();
        assert!(matches!(
            err.kind(),
            DecompositionErrorKind::DimensionMismatch { expected: 3, actual: 2, .. }
        ));
    }
}
