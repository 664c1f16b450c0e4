//! This module provides a high-level API for factorizing a dense matrix once and
//! solving `A x = b` for as many right-hand sides as needed.

use crate::{
    algorithms::{
        cholesky::{
            cholesky, cholesky_in_place, cholesky_row, cholesky_row_in_place, cholesky_solve,
        },
        crout::{crout, crout_in_place, crout_solve},
        doolittle::{doolittle, doolittle_in_place, doolittle_solve},
    },
    error::{DecompositionError, DecompositionErrorKind},
    matrix::{DenseMatrix, residual_norm},
    options::FactorOptions,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The compact factorization scheme to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scheme {
    /// `L` with explicit diagonal, `U` with unit diagonal.
    Crout,
    /// `L` with unit diagonal, `U` with explicit diagonal.
    Doolittle,
    /// `A = L Lᵀ`, computed column by column.
    Cholesky,
    /// `A = L Lᵀ`, computed row by row.
    CholeskyRow,
}

impl Scheme {
    /// Every scheme, in a fixed order.
    pub const ALL: [Scheme; 4] = [
        Scheme::Crout,
        Scheme::Doolittle,
        Scheme::Cholesky,
        Scheme::CholeskyRow,
    ];

    /// Whether the scheme requires a symmetric positive-definite source.
    pub fn is_symmetric(self) -> bool {
        matches!(self, Scheme::Cholesky | Scheme::CholeskyRow)
    }

    fn name(self) -> &'static str {
        match self {
            Scheme::Crout => "crout",
            Scheme::Doolittle => "doolittle",
            Scheme::Cholesky => "cholesky",
            Scheme::CholeskyRow => "cholesky-row",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A packed factorization together with the scheme that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Factorization {
    scheme: Scheme,
    lu: DenseMatrix,
}

impl Factorization {
    /// The scheme that produced this factorization.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The dimension of the factorized matrix.
    pub fn dim(&self) -> usize {
        self.lu.dim()
    }

    /// The packed buffer holding both triangular factors.
    pub fn packed(&self) -> &DenseMatrix {
        &self.lu
    }

    /// Consumes the factorization and returns the packed buffer.
    pub fn into_packed(self) -> DenseMatrix {
        self.lu
    }

    /// Solves `A x = b` and returns `x`.
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>, DecompositionError> {
        let mut x = vec![0.0; self.dim()];
        self.solve_into(b, &mut x)?;
        Ok(x)
    }

    /// Solves `A x = b`, writing `x` into a caller-owned buffer.
    pub fn solve_into(&self, b: &[f64], x: &mut [f64]) -> Result<(), DecompositionError> {
        match self.scheme {
            Scheme::Crout => crout_solve(&self.lu, b, x),
            Scheme::Doolittle => doolittle_solve(&self.lu, b, x),
            Scheme::Cholesky | Scheme::CholeskyRow => cholesky_solve(&self.lu, b, x),
        }
    }

    /// The lower triangular factor with its diagonal made explicit.
    pub fn lower(&self) -> DenseMatrix {
        let unit_diagonal = self.scheme == Scheme::Doolittle;
        DenseMatrix::from_fn(self.dim(), |i, j| match i.cmp(&j) {
            std::cmp::Ordering::Greater => self.lu[(i, j)],
            std::cmp::Ordering::Equal if unit_diagonal => 1.0,
            std::cmp::Ordering::Equal => self.lu[(i, i)],
            std::cmp::Ordering::Less => 0.0,
        })
    }

    /// The upper triangular factor with its diagonal made explicit. For the Cholesky
    /// schemes this is the transpose of [`Factorization::lower`].
    pub fn upper(&self) -> DenseMatrix {
        match self.scheme {
            Scheme::Cholesky | Scheme::CholeskyRow => self.lower().transpose(),
            Scheme::Crout | Scheme::Doolittle => {
                let unit_diagonal = self.scheme == Scheme::Crout;
                DenseMatrix::from_fn(self.dim(), |i, j| match i.cmp(&j) {
                    std::cmp::Ordering::Less => self.lu[(i, j)],
                    std::cmp::Ordering::Equal if unit_diagonal => 1.0,
                    std::cmp::Ordering::Equal => self.lu[(i, i)],
                    std::cmp::Ordering::Greater => 0.0,
                })
            }
        }
    }

    /// Multiplies the factors back together, `L U` (or `L Lᵀ`).
    pub fn reconstruct(&self) -> DenseMatrix {
        self.lower().matmul(&self.upper())
    }

    /// The determinant of the factorized matrix: the product of the stored pivots,
    /// squared for the Cholesky schemes.
    pub fn determinant(&self) -> f64 {
        let product: f64 = (0..self.dim()).map(|k| self.lu[(k, k)]).product();
        if self.scheme.is_symmetric() {
            product * product
        } else {
            product
        }
    }
}

/// Checks the options and, for the Cholesky schemes, the optional symmetry of `a`.
fn validate_input(
    a: &DenseMatrix,
    scheme: Scheme,
    options: &FactorOptions,
) -> Result<(), DecompositionError> {
    options.validate()?;
    if !scheme.is_symmetric() {
        return Ok(());
    }
    let worst = options
        .symmetry_tolerance
        .and_then(|tolerance| a.max_asymmetry().filter(|&(_, _, diff)| !(diff <= tolerance)));
    match worst {
        Some((row, col, difference)) => Err(DecompositionErrorKind::NotSymmetric {
            row,
            col,
            difference,
        }
        .into()),
        None => Ok(()),
    }
}

/// Factorizes `a` with the given scheme, leaving `a` untouched.
///
/// # Errors
/// `SingularPivot` or `NotPositiveDefinite` from the decomposition, `NotSymmetric`
/// when the symmetry check is enabled and fails, and `InputError` for invalid options.
pub fn factorize(
    a: &DenseMatrix,
    scheme: Scheme,
    options: &FactorOptions,
) -> Result<Factorization, DecompositionError> {
    validate_input(a, scheme, options)?;
    log::debug!("Factorizing a {0}x{0} matrix with the {scheme} scheme.", a.dim());

    let mut lu = DenseMatrix::zeros(a.dim());
    let tolerance = options.pivot_tolerance;
    let result = match scheme {
        Scheme::Crout => crout(a, &mut lu, tolerance),
        Scheme::Doolittle => doolittle(a, &mut lu, tolerance),
        Scheme::Cholesky => cholesky(a, &mut lu, tolerance),
        Scheme::CholeskyRow => cholesky_row(a, &mut lu, tolerance),
    };
    if let Err(e) = result {
        log::warn!("{scheme} factorization failed: {e}");
        return Err(e);
    }

    Ok(Factorization { scheme, lu })
}

/// Factorizes `a` in its own buffer, without allocating a destination matrix.
pub fn factorize_in_place(
    mut a: DenseMatrix,
    scheme: Scheme,
    options: &FactorOptions,
) -> Result<Factorization, DecompositionError> {
    validate_input(&a, scheme, options)?;
    log::debug!(
        "Factorizing a {0}x{0} matrix in place with the {scheme} scheme.",
        a.dim()
    );

    let tolerance = options.pivot_tolerance;
    let result = match scheme {
        Scheme::Crout => crout_in_place(&mut a, tolerance),
        Scheme::Doolittle => doolittle_in_place(&mut a, tolerance),
        Scheme::Cholesky => cholesky_in_place(&mut a, tolerance),
        Scheme::CholeskyRow => cholesky_row_in_place(&mut a, tolerance),
    };
    if let Err(e) = result {
        log::warn!("{scheme} factorization failed: {e}");
        return Err(e);
    }

    Ok(Factorization { scheme, lu: a })
}

/// Solves `A x = b` in one call.
///
/// This is a convenience function that combines factorization and solve.
pub fn solve(
    a: &DenseMatrix,
    b: &[f64],
    scheme: Scheme,
    options: &FactorOptions,
) -> Result<Vec<f64>, DecompositionError> {
    let factorization = factorize(a, scheme, options)?;
    let x = factorization.solve(b)?;
    if log::log_enabled!(log::Level::Trace) {
        log::trace!(
            "{scheme} solve finished with residual {:e}.",
            residual_norm(a, &x, b)
        );
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::test_support::{assert_close, mathews_system};

    #[test]
    fn test_every_scheme_solves_reference_system() {
        let (a, b, expected) = mathews_system();
        for scheme in Scheme::ALL {
            let x = solve(&a, &b, scheme, &FactorOptions::default()).unwrap();
            assert_close(&x, &expected, 1e-9);
        }
    }

    #[test]
    fn test_reconstruction_and_determinant() {
        let (a, _, _) = mathews_system();
        for scheme in Scheme::ALL {
            let factorization = factorize(&a, scheme, &FactorOptions::default()).unwrap();
            assert!(
                factorization.reconstruct().max_abs_diff(&a) < 1e-12,
                "{scheme} does not reconstruct the source"
            );
            assert!((factorization.determinant() - 98.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_triangular_factors() {
        let a = DenseMatrix::from_rows(&[[4.0, 2.0], [6.0, 7.0]]).unwrap();
        let crout = factorize(&a, Scheme::Crout, &FactorOptions::default()).unwrap();
        assert_eq!(crout.lower().as_slice(), &[4.0, 0.0, 6.0, 4.0]);
        assert_eq!(crout.upper().as_slice(), &[1.0, 0.5, 0.0, 1.0]);

        let doolittle = factorize(&a, Scheme::Doolittle, &FactorOptions::default()).unwrap();
        assert_eq!(doolittle.lower().as_slice(), &[1.0, 0.0, 1.5, 1.0]);
        assert_eq!(doolittle.upper().as_slice(), &[4.0, 2.0, 0.0, 4.0]);
    }

    #[test]
    fn test_in_place_matches_out_of_place() {
        let (a, _, _) = mathews_system();
        for scheme in Scheme::ALL {
            let options = FactorOptions::default();
            let out_of_place = factorize(&a, scheme, &options).unwrap();
            let in_place = factorize_in_place(a.clone(), scheme, &options).unwrap();
            assert_eq!(in_place, out_of_place);
        }
    }

    #[test]
    fn test_factorization_is_reusable() {
        let (a, b, expected) = mathews_system();
        let factorization = factorize(&a, Scheme::Doolittle, &FactorOptions::default()).unwrap();

        let mut x = vec![0.0; 5];
        factorization.solve_into(&b, &mut x).unwrap();
        assert_close(&x, &expected, 1e-12);

        let e0 = [1.0, 0.0, 0.0, 0.0, 0.0];
        let column = factorization.solve(&e0).unwrap();
        assert!(residual_norm(&a, &column, &e0) < 1e-12);
    }

    #[test]
    fn test_symmetry_check_is_opt_in() {
        let a = DenseMatrix::from_rows(&[[4.0, 1.0], [2.0, 3.0]]).unwrap();
        let strict = FactorOptions::default().with_symmetry_check(1e-12);

        // Only the lower triangle is read, so the unchecked factorization succeeds.
        assert!(factorize(&a, Scheme::Cholesky, &FactorOptions::default()).is_ok());

        let err = factorize(&a, Scheme::CholeskyRow, &strict).unwrap_err();
        assert_eq!(
            err.kind(),
            &DecompositionErrorKind::NotSymmetric {
                row: 1,
                col: 0,
                difference: 1.0,
            }
        );

        // The check does not apply to the LU schemes.
        assert!(factorize(&a, Scheme::Crout, &strict).is_ok());
    }

    #[test]
    fn test_symmetry_check_rejects_nan_mirror() {
        let a = DenseMatrix::from_rows(&[[4.0, 1.0, f64::NAN], [1.0, 3.0, 1.0], [0.0, 1.0, 2.0]])
            .unwrap();
        let strict = FactorOptions::default().with_symmetry_check(1e-12);

        // The NaN sits in the unread upper triangle.
        assert!(factorize(&a, Scheme::Cholesky, &FactorOptions::default()).is_ok());

        let err = factorize(&a, Scheme::Cholesky, &strict).unwrap_err();
        assert!(matches!(
            err.kind(),
            DecompositionErrorKind::NotSymmetric { row: 2, col: 0, difference } if difference.is_nan()
        ));
    }

    #[test]
    fn test_invalid_options_are_rejected_before_factorizing() {
        let a = DenseMatrix::identity(2);
        let options = FactorOptions::default().with_pivot_tolerance(f64::INFINITY);
        let err = factorize_in_place(a, Scheme::Crout, &options).unwrap_err();
        assert!(matches!(err.kind(), DecompositionErrorKind::InputError(_)));
    }

    #[test]
    fn test_scheme_names() {
        let names: Vec<String> = Scheme::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["crout", "doolittle", "cholesky", "cholesky-row"]);
        assert!(Scheme::CholeskyRow.is_symmetric());
        assert!(!Scheme::Crout.is_symmetric());
    }
}
