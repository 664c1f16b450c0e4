//! Configuration of the optional input validation performed by [`crate::solvers`].
//!
//! By default the caller is trusted: the only pivot rejected is an exact zero and
//! Cholesky sources are not checked for symmetry. Both checks can be tightened here.

use crate::error::{DecompositionError, DecompositionErrorKind};

/// Options controlling how strictly a factorization validates its input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorOptions {
    /// A pivot whose magnitude is not strictly greater than this value is reported as
    /// singular. `0.0` rejects exact zeros only.
    pub pivot_tolerance: f64,
    /// When set, the Cholesky schemes first verify that no pair of mirrored entries
    /// differs by more than this amount.
    pub symmetry_tolerance: Option<f64>,
}

impl Default for FactorOptions {
    fn default() -> Self {
        Self {
            pivot_tolerance: 0.0,
            symmetry_tolerance: None,
        }
    }
}

impl FactorOptions {
    /// Sets the pivot tolerance.
    pub fn with_pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }

    /// Enables the symmetry check for the Cholesky schemes.
    pub fn with_symmetry_check(mut self, tolerance: f64) -> Self {
        self.symmetry_tolerance = Some(tolerance);
        self
    }

    /// Checks that every tolerance is finite and non-negative.
    pub fn validate(&self) -> Result<(), DecompositionError> {
        let tolerances = std::iter::once(("pivot_tolerance", self.pivot_tolerance))
            .chain(self.symmetry_tolerance.map(|t| ("symmetry_tolerance", t)));
        for (name, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(DecompositionErrorKind::InputError(format!(
                    "`{name}` must be a finite, non-negative number, got {value}."
                ))
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_trust_the_caller() {
        let options = FactorOptions::default();
        assert_eq!(options.pivot_tolerance, 0.0);
        assert_eq!(options.symmetry_tolerance, None);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let options = FactorOptions::default()
            .with_pivot_tolerance(1e-12)
            .with_symmetry_check(1e-9);
        assert_eq!(options.pivot_tolerance, 1e-12);
        assert_eq!(options.symmetry_tolerance, Some(1e-9));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_invalid_tolerances_are_rejected() {
        let err = FactorOptions::default()
            .with_pivot_tolerance(-1.0)
            .validate()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input parameter: `pivot_tolerance` must be a finite, non-negative number, got -1."
        );

        let err = FactorOptions::default()
            .with_symmetry_check(f64::NAN)
            .validate()
            .unwrap_err();
        assert!(matches!(err.kind(), DecompositionErrorKind::InputError(_)));
    }
}
