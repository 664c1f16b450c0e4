//! This module defines the dense square matrix shared by every routine in the crate.
//!
//! A [`DenseMatrix`] of dimension `d` owns a single contiguous buffer of `d*d`
//! values in row-major order, so element `(i, j)` lives at linear index `i*d + j`.
//! All element access goes through bounds-checked `(row, col)` indexing, which keeps
//! the linear index arithmetic in one place while preserving the row-major layout
//! the factorizations walk through.
//!
//! Vectors are plain `f64` slices of length `d`; nothing in the crate needs more
//! structure than that.
//!
//! The module also provides the [`LinearOperator`] abstraction, used to evaluate
//! matrix-vector products when checking residuals, and the column-aligned textual
//! rendering of matrices and vectors.

use crate::error::{DecompositionError, DecompositionErrorKind};
use std::{
    fmt,
    ops::{Index, IndexMut},
};

/// Width of each right-aligned column when a matrix or vector is displayed.
const DISPLAY_WIDTH: usize = 14;

/// Significant digits shown per displayed element.
const DISPLAY_DIGITS: i32 = 6;

/// Formats `value` with [`DISPLAY_DIGITS`] significant digits in the shorter of fixed
/// and scientific notation, dropping trailing zeros. The result is at most 13
/// characters long, so every field keeps at least one blank inside its column.
fn format_general(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }
    let scientific = format!("{value:.prec$e}", prec = (DISPLAY_DIGITS - 1) as usize);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if exponent < -4 || exponent >= DISPLAY_DIGITS {
        format!("{}e{exponent}", trim_fraction(mantissa))
    } else {
        let decimals = (DISPLAY_DIGITS - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// A square matrix of `f64` stored as one flat row-major buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    data: Vec<f64>,
    dim: usize,
}

impl DenseMatrix {
    /// Creates a `dim x dim` matrix filled with zeros.
    pub fn zeros(dim: usize) -> Self {
        Self {
            data: vec![0.0; dim * dim],
            dim,
        }
    }

    /// Creates the `dim x dim` identity matrix.
    pub fn identity(dim: usize) -> Self {
        Self::from_fn(dim, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    /// Creates a `dim x dim` matrix whose element `(i, j)` is `f(i, j)`.
    pub fn from_fn(dim: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(dim * dim);
        for i in 0..dim {
            for j in 0..dim {
                data.push(f(i, j));
            }
        }
        Self { data, dim }
    }

    /// Wraps an existing row-major buffer.
    ///
    /// # Errors
    /// Returns an `InputError` if `dim` is zero and a `DimensionMismatch` if the
    /// buffer does not hold exactly `dim * dim` elements.
    pub fn from_row_major(dim: usize, data: Vec<f64>) -> Result<Self, DecompositionError> {
        if dim == 0 {
            return Err(DecompositionErrorKind::InputError(
                "The matrix dimension must be at least 1.".to_string(),
            )
            .into());
        }
        if data.len() != dim * dim {
            return Err(DecompositionErrorKind::DimensionMismatch {
                param_name: "data".to_string(),
                expected: dim * dim,
                actual: data.len(),
            }
            .into());
        }
        Ok(Self { data, dim })
    }

    /// Builds a matrix from a list of rows, each of which must be as long as the
    /// number of rows.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, DecompositionError> {
        let dim = rows.len();
        let mut data = Vec::with_capacity(dim * dim);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != dim {
                return Err(DecompositionErrorKind::DimensionMismatch {
                    param_name: format!("rows[{i}]"),
                    expected: dim,
                    actual: row.len(),
                }
                .into());
            }
            data.extend_from_slice(row);
        }
        Self::from_row_major(dim, data)
    }

    /// The dimension `d` of this `d x d` matrix.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns element `(row, col)`, or `None` if it is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.dim && col < self.dim {
            Some(self.data[row * self.dim + col])
        } else {
            None
        }
    }

    /// Returns row `row` as a slice.
    pub fn row(&self, row: usize) -> &[f64] {
        assert!(
            row < self.dim,
            "Row index {row} out of bounds for a {0}x{0} matrix.",
            self.dim
        );
        let start = row * self.dim;
        &self.data[start..start + self.dim]
    }

    /// The underlying row-major buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// The underlying row-major buffer, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consumes the matrix and returns its row-major buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Overwrites this matrix with the contents of `src`.
    ///
    /// # Errors
    /// Returns a `DimensionMismatch` if the two matrices have different dimensions.
    pub fn copy_from(&mut self, src: &DenseMatrix) -> Result<(), DecompositionError> {
        if src.dim != self.dim {
            return Err(DecompositionErrorKind::DimensionMismatch {
                param_name: "dst".to_string(),
                expected: src.dim,
                actual: self.dim,
            }
            .into());
        }
        self.data.copy_from_slice(&src.data);
        Ok(())
    }

    /// Returns the transpose of this matrix.
    pub fn transpose(&self) -> DenseMatrix {
        Self::from_fn(self.dim, |i, j| self[(j, i)])
    }

    /// Computes the matrix product `self * rhs`.
    ///
    /// # Panics
    /// Panics if the dimensions differ.
    pub fn matmul(&self, rhs: &DenseMatrix) -> DenseMatrix {
        assert_eq!(
            self.dim, rhs.dim,
            "Dimension mismatch: cannot multiply a {0}x{0} matrix by a {1}x{1} matrix.",
            self.dim, rhs.dim,
        );
        let d = self.dim;
        let mut out = DenseMatrix::zeros(d);
        for i in 0..d {
            for p in 0..d {
                let lhs = self[(i, p)];
                if lhs == 0.0 {
                    continue;
                }
                for j in 0..d {
                    out[(i, j)] += lhs * rhs[(p, j)];
                }
            }
        }
        out
    }

    /// Finds the pair of mirrored entries `(row, col)`, `row > col`, with the
    /// largest absolute difference, or `None` for a `1x1` matrix. A NaN difference
    /// outranks every finite one.
    pub fn max_asymmetry(&self) -> Option<(usize, usize, f64)> {
        let mut worst: Option<(usize, usize, f64)> = None;
        for i in 1..self.dim {
            for j in 0..i {
                let difference = (self[(i, j)] - self[(j, i)]).abs();
                match worst {
                    Some((_, _, w)) if w.is_nan() || w >= difference => {}
                    _ => worst = Some((i, j, difference)),
                }
            }
        }
        worst
    }

    /// Largest absolute element-wise difference between two matrices of equal
    /// dimension.
    pub fn max_abs_diff(&self, other: &DenseMatrix) -> f64 {
        assert_eq!(self.dim, other.dim, "Dimension mismatch in max_abs_diff.");
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    #[inline]
    fn linear_index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.dim && col < self.dim,
            "Index ({row}, {col}) out of bounds for a {0}x{0} matrix.",
            self.dim
        );
        row * self.dim + col
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = f64;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[self.linear_index(row, col)]
    }
}

impl IndexMut<(usize, usize)> for DenseMatrix {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        let idx = self.linear_index(row, col);
        &mut self.data[idx]
    }
}

/// Renders the matrix one row per line, each element rounded to six significant
/// digits and right-aligned in a 14-character column. A leading newline separates it from any caption.
impl fmt::Display for DenseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for i in 0..self.dim {
            for &value in self.row(i) {
                write!(f, "{:>width$}", format_general(value), width = DISPLAY_WIDTH)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Displays a vector on a single line in the same column layout as [`DenseMatrix`].
pub struct DisplayVector<'a>(pub &'a [f64]);

impl fmt::Display for DisplayVector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for &value in self.0 {
            write!(f, "{:>width$}", format_general(value), width = DISPLAY_WIDTH)?;
        }
        writeln!(f)
    }
}

/// Represents a square linear operator that can be applied to a vector.
///
/// Residual checks only need the product `A * x`, so they are written against
/// this trait rather than against a concrete matrix type.
pub trait LinearOperator {
    /// Returns the dimension of the (square) operator.
    fn dim(&self) -> usize;

    /// Applies the operator to `x` and returns `A * x`.
    ///
    /// # Panics
    ///
    /// This method is expected to panic if `x.len()` does not match the operator's
    /// dimension.
    fn apply(&self, x: &[f64]) -> Vec<f64>;
}

impl LinearOperator for DenseMatrix {
    #[inline]
    fn dim(&self) -> usize {
        self.dim
    }

    fn apply(&self, x: &[f64]) -> Vec<f64> {
        assert_eq!(
            self.dim,
            x.len(),
            "Dimension mismatch: operator columns ({}) do not match vector rows ({}).",
            self.dim,
            x.len(),
        );
        (0..self.dim)
            .map(|i| self.row(i).iter().zip(x).map(|(a, v)| a * v).sum())
            .collect()
    }
}

/// Euclidean norm of `b - A x`.
///
/// # Panics
///
/// Panics if `x` or `b` does not match the operator's dimension.
pub fn residual_norm(operator: &impl LinearOperator, x: &[f64], b: &[f64]) -> f64 {
    assert_eq!(
        operator.dim(),
        b.len(),
        "Dimension mismatch: operator rows ({}) do not match right-hand side rows ({}).",
        operator.dim(),
        b.len(),
    );
    let ax = operator.apply(x);
    ax.iter()
        .zip(b)
        .map(|(lhs, rhs)| (rhs - lhs) * (rhs - lhs))
        .sum::<f64>()
        .sqrt()
}
