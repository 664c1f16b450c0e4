//! This module provides utilities for loading matrices and linear systems from files.
//!
//! All inputs are plain CSV without a header row. Fields are trimmed, empty lines are
//! skipped and lines starting with `#` are treated as comments. Three layouts are
//! understood:
//!
//! - a **matrix**: `d` rows of `d` values;
//! - a **vector**: either one row of values or one value per row;
//! - a **system**: the augmented matrix `[A | b]`, i.e. `d` rows of `d + 1` values.

use crate::{error::DecompositionError, matrix::DenseMatrix};
use std::{fs::File, io, path::Path};
use thiserror::Error;

/// Represents all possible errors that can occur during data loading and parsing.
#[derive(Error, Debug)]
pub enum DataLoaderError {
    /// Wraps a standard I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Wraps an error raised by the CSV reader.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Occurs when a field cannot be parsed into a float. `line` and `col` are
    /// 1-based positions in the file, comment and blank lines included.
    #[error("Parse error: Failed to parse float from '{value}' on line {line}, column {col}.")]
    ParseFloat {
        line: u64,
        col: usize,
        value: String,
    },
    /// Occurs when a row does not have as many fields as the first one.
    #[error("Format error: line {line} has {actual} fields, but the first row has {expected}.")]
    RaggedRow {
        line: u64,
        expected: usize,
        actual: usize,
    },
    /// Occurs when the rows and columns do not form the expected layout.
    #[error("Format error: expected {expected}, found {rows} rows of {cols} fields.")]
    Shape {
        expected: &'static str,
        rows: usize,
        cols: usize,
    },
    /// Occurs when the input holds no data rows at all.
    #[error("Format error: the input contains no data.")]
    Empty,
    /// Occurs if the parsed values do not form a valid matrix.
    #[error("Invalid matrix: {0}")]
    Matrix(#[from] DecompositionError),
}

/// A square linear system `A x = b`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    /// The system matrix.
    pub a: DenseMatrix,
    /// The right-hand side.
    pub b: Vec<f64>,
}

/// 1-based file line of every line the CSV reader treats as a record: blank lines
/// and `#` comments are skipped.
fn data_line_numbers(text: &str) -> Vec<u64> {
    text.lines()
        .zip(1u64..)
        .filter(|(line, _)| !line.is_empty() && !line.starts_with('#'))
        .map(|(_, number)| number)
        .collect()
}

/// Parses every data row of a CSV source into floats, checking that all rows have
/// the same number of fields.
fn read_rows<R: io::Read>(mut reader: R) -> Result<Vec<Vec<f64>>, DataLoaderError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let line_numbers = data_line_numbers(&text);

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let line = line_numbers
            .get(index)
            .copied()
            .unwrap_or(index as u64 + 1);
        let values = record
            .iter()
            .enumerate()
            .map(|(col, field)| {
                field.parse::<f64>().map_err(|_| DataLoaderError::ParseFloat {
                    line,
                    col: col + 1,
                    value: field.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        if let Some(first) = rows.first().filter(|first| first.len() != values.len()) {
            return Err(DataLoaderError::RaggedRow {
                line,
                expected: first.len(),
                actual: values.len(),
            });
        }
        rows.push(values);
    }

    if rows.is_empty() {
        return Err(DataLoaderError::Empty);
    }
    Ok(rows)
}

/// Reads a square matrix from CSV text.
pub fn read_matrix<R: io::Read>(reader: R) -> Result<DenseMatrix, DataLoaderError> {
    let rows = read_rows(reader)?;
    let cols = rows[0].len();
    if cols != rows.len() {
        return Err(DataLoaderError::Shape {
            expected: "a square matrix",
            rows: rows.len(),
            cols,
        });
    }
    Ok(DenseMatrix::from_rows(&rows)?)
}

/// Reads a vector from CSV text, laid out either as one row or as one column.
pub fn read_vector<R: io::Read>(reader: R) -> Result<Vec<f64>, DataLoaderError> {
    let rows = read_rows(reader)?;
    let cols = rows[0].len();
    match (rows.len(), cols) {
        (1, _) | (_, 1) => Ok(rows.into_iter().flatten().collect()),
        (rows, cols) => Err(DataLoaderError::Shape {
            expected: "a single row or a single column",
            rows,
            cols,
        }),
    }
}

/// Reads an augmented system `[A | b]` from CSV text.
pub fn read_system<R: io::Read>(reader: R) -> Result<LinearSystem, DataLoaderError> {
    let mut rows = read_rows(reader)?;
    let cols = rows[0].len();
    if cols != rows.len() + 1 {
        return Err(DataLoaderError::Shape {
            expected: "an augmented matrix with one more column than rows",
            rows: rows.len(),
            cols,
        });
    }

    // Every row is at least two wide here, so `pop` always yields a value.
    let b = rows.iter_mut().filter_map(Vec::pop).collect();
    let a = DenseMatrix::from_rows(&rows)?;
    Ok(LinearSystem { a, b })
}

/// Loads a square matrix from a CSV file.
pub fn load_matrix(path: impl AsRef<Path>) -> Result<DenseMatrix, DataLoaderError> {
    read_matrix(File::open(path)?)
}

/// Loads a vector from a CSV file.
pub fn load_vector(path: impl AsRef<Path>) -> Result<Vec<f64>, DataLoaderError> {
    read_vector(File::open(path)?)
}

/// Loads an augmented system `[A | b]` from a CSV file.
pub fn load_system(path: impl AsRef<Path>) -> Result<LinearSystem, DataLoaderError> {
    read_system(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_matrix_with_comments_and_whitespace() {
        let text = "# a 2x2 matrix\n 4.0, 1.0\n\n1.0 ,3.0\n";
        let m = read_matrix(text.as_bytes()).unwrap();
        assert_eq!(m.dim(), 2);
        assert_eq!(m.as_slice(), &[4.0, 1.0, 1.0, 3.0]);
    }

    #[test]
    fn test_read_vector_as_row_or_column() {
        assert_eq!(read_vector("1,2,3\n".as_bytes()).unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(read_vector("1\n2\n3\n".as_bytes()).unwrap(), vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            read_vector("1,2\n3,4\n".as_bytes()),
            Err(DataLoaderError::Shape { rows: 2, cols: 2, .. })
        ));
    }

    #[test]
    fn test_read_system_splits_augmented_column() {
        let system = read_system("2,1,-2\n1,2,4\n".as_bytes()).unwrap();
        assert_eq!(system.a.as_slice(), &[2.0, 1.0, 1.0, 2.0]);
        assert_eq!(system.b, vec![-2.0, 4.0]);
    }

    #[test]
    fn test_non_square_matrix_is_rejected() {
        let err = read_matrix("1,2,3\n4,5,6\n".as_bytes()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Format error: expected a square matrix, found 2 rows of 3 fields."
        );
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let err = read_matrix("1,2\n3\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DataLoaderError::RaggedRow { line: 2, expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn test_error_lines_count_comment_lines() {
        let text = "# a commented header\n# spanning two lines\n1,2\n\n3\n";
        let err = read_matrix(text.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DataLoaderError::RaggedRow { line: 5, expected: 2, actual: 1 }
        ));

        let err = read_vector("# values\n1.0\nthree\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DataLoaderError::ParseFloat { line: 3, col: 1, .. }
        ));
    }

    #[test]
    fn test_unparsable_field_is_reported() {
        let err = read_vector("1.0, two\n".as_bytes()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error: Failed to parse float from 'two' on line 1, column 2."
        );
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(
            read_system("# nothing here\n".as_bytes()),
            Err(DataLoaderError::Empty)
        ));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = load_matrix("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, DataLoaderError::Io(_)));
    }
}
