//! Utilities that sit outside the numeric core.
//!
//! - **`data_loader`**: parses matrices, vectors and augmented systems from CSV files,
//!   used by the `lu-solve` binary and by the fixture-driven tests.

pub mod data_loader;
