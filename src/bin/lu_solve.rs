//! Command-line driver for the compact factorization schemes.
//!
//! Loads a linear system `A x = b` (or falls back to a built-in 5x5 symmetric
//! positive-definite example), factorizes `A` with one or all of the schemes, solves
//! for `x`, and prints the packed factorization and the solution in aligned columns.
//! Solutions can additionally be written to a CSV file with one row per component.

use anyhow::{Context, Result, anyhow, ensure};
use clap::{Parser, ValueEnum};
use compact_lu::{
    DenseMatrix, DisplayVector, FactorOptions, Scheme, factorize, factorize_in_place,
    matrix::residual_norm,
    utils::data_loader::{LinearSystem, load_matrix, load_system, load_vector},
};
use serde::Serialize;
use std::path::PathBuf;

/// The scheme(s) to run.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SchemeArg {
    Crout,
    Doolittle,
    Cholesky,
    CholeskyRow,
    /// Run every scheme in turn.
    All,
}

impl SchemeArg {
    fn schemes(self) -> Vec<Scheme> {
        match self {
            SchemeArg::Crout => vec![Scheme::Crout],
            SchemeArg::Doolittle => vec![Scheme::Doolittle],
            SchemeArg::Cholesky => vec![Scheme::Cholesky],
            SchemeArg::CholeskyRow => vec![Scheme::CholeskyRow],
            SchemeArg::All => Scheme::ALL.to_vec(),
        }
    }
}

/// Command-line arguments for the solver driver.
#[derive(Parser, Debug)]
#[clap(
    name = "lu-solve",
    about = "Solves a dense linear system with the Crout, Doolittle and Cholesky compact schemes."
)]
struct SolveArgs {
    /// CSV file holding the augmented system [A | b].
    #[clap(long, value_name = "PATH", conflicts_with_all = ["matrix", "rhs"])]
    system: Option<PathBuf>,

    /// CSV file holding the square matrix A.
    #[clap(long, value_name = "PATH", requires = "rhs")]
    matrix: Option<PathBuf>,

    /// CSV file holding the right-hand side b, as one row or one column.
    #[clap(long, value_name = "PATH", requires = "matrix")]
    rhs: Option<PathBuf>,

    /// The factorization scheme to use.
    #[clap(long, value_enum, default_value_t = SchemeArg::All)]
    scheme: SchemeArg,

    /// Pivots whose magnitude does not exceed this value are treated as singular.
    #[clap(long, default_value_t = 0.0)]
    pivot_tolerance: f64,

    /// Verify symmetry within this tolerance before a Cholesky factorization.
    #[clap(long, value_name = "TOL")]
    symmetry_tolerance: Option<f64>,

    /// Factorize in the matrix's own buffer instead of a separate destination.
    #[clap(long)]
    in_place: bool,

    /// Only report warnings and errors; do not print matrices.
    #[clap(long)]
    quiet: bool,

    /// Path to an output CSV file where the solutions will be written.
    #[clap(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// A single row of the solution CSV.
#[derive(Debug, Serialize)]
struct SolutionRecord {
    scheme: Scheme,
    index: usize,
    value: f64,
}

fn main() -> Result<()> {
    let args = SolveArgs::parse();

    let level = if args.quiet {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    let system = load_input(&args)?;
    ensure!(
        system.b.len() == system.a.dim(),
        "The right-hand side has {} entries but the matrix is {}x{}.",
        system.b.len(),
        system.a.dim(),
        system.a.dim()
    );

    let options = FactorOptions {
        pivot_tolerance: args.pivot_tolerance,
        symmetry_tolerance: args.symmetry_tolerance,
    };
    options.validate()?;

    let mut records = Vec::new();
    for scheme in args.scheme.schemes() {
        let factorization = if args.in_place {
            factorize_in_place(system.a.clone(), scheme, &options)
        } else {
            factorize(&system.a, scheme, &options)
        }
        .with_context(|| format!("The {scheme} factorization failed"))?;

        let x = factorization
            .solve(&system.b)
            .with_context(|| format!("The {scheme} substitution failed"))?;

        if !args.quiet {
            print!("{scheme}{}", factorization.packed());
            print!("solve {scheme}{}", DisplayVector(&x));
        }
        log::info!(
            "{scheme}: residual {:e}, determinant {}",
            residual_norm(&system.a, &x, &system.b),
            factorization.determinant()
        );

        records.extend(
            x.iter()
                .enumerate()
                .map(|(index, &value)| SolutionRecord { scheme, index, value }),
        );
    }

    if let Some(path) = &args.output {
        log::info!("Writing solutions to {:?}...", path);
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create output file {path:?}"))?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
    }

    Ok(())
}

/// Loads the system named on the command line, or the built-in example.
fn load_input(args: &SolveArgs) -> Result<LinearSystem> {
    match (&args.system, &args.matrix, &args.rhs) {
        (Some(path), _, _) => {
            load_system(path).with_context(|| format!("Failed to load system from {path:?}"))
        }
        (None, Some(matrix), Some(rhs)) => Ok(LinearSystem {
            a: load_matrix(matrix)
                .with_context(|| format!("Failed to load matrix from {matrix:?}"))?,
            b: load_vector(rhs)
                .with_context(|| format!("Failed to load right-hand side from {rhs:?}"))?,
        }),
        _ => {
            log::info!("No input given; using the built-in 5x5 example system.");
            example_system()
        }
    }
}

/// A symmetric positive-definite system with the exact solution
/// `[-629/98, 237/49, -53/49, 62/49, 23/14]`.
fn example_system() -> Result<LinearSystem> {
    let a = DenseMatrix::from_rows(&[
        [2.0, 1.0, 1.0, 3.0, 2.0],
        [1.0, 2.0, 2.0, 1.0, 1.0],
        [1.0, 2.0, 9.0, 1.0, 5.0],
        [3.0, 1.0, 1.0, 7.0, 1.0],
        [2.0, 1.0, 5.0, 1.0, 8.0],
    ])?;
    let b = vec![-2.0, 4.0, 3.0, -5.0, 1.0];
    Ok(LinearSystem { a, b })
}
