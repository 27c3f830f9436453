//! Command-line driver for the symmetric eigen solver.
//!
//! Loads a matrix from a text file (or uses a built-in 5x5 demonstration matrix), runs
//! the Householder reduction and the QR iteration, and prints every intermediate matrix
//! followed by the eigenvalues. Eigenpairs can optionally be written to a CSV file.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use faer::{Mat, mat};
use householder_qr::{
    HouseholderQr, SolverConfig, ThresholdScale, Thresholds, Tridiagonalizer,
    solvers::DEFAULT_MAX_ITERATIONS,
    utils::{data_loader::load_dense_matrix, format::format_matrix},
};
use serde::Serialize;
use std::path::PathBuf;

/// How the degeneracy cutoffs are applied.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum CutoffScale {
    /// Use the cutoffs as absolute values.
    Absolute,
    /// Scale the cutoffs by the Frobenius norm of the input.
    Relative,
}

impl From<CutoffScale> for ThresholdScale {
    fn from(scale: CutoffScale) -> Self {
        match scale {
            CutoffScale::Absolute => ThresholdScale::Absolute,
            CutoffScale::Relative => ThresholdScale::RelativeToNorm,
        }
    }
}

/// Command-line arguments for the eigen solver.
#[derive(Parser, Debug)]
#[clap(
    name = "eigen",
    about = "Computes eigenvalues and eigenvectors of a symmetric matrix via Householder + QR."
)]
struct EigenArgs {
    /// Path to a matrix file (one row per line, whitespace-separated). Uses a built-in
    /// 5x5 matrix when omitted.
    #[clap(long, value_name = "PATH")]
    input: Option<PathBuf>,
    /// Convergence tolerance on the sum of absolute sub-diagonal entries.
    #[clap(long, default_value_t = 1e-6)]
    tolerance: f64,
    /// Maximum number of QR sweeps.
    #[clap(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,
    /// How the reflector and rotation cutoffs are scaled.
    #[clap(long, value_enum, default_value_t = CutoffScale::Absolute)]
    cutoff_scale: CutoffScale,
    /// Accept input without checking that it is symmetric.
    #[clap(long)]
    skip_symmetry_check: bool,
    /// Order the eigenpairs by decreasing eigenvalue.
    #[clap(long)]
    sort: bool,
    /// Digits printed after the decimal point.
    #[clap(long, default_value_t = 6)]
    precision: usize,
    /// Optional path to a CSV file receiving the eigenpairs.
    #[clap(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// One eigenvector component, in long format.
#[derive(Debug, Serialize)]
struct EigenpairRecord {
    /// Index of the eigenpair.
    pair: usize,
    /// The eigenvalue of the pair.
    eigenvalue: f64,
    /// Row index inside the eigenvector.
    component: usize,
    /// Value of the eigenvector component.
    value: f64,
}

fn demo_matrix() -> Mat<f64> {
    mat![
        [21.0, 29.0, 21.0, 32.0, 40.0],
        [29.0, 94.0, 62.0, 87.0, 94.0],
        [21.0, 62.0, 131.0, 90.0, 73.0],
        [32.0, 87.0, 90.0, 94.0, 95.0],
        [40.0, 94.0, 73.0, 95.0, 105.0],
    ]
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init()?;
    let args = EigenArgs::parse();

    let a = match &args.input {
        Some(path) => load_dense_matrix(path)
            .with_context(|| format!("Failed to load matrix from {}", path.display()))?,
        None => {
            log::info!("No input given, using the built-in 5x5 matrix.");
            demo_matrix()
        }
    };

    let config = SolverConfig::default()
        .with_tolerance(args.tolerance)
        .with_max_iterations(args.max_iterations)
        .with_symmetry_tolerance(if args.skip_symmetry_check {
            None
        } else {
            SolverConfig::default().symmetry_tolerance
        })
        .with_thresholds(Thresholds {
            scale: args.cutoff_scale.into(),
            ..Thresholds::default()
        });
    let solver = HouseholderQr::new(config);
    let p = args.precision;

    println!("Original matrix (A):\n{}", format_matrix(a.as_ref(), p));

    let tridiagonal = solver
        .tridiagonalize(a.as_ref())
        .context("Householder reduction failed")?;
    println!("Tridiagonal matrix (T):\n{}", format_matrix(tridiagonal.t.as_ref(), p));
    println!("Accumulated transform (H):\n{}", format_matrix(tridiagonal.h.as_ref(), p));

    let mut eigen = solver
        .iterate(a.as_ref(), &tridiagonal, None)
        .context("QR iteration failed")?;
    log::info!(
        "Converged after {} QR sweeps (sub-diagonal mass {:e}).",
        eigen.iterations,
        eigen.residual
    );
    if args.sort {
        eigen = eigen.sorted_descending();
    }

    println!("Eigenvalue matrix (Lambda):\n{}", format_matrix(eigen.lambda.as_ref(), p));
    println!("Eigenvector matrix (X):\n{}", format_matrix(eigen.x.as_ref(), p));

    println!("Eigenvalues (diagonal of Lambda):");
    for (i, value) in eigen.eigenvalues().iter().enumerate() {
        println!("λ{} = {:.prec$}", i + 1, value + 0.0, prec = p + 2);
    }

    if let Some(output) = &args.output {
        let mut writer = csv::Writer::from_path(output)
            .with_context(|| format!("Failed to create {}", output.display()))?;
        for (pair, eigenvalue) in eigen.eigenvalues().into_iter().enumerate() {
            let vector = eigen.eigenvector(pair);
            for component in 0..vector.nrows() {
                writer.serialize(EigenpairRecord {
                    pair,
                    eigenvalue,
                    component,
                    value: vector[component],
                })?;
            }
        }
        writer.flush()?;
        log::info!("Eigenpairs saved to {:?}.", output);
    }

    Ok(())
}
