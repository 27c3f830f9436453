//! Experiment Runner for Convergence Analysis.
//!
//! This executable measures how the unshifted QR iteration behaves as the matrix size
//! and the shape of the spectrum change. Test matrices are built as `A = V·D·Vᵀ` with a
//! prescribed diagonal `D` and a random orthogonal `V`, so the exact eigenvalues are
//! known. For every run the number of sweeps, the final sub-diagonal mass, the loss of
//! orthogonality of `X`, the reconstruction error and the eigenvalue error are recorded.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use faer::{Mat, MatRef};
use householder_qr::{
    EigenSolver, HouseholderQr, SolverConfig,
    algorithms::{DEFAULT_ROTATION_CUTOFF, givens::qr_decompose},
    matrix::SquareMatrix,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;
use std::path::PathBuf;

/// Defines the spectrum of the generated test matrices.
#[derive(ValueEnum, Clone, Debug, Copy)]
enum Spectrum {
    /// Geometrically decaying eigenvalues: fast, uniform convergence.
    Geometric,
    /// Eigenvalues packed in a narrow interval: neighbouring ratios close to one.
    Clustered,
    /// Eigenvalues of alternating sign and growing magnitude.
    Alternating,
}

impl Spectrum {
    fn eigenvalues(&self, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| match self {
                Spectrum::Geometric => 10.0 * 0.7f64.powi(i as i32),
                Spectrum::Clustered => 1.0 + 0.05 * i as f64,
                Spectrum::Alternating => {
                    let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                    sign * (1.0 + i as f64)
                }
            })
            .collect()
    }
}

/// Command-line arguments for the convergence analysis runner.
#[derive(Parser, Debug)]
#[clap(
    name = "convergence-runner",
    about = "Runs a convergence analysis of the Householder + QR eigen solver."
)]
struct ConvergenceArgs {
    /// The spectral scenario for the test matrices.
    #[clap(long, value_enum)]
    spectrum: Spectrum,
    /// Smallest matrix dimension to test.
    #[clap(long, default_value_t = 4)]
    n_min: usize,
    /// Largest matrix dimension to test.
    #[clap(long, default_value_t = 40)]
    n_max: usize,
    /// Step size for iterating n.
    #[clap(long, default_value_t = 4)]
    n_step: usize,
    /// Number of random matrices per dimension.
    #[clap(long, default_value_t = 3)]
    trials: usize,
    /// Convergence tolerance on the sub-diagonal mass.
    #[clap(long, default_value_t = 1e-9)]
    tolerance: f64,
    /// Maximum number of QR sweeps.
    #[clap(long, default_value_t = 20_000)]
    max_iterations: usize,
    /// Seed for the random orthogonal bases.
    #[clap(long, default_value_t = 42)]
    seed: u64,
    /// Path to the output CSV file where results will be written.
    #[clap(long, value_name = "PATH")]
    output: PathBuf,
}

/// Represents a single row of data in the output CSV file.
#[derive(Debug, Serialize)]
struct ConvergenceResult {
    n: usize,
    trial: usize,
    converged: bool,
    /// Number of QR sweeps performed.
    iterations: usize,
    /// Sub-diagonal mass of Λ when the iteration stopped.
    residual: f64,
    /// ||I - XᵀX||_F.
    orthogonality_loss: f64,
    /// ||X·Λ·Xᵀ - A||_F / ||A||_F.
    reconstruction_error: f64,
    /// Largest deviation between computed and prescribed eigenvalues.
    eigenvalue_error: f64,
}

/// Builds `V·diag(values)·Vᵀ` with `V` the orthogonal factor of a random matrix.
fn random_symmetric(values: &[f64], rng: &mut StdRng) -> Result<Mat<f64>> {
    let n = values.len();
    let g = Mat::from_fn(n, n, |_, _| 2.0 * rng.random::<f64>() - 1.0);
    let v = qr_decompose(g.as_ref(), DEFAULT_ROTATION_CUTOFF)?.q;
    let d = Mat::from_fn(n, n, |i, j| if i == j { values[i] } else { 0.0 });
    let a = &v * &d * v.transpose();
    // Symmetrize away the rounding noise of the product.
    Ok(Mat::from_fn(n, n, |i, j| 0.5 * (a[(i, j)] + a[(j, i)])))
}

fn eigenvalue_error(mut computed: Vec<f64>, mut expected: Vec<f64>) -> f64 {
    computed.sort_by(f64::total_cmp);
    expected.sort_by(f64::total_cmp);
    computed
        .iter()
        .zip(&expected)
        .map(|(c, e)| (c - e).abs())
        .fold(0.0, f64::max)
}

fn relative_reconstruction_error(
    a: MatRef<'_, f64>,
    x: MatRef<'_, f64>,
    lambda: MatRef<'_, f64>,
) -> f64 {
    let rebuilt = x * lambda * x.transpose();
    (rebuilt.as_ref() - a).norm_l2() / a.norm_l2()
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .try_init()?;
    let args = ConvergenceArgs::parse();
    log::info!(
        "Starting convergence analysis for spectrum {:?}, n in {}..={} step {}",
        args.spectrum,
        args.n_min,
        args.n_max,
        args.n_step
    );

    let solver = HouseholderQr::new(
        SolverConfig::default()
            .with_tolerance(args.tolerance)
            .with_max_iterations(args.max_iterations),
    );
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut writer = csv::Writer::from_path(&args.output)?;

    for n in (args.n_min.max(1)..=args.n_max).step_by(args.n_step.max(1)) {
        let values = args.spectrum.eigenvalues(n);
        for trial in 0..args.trials {
            let a = random_symmetric(&values, &mut rng)?;

            let row = match solver.solve(a.as_ref()) {
                Ok(eigen) => ConvergenceResult {
                    n,
                    trial,
                    converged: true,
                    iterations: eigen.iterations,
                    residual: eigen.residual,
                    orthogonality_loss: eigen.x.orthogonality_loss(),
                    reconstruction_error: relative_reconstruction_error(
                        a.as_ref(),
                        eigen.x.as_ref(),
                        eigen.lambda.as_ref(),
                    ),
                    eigenvalue_error: eigenvalue_error(eigen.eigenvalues(), values.clone()),
                },
                Err(err) if err.is_convergence_failure() => {
                    log::warn!("n = {n}, trial {trial}: {err}");
                    ConvergenceResult {
                        n,
                        trial,
                        converged: false,
                        iterations: args.max_iterations,
                        residual: err.residual().unwrap_or(f64::NAN),
                        orthogonality_loss: f64::NAN,
                        reconstruction_error: f64::NAN,
                        eigenvalue_error: f64::NAN,
                    }
                }
                Err(err) => return Err(err.into()),
            };

            log::info!(
                "n = {n}, trial {trial}: {} sweeps, eigenvalue error {:e}",
                row.iterations,
                row.eigenvalue_error
            );
            writer.serialize(row)?;
        }
    }

    writer.flush()?;
    log::info!(
        "Convergence analysis complete. Results saved to {:?}.",
        &args.output
    );
    Ok(())
}
