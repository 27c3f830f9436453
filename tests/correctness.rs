//! Integration test suite to verify the mathematical correctness of the eigen solver.
//!
//! # Test Methodology
//!
//! Rather than comparing against reference eigenvalues, which would require an
//! independent solver, every test checks an identity that the exact decomposition must
//! satisfy and that floating-point error can only perturb slightly:
//!
//! 1.  **Similarity**: the tridiagonal form reproduces the input, `H·T·Hᵀ = A`.
//! 2.  **Orthogonality**: `HᵀH = I` and `XᵀX = I`.
//! 3.  **QR factorization**: `Q·R = A` with `R` upper triangular, for any square `A`.
//! 4.  **Eigen-reconstruction**: `X·Λ·Xᵀ = A`.
//! 5.  **Eigen-definition**: `A·vᵢ = λᵢ·vᵢ` for every column `vᵢ` of `X`.
//!
//! Where the spectrum is known by construction (`A = V·D·Vᵀ` with a prescribed `D`),
//! the computed eigenvalues are compared against it as well.

use anyhow::{Result, ensure};
use faer::{Mat, mat};
use householder_qr::{
    EigenDecomposition, EigenSolver, HouseholderQr, SolverConfig, Tridiagonalizer,
    algorithms::{
        DEFAULT_REFLECTOR_CUTOFF, DEFAULT_ROTATION_CUTOFF, givens::qr_decompose,
        householder::tridiagonalize,
    },
    matrix::SquareMatrix,
    symmetric_eigen,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Tolerance used for the structural checks that involve no iteration.
const TIGHT_TOLERANCE: f64 = 1e-12;

fn symmetric_3x3() -> Mat<f64> {
    mat![[6.0, 4.0, 1.0], [4.0, 6.0, 1.0], [1.0, 1.0, 5.0]]
}

fn symmetric_5x5() -> Mat<f64> {
    mat![
        [40.0, 8.0, 4.0, 2.0, 1.0],
        [8.0, 30.0, 12.0, 6.0, 2.0],
        [4.0, 12.0, 20.0, 1.0, 2.0],
        [2.0, 6.0, 1.0, 25.0, 4.0],
        [1.0, 2.0, 2.0, 4.0, 5.0],
    ]
}

/// The 1D discrete Laplacian, already tridiagonal.
fn laplacian_8x8() -> Mat<f64> {
    Mat::from_fn(8, 8, |i, j| match i.abs_diff(j) {
        0 => 2.0,
        1 => -1.0,
        _ => 0.0,
    })
}

fn diagonal_4x4() -> Mat<f64> {
    Mat::from_fn(4, 4, |i, j| if i == j { 4.0 - i as f64 } else { 0.0 })
}

/// Eigenvalues of [`known_spectrum_6x6`], all of distinct magnitude.
const KNOWN_SPECTRUM: [f64; 6] = [9.0, 7.0, 5.0, 3.0, 1.0, -0.5];

/// Builds `V·D·Vᵀ` with `D = diag(KNOWN_SPECTRUM)` and `V` a random orthogonal matrix.
///
/// Using a fixed seed makes the test deterministic.
fn known_spectrum_6x6() -> Mat<f64> {
    let n = KNOWN_SPECTRUM.len();
    let mut rng = StdRng::seed_from_u64(42);
    let g = Mat::from_fn(n, n, |_, _| 2.0 * rng.random::<f64>() - 1.0);
    let v = qr_decompose(g.as_ref(), DEFAULT_ROTATION_CUTOFF).unwrap().q;
    let d = Mat::from_fn(n, n, |i, j| if i == j { KNOWN_SPECTRUM[i] } else { 0.0 });
    let a = &v * &d * v.transpose();
    Mat::from_fn(n, n, |i, j| 0.5 * (a[(i, j)] + a[(j, i)]))
}

/// Checks `A·X = X·diag(λ)`, i.e. `A·vᵢ = λᵢ·vᵢ` for every eigenpair at once.
fn check_eigen_definition(
    a: &Mat<f64>,
    eigen: &EigenDecomposition,
    tolerance: f64,
) -> Result<()> {
    let values = eigen.eigenvalues();
    let av = a * &eigen.x;
    let lambda_v = Mat::from_fn(eigen.x.nrows(), eigen.x.ncols(), |i, j| {
        values[j] * eigen.x[(i, j)]
    });
    for j in 0..values.len() {
        ensure!(
            av.as_ref()
                .get(.., j..j + 1)
                .approx_eq(lambda_v.as_ref().get(.., j..j + 1), tolerance),
            "A*v should equal λ*v for eigenpair {} (λ = {})",
            j,
            values[j]
        );
    }
    Ok(())
}

/// Generates the property tests for one input matrix.
///
/// The pipeline is run with `$solve_tolerance` and the identities are checked with
/// `$check_tolerance`, both in the absolute-or-relative sense of
/// [`SquareMatrix::approx_eq`].
macro_rules! generate_pipeline_tests {
    ($mod_name:ident, $matrix:expr, $solve_tolerance:expr, $check_tolerance:expr) => {
        mod $mod_name {
            use super::*;

            #[test]
            fn tridiagonal_form_is_similar_and_h_is_orthogonal() -> Result<()> {
                let a: Mat<f64> = $matrix;
                let result = tridiagonalize(a.as_ref(), DEFAULT_REFLECTOR_CUTOFF)?;

                let rebuilt = &result.h * &result.t * result.h.transpose();
                ensure!(
                    rebuilt.approx_eq(a.as_ref(), $check_tolerance),
                    "H*T*H^T should reproduce A"
                );
                ensure!(
                    result.h.orthogonality_loss() < TIGHT_TOLERANCE,
                    "H should be orthogonal, loss {}",
                    result.h.orthogonality_loss()
                );
                ensure!(
                    result.t.is_tridiagonal(TIGHT_TOLERANCE * a.max_abs().max(1.0)),
                    "T should be tridiagonal"
                );
                Ok(())
            }

            #[test]
            fn decomposition_reconstructs_input() -> Result<()> {
                let a: Mat<f64> = $matrix;
                let eigen = symmetric_eigen(a.as_ref(), $solve_tolerance)?;

                let rebuilt = &eigen.x * &eigen.lambda * eigen.x.transpose();
                ensure!(
                    rebuilt.approx_eq(a.as_ref(), $check_tolerance),
                    "X*Λ*X^T should reproduce A"
                );
                ensure!(
                    eigen.x.orthogonality_loss() < TIGHT_TOLERANCE,
                    "X should be orthogonal"
                );
                ensure!(
                    eigen.residual <= $solve_tolerance,
                    "sub-diagonal mass {} above tolerance",
                    eigen.residual
                );
                Ok(())
            }

            #[test]
            fn columns_are_eigenvectors() -> Result<()> {
                let a: Mat<f64> = $matrix;
                let eigen = symmetric_eigen(a.as_ref(), $solve_tolerance)?;
                check_eigen_definition(&a, &eigen, $check_tolerance)?;

                // The same holds after reordering the pairs.
                check_eigen_definition(&a, &eigen.sorted_descending(), $check_tolerance)
            }

            #[test]
            fn trace_is_preserved() -> Result<()> {
                let a: Mat<f64> = $matrix;
                let eigen = symmetric_eigen(a.as_ref(), $solve_tolerance)?;
                let trace: f64 = (0..a.nrows()).map(|i| a[(i, i)]).sum();
                let sum: f64 = eigen.eigenvalues().iter().sum();
                ensure!(
                    (trace - sum).abs() <= $check_tolerance * trace.abs().max(1.0),
                    "eigenvalues should sum to the trace: {} vs {}",
                    sum,
                    trace
                );
                Ok(())
            }
        }
    };
}

// --- Test Suite ---

generate_pipeline_tests!(symmetric_3x3_suite, symmetric_3x3(), 1e-9, 1e-9);
generate_pipeline_tests!(symmetric_5x5_suite, symmetric_5x5(), 1e-9, 1e-9);
generate_pipeline_tests!(laplacian_suite, laplacian_8x8(), 1e-10, 1e-9);
generate_pipeline_tests!(known_spectrum_suite, known_spectrum_6x6(), 1e-10, 1e-9);
generate_pipeline_tests!(diagonal_suite, diagonal_4x4(), 1e-12, 1e-12);

#[test]
fn known_spectrum_is_recovered() -> Result<()> {
    let a = known_spectrum_6x6();
    let eigen = symmetric_eigen(a.as_ref(), 1e-10)?.sorted_descending();
    for (computed, expected) in eigen.eigenvalues().iter().zip(KNOWN_SPECTRUM) {
        ensure!(
            (computed - expected).abs() < 1e-9,
            "eigenvalue {} should be {}",
            computed,
            expected
        );
    }
    Ok(())
}

#[test]
fn qr_factorization_of_random_nonsymmetric_matrices() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(7);
    for n in [1, 2, 3, 5, 8, 13] {
        let a = Mat::from_fn(n, n, |_, _| 10.0 * rng.random::<f64>() - 5.0);
        let factors = qr_decompose(a.as_ref(), DEFAULT_ROTATION_CUTOFF)?;

        ensure!(
            (&factors.q * &factors.r).approx_eq(a.as_ref(), 1e-12),
            "Q*R should reproduce A for n = {}",
            n
        );
        ensure!(
            factors.q.orthogonality_loss() < 1e-12,
            "Q should be orthogonal for n = {}",
            n
        );
        for j in 0..n {
            for i in (j + 1)..n {
                ensure!(
                    factors.r[(i, j)].abs() < 1e-12,
                    "R[{}][{}] = {} should be zero",
                    i,
                    j,
                    factors.r[(i, j)]
                );
            }
        }
    }
    Ok(())
}

#[test]
fn single_entry_matrix_is_its_own_decomposition() -> Result<()> {
    let a: Mat<f64> = mat![[42.0]];
    let solver = HouseholderQr::default();

    let tridiagonal = solver.tridiagonalize(a.as_ref())?;
    ensure!(tridiagonal.t == a && tridiagonal.h == mat![[1.0]]);

    let eigen = solver.solve(a.as_ref())?;
    ensure!(eigen.eigenvalues() == vec![42.0]);
    ensure!(eigen.iterations == 1);
    Ok(())
}

#[test]
fn diagonal_matrix_needs_no_rotation() -> Result<()> {
    let a = diagonal_4x4();
    let eigen = symmetric_eigen(a.as_ref(), 1e-12)?;
    ensure!(eigen.iterations == 1, "took {} sweeps", eigen.iterations);
    ensure!(eigen.lambda == a, "Λ should equal the input");
    ensure!(eigen.x == Mat::<f64>::identity(4, 4), "X should be the identity");
    Ok(())
}

#[test]
fn opposite_eigenvalues_report_non_convergence() -> Result<()> {
    let a: Mat<f64> = mat![[0.0, 1.0], [1.0, 0.0]];
    let solver = HouseholderQr::new(SolverConfig::default().with_max_iterations(200));
    let err = solver.solve(a.as_ref()).unwrap_err();
    ensure!(err.is_convergence_failure(), "unexpected error: {}", err);
    ensure!(err.to_string().contains("200 iterations"));
    ensure!(err.residual() == Some(1.0), "residual was {:?}", err.residual());
    Ok(())
}

#[test]
fn rectangular_input_fails_fast() -> Result<()> {
    let a = Mat::<f64>::zeros(2, 3);
    let err = symmetric_eigen(a.as_ref(), 1e-9).unwrap_err();
    ensure!(
        err.to_string() == "Matrix must be square, but it has 2 rows and 3 columns.",
        "unexpected error: {}",
        err
    );
    Ok(())
}

#[test]
fn independent_solves_run_concurrently() -> Result<()> {
    let inputs = [
        symmetric_3x3(),
        symmetric_5x5(),
        laplacian_8x8(),
        known_spectrum_6x6(),
    ];
    let solve = |a: &Mat<f64>| symmetric_eigen(a.as_ref(), 1e-10).map(|e| e.eigenvalues());

    let sequential: Vec<Vec<f64>> = inputs.iter().map(solve).collect::<Result<_, _>>()?;
    let concurrent: Vec<Vec<f64>> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|a| scope.spawn(move || solve(a)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("solver thread panicked"))
            .collect::<Result<_, _>>()
    })?;

    for (seq, conc) in sequential.iter().zip(&concurrent) {
        for (x, y) in seq.iter().zip(conc) {
            ensure!(
                (x - y).abs() <= 1e-12 * x.abs().max(1.0),
                "concurrent solve gave {} instead of {}",
                y,
                x
            );
        }
    }
    Ok(())
}
