//! This module provides a high-level, user-friendly API for computing the full
//! eigen-decomposition of a dense symmetric matrix.
//!
//! The pipeline has two stages, each exposed through its own capability trait:
//! - [`Tridiagonalizer`]: orthogonal reduction `A = H·T·Hᵀ` to tridiagonal form.
//! - [`EigenSolver`]: the complete decomposition `A = X·Λ·Xᵀ`.
//!
//! [`HouseholderQr`] implements both, using Householder reflections for the first stage
//! and the unshifted Givens QR iteration for the second. [`symmetric_eigen`] is a
//! shortcut for the common case.

use crate::{
    algorithms::{
        EigenDecomposition, IterationCallback, StoppingCriterion, Thresholds, Tridiagonalization,
        householder::tridiagonalize, qr_iteration::qr_iterate,
    },
    error::{EigenError, EigenErrorKind},
    matrix::SquareMatrix,
};
use faer::MatRef;

/// Default tolerance on the sub-diagonal mass of `Λ`.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Default cap on the number of QR sweeps.
///
/// Unshifted QR converges linearly, at the rate of the closest ratio `|λ_{i+1} / λ_i|`,
/// so clustered spectra can need thousands of sweeps.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Default tolerance of the symmetry check, relative to `max(1, max|a_ij|)`.
pub const DEFAULT_SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Configuration for [`HouseholderQr`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Convergence tolerance ε on the sum of absolute sub-diagonal entries.
    pub tolerance: f64,
    /// Maximum number of QR sweeps before reporting non-convergence.
    pub max_iterations: usize,
    /// Symmetry check tolerance, relative to `max(1, max|a_ij|)`. `None` skips the check.
    pub symmetry_tolerance: Option<f64>,
    /// Degeneracy cutoffs for reflectors and rotations.
    pub thresholds: Thresholds,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            symmetry_tolerance: Some(DEFAULT_SYMMETRY_TOLERANCE),
            thresholds: Thresholds::default(),
        }
    }
}

impl SolverConfig {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_symmetry_tolerance(mut self, symmetry_tolerance: Option<f64>) -> Self {
        self.symmetry_tolerance = symmetry_tolerance;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    fn stopping_criterion(&self) -> StoppingCriterion {
        StoppingCriterion {
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
        }
    }

    /// Checks every parameter before any computation starts.
    pub fn validate(&self) -> Result<(), EigenError> {
        self.stopping_criterion().validate()?;
        self.thresholds.validate()?;
        if let Some(tolerance) = self.symmetry_tolerance {
            if !(tolerance.is_finite() && tolerance >= 0.0) {
                return Err(EigenErrorKind::InputError(format!(
                    "The symmetry tolerance must be a non-negative finite number, got {tolerance}."
                ))
                .into());
            }
        }
        Ok(())
    }
}

/// Reduction of a symmetric matrix to tridiagonal form.
pub trait Tridiagonalizer {
    /// Returns `T` and `H` with `A = H·T·Hᵀ`, `T` tridiagonal and `H` orthogonal.
    fn tridiagonalize(&self, a: MatRef<'_, f64>) -> Result<Tridiagonalization, EigenError>;
}

/// Full eigen-decomposition of a symmetric matrix.
pub trait EigenSolver {
    /// Returns `Λ` and `X` with `A = X·Λ·Xᵀ`, `Λ` diagonal within tolerance and `X`
    /// orthogonal.
    fn solve(&self, a: MatRef<'_, f64>) -> Result<EigenDecomposition, EigenError>;
}

/// Householder tridiagonalization followed by the unshifted Givens QR iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HouseholderQr {
    config: SolverConfig,
}

impl HouseholderQr {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Like [`EigenSolver::solve`], with a callback invoked after every QR sweep.
    ///
    /// # Arguments
    /// * `a`: A symmetric matrix.
    /// * `callback`: Receives the sweep count, the current `A_k` and its sub-diagonal mass.
    ///   Returning `false` stops the iteration early; the current state is returned.
    ///
    /// # Returns
    /// The [`EigenDecomposition`] of `a`, or an [`EigenError`] if the input or the
    /// configuration is invalid, or the iteration cap is reached.
    pub fn solve_with_callback(
        &self,
        a: MatRef<'_, f64>,
        callback: Option<&mut IterationCallback<'_>>,
    ) -> Result<EigenDecomposition, EigenError> {
        let tridiagonal = self.tridiagonalize(a)?;
        self.iterate(a, &tridiagonal, callback)
    }

    /// Runs the QR iteration on a reduction previously returned by
    /// [`Tridiagonalizer::tridiagonalize`] for the same `a`.
    ///
    /// `a` is only used to resolve relative cutoffs; it is not validated again.
    pub fn iterate(
        &self,
        a: MatRef<'_, f64>,
        tridiagonal: &Tridiagonalization,
        callback: Option<&mut IterationCallback<'_>>,
    ) -> Result<EigenDecomposition, EigenError> {
        let Tridiagonalization { t, h } = tridiagonal;
        let cutoffs = self.config.thresholds.resolve(a);

        qr_iterate(
            t.as_ref(),
            h.as_ref(),
            self.config.stopping_criterion(),
            cutoffs.rotation,
            callback,
        )
    }

    /// Validates the configuration and the shape (and optionally the symmetry) of `a`.
    fn check_input(&self, a: MatRef<'_, f64>) -> Result<(), EigenError> {
        self.config.validate()?;
        let n = a.order()?;

        for i in 0..n {
            for j in 0..n {
                let value = a[(i, j)];
                if !value.is_finite() {
                    return Err(EigenErrorKind::InputError(format!(
                        "Matrix entry ({i}, {j}) is not finite: {value}."
                    ))
                    .into());
                }
            }
        }

        if let Some(tolerance) = self.config.symmetry_tolerance {
            let scale = a.max_abs().max(1.0);
            if let Some((row, col, deviation)) = a.worst_asymmetry() {
                if deviation > tolerance * scale {
                    return Err(EigenErrorKind::NotSymmetric {
                        row,
                        col,
                        deviation,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

impl Tridiagonalizer for HouseholderQr {
    fn tridiagonalize(&self, a: MatRef<'_, f64>) -> Result<Tridiagonalization, EigenError> {
        self.check_input(a)?;
        let cutoffs = self.config.thresholds.resolve(a);
        tridiagonalize(a, cutoffs.reflector)
    }
}

impl EigenSolver for HouseholderQr {
    fn solve(&self, a: MatRef<'_, f64>) -> Result<EigenDecomposition, EigenError> {
        self.solve_with_callback(a, None)
    }
}

/// Computes the eigen-decomposition of a symmetric matrix with the default configuration
/// and the given convergence tolerance.
///
/// # Arguments
/// * `a`: A symmetric matrix.
/// * `tolerance`: Convergence tolerance ε on the sub-diagonal mass of `Λ`.
///
/// # Returns
/// A `Result` containing `Λ` and `X` such that `A = X·Λ·Xᵀ`, or an [`EigenError`].
pub fn symmetric_eigen(
    a: MatRef<'_, f64>,
    tolerance: f64,
) -> Result<EigenDecomposition, EigenError> {
    HouseholderQr::new(SolverConfig::default().with_tolerance(tolerance)).solve(a)
}
