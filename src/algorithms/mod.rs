//! Building blocks of the symmetric eigen solver.
//!
//! ** NOTE: We recommend using the high-level entry points in [`crate::solvers`]. The
//! functions in the submodules are exposed for callers that need the intermediate
//! matrices (the tridiagonal form, a single QR factorization, or a custom stopping rule).
//!
//! - [`householder`]: reflector construction and reduction to tridiagonal form.
//! - [`givens`]: plane rotations and the Givens QR factorization.
//! - [`qr_iteration`]: the unshifted QR algorithm that drives the tridiagonal matrix to
//!   diagonal form while accumulating eigenvectors.
//!
//! This module holds the types the three stages exchange.

pub mod givens;
pub mod householder;
pub mod qr_iteration;

pub use crate::error::EigenError;

use crate::error::EigenErrorKind;
use crate::matrix::SquareMatrix;
use faer::{Col, Mat, MatRef};

/// Below this norm, the residual vector of a Householder reflector is treated as zero.
pub const DEFAULT_REFLECTOR_CUTOFF: f64 = 1e-12;

/// Below this hypotenuse, a Givens rotation is skipped.
pub const DEFAULT_ROTATION_CUTOFF: f64 = 1e-15;

/// How the degeneracy cutoffs in [`Thresholds`] are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdScale {
    /// The cutoffs are used as given.
    #[default]
    Absolute,
    /// The cutoffs are multiplied by the Frobenius norm of the input matrix (floored at 1),
    /// so that the same configuration behaves alike on `A` and `1e6 * A`.
    RelativeToNorm,
}

/// Cutoffs under which a transform is replaced by the identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Cutoff on `||w - ŵ||` when building a Householder reflector.
    pub reflector: f64,
    /// Cutoff on `sqrt(a² + b²)` when building a Givens rotation.
    pub rotation: f64,
    pub scale: ThresholdScale,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            reflector: DEFAULT_REFLECTOR_CUTOFF,
            rotation: DEFAULT_ROTATION_CUTOFF,
            scale: ThresholdScale::Absolute,
        }
    }
}

impl Thresholds {
    /// Returns absolute cutoffs for the given input matrix.
    pub fn resolve(&self, a: MatRef<'_, f64>) -> Thresholds {
        let factor = match self.scale {
            ThresholdScale::Absolute => 1.0,
            ThresholdScale::RelativeToNorm => a.norm_l2().max(1.0),
        };
        Thresholds {
            reflector: self.reflector * factor,
            rotation: self.rotation * factor,
            scale: ThresholdScale::Absolute,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), EigenError> {
        for (name, value) in [("reflector", self.reflector), ("rotation", self.rotation)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(EigenErrorKind::InputError(format!(
                    "The {name} cutoff must be a non-negative finite number, got {value}."
                ))
                .into());
            }
        }
        Ok(())
    }
}

/// When the QR iteration stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoppingCriterion {
    /// The iteration stops once the sub-diagonal mass is at or below this value.
    pub tolerance: f64,
    /// Hard cap on the number of QR sweeps.
    pub max_iterations: usize,
}

impl StoppingCriterion {
    pub(crate) fn validate(&self) -> Result<(), EigenError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(EigenErrorKind::InputError(format!(
                "The convergence tolerance must be a positive finite number, got {}.",
                self.tolerance
            ))
            .into());
        }
        if self.max_iterations == 0 {
            return Err(EigenErrorKind::InputError(
                "The iteration cap must allow at least one iteration.".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

/// Output of the reduction to tridiagonal form: `T = Hᵀ·A·H`.
#[derive(Debug, Clone)]
pub struct Tridiagonalization {
    /// The tridiagonal matrix similar to the input.
    pub t: Mat<f64>,
    /// The accumulated orthogonal transform `H = H₀·H₁·…`.
    pub h: Mat<f64>,
}

/// Output of a Givens QR factorization: `A = Q·R`.
#[derive(Debug, Clone)]
pub struct QrFactors {
    pub q: Mat<f64>,
    pub r: Mat<f64>,
    /// Number of rotations actually applied (skipped, degenerate ones are not counted).
    pub rotations: usize,
}

/// Result of the full solve: `A = X·Λ·Xᵀ`.
#[derive(Debug, Clone)]
pub struct EigenDecomposition {
    /// Near-diagonal matrix whose diagonal holds the eigenvalues.
    pub lambda: Mat<f64>,
    /// Orthogonal matrix whose columns are the eigenvectors, in the order of `lambda`.
    pub x: Mat<f64>,
    /// Number of QR sweeps performed.
    pub iterations: usize,
    /// Sub-diagonal mass of `lambda` when the iteration stopped.
    pub residual: f64,
}

impl EigenDecomposition {
    /// Dimension of the decomposed matrix.
    pub fn order(&self) -> usize {
        self.lambda.nrows()
    }

    /// The eigenvalues, read off the diagonal of `Λ`.
    pub fn eigenvalues(&self) -> Vec<f64> {
        (0..self.order()).map(|i| self.lambda[(i, i)]).collect()
    }

    /// The eigenvector paired with the `i`-th eigenvalue.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    pub fn eigenvector(&self, i: usize) -> Col<f64> {
        self.x.col(i).to_owned()
    }

    /// Reorders the eigenpairs by decreasing eigenvalue.
    ///
    /// `Λ` is permuted symmetrically and the columns of `X` follow, so `X·Λ·Xᵀ` is unchanged.
    pub fn sorted_descending(self) -> EigenDecomposition {
        let values = self.eigenvalues();
        let mut perm: Vec<usize> = (0..values.len()).collect();
        perm.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

        let n = self.order();
        let lambda = Mat::from_fn(n, n, |i, j| self.lambda[(perm[i], perm[j])]);
        let x = Mat::from_fn(self.x.nrows(), n, |i, j| self.x[(i, perm[j])]);

        EigenDecomposition {
            lambda,
            x,
            iterations: self.iterations,
            residual: self.residual,
        }
    }

    /// Sub-diagonal mass of `Λ`, recomputed from the stored matrix.
    pub fn sub_diagonal_mass(&self) -> f64 {
        self.lambda.sub_diagonal_mass()
    }
}

/// Callback invoked after every QR sweep with the iteration count, the current matrix
/// `A_k` and its sub-diagonal mass. Returning `false` stops the iteration early.
pub type IterationCallback<'a> = dyn FnMut(usize, MatRef<'_, f64>, f64) -> bool + 'a;
