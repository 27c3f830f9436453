//! This module defines the custom error types for the library.
//!
//! Every failure the eigen solver can report is collected in a single enum,
//! [`EigenErrorKind`], hidden behind the public opaque wrapper [`EigenError`].
//!
//! Numerical degeneracies met along the way (a reflector column that is already
//! reduced, a rotation whose hypotenuse vanishes) are not errors: the algorithms
//! substitute an identity transform and carry on. Only precondition violations and
//! non-convergence surface here.
use thiserror::Error;

/// Represents all possible errors that can occur while computing an eigen-decomposition.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct EigenError(#[from] EigenErrorKind);

impl EigenError {
    /// Returns `true` when the QR iteration hit its iteration cap before converging.
    pub fn is_convergence_failure(&self) -> bool {
        matches!(self.0, EigenErrorKind::NoConvergence { .. })
    }

    /// Sub-diagonal mass reached when the iteration cap was hit, if this is a
    /// convergence failure.
    pub fn residual(&self) -> Option<f64> {
        match self.0 {
            EigenErrorKind::NoConvergence { residual, .. } => Some(residual),
            _ => None,
        }
    }
}

/// Private enum containing the distinct kinds of errors.
#[derive(Error, Debug, PartialEq)]
pub(crate) enum EigenErrorKind {
    /// The input matrix is not square.
    #[error("Matrix must be square, but it has {rows} rows and {cols} columns.")]
    NotSquare { rows: usize, cols: usize },

    /// Two matrices handed to the same stage have incompatible dimensions.
    #[error("Dimension mismatch: expected a {expected}x{expected} matrix but got {actual}x{actual}.")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The input matrix has no entries.
    #[error("Matrix must have at least one row and one column.")]
    EmptyMatrix,

    /// The input failed the optional symmetry validation.
    #[error(
        "Matrix is not symmetric: entries ({row}, {col}) and ({col}, {row}) differ by {deviation:e}."
    )]
    NotSymmetric {
        row: usize,
        col: usize,
        deviation: f64,
    },

    /// The QR iteration exhausted its iteration budget.
    #[error(
        "QR iteration did not converge after {iterations} iterations (sub-diagonal mass {residual:e})."
    )]
    NoConvergence { iterations: usize, residual: f64 },

    /// Indicates that an invalid input parameter was provided to a function.
    #[error("Invalid input parameter: {0}")]
    InputError(String),
}

impl PartialEq for EigenError {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
