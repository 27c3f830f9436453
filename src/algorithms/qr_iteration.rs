//! The unshifted QR algorithm on a tridiagonal matrix.
//!
//! Starting from `A_0 = T` and `X_0 = H`, each sweep factors the current matrix and
//! recombines the factors in reverse order:
//!
//! ```text
//! A_k = Q_k · R_k        A_{k+1} = R_k · Q_k = Q_kᵀ · A_k · Q_k        X_{k+1} = X_k · Q_k
//! ```
//!
//! Every `A_k` is orthogonally similar to `T`, and `X_k` stays orthogonal, so
//! `X_k · A_k · X_kᵀ` reproduces the original matrix at every step. The sub-diagonal of
//! `A_k` shrinks geometrically at a rate set by the ratios of neighbouring eigenvalue
//! magnitudes; the iteration stops once its absolute sum reaches the tolerance.
//!
//! Without shifts, eigenvalues of equal magnitude and opposite sign never separate. The
//! iteration cap turns that case into a reported [`EigenError`] instead of a hang.

use super::{
    EigenDecomposition, EigenError, IterationCallback, QrFactors, StoppingCriterion,
    givens::qr_decompose,
};
use crate::{error::EigenErrorKind, matrix::SquareMatrix};
use faer::MatRef;

/// Runs the QR iteration on `t`, accumulating eigenvectors on top of `h`.
///
/// At least one sweep is always performed, so an input that is already diagonal still
/// comes back with `iterations == 1`.
///
/// # Arguments
/// * `t`: The starting matrix, normally the tridiagonal form of a symmetric matrix.
/// * `h`: The orthogonal transform that produced `t`; pass the identity to get the
///   eigenvectors of `t` itself.
/// * `criterion`: Tolerance on the sub-diagonal mass and iteration cap.
/// * `rotation_cutoff`: Degeneracy threshold forwarded to [`qr_decompose`].
/// * `callback`: An optional callback invoked after every sweep. Returning `false` stops
///   the iteration and returns the current state as the result.
///
/// # Returns
/// The [`EigenDecomposition`] `(Λ, X)`, or an error if the inputs are malformed or the
/// iteration cap is reached first.
pub fn qr_iterate(
    t: MatRef<'_, f64>,
    h: MatRef<'_, f64>,
    criterion: StoppingCriterion,
    rotation_cutoff: f64,
    mut callback: Option<&mut IterationCallback<'_>>,
) -> Result<EigenDecomposition, EigenError> {
    criterion.validate()?;
    let n = t.order()?;
    let h_order = h.order()?;
    if h_order != n {
        return Err(EigenErrorKind::DimensionMismatch {
            expected: n,
            actual: h_order,
        }
        .into());
    }

    let mut a = t.to_owned();
    let mut x = h.to_owned();
    let mut residual = f64::INFINITY;

    for iteration in 1..=criterion.max_iterations {
        let QrFactors { q, r, rotations } = qr_decompose(a.as_ref(), rotation_cutoff)?;

        a = &r * &q;
        x = &x * &q;
        residual = a.sub_diagonal_mass();

        log::trace!("QR sweep {iteration}: {rotations} rotations, sub-diagonal mass {residual:e}");

        if let Some(ref mut cb) = callback {
            if !cb(iteration, a.as_ref(), residual) {
                log::debug!("QR iteration stopped by callback after {iteration} sweeps.");
                return Ok(EigenDecomposition {
                    lambda: a,
                    x,
                    iterations: iteration,
                    residual,
                });
            }
        }

        if residual <= criterion.tolerance {
            log::debug!(
                "QR iteration converged after {iteration} sweeps (sub-diagonal mass {residual:e})."
            );
            return Ok(EigenDecomposition {
                lambda: a,
                x,
                iterations: iteration,
                residual,
            });
        }
    }

    log::warn!(
        "QR iteration hit the cap of {} sweeps with sub-diagonal mass {residual:e}.",
        criterion.max_iterations
    );
    Err(EigenErrorKind::NoConvergence {
        iterations: criterion.max_iterations,
        residual,
    }
    .into())
}
