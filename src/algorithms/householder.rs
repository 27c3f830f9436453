//! Householder reduction of a symmetric matrix to tridiagonal form.
//!
//! For every column `i` in `0..n-2`, a reflector `H_i = I - 2·v·vᵀ` is built that maps the
//! part of column `i` below the sub-diagonal onto the sub-diagonal entry. Conjugating the
//! working matrix with `H_i` zeroes that part of the column (and, by symmetry, of row
//! `i`), while the product of all reflectors is accumulated into `H`:
//!
//! ```text
//! A_{i+1} = H_iᵀ · A_i · H_i        H = H₀ · H₁ · … · H_{n-3}
//! ```
//!
//! The last two columns never need a reflector, since a trailing 2x2 block is already
//! tridiagonal.
//!
//! Reflectors are formed explicitly as dense `n x n` matrices and applied with full
//! matrix products. This keeps every step a plain similarity transform that can be
//! inspected on its own.

use super::{EigenError, Tridiagonalization};
use crate::{error::EigenErrorKind, matrix::SquareMatrix};
use faer::{Col, Mat, MatRef};

/// Builds the Householder reflector that zeroes column `i` of `a` below row `i + 1`.
///
/// The reflector is computed from `w`, the part of column `i` strictly below the
/// diagonal, and its target `ŵ = ||w||·e_{i+1}`. When `||w - ŵ||` falls under `cutoff`
/// the column is already reduced, and the identity is returned instead of dividing by a
/// vanishing norm.
///
/// # Arguments
/// * `a`: The current working matrix. Must be square.
/// * `i`: The column to reduce, in `0..=n-3`.
/// * `cutoff`: Degeneracy threshold on `||w - ŵ||`.
///
/// # Returns
/// The orthogonal, symmetric matrix `H_i`, or an error if `a` is not square or `i` is
/// out of range.
pub fn householder_reflector(
    a: MatRef<'_, f64>,
    i: usize,
    cutoff: f64,
) -> Result<Mat<f64>, EigenError> {
    let n = a.order()?;
    if i + 2 >= n {
        return Err(EigenErrorKind::InputError(format!(
            "Reflector column {i} is out of range for a {n}x{n} matrix; it must leave at least two rows below the pivot."
        ))
        .into());
    }

    // w holds column i below the diagonal; everything above row i + 1 stays zero.
    let mut w = Col::<f64>::zeros(n);
    for row in (i + 1)..n {
        w[row] = a[(row, i)];
    }

    // N = w - ŵ, with ŵ = ||w||·e_{i+1}.
    let length = w.norm_l2();
    let mut residual = w;
    residual[i + 1] -= length;

    let residual_norm = residual.norm_l2();
    if residual_norm < cutoff {
        return Ok(Mat::identity(n, n));
    }

    let v = Col::from_fn(n, |k| residual[k] / residual_norm);
    Ok(Mat::from_fn(n, n, |r, c| {
        let delta = if r == c { 1.0 } else { 0.0 };
        delta - 2.0 * v[r] * v[c]
    }))
}

/// Reduces a symmetric matrix to tridiagonal form by successive Householder reflections.
///
/// The input is copied; `a` itself is never modified. Symmetry is a precondition that is
/// not checked here: a non-symmetric input is still processed, but the result is then
/// only upper Hessenberg. Use [`crate::solvers::HouseholderQr`] for validated input.
///
/// # Arguments
/// * `a`: A square matrix.
/// * `cutoff`: Degeneracy threshold forwarded to [`householder_reflector`].
///
/// # Returns
/// A [`Tridiagonalization`] holding `T = Hᵀ·A·H` and the accumulated orthogonal `H`,
/// or an error if `a` is empty or not square.
pub fn tridiagonalize(a: MatRef<'_, f64>, cutoff: f64) -> Result<Tridiagonalization, EigenError> {
    let n = a.order()?;

    let mut h = Mat::<f64>::identity(n, n);
    let mut current = a.to_owned();

    for i in 0..n.saturating_sub(2) {
        let h_i = householder_reflector(current.as_ref(), i, cutoff)?;

        // The similarity transform must conjugate with H_i on both sides.
        let right = &current * &h_i;
        current = h_i.transpose() * &right;

        h = &h * &h_i;
    }

    log::debug!(
        "Tridiagonalized a {n}x{n} matrix with {} reflectors.",
        n.saturating_sub(2)
    );

    Ok(Tridiagonalization { t: current, h })
}
