//! QR factorization by Givens rotations.
//!
//! Each rotation acts on two adjacent rows `(i - 1, i)` and is chosen to zero the entry
//! `R[i][j]` against `R[i - 1][j]`. Columns are processed left to right and, within a
//! column, rows bottom-up. A rotation only touches rows `i - 1` and `i`, whose entries
//! left of column `j` are already zero, so previously eliminated entries stay zero.
//!
//! Rotations are applied directly to the two affected rows of `R` (and the two affected
//! columns of `Q`) rather than by a dense `n x n` product. The arithmetic is the same as
//! multiplying by the explicit matrix returned by [`GivensRotation::to_mat`].

use super::{EigenError, QrFactors};
use crate::matrix::SquareMatrix;
use faer::{Mat, MatMut, MatRef};

/// A plane rotation acting on rows (or columns) `row - 1` and `row`.
///
/// As a matrix `G`, it is the identity except for the block
///
/// ```text
/// G[row-1][row-1] = cos    G[row-1][row] = -sin
/// G[row  ][row-1] = sin    G[row  ][row] =  cos
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GivensRotation {
    pub row: usize,
    pub cos: f64,
    pub sin: f64,
}

impl GivensRotation {
    /// Returns the rotation that maps `(a, b)` in rows `(row - 1, row)` onto `(r, 0)`,
    /// where `r = sqrt(a² + b²)`.
    ///
    /// Returns `None` when there is nothing to eliminate: `b` is exactly zero, or
    /// `r < cutoff` and rotating the pair would only amplify rounding noise.
    pub fn zeroing(a: f64, b: f64, row: usize, cutoff: f64) -> Option<Self> {
        debug_assert!(row >= 1, "a Givens rotation needs a row above the target");
        let r = a.hypot(b);
        if b == 0.0 || r < cutoff {
            return None;
        }
        Some(Self {
            row,
            cos: a / r,
            sin: -b / r,
        })
    }

    /// Materializes the rotation as a dense `n x n` matrix.
    pub fn to_mat(&self, n: usize) -> Mat<f64> {
        let mut g = Mat::<f64>::identity(n, n);
        let (p, q) = (self.row - 1, self.row);
        g[(p, p)] = self.cos;
        g[(q, q)] = self.cos;
        g[(p, q)] = -self.sin;
        g[(q, p)] = self.sin;
        g
    }

    /// Computes `M ← G·M` in place, touching only rows `row - 1` and `row`.
    pub fn apply_left(&self, mut m: MatMut<'_, f64>) {
        let (p, q) = (self.row - 1, self.row);
        for k in 0..m.ncols() {
            let upper = m[(p, k)];
            let lower = m[(q, k)];
            m[(p, k)] = self.cos * upper - self.sin * lower;
            m[(q, k)] = self.sin * upper + self.cos * lower;
        }
    }

    /// Computes `M ← M·Gᵀ` in place, touching only columns `row - 1` and `row`.
    pub fn apply_right_transpose(&self, mut m: MatMut<'_, f64>) {
        let (p, q) = (self.row - 1, self.row);
        for k in 0..m.nrows() {
            let left = m[(k, p)];
            let right = m[(k, q)];
            m[(k, p)] = self.cos * left - self.sin * right;
            m[(k, q)] = self.sin * left + self.cos * right;
        }
    }
}

/// Factors a square matrix as `A = Q·R` using Givens rotations.
///
/// The algorithm is general, but it is intended for the (near-)tridiagonal matrices
/// produced during the QR iteration, where most candidate rotations are skipped.
///
/// # Arguments
/// * `a`: A square matrix. It is copied, not modified.
/// * `cutoff`: Hypotenuse below which a rotation is skipped, see [`GivensRotation::zeroing`].
///
/// # Returns
/// [`QrFactors`] with orthogonal `q`, upper-triangular `r`, and the number of rotations
/// applied, or an error if `a` is empty or not square.
pub fn qr_decompose(a: MatRef<'_, f64>, cutoff: f64) -> Result<QrFactors, EigenError> {
    let n = a.order()?;

    let mut r = a.to_owned();
    let mut q = Mat::<f64>::identity(n, n);
    let mut rotations = 0;

    for j in 0..n {
        for i in ((j + 1)..n).rev() {
            let Some(rotation) = GivensRotation::zeroing(r[(i - 1, j)], r[(i, j)], i, cutoff)
            else {
                continue;
            };

            rotation.apply_left(r.as_mut());
            rotation.apply_right_transpose(q.as_mut());
            rotations += 1;
        }
    }

    Ok(QrFactors { q, r, rotations })
}
