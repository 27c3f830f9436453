//! Dense-matrix helpers shared by every stage of the eigen solver.
//!
//! The heavy lifting (storage, products, transposes, norms) is delegated to [`faer`].
//! What this module adds is a small capability trait, [`SquareMatrix`], that gathers the
//! structural queries the algorithms and their tests keep asking: is the matrix square,
//! how much mass is left below the diagonal, is it tridiagonal, is it symmetric, how far
//! is it from being orthogonal.
//!
//! The trait is implemented for faer's owned matrix (`Mat`) and both of its views
//! (`MatRef`, `MatMut`). The view implementations reborrow into `MatRef`, which holds the
//! only real implementation.

use crate::error::{EigenError, EigenErrorKind};
use faer::{Mat, MatMut, MatRef, prelude::Reborrow};

/// Structural queries on a dense real matrix.
pub trait SquareMatrix {
    /// Returns the order `n` of the matrix, or an error if it is empty or not square.
    fn order(&self) -> Result<usize, EigenError>;

    /// Sum of the absolute values of the entries immediately below the main diagonal.
    ///
    /// This is the convergence measure of the QR iteration.
    fn sub_diagonal_mass(&self) -> f64;

    /// Largest absolute entry, or `0.0` for an empty matrix.
    fn max_abs(&self) -> f64;

    /// Returns the position and size of the largest asymmetry `|a_ij - a_ji|`, with `i < j`.
    ///
    /// `None` when the matrix is exactly symmetric (or smaller than 2x2). The first
    /// NaN deviation found is reported as the worst one.
    fn worst_asymmetry(&self) -> Option<(usize, usize, f64)>;

    /// Returns `true` if every entry with `|i - j| > 1` is within `tolerance` of zero.
    fn is_tridiagonal(&self, tolerance: f64) -> bool;

    /// Entry-wise comparison using an absolute-or-relative tolerance.
    ///
    /// Two entries `x` and `y` match when `|x - y| <= tolerance` or
    /// `|x - y| <= tolerance * max(|x|, |y|)`.
    fn approx_eq(&self, other: MatRef<'_, f64>, tolerance: f64) -> bool;

    /// Frobenius norm of `I - M^T M`; zero for an exactly orthogonal matrix.
    fn orthogonality_loss(&self) -> f64;
}

impl SquareMatrix for MatRef<'_, f64> {
    fn order(&self) -> Result<usize, EigenError> {
        let (rows, cols) = (self.nrows(), self.ncols());
        if rows != cols {
            return Err(EigenErrorKind::NotSquare { rows, cols }.into());
        }
        if rows == 0 {
            return Err(EigenErrorKind::EmptyMatrix.into());
        }
        Ok(rows)
    }

    fn sub_diagonal_mass(&self) -> f64 {
        let n = self.nrows().min(self.ncols() + 1);
        (1..n).map(|row| self[(row, row - 1)].abs()).sum()
    }

    fn max_abs(&self) -> f64 {
        let mut max = 0.0f64;
        for j in 0..self.ncols() {
            for i in 0..self.nrows() {
                max = max.max(self[(i, j)].abs());
            }
        }
        max
    }

    fn worst_asymmetry(&self) -> Option<(usize, usize, f64)> {
        let n = self.nrows().min(self.ncols());
        let mut worst: Option<(usize, usize, f64)> = None;
        for i in 0..n {
            for j in (i + 1)..n {
                let deviation = (self[(i, j)] - self[(j, i)]).abs();
                if deviation.is_nan() {
                    return Some((i, j, deviation));
                }
                if deviation > worst.map_or(0.0, |(_, _, d)| d) {
                    worst = Some((i, j, deviation));
                }
            }
        }
        worst
    }

    fn is_tridiagonal(&self, tolerance: f64) -> bool {
        for j in 0..self.ncols() {
            for i in 0..self.nrows() {
                if i.abs_diff(j) > 1 && self[(i, j)].abs() > tolerance {
                    return false;
                }
            }
        }
        true
    }

    fn approx_eq(&self, other: MatRef<'_, f64>, tolerance: f64) -> bool {
        if self.nrows() != other.nrows() || self.ncols() != other.ncols() {
            return false;
        }
        for j in 0..self.ncols() {
            for i in 0..self.nrows() {
                let (x, y) = (self[(i, j)], other[(i, j)]);
                let diff = (x - y).abs();
                if diff > tolerance && diff > tolerance * x.abs().max(y.abs()) {
                    return false;
                }
            }
        }
        true
    }

    fn orthogonality_loss(&self) -> f64 {
        let gram = self.transpose() * *self;
        (&Mat::<f64>::identity(gram.nrows(), gram.ncols()) - &gram).norm_l2()
    }
}

impl SquareMatrix for MatMut<'_, f64> {
    #[inline]
    fn order(&self) -> Result<usize, EigenError> {
        self.rb().order()
    }

    #[inline]
    fn sub_diagonal_mass(&self) -> f64 {
        self.rb().sub_diagonal_mass()
    }

    #[inline]
    fn max_abs(&self) -> f64 {
        self.rb().max_abs()
    }

    #[inline]
    fn worst_asymmetry(&self) -> Option<(usize, usize, f64)> {
        self.rb().worst_asymmetry()
    }

    #[inline]
    fn is_tridiagonal(&self, tolerance: f64) -> bool {
        self.rb().is_tridiagonal(tolerance)
    }

    #[inline]
    fn approx_eq(&self, other: MatRef<'_, f64>, tolerance: f64) -> bool {
        self.rb().approx_eq(other, tolerance)
    }

    #[inline]
    fn orthogonality_loss(&self) -> f64 {
        self.rb().orthogonality_loss()
    }
}

impl SquareMatrix for Mat<f64> {
    #[inline]
    fn order(&self) -> Result<usize, EigenError> {
        self.as_ref().order()
    }

    #[inline]
    fn sub_diagonal_mass(&self) -> f64 {
        self.as_ref().sub_diagonal_mass()
    }

    #[inline]
    fn max_abs(&self) -> f64 {
        self.as_ref().max_abs()
    }

    #[inline]
    fn worst_asymmetry(&self) -> Option<(usize, usize, f64)> {
        self.as_ref().worst_asymmetry()
    }

    #[inline]
    fn is_tridiagonal(&self, tolerance: f64) -> bool {
        self.as_ref().is_tridiagonal(tolerance)
    }

    #[inline]
    fn approx_eq(&self, other: MatRef<'_, f64>, tolerance: f64) -> bool {
        self.as_ref().approx_eq(other, tolerance)
    }

    #[inline]
    fn orthogonality_loss(&self) -> f64 {
        self.as_ref().orthogonality_loss()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::mat;

    #[test]
    fn test_order_of_square_matrix() {
        let matrix: Mat<f64> = mat![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(matrix.order().unwrap(), 2);
        assert_eq!(matrix.as_ref().order().unwrap(), 2);
    }

    #[test]
    fn test_order_rejects_rectangular_and_empty() {
        let rectangular = Mat::<f64>::zeros(2, 3);
        assert_eq!(
            rectangular.order().unwrap_err(),
            EigenError::from(EigenErrorKind::NotSquare { rows: 2, cols: 3 })
        );

        let empty = Mat::<f64>::zeros(0, 0);
        assert_eq!(
            empty.order().unwrap_err(),
            EigenError::from(EigenErrorKind::EmptyMatrix)
        );
    }

    #[test]
    fn test_sub_diagonal_mass() {
        let matrix: Mat<f64> = mat![[1.0, 9.0, 9.0], [-2.0, 1.0, 9.0], [7.0, 0.5, 1.0]];
        // Only (1, 0) and (2, 1) count; (2, 0) is below the sub-diagonal.
        assert_eq!(matrix.sub_diagonal_mass(), 2.5);

        let single: Mat<f64> = mat![[3.0]];
        assert_eq!(single.sub_diagonal_mass(), 0.0);
    }

    #[test]
    fn test_tridiagonal_and_symmetry_predicates() {
        let mut matrix: Mat<f64> = mat![[2.0, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 2.0]];
        assert!(matrix.is_tridiagonal(0.0));
        assert!(matrix.worst_asymmetry().is_none());

        matrix.as_mut()[(0, 2)] = 0.25;
        assert!(!matrix.as_mut().is_tridiagonal(1e-3));
        assert!(matrix.is_tridiagonal(0.5));
        assert_eq!(matrix.worst_asymmetry(), Some((0, 2, 0.25)));
    }

    #[test]
    fn test_nan_asymmetry_is_reported() {
        let matrix: Mat<f64> = mat![[1.0, 5.0, f64::NAN], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]];
        let (row, col, deviation) = matrix.worst_asymmetry().unwrap();
        assert_eq!((row, col), (0, 2));
        assert!(deviation.is_nan());
    }

    #[test]
    fn test_approx_eq_is_absolute_or_relative() {
        let a: Mat<f64> = mat![[1000.0, 0.0], [0.0, 1e-12]];
        let b: Mat<f64> = mat![[1000.000_000_1, 0.0], [0.0, 0.0]];
        assert!(a.approx_eq(b.as_ref(), 1e-9));
        assert!(!a.approx_eq(b.as_ref(), 1e-14));
        assert!(!a.approx_eq(Mat::<f64>::zeros(3, 3).as_ref(), 1.0));
    }

    #[test]
    fn test_orthogonality_loss() {
        let (c, s) = (0.6, 0.8);
        let rotation: Mat<f64> = mat![[c, -s], [s, c]];
        assert!(rotation.orthogonality_loss() < 1e-15);

        let scaled: Mat<f64> = mat![[2.0, 0.0], [0.0, 1.0]];
        assert!((scaled.orthogonality_loss() - 3.0).abs() < 1e-15);
        assert_eq!(scaled.max_abs(), 2.0);
    }
}
