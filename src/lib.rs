//! Dense symmetric eigenvalue solver built from orthogonal transformations.
//!
//! This crate computes every eigenvalue and eigenvector of a dense real symmetric matrix
//! `A` in two stages:
//!
//! 1. **Tridiagonalization** ([`algorithms::householder`]): a sequence of Householder
//!    reflections reduces `A` to a tridiagonal matrix `T = Hᵀ·A·H`, accumulating the
//!    orthogonal transform `H`.
//! 2. **QR iteration** ([`algorithms::qr_iteration`]): the unshifted QR algorithm, with
//!    each factorization computed by Givens rotations ([`algorithms::givens`]), drives
//!    `T` towards a diagonal matrix `Λ` while accumulating `X = H·Q₀·Q₁·…`.
//!
//! The result satisfies `A = X·Λ·Xᵀ` with `X` orthogonal: the diagonal of `Λ` holds the
//! eigenvalues and the columns of `X` the matching eigenvectors.
//!
//! Built on the [`faer`] linear algebra framework for storage, products and norms.
//!
//! ## Example Usage
//!
//! ```rust
//! use faer::mat;
//! use householder_qr::{EigenSolver, HouseholderQr, SolverConfig, matrix::SquareMatrix};
//!
//! let a = mat![
//!     [6.0, 4.0, 1.0],
//!     [4.0, 6.0, 1.0],
//!     [1.0, 1.0, 5.0],
//! ];
//!
//! let solver = HouseholderQr::new(SolverConfig::default().with_tolerance(1e-9));
//! let eigen = solver.solve(a.as_ref()).unwrap();
//!
//! // The decomposition reproduces the input...
//! let rebuilt = &eigen.x * &eigen.lambda * eigen.x.transpose();
//! assert!(rebuilt.approx_eq(a.as_ref(), 1e-9));
//!
//! // ...and every column of X is an eigenvector.
//! for (i, lambda) in eigen.eigenvalues().into_iter().enumerate() {
//!     let v = eigen.eigenvector(i);
//!     let av = &a * &v;
//!     for row in 0..3 {
//!         assert!((av[row] - lambda * v[row]).abs() < 1e-8);
//!     }
//! }
//! ```
//!
//! ## Convergence
//!
//! The QR iteration is unshifted, so it converges linearly and fails on spectra with two
//! eigenvalues of equal magnitude and opposite sign. The iteration is therefore capped
//! (see [`SolverConfig::max_iterations`]) and reports a convergence failure through
//! [`EigenError`] rather than looping forever.

pub mod algorithms;
pub mod error;
pub mod matrix;
pub mod solvers;
pub mod utils;

// Re-export the main API for convenient access.
pub use algorithms::{EigenDecomposition, ThresholdScale, Thresholds, Tridiagonalization};
pub use error::EigenError;
pub use solvers::{EigenSolver, HouseholderQr, SolverConfig, Tridiagonalizer, symmetric_eigen};
