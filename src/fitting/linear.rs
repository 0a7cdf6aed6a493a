//! Dense linear solves by LU decomposition with partial pivoting
//!
//! Sized for the normal equations of small fits: a handful of unknowns,
//! solved once per fitter iteration.

use crate::io::configuration::SINGULAR_PIVOT;
use crate::io::error::{FitError, Result};
use ndarray::{Array1, Array2};

/// LU factors of a square matrix with the row permutation applied
#[derive(Debug, Clone)]
pub struct Lu {
    /// Unit lower triangle below the diagonal, upper triangle on and above
    factors: Array2<f64>,
    /// `pivots[i]` is the original row now stored at row `i`
    pivots: Vec<usize>,
}

impl Lu {
    /// Factor `a` as `P·A = L·U`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `a` is not square
    /// - A column has no pivot larger than [`SINGULAR_PIVOT`] in magnitude
    ///   (including `NaN` entries)
    pub fn decompose(a: &Array2<f64>) -> Result<Self> {
        let (rows, cols) = a.dim();
        if rows != cols {
            return Err(FitError::DimensionMismatch {
                context: "LU decomposition (square matrix)",
                expected: rows,
                found: cols,
            });
        }

        let n = rows;
        let mut factors = a.clone();
        let mut pivots: Vec<usize> = (0..n).collect();

        for k in 0..n {
            let (pivot_row, magnitude) = (k..n)
                .map(|i| (i, factors[[i, k]].abs()))
                .fold((k, f64::NEG_INFINITY), |best, candidate| {
                    if candidate.1 > best.1 { candidate } else { best }
                });

            // Written so that a NaN magnitude also counts as singular
            if !(magnitude > SINGULAR_PIVOT) {
                return Err(FitError::SingularMatrix { column: k });
            }

            if pivot_row != k {
                for j in 0..n {
                    factors.swap([k, j], [pivot_row, j]);
                }
                pivots.swap(k, pivot_row);
            }

            let pivot = factors[[k, k]];
            for i in k + 1..n {
                let factor = factors[[i, k]] / pivot;
                factors[[i, k]] = factor;
                for j in k + 1..n {
                    factors[[i, j]] -= factor * factors[[k, j]];
                }
            }
        }

        Ok(Self { factors, pivots })
    }

    /// Dimension of the factored matrix
    pub const fn dim(&self) -> usize {
        self.pivots.len()
    }

    /// Solve `A·x = b` using the stored factors
    ///
    /// # Errors
    ///
    /// Returns an error if `b` does not match the matrix dimension
    pub fn solve(&self, b: &Array1<f64>) -> Result<Array1<f64>> {
        let n = self.dim();
        if b.len() != n {
            return Err(FitError::DimensionMismatch {
                context: "LU solve (right-hand side)",
                expected: n,
                found: b.len(),
            });
        }

        let mut x: Array1<f64> = self.pivots.iter().map(|&row| b[row]).collect();

        for i in 0..n {
            let sum: f64 = (0..i).map(|j| self.factors[[i, j]] * x[j]).sum();
            x[i] -= sum;
        }

        for i in (0..n).rev() {
            let sum: f64 = (i + 1..n).map(|j| self.factors[[i, j]] * x[j]).sum();
            x[i] = (x[i] - sum) / self.factors[[i, i]];
        }

        Ok(x)
    }
}

/// Solve the square system `a·x = b`
///
/// # Errors
///
/// Returns an error if the dimensions disagree or `a` is singular
pub fn solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    Lu::decompose(a)?.solve(b)
}
