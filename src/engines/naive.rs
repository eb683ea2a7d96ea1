//! Reference triple-loop multiply. Defines the correctness ground truth the
//! other engines are compared against.

use num::Float;

use crate::error::Result;
use crate::matrix::{square_pair_dim, Matrix};

/// Computes `C = A * B` with the textbook triple loop.
///
/// For all i, j: `C[i][j] = Σ_k A[i][k] * B[k][j]`, accumulated in increasing
/// k order. O(n³) time, O(n²) extra space for the result. Fails with a
/// dimension-mismatch error unless both operands are square with equal
/// dimension.
pub fn multiply<F: Float>(a: &Matrix<F>, b: &Matrix<F>) -> Result<Matrix<F>> {
    let n = square_pair_dim(a, b)?;
    let mut c = Matrix::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            let mut sum = F::zero();
            for k in 0..n {
                sum = sum + a[(i, k)] * b[(k, j)];
            }
            c[(i, j)] = sum;
        }
    }
    Ok(c)
}
