//! Dense row-major matrix container and generators.
//!
//! Every multiplication engine in this crate consumes two [`Matrix`] operands
//! and returns a newly allocated result; inputs are never mutated in place.

use std::ops::{Index, IndexMut};

use num::Float;
use rand::distr::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{dimension_mismatch, Result};

/// A dense matrix of floating-point values in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<F> {
    rows: usize,
    cols: usize,
    data: Vec<F>,
}

impl<F: Float> Matrix<F> {
    /// Creates a rows x cols matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![F::zero(); rows * cols],
        }
    }

    /// Creates the n x n identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Matrix::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = F::one();
        }
        m
    }

    /// Creates a matrix from a flat row-major buffer.
    ///
    /// Fails with a dimension-mismatch error when the buffer length does not
    /// equal `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<F>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(dimension_mismatch(
                (rows, cols),
                (data.len(), 1),
                "data length does not match rows * cols",
            ));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Generates an n x n matrix with uniformly-random values in `[0, 1)`.
    ///
    /// Deterministic when a seed is supplied, non-deterministic otherwise.
    pub fn random(n: usize, seed: Option<u64>) -> Self
    where
        F: SampleUniform,
    {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        let data = (0..n * n)
            .map(|_| rng.random_range(F::zero()..F::one()))
            .collect();
        Matrix { rows: n, cols: n, data }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Returns the element at (row, col), or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&F> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col)
    }

    /// The underlying row-major buffer.
    pub fn as_slice(&self) -> &[F] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [F] {
        &mut self.data
    }

    /// Element-wise sum. Fails when shapes differ.
    pub fn add(&self, other: &Matrix<F>) -> Result<Matrix<F>> {
        self.zip_with(other, |x, y| x + y, "cannot add matrices of different shapes")
    }

    /// Element-wise difference. Fails when shapes differ.
    pub fn sub(&self, other: &Matrix<F>) -> Result<Matrix<F>> {
        self.zip_with(other, |x, y| x - y, "cannot subtract matrices of different shapes")
    }

    fn zip_with(
        &self,
        other: &Matrix<F>,
        op: impl Fn(F, F) -> F,
        message: &str,
    ) -> Result<Matrix<F>> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(dimension_mismatch(
                (self.rows, self.cols),
                (other.rows, other.cols),
                message,
            ));
        }
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&x, &y)| op(x, y))
            .collect();
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Largest absolute entry. Used as the agreement metric between engines.
    pub fn norm_inf(&self) -> F {
        self.data
            .iter()
            .fold(F::zero(), |acc, v| acc.max(v.abs()))
    }
}

impl<F> Index<(usize, usize)> for Matrix<F> {
    type Output = F;

    #[inline(always)]
    fn index(&self, (row, col): (usize, usize)) -> &F {
        &self.data[row * self.cols + col]
    }
}

impl<F> IndexMut<(usize, usize)> for Matrix<F> {
    #[inline(always)]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut F {
        &mut self.data[row * self.cols + col]
    }
}

/// Validates a pair of multiplication operands: both square, inner dimensions
/// equal. Returns the common dimension n.
pub(crate) fn square_pair_dim<F: Float>(a: &Matrix<F>, b: &Matrix<F>) -> Result<usize> {
    if !a.is_square() || !b.is_square() {
        return Err(dimension_mismatch(
            (a.rows, a.cols),
            (b.rows, b.cols),
            "operands must be square",
        ));
    }
    if a.cols != b.rows {
        return Err(dimension_mismatch(
            (a.rows, a.cols),
            (b.rows, b.cols),
            "inner dimensions differ",
        ));
    }
    Ok(a.rows)
}
