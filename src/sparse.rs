//! Sparse matrix containers and the sparse multiplication engine.
//!
//! Matrices are assembled as coordinate triples ([`CooMatrix`]) and
//! normalized into compressed-row form ([`CsrMatrix`]), the representation
//! the multiply operates on. Duplicate coordinates sum additively during
//! compression.

use num::Float;
use rand::distr::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{dimension_mismatch, Result};
use crate::matrix::Matrix;

/// Sparse matrix in coordinate form: an unordered list of
/// (row, col, value) triples with implicit zero elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct CooMatrix<F> {
    rows: usize,
    cols: usize,
    entries: Vec<(usize, usize, F)>,
}

impl<F: Float> CooMatrix<F> {
    pub fn new(rows: usize, cols: usize) -> Self {
        CooMatrix {
            rows,
            cols,
            entries: Vec::new(),
        }
    }

    /// Appends an entry. Panics if (row, col) is out of bounds.
    pub fn push(&mut self, row: usize, col: usize, value: F) {
        assert!(row < self.rows, "row {} out of bounds ({})", row, self.rows);
        assert!(col < self.cols, "col {} out of bounds ({})", col, self.cols);
        self.entries.push((row, col, value));
    }

    /// Number of stored triples, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compresses into row-major CSR form.
    ///
    /// Triples at the same coordinate are summed in insertion order, so the
    /// compressed matrix is deterministic for a given construction sequence
    /// and carries no duplicate (row, col) pairs.
    pub fn to_csr(&self) -> CsrMatrix<F> {
        let mut per_row: Vec<Vec<(usize, F)>> = vec![Vec::new(); self.rows];
        for &(r, c, v) in &self.entries {
            per_row[r].push((c, v));
        }

        let mut indptr = Vec::with_capacity(self.rows + 1);
        let mut indices = Vec::with_capacity(self.entries.len());
        let mut values = Vec::with_capacity(self.entries.len());
        indptr.push(0);

        for row in &mut per_row {
            // Stable sort keeps duplicate entries in insertion order before
            // they are merged.
            row.sort_by_key(|&(c, _)| c);
            let row_start = indices.len();
            for &(c, v) in row.iter() {
                if indices.len() > row_start && indices.last() == Some(&c) {
                    let last = values.len() - 1;
                    values[last] = values[last] + v;
                } else {
                    indices.push(c);
                    values.push(v);
                }
            }
            indptr.push(indices.len());
        }

        CsrMatrix {
            rows: self.rows,
            cols: self.cols,
            indptr,
            indices,
            values,
        }
    }
}

/// Sparse matrix in compressed-row form: the normalized representation fed
/// into the sparse engine. Column indices are strictly increasing within
/// each row.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<F> {
    rows: usize,
    cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<F>,
}

impl<F: Float> CsrMatrix<F> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of structurally non-zero entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Column indices and values of row i.
    pub fn row(&self, i: usize) -> (&[usize], &[F]) {
        let span = self.indptr[i]..self.indptr[i + 1];
        (&self.indices[span.clone()], &self.values[span])
    }

    /// Coerces a dense matrix into CSR form, keeping only non-zero entries.
    pub fn from_dense(m: &Matrix<F>) -> Self {
        let mut coo = CooMatrix::new(m.rows(), m.cols());
        for i in 0..m.rows() {
            for j in 0..m.cols() {
                let v = m[(i, j)];
                if v != F::zero() {
                    coo.push(i, j, v);
                }
            }
        }
        coo.to_csr()
    }

    /// Expands into a dense matrix.
    pub fn to_dense(&self) -> Matrix<F> {
        let mut out = Matrix::zeros(self.rows, self.cols);
        for i in 0..self.rows {
            let (cols, vals) = self.row(i);
            for (&j, &v) in cols.iter().zip(vals) {
                out[(i, j)] = v;
            }
        }
        out
    }

    /// Generates a synthetic n x n sparse matrix with the given sparsity
    /// level (fraction of zero entries, in the open interval (0, 1)).
    ///
    /// Draws exactly `⌊(1 - sparsity) * n²⌋` independent uniformly-random
    /// (row, col) pairs with values in `[0, 1)`; coordinate collisions sum
    /// during compression, so the resulting [`nnz`](Self::nnz) may fall
    /// below the draw count but never exceeds it.
    pub fn random(n: usize, sparsity: f64, seed: Option<u64>) -> Self
    where
        F: SampleUniform,
    {
        assert!(n > 0, "dimension must be positive");
        assert!(
            sparsity > 0.0 && sparsity < 1.0,
            "sparsity must lie in (0, 1), got {}",
            sparsity
        );

        let draws = ((1.0 - sparsity) * (n * n) as f64).floor() as usize;
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };

        let mut coo = CooMatrix::new(n, n);
        for _ in 0..draws {
            let i = rng.random_range(0..n);
            let j = rng.random_range(0..n);
            coo.push(i, j, rng.random_range(F::zero()..F::one()));
        }
        coo.to_csr()
    }

    /// Sparse-sparse product `C = A * B`, preserving only structurally
    /// non-zero results.
    ///
    /// Row-wise accumulation over shared non-zero indices (Gustavson): for
    /// each row of A, partial products are gathered into a dense accumulator
    /// row and scattered back out in column order. Result entries are exact
    /// sums: the dense product restricted to non-zero accumulation paths.
    pub fn multiply(&self, other: &CsrMatrix<F>) -> Result<CsrMatrix<F>> {
        if self.rows != self.cols || other.rows != other.cols || self.cols != other.rows {
            return Err(dimension_mismatch(
                (self.rows, self.cols),
                (other.rows, other.cols),
                "sparse multiply requires square operands with matching inner dimensions",
            ));
        }
        let n = self.rows;

        let mut indptr = Vec::with_capacity(n + 1);
        let mut indices = Vec::new();
        let mut values = Vec::new();
        indptr.push(0);

        let mut acc = vec![F::zero(); n];
        let mut occupied = vec![false; n];
        let mut touched: Vec<usize> = Vec::new();

        for i in 0..n {
            let (a_cols, a_vals) = self.row(i);
            for (&k, &a_ik) in a_cols.iter().zip(a_vals) {
                let (b_cols, b_vals) = other.row(k);
                for (&j, &b_kj) in b_cols.iter().zip(b_vals) {
                    if !occupied[j] {
                        occupied[j] = true;
                        touched.push(j);
                    }
                    acc[j] = acc[j] + a_ik * b_kj;
                }
            }

            touched.sort_unstable();
            for &j in &touched {
                indices.push(j);
                values.push(acc[j]);
                acc[j] = F::zero();
                occupied[j] = false;
            }
            indptr.push(indices.len());
            touched.clear();
        }

        Ok(CsrMatrix {
            rows: n,
            cols: n,
            indptr,
            indices,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_csr_sums_duplicates() {
        let mut coo = CooMatrix::new(2, 2);
        coo.push(0, 1, 1.5);
        coo.push(0, 1, 2.5);
        coo.push(1, 0, 3.0);
        assert_eq!(coo.len(), 3);

        let csr = coo.to_csr();
        assert_eq!(csr.nnz(), 2);
        assert_eq!(csr.row(0), (&[1usize][..], &[4.0][..]));
        assert_eq!(csr.row(1), (&[0usize][..], &[3.0][..]));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_push_out_of_bounds_panics() {
        let mut coo = CooMatrix::<f64>::new(2, 2);
        coo.push(2, 0, 1.0);
    }

    #[test]
    fn test_dense_roundtrip() {
        let dense =
            Matrix::from_vec(2, 3, vec![0.0, 2.0, 0.0, 1.0, 0.0, 5.0]).unwrap();
        let csr = CsrMatrix::from_dense(&dense);
        assert_eq!(csr.nnz(), 3);
        assert_eq!(csr.to_dense(), dense);
    }

    #[test]
    fn test_multiply_against_dense() {
        // A = [1 0; 2 3], B = [0 4; 5 6] => C = [0 4; 15 26]
        let a = CsrMatrix::from_dense(
            &Matrix::from_vec(2, 2, vec![1.0, 0.0, 2.0, 3.0]).unwrap(),
        );
        let b = CsrMatrix::from_dense(
            &Matrix::from_vec(2, 2, vec![0.0, 4.0, 5.0, 6.0]).unwrap(),
        );

        let c = a.multiply(&b).unwrap();
        let expected = Matrix::from_vec(2, 2, vec![0.0, 4.0, 15.0, 26.0]).unwrap();
        assert_eq!(c.to_dense(), expected);
        // C[0][0] is a structural zero, not a stored entry.
        assert_eq!(c.nnz(), 3);
    }

    #[test]
    fn test_multiply_dimension_check() {
        let a = CsrMatrix::from_dense(&Matrix::<f64>::identity(2));
        let b = CsrMatrix::from_dense(&Matrix::<f64>::identity(3));
        assert!(a.multiply(&b).is_err());
    }

    #[test]
    fn test_random_respects_draw_budget() {
        let csr = CsrMatrix::<f64>::random(50, 0.9, Some(7));
        let draws = (0.1 * 2500.0) as usize;
        assert!(
            csr.nnz() <= draws,
            "nnz {} exceeds draw count {}",
            csr.nnz(),
            draws
        );
        assert!(csr.nnz() > 0);

        // Same seed, same matrix.
        let again = CsrMatrix::<f64>::random(50, 0.9, Some(7));
        assert_eq!(csr, again);
    }
}
