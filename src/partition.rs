//! Matrix partitioning: quadrant splits for the recursive engine and
//! rectangular block extraction/accumulation for the blocked and distributed
//! engines.

use num::Float;

use crate::error::{size_constraint, Result};
use crate::matrix::Matrix;

/// Splits a square matrix of even dimension into its four quadrants,
/// returned as (top-left, top-right, bottom-left, bottom-right).
///
/// Fails with a size-constraint error when the dimension is odd; the
/// Strassen engine guarantees even dimensions by gating on powers of two.
pub fn quadrants<F: Float>(m: &Matrix<F>) -> Result<(Matrix<F>, Matrix<F>, Matrix<F>, Matrix<F>)> {
    let n = m.rows();
    if n % 2 != 0 {
        return Err(size_constraint(
            n,
            "quadrant split requires an even dimension",
        ));
    }
    let mid = n / 2;
    Ok((
        block(m, 0, 0, mid, mid),
        block(m, 0, mid, mid, mid),
        block(m, mid, 0, mid, mid),
        block(m, mid, mid, mid, mid),
    ))
}

/// Reassembles four equally-sized quadrants into one matrix:
/// `(c11 | c12)` atop `(c21 | c22)`.
pub fn join_quadrants<F: Float>(
    c11: &Matrix<F>,
    c12: &Matrix<F>,
    c21: &Matrix<F>,
    c22: &Matrix<F>,
) -> Matrix<F> {
    let mid = c11.rows();
    debug_assert!(
        [c12, c21, c22]
            .iter()
            .all(|q| q.rows() == mid && q.cols() == mid),
        "quadrants must share one shape"
    );

    let mut out = Matrix::zeros(2 * mid, 2 * mid);
    copy_block_into(&mut out, 0, 0, c11);
    copy_block_into(&mut out, 0, mid, c12);
    copy_block_into(&mut out, mid, 0, c21);
    copy_block_into(&mut out, mid, mid, c22);
    out
}

/// Copies the `height` x `width` block whose top-left corner is
/// (row0, col0) out of `m`. The caller clamps extents to the matrix edge.
pub fn block<F: Float>(
    m: &Matrix<F>,
    row0: usize,
    col0: usize,
    height: usize,
    width: usize,
) -> Matrix<F> {
    assert!(
        row0 + height <= m.rows() && col0 + width <= m.cols(),
        "block ({}+{}, {}+{}) exceeds matrix bounds {}x{}",
        row0,
        height,
        col0,
        width,
        m.rows(),
        m.cols()
    );

    let mut out = Matrix::zeros(height, width);
    let src = m.as_slice();
    let dst = out.as_mut_slice();
    for i in 0..height {
        let src_row = (row0 + i) * m.cols() + col0;
        dst[i * width..(i + 1) * width].copy_from_slice(&src[src_row..src_row + width]);
    }
    out
}

/// Accumulates `partial` additively into `out` at (row0, col0).
///
/// The reduce phase of the distributed engine calls this once per delivered
/// task result; partial products targeting the same region must sum, never
/// overwrite.
pub fn add_block_into<F: Float>(out: &mut Matrix<F>, row0: usize, col0: usize, partial: &Matrix<F>) {
    assert!(
        row0 + partial.rows() <= out.rows() && col0 + partial.cols() <= out.cols(),
        "block ({}+{}, {}+{}) exceeds matrix bounds {}x{}",
        row0,
        partial.rows(),
        col0,
        partial.cols(),
        out.rows(),
        out.cols()
    );

    for i in 0..partial.rows() {
        for j in 0..partial.cols() {
            out[(row0 + i, col0 + j)] = out[(row0 + i, col0 + j)] + partial[(i, j)];
        }
    }
}

fn copy_block_into<F: Float>(out: &mut Matrix<F>, row0: usize, col0: usize, src: &Matrix<F>) {
    let width = src.cols();
    for i in 0..src.rows() {
        let dst_row = (row0 + i) * out.cols() + col0;
        out.as_mut_slice()[dst_row..dst_row + width]
            .copy_from_slice(&src.as_slice()[i * width..(i + 1) * width]);
    }
}
