//! Strassen divide-and-conquer multiply.
//!
//! Trades the eighth recursive sub-product of the quadrant decomposition for
//! extra additions: O(n^2.807) arithmetic at the cost of O(n²) temporary
//! storage per recursion level. Temporaries live on the heap, so the
//! recursion depth of log2(n) stays far from any stack limit (11 frames at
//! n = 2048).

use num::Float;

use crate::engines::naive;
use crate::error::{size_constraint, Result};
use crate::matrix::{square_pair_dim, Matrix};
use crate::partition::{join_quadrants, quadrants};
use crate::STRASSEN_CUTOFF;

/// Computes `C = A * B` with the default recursion cutoff
/// ([`STRASSEN_CUTOFF`]).
pub fn multiply<F: Float>(a: &Matrix<F>, b: &Matrix<F>) -> Result<Matrix<F>> {
    multiply_with_cutoff(a, b, STRASSEN_CUTOFF)
}

/// Computes `C = A * B`, recursing on quadrants down to the cutoff.
///
/// The dimension must be a power of two; anything else fails with a
/// size-constraint error rather than being silently padded, since the
/// recursion requires exact halving at every level. At or below the cutoff
/// the naive engine takes over; a cutoff of 1 reaches the scalar-product
/// base case.
///
/// # Arguments
///
/// * `a`, `b` - Square operands of equal power-of-two dimension.
/// * `cutoff` - Dimension at which to stop recursing (minimum 1).
pub fn multiply_with_cutoff<F: Float>(
    a: &Matrix<F>,
    b: &Matrix<F>,
    cutoff: usize,
) -> Result<Matrix<F>> {
    let n = square_pair_dim(a, b)?;
    if !n.is_power_of_two() {
        return Err(size_constraint(
            n,
            "Strassen requires a power-of-two dimension",
        ));
    }
    recurse(a, b, cutoff.max(1))
}

/// One recursion level. Dimensions are valid by construction: the entry
/// point checked them and quadrant halves of a power of two stay powers of
/// two.
fn recurse<F: Float>(a: &Matrix<F>, b: &Matrix<F>, cutoff: usize) -> Result<Matrix<F>> {
    if a.rows() <= cutoff {
        return naive::multiply(a, b);
    }

    let (a11, a12, a21, a22) = quadrants(a)?;
    let (b11, b12, b21, b22) = quadrants(b)?;

    // The canonical seven sub-products.
    let m1 = recurse(&a11.add(&a22)?, &b11.add(&b22)?, cutoff)?;
    let m2 = recurse(&a21.add(&a22)?, &b11, cutoff)?;
    let m3 = recurse(&a11, &b12.sub(&b22)?, cutoff)?;
    let m4 = recurse(&a22, &b21.sub(&b11)?, cutoff)?;
    let m5 = recurse(&a11.add(&a12)?, &b22, cutoff)?;
    let m6 = recurse(&a21.sub(&a11)?, &b11.add(&b12)?, cutoff)?;
    let m7 = recurse(&a12.sub(&a22)?, &b21.add(&b22)?, cutoff)?;

    let c11 = m1.add(&m4)?.sub(&m5)?.add(&m7)?;
    let c12 = m3.add(&m5)?;
    let c21 = m2.add(&m4)?;
    let c22 = m1.sub(&m2)?.add(&m3)?.add(&m6)?;

    Ok(join_quadrants(&c11, &c12, &c21, &c22))
}
