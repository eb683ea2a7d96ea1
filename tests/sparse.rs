//! Sparse generator and sparse-engine tests.

use matbench::engines::naive;
use matbench::matrix::Matrix;
use matbench::sparse::{CooMatrix, CsrMatrix};

const TOL: f64 = 1e-9;

#[test]
fn test_generator_nnz_never_exceeds_draw_count() {
    // n = 500 at sparsity 0.9 draws exactly ⌊0.1 * 500²⌋ = 25000 entries;
    // coordinate collisions can only reduce the compressed count.
    let m = CsrMatrix::<f64>::random(500, 0.9, Some(301));

    assert!(
        m.nnz() <= 25_000,
        "nnz {} exceeds the pre-compression draw count",
        m.nnz()
    );
    assert!(m.nnz() > 0, "generator produced an empty matrix");
    assert_eq!(m.rows(), 500);
    assert_eq!(m.cols(), 500);
}

#[test]
fn test_generator_is_seed_deterministic() {
    let a = CsrMatrix::<f64>::random(100, 0.95, Some(302));
    let b = CsrMatrix::<f64>::random(100, 0.95, Some(302));
    let c = CsrMatrix::<f64>::random(100, 0.95, Some(303));

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_duplicate_coordinates_sum_additively() {
    let mut coo = CooMatrix::new(3, 3);
    coo.push(1, 1, 0.25);
    coo.push(1, 1, 0.5);
    coo.push(1, 1, 0.25);
    coo.push(0, 2, 2.0);

    let csr = coo.to_csr();
    assert_eq!(csr.nnz(), 2);
    assert_eq!(csr.to_dense()[(1, 1)], 1.0);
    assert_eq!(csr.to_dense()[(0, 2)], 2.0);
}

#[test]
fn test_sparse_multiply_agrees_with_dense_naive() {
    let a_csr = CsrMatrix::<f64>::random(40, 0.8, Some(304));
    let b_csr = CsrMatrix::<f64>::random(40, 0.8, Some(305));

    let expected = naive::multiply(&a_csr.to_dense(), &b_csr.to_dense()).unwrap();
    let got = a_csr.multiply(&b_csr).unwrap().to_dense();

    let diff = got.sub(&expected).unwrap().norm_inf();
    assert!(diff < TOL, "sparse product diverged from dense by {}", diff);
}

#[test]
fn test_sparse_identity_property() {
    let a = CsrMatrix::<f64>::random(20, 0.7, Some(306));
    let id = CsrMatrix::from_dense(&Matrix::<f64>::identity(20));

    let c = a.multiply(&id).unwrap();
    assert_eq!(c.to_dense(), a.to_dense());
}

#[test]
fn test_sparse_product_keeps_only_structural_nonzeros() {
    // A's single column hits B's empty row: the product is all zero and
    // stores nothing.
    let mut a = CooMatrix::new(2, 2);
    a.push(0, 0, 1.0);
    a.push(1, 0, 2.0);
    let mut b = CooMatrix::new(2, 2);
    b.push(1, 1, 5.0);

    let c = a.to_csr().multiply(&b.to_csr()).unwrap();
    assert_eq!(c.nnz(), 0);
    assert_eq!(c.to_dense(), Matrix::<f64>::zeros(2, 2));
}

#[test]
fn test_dense_coercion_roundtrip() {
    let dense = Matrix::<f64>::random(10, Some(307));
    let csr = CsrMatrix::from_dense(&dense);

    // Uniform [0, 1) draws are never exactly zero, so nothing is lost.
    assert_eq!(csr.nnz(), 100);
    assert_eq!(csr.to_dense(), dense);
}
