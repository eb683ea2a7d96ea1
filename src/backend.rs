//! Optimized dense backend and thread-budget accessors.
//!
//! The vendor-optimized multiply is modeled as a capability interface: core
//! code depends only on [`OptimizedBackend`], and an unavailable
//! implementation disables that one benchmarked strategy without affecting
//! the others.

use ndarray::{Array2, LinalgScalar};
use num::Float;

use crate::error::{backend_unavailable, Result};
use crate::matrix::{square_pair_dim, Matrix};

/// Environment variables conventionally used to cap BLAS-style backend
/// thread pools, probed in priority order.
const BACKEND_THREAD_VARS: [&str; 4] = [
    "MKL_NUM_THREADS",
    "OPENBLAS_NUM_THREADS",
    "BLIS_NUM_THREADS",
    "OMP_NUM_THREADS",
];

/// A black-box dense multiply used as one benchmarked strategy and as the
/// correctness oracle for the others.
pub trait OptimizedBackend<F> {
    /// Backend name, for benchmark labels and error messages.
    fn name(&self) -> &'static str;

    /// Whether the backend can be invoked at all.
    fn is_available(&self) -> bool;

    /// Thread count configured for the backend, when obtainable. `None`
    /// means unknown; callers omit efficiency reporting rather than fail.
    fn threads(&self) -> Option<usize>;

    /// Computes `A * B`. Fails with a backend-unavailable error when
    /// [`is_available`](Self::is_available) is false.
    fn multiply(&self, a: &Matrix<F>, b: &Matrix<F>) -> Result<Matrix<F>>;
}

/// [`ndarray`]-backed implementation of the optimized multiply.
#[derive(Debug, Clone, Copy, Default)]
pub struct NdarrayBackend;

impl<F: Float + LinalgScalar> OptimizedBackend<F> for NdarrayBackend {
    fn name(&self) -> &'static str {
        "ndarray"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn threads(&self) -> Option<usize> {
        BACKEND_THREAD_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok()?.parse().ok())
    }

    fn multiply(&self, a: &Matrix<F>, b: &Matrix<F>) -> Result<Matrix<F>> {
        let n = square_pair_dim(a, b)?;

        let a_nd = Array2::from_shape_fn((n, n), |(i, j)| a[(i, j)]);
        let b_nd = Array2::from_shape_fn((n, n), |(i, j)| b[(i, j)]);
        let c_nd = a_nd.dot(&b_nd);

        let mut c = Matrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                c[(i, j)] = c_nd[[i, j]];
            }
        }
        Ok(c)
    }
}

/// A backend that is never available; stands in when no accelerated library
/// is linked, disabling the optimized strategy without affecting the rest.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsentBackend;

impl<F: Float> OptimizedBackend<F> for AbsentBackend {
    fn name(&self) -> &'static str {
        "absent"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn threads(&self) -> Option<usize> {
        None
    }

    fn multiply(&self, _a: &Matrix<F>, _b: &Matrix<F>) -> Result<Matrix<F>> {
        Err(backend_unavailable(
            "absent",
            "no optimized dense backend is linked",
        ))
    }
}

/// Active parallelism of the worker-pool runtime the parallel engines run on.
pub fn pool_threads() -> usize {
    rayon::current_num_threads()
}

/// Per-thread efficiency: speedup divided by the thread budget. `None` when
/// the budget is unknown, so callers omit the metric instead of failing.
pub fn efficiency(speedup: f64, threads: Option<usize>) -> Option<f64> {
    match threads {
        Some(t) if t > 0 => Some(speedup / t as f64),
        _ => None,
    }
}
