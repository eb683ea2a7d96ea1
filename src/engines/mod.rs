//! The multiplication engine family and the driver-facing strategy selector.

pub mod blocked;
pub mod naive;
pub mod parallel;
pub mod strassen;

use ndarray::LinalgScalar;
use num::Float;

use crate::backend::{NdarrayBackend, OptimizedBackend};
use crate::error::Result;
use crate::matrix::Matrix;

/// Selects one of the benchmarked dense strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Reference triple loop.
    Naive,
    /// Cache-tiled multiply with the given tile size.
    Blocked { block_size: usize },
    /// Recursive divide-and-conquer (power-of-two dimensions only).
    Strassen,
    /// The optimized dense backend.
    Optimized,
    /// One worker task per output row, no reduce step.
    RowParallel { workers: Option<usize> },
    /// Block map/reduce over a worker pool.
    Distributed {
        workers: Option<usize>,
        block_size: usize,
    },
}

/// Dispatches to the selected engine. All strategies produce numerically
/// consistent results on the same inputs, modulo floating-point accumulation
/// order.
///
/// The distributed engine's phase-timing record is discarded here; drivers
/// that want it call [`parallel::distributed_multiply_with_block`] directly.
pub fn multiply<F>(strategy: Strategy, a: &Matrix<F>, b: &Matrix<F>) -> Result<Matrix<F>>
where
    F: Float + LinalgScalar + Send + Sync,
{
    match strategy {
        Strategy::Naive => naive::multiply(a, b),
        Strategy::Blocked { block_size } => blocked::multiply_with_block(a, b, block_size),
        Strategy::Strassen => strassen::multiply(a, b),
        Strategy::Optimized => NdarrayBackend.multiply(a, b),
        Strategy::RowParallel { workers } => parallel::row_parallel_multiply(a, b, workers),
        Strategy::Distributed {
            workers,
            block_size,
        } => parallel::distributed_multiply_with_block(a, b, workers, block_size)
            .map(|(c, _timing)| c),
    }
}
