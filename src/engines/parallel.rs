//! Parallel and distributed multiplication engines.
//!
//! The distributed engine decomposes `C = A * B` into independent block
//! tasks, dispatches them across a bounded worker pool and reduces the
//! partial products into the output matrix, timing each phase. The simpler
//! row-parallel variant assigns each output row to a task; rows are disjoint,
//! so it needs no reduce step.
//!
//! Both engines are synchronous from the caller's point of view: a call
//! blocks until every task result is collected, and a failed task fails the
//! whole invocation with no partial result. The worker pool lives for a
//! single call, so concurrent benchmark runs cannot interfere through shared
//! pool state.

use std::num::NonZeroUsize;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use num::Float;
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
use rayon::slice::ParallelSliceMut;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::engines::blocked;
use crate::error::{backend_unavailable, size_constraint, task_failure, Result};
use crate::matrix::{square_pair_dim, Matrix};
use crate::partition::{add_block_into, block};
use crate::DIST_BLOCK_SIZE;

/// Wall-clock spans bracketing the three phases of one distributed multiply,
/// plus the parameters the run used. Purely observational; never affects the
/// computed result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTiming {
    /// Time spent slicing A and B into block tasks.
    pub partition: Duration,
    /// Time from first dispatch until the last task result was collected.
    pub compute: Duration,
    /// Time spent accumulating partial blocks into the output.
    pub reduce: Duration,
    /// Worker threads the pool was built with.
    pub workers: usize,
    /// Block edge length the matrices were partitioned by.
    pub block_size: usize,
}

impl PhaseTiming {
    /// Total reported time: the phases are measured side by side, never
    /// nested, so their sum is the whole invocation.
    pub fn total(&self) -> Duration {
        self.partition + self.compute + self.reduce
    }
}

/// One unit of distributed work: the block-index triple and owned copies of
/// the operand blocks. Consumed exactly once by a worker; produces exactly
/// one partial product for the output region (bi, bj).
struct BlockTask<F> {
    bi: usize,
    bj: usize,
    bk: usize,
    a_block: Matrix<F>,
    b_block: Matrix<F>,
}

impl<F: Float> BlockTask<F> {
    fn run(self) -> Result<(usize, usize, Matrix<F>)> {
        let coords = (self.bi, self.bj, self.bk);
        let partial = blocked::multiply(&self.a_block, &self.b_block)
            .map_err(|e| task_failure(coords, e.to_string()))?;
        Ok((self.bi, self.bj, partial))
    }
}

/// Computes `C = A * B` with the default distributed block size
/// ([`DIST_BLOCK_SIZE`]), returning the result and the phase timings.
pub fn distributed_multiply<F>(
    a: &Matrix<F>,
    b: &Matrix<F>,
    workers: Option<usize>,
) -> Result<(Matrix<F>, PhaseTiming)>
where
    F: Float + Send + Sync,
{
    distributed_multiply_with_block(a, b, workers, DIST_BLOCK_SIZE)
}

/// Computes `C = A * B` by block decomposition over a bounded worker pool.
///
/// Three phases, timed independently:
///
/// 1. **Partition**: enumerate all (bi, bj, bk) triples over `n/block_size`
///    blocks per axis and slice the corresponding operand blocks.
/// 2. **Compute**: dispatch every task onto a pool of `workers` threads
///    (hardware parallelism when `None`). Workers share no mutable state;
///    results arrive over a channel as a multiset of (bi, bj, partial)
///    tuples in completion order, which need not match submission order.
/// 3. **Reduce**: accumulate each partial product additively into the
///    output region (bi, bj). Distinct bk targeting the same region sum.
///
/// Fails with a size-constraint error unless n is divisible by
/// `block_size`, with a backend-unavailable error when the pool cannot be
/// built, and with a task-failure error (no partial result, no retry)
/// when any worker task fails.
pub fn distributed_multiply_with_block<F>(
    a: &Matrix<F>,
    b: &Matrix<F>,
    workers: Option<usize>,
    block_size: usize,
) -> Result<(Matrix<F>, PhaseTiming)>
where
    F: Float + Send + Sync,
{
    let n = square_pair_dim(a, b)?;
    if block_size == 0 || n % block_size != 0 {
        return Err(size_constraint(
            n,
            format!("dimension must be divisible by the block size {}", block_size),
        ));
    }
    let workers = workers.unwrap_or_else(default_workers).max(1);
    let pool = build_pool(workers)?;

    // Partition phase.
    let partition_start = Instant::now();
    let blocks = n / block_size;
    let mut tasks = Vec::with_capacity(blocks * blocks * blocks);
    for bi in 0..blocks {
        for bj in 0..blocks {
            for bk in 0..blocks {
                tasks.push(BlockTask {
                    bi,
                    bj,
                    bk,
                    a_block: block(a, bi * block_size, bk * block_size, block_size, block_size),
                    b_block: block(b, bk * block_size, bj * block_size, block_size, block_size),
                });
            }
        }
    }
    let partition = partition_start.elapsed();

    // Compute phase. The scope joins all workers before returning, and every
    // sender is dropped by then, so draining the channel cannot block.
    let compute_start = Instant::now();
    let task_count = tasks.len();
    let (tx, rx) = mpsc::channel();
    pool.scope(move |scope| {
        for task in tasks {
            let tx = tx.clone();
            scope.spawn(move |_| {
                let _ = tx.send(task.run());
            });
        }
    });
    let delivered: Vec<Result<(usize, usize, Matrix<F>)>> = rx.iter().collect();
    let compute = compute_start.elapsed();
    debug_assert_eq!(delivered.len(), task_count);

    // Reduce phase.
    let reduce_start = Instant::now();
    let mut c = Matrix::zeros(n, n);
    for result in delivered {
        let (bi, bj, partial) = result?;
        add_block_into(&mut c, bi * block_size, bj * block_size, &partial);
    }
    let reduce = reduce_start.elapsed();

    Ok((
        c,
        PhaseTiming {
            partition,
            compute,
            reduce,
            workers,
            block_size,
        },
    ))
}

/// Computes `C = A * B` with one task per output row.
///
/// Each task computes a full dot-product row independently and owns a
/// disjoint slice of the output, so no accumulation step (and no write race)
/// exists. Pool size and lifetime follow the distributed engine: `workers`
/// threads (hardware parallelism when `None`), torn down when the call
/// returns.
pub fn row_parallel_multiply<F>(
    a: &Matrix<F>,
    b: &Matrix<F>,
    workers: Option<usize>,
) -> Result<Matrix<F>>
where
    F: Float + Send + Sync,
{
    let n = square_pair_dim(a, b)?;
    let workers = workers.unwrap_or_else(default_workers).max(1);
    let pool = build_pool(workers)?;

    let mut c = Matrix::zeros(n, n);
    pool.install(|| {
        c.as_mut_slice()
            .par_chunks_mut(n)
            .enumerate()
            .for_each(|(i, c_row)| {
                for (j, c_val) in c_row.iter_mut().enumerate() {
                    let mut sum = F::zero();
                    for k in 0..n {
                        sum = sum + a[(i, k)] * b[(k, j)];
                    }
                    *c_val = sum;
                }
            });
    });
    Ok(c)
}

fn build_pool(workers: usize) -> Result<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| backend_unavailable("rayon", e.to_string()))
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::naive;

    #[test]
    fn test_distributed_matches_naive() {
        let a = Matrix::<f64>::random(16, Some(31));
        let b = Matrix::<f64>::random(16, Some(32));

        let expected = naive::multiply(&a, &b).unwrap();
        // Four blocks per axis, so each output region accumulates four
        // partial products.
        let (got, timing) = distributed_multiply_with_block(&a, &b, Some(2), 4).unwrap();

        let diff = got.sub(&expected).unwrap().norm_inf();
        assert!(diff < 1e-9, "distributed vs naive diverged by {}", diff);
        assert_eq!(timing.workers, 2);
        assert_eq!(timing.block_size, 4);
        assert_eq!(
            timing.total(),
            timing.partition + timing.compute + timing.reduce
        );
    }

    #[test]
    fn test_distributed_rejects_non_divisible_dimension() {
        let a = Matrix::<f64>::identity(10);
        let err = distributed_multiply_with_block(&a, &a, None, 4).unwrap_err();
        assert!(matches!(
            err,
            crate::error::MatbenchError::SizeConstraint { dimension: 10, .. }
        ));
    }

    #[test]
    fn test_row_parallel_matches_naive() {
        let a = Matrix::<f64>::random(12, Some(33));
        let b = Matrix::<f64>::random(12, Some(34));

        let expected = naive::multiply(&a, &b).unwrap();
        let got = row_parallel_multiply(&a, &b, Some(3)).unwrap();

        // Row tasks reuse the naive accumulation order, so the results are
        // bitwise equal, not merely close.
        assert_eq!(got, expected);
    }

    #[test]
    fn test_phase_timing_total() {
        let timing = PhaseTiming {
            partition: Duration::from_millis(2),
            compute: Duration::from_millis(30),
            reduce: Duration::from_millis(4),
            workers: 8,
            block_size: 256,
        };
        assert_eq!(timing.total(), Duration::from_millis(36));
    }
}
