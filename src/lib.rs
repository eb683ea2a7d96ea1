//! Matrix multiplication strategy engine.
//!
//! A family of multiplication algorithms (naive, cache-blocked, Strassen,
//! sparse, optimized-backend and parallel/distributed) over a common matrix
//! abstraction, instrumented uniformly so benchmark results are comparable
//! across strategies.

pub mod backend;
pub mod engines;
pub mod error;
pub mod matrix;
pub mod partition;
pub mod sparse;

/// Default tile size for the cache-blocked engine.
pub const BLOCK_SIZE: usize = 64;

/// Default block size for the distributed map/reduce engine.
pub const DIST_BLOCK_SIZE: usize = 256;

/// Dimension at or below which the Strassen engine delegates to the naive
/// engine instead of recursing further.
pub const STRASSEN_CUTOFF: usize = 64;
