//! Error types for matbench operations.
//!
//! This module defines custom error types that provide better error handling
//! than panicking, allowing benchmark drivers to catch a failing strategy and
//! skip it without aborting the whole run.

use std::fmt;

/// Errors that can occur during matbench operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatbenchError {
    /// Operand shapes are incompatible for multiplication, or an operand is
    /// not square where a square matrix is required.
    DimensionMismatch {
        /// Shape of the left operand as (rows, cols).
        left: (usize, usize),
        /// Shape of the right operand as (rows, cols).
        right: (usize, usize),
        /// Human-readable error message.
        message: String,
    },
    /// A dimension violates an engine's structural requirement: not a power
    /// of two (Strassen) or not divisible by the block size (distributed).
    SizeConstraint {
        /// The offending dimension.
        dimension: usize,
        /// Human-readable error message.
        message: String,
    },
    /// An optional accelerated engine could not be initialized. Fatal to the
    /// specific invocation only; other engines keep working.
    BackendUnavailable {
        /// Name of the backend that failed to initialize.
        backend: String,
        /// Human-readable error message.
        message: String,
    },
    /// A distributed worker task raised during the compute phase. The whole
    /// multiply call fails; no partial result is returned and no retry is
    /// attempted.
    TaskFailure {
        /// Block indices (bi, bj, bk) of the failed task.
        block: (usize, usize, usize),
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for MatbenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatbenchError::DimensionMismatch {
                left,
                right,
                message,
            } => write!(
                f,
                "Dimension mismatch: {} (left: {}x{}, right: {}x{})",
                message, left.0, left.1, right.0, right.1
            ),
            MatbenchError::SizeConstraint { dimension, message } => {
                write!(
                    f,
                    "Size constraint violated: {} (dimension: {})",
                    message, dimension
                )
            }
            MatbenchError::BackendUnavailable { backend, message } => {
                write!(f, "Backend '{}' unavailable: {}", backend, message)
            }
            MatbenchError::TaskFailure { block, message } => write!(
                f,
                "Task ({}, {}, {}) failed: {}",
                block.0, block.1, block.2, message
            ),
        }
    }
}

impl std::error::Error for MatbenchError {}

/// Result type alias for matbench operations.
pub type Result<T> = std::result::Result<T, MatbenchError>;

/// Creates a dimension-mismatch error.
pub fn dimension_mismatch(
    left: (usize, usize),
    right: (usize, usize),
    message: impl Into<String>,
) -> MatbenchError {
    MatbenchError::DimensionMismatch {
        left,
        right,
        message: message.into(),
    }
}

/// Creates a size-constraint error.
pub fn size_constraint(dimension: usize, message: impl Into<String>) -> MatbenchError {
    MatbenchError::SizeConstraint {
        dimension,
        message: message.into(),
    }
}

/// Creates a backend-unavailable error.
pub fn backend_unavailable(
    backend: impl Into<String>,
    message: impl Into<String>,
) -> MatbenchError {
    MatbenchError::BackendUnavailable {
        backend: backend.into(),
        message: message.into(),
    }
}

/// Creates a task-failure error for the task at block (bi, bj, bk).
pub fn task_failure(block: (usize, usize, usize), message: impl Into<String>) -> MatbenchError {
    MatbenchError::TaskFailure {
        block,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let error = dimension_mismatch((4, 4), (3, 3), "inner dimensions differ");
        let display = format!("{}", error);
        assert!(display.contains("Dimension mismatch"));
        assert!(display.contains("left: 4x4"));
        assert!(display.contains("right: 3x3"));
        assert!(display.contains("inner dimensions differ"));
    }

    #[test]
    fn test_size_constraint_display() {
        let error = size_constraint(3, "dimension must be a power of two");
        let display = format!("{}", error);
        assert!(display.contains("Size constraint violated"));
        assert!(display.contains("dimension: 3"));
        assert!(display.contains("power of two"));
    }

    #[test]
    fn test_backend_unavailable_display() {
        let error = backend_unavailable("rayon", "could not build thread pool");
        let display = format!("{}", error);
        assert!(display.contains("Backend 'rayon' unavailable"));
        assert!(display.contains("could not build thread pool"));
    }

    #[test]
    fn test_task_failure_display() {
        let error = task_failure((1, 2, 0), "worker panicked");
        let display = format!("{}", error);
        assert!(display.contains("Task (1, 2, 0) failed"));
        assert!(display.contains("worker panicked"));
    }

    #[test]
    fn test_error_equality() {
        let error1 = size_constraint(3, "test");
        let error2 = size_constraint(3, "test");
        let error3 = size_constraint(5, "test");

        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
    }

    #[test]
    fn test_error_trait_implementation() {
        let error = dimension_mismatch((2, 2), (3, 3), "test error");

        let _: &dyn std::error::Error = &error;

        assert!(std::error::Error::source(&error).is_none());
    }
}
