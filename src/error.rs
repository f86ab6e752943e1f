//! Error types for parmat

use thiserror::Error;

/// Result type alias using parmat's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building matrices, running parallel
/// operations or evaluating formulas
#[derive(Error, Debug)]
pub enum Error {
    /// Operand shapes are incompatible for the operation
    #[error("Shape mismatch in '{op}': {lhs:?} vs {rhs:?}")]
    ShapeMismatch {
        /// The operation that rejected its operands
        op: &'static str,
        /// Left-hand side shape
        lhs: Vec<usize>,
        /// Right-hand side shape
        rhs: Vec<usize>,
    },

    /// Nested rows do not all have the same length
    #[error("Ragged rows: row {row} has {got} values, expected {expected}")]
    RaggedRows {
        /// Index of the first offending row
        row: usize,
        /// Length of the first row
        expected: usize,
        /// Length of the offending row
        got: usize,
    },

    /// Invalid configuration or argument, rejected before any work is dispatched
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// A worker panicked while processing its range
    #[error("Worker for range [{start}, {end}) failed: {reason}")]
    WorkerFailure {
        /// First index owned by the failed worker
        start: usize,
        /// One past the last index owned by the failed worker
        end: usize,
        /// Panic message, if one could be recovered
        reason: String,
    },

    /// The producer side of a pipeline finished without sending every item
    #[error("Pipeline incomplete: expected {expected} intermediate results, received {received}")]
    PipelineIncomplete {
        /// Number of items the consumer needs
        expected: usize,
        /// Number of items actually received
        received: usize,
    },

    /// Scheduling backend could not be created
    #[error("Backend error: {0}")]
    Backend(String),

    /// I/O failure while reading or writing sample data
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed sample data document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(op: &'static str, lhs: &[usize], rhs: &[usize]) -> Self {
        Self::ShapeMismatch {
            op,
            lhs: lhs.to_vec(),
            rhs: rhs.to_vec(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Whether repeating the same call could succeed.
    ///
    /// Shape and configuration errors are deterministic; only worker failures
    /// and I/O may be transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::WorkerFailure { .. } | Self::Io(_))
    }
}
