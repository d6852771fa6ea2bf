//! Pool runner errors
//!
//! Configuration errors reject a call before any item is pulled from the
//! input source. Per-item failures are never reported here; they are
//! captured in [`PoolOutcome`](super::PoolOutcome).

use std::convert::Infallible;
use thiserror::Error;

/// Result type alias for pool operations
pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors that fail an entire pool invocation
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PoolError {
    /// No input source was supplied
    #[error("input source is required")]
    MissingInput,

    /// No per-item operation was supplied
    #[error("operation is required")]
    MissingOperation,

    /// Concurrency was zero, negative, fractional or not a number
    #[error("concurrency must be a positive integer, got '{0}'")]
    InvalidConcurrency(String),

    /// The failure handler could not be resolved
    #[error("failure handler '{0}' is not a known policy")]
    InvalidHandler(String),

    /// A worker's operation or failure handler panicked
    #[error("worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },
}

impl PoolError {
    /// Whether this error comes from argument validation
    pub fn is_configuration(&self) -> bool {
        !matches!(self, PoolError::WorkerPanicked { .. })
    }
}

impl From<Infallible> for PoolError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
