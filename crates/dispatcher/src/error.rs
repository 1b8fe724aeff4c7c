//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
///
/// Per-item failures never show up here; they are recorded in the report.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Input document could not be decoded; no worker was started
    #[error("source error: {0}")]
    Source(#[from] work_source::SourceError),

    /// Submission after the pool was released
    #[error("worker pool released, cannot submit more work")]
    PoolReleased,

    /// Submission beyond the pool size
    #[error("worker pool exhausted: all {capacity} workers already spawned")]
    PoolExhausted { capacity: usize },
}

impl DispatcherError {
    pub fn pool_exhausted(capacity: usize) -> Self {
        Self::PoolExhausted { capacity }
    }

    /// True if the batch never started because the input was malformed
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Source(e) if e.is_decode())
    }
}
