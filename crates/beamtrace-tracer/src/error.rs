//! Error types for the batch scheduler.

use beamtrace_material::MaterialError;
use thiserror::Error;

/// Errors that abort a whole trace.
///
/// Per-ray anomalies never appear here; they are encoded as terminal
/// event types inside the affected ray's own history.
#[derive(Error, Debug)]
pub enum TracerError {
    /// Batch size of zero rays.
    #[error("invalid batch size: batches must hold at least one ray")]
    InvalidBatchSize,

    /// A malformed raw-trace configuration.
    #[error("invalid trace configuration: {0}")]
    InvalidConfig(String),

    /// Material-table construction failed (invalid material index,
    /// unsorted data).
    #[error(transparent)]
    Material(#[from] MaterialError),

    /// The dispatch backend returned a buffer of the wrong size.
    #[error("dispatch returned {got} records, expected {expected}")]
    OutputSizeMismatch {
        /// Records returned.
        got: usize,
        /// Records expected (`batch_size * max_events`).
        expected: usize,
    },
}

/// Result type for tracer operations.
pub type Result<T> = std::result::Result<T, TracerError>;
