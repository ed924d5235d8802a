//! Error types for partitioning and distance filtering

use thiserror::Error;

/// Precondition violations surfaced before any partial computation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PartitionError {
    /// A distance threshold must be a finite, non-negative number
    #[error("invalid distance threshold {0}: must be finite and non-negative")]
    InvalidDistanceThreshold(f64),

    /// Distances are dissimilarity scores and can never be negative
    #[error("invalid distance {distance} for pair ({first}, {second}): must be finite and non-negative")]
    InvalidDistance {
        first: String,
        second: String,
        distance: f64,
    },
}
