//! Error types for graph construction and configuration.

use thiserror::Error;

/// Errors reported while installing data or loading configuration.
///
/// Gesture handling, scrolling and zooming never fail: out-of-range requests
/// are clamped and cancelled gestures reset silently.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The input violates a precondition, such as an empty point set.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A point has a NaN or infinite coordinate.
    #[error("non-finite coordinate in line {line} at index {index}")]
    NonFinite {
        /// Position of the line in the line list.
        line: usize,
        /// Index of the offending point.
        index: usize,
    },
    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias for graph operations.
pub type ChartResult<T> = Result<T, ChartError>;
