//! Error types for the binomial engine and its renderers.

use thiserror::Error;

/// Errors raised by [`crate::binomial::Binomial`] and its helpers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BinomialError {
    /// A parameter violates the distribution's constraints
    /// (negative or oversized `n`, `pi` outside `[0, 1]`, unknown chart kind, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A point query asked for an `x` outside `[0, n]`.
    #[error("x = {x} is outside of range 0 to {n}")]
    OutOfRange { x: i64, n: u64 },
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, BinomialError>;

/// Errors raised while drawing a chart.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("chart error: {0}")]
    Chart(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
