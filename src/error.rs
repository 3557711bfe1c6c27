//! Error types for the particle avatar simulation.

use thiserror::Error;

/// Errors raised by particle field construction and morph requests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The requested configuration cannot produce a valid field
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A morph target buffer does not match the particle count
    #[error("Invalid morph targets: expected {expected} points, got {actual}")]
    InvalidArgument { expected: usize, actual: usize },

    /// A morph target has a NaN or infinite coordinate
    #[error("Invalid morph target {index}: coordinates must be finite")]
    NonFiniteTarget { index: usize },

    /// The field has been disposed and its buffers released
    #[error("Particle field has been disposed")]
    Disposed,
}

pub type Result<T> = std::result::Result<T, Error>;
