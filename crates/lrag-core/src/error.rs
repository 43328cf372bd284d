//! Error types for LRAG

use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the retrieval-and-answer service
#[derive(Error, Debug)]
pub enum Error {
    /// The vector index could not be reached while building a store.
    #[error("Store construction failed: {0}")]
    Construction(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    /// A backend call failed after the store was constructed.
    #[error("Store error: {0}")]
    Store(String),

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Duplicate document id: {0}")]
    DuplicateId(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl Error {
    /// Check a vector length against the expected dimension.
    pub fn check_dimension(expected: usize, vector: &[f32]) -> Result<()> {
        if vector.len() == expected {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected,
                got: vector.len(),
            })
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}
