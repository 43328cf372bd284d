//! Embedder trait

use crate::Result;

/// Dimension of every vector produced and stored by default.
pub const DEFAULT_DIMENSION: usize = 128;

/// Trait for text embedders
///
/// Implementations turn a string into a fixed-length vector. The call is
/// synchronous and side-effect free, so one embedder can be shared between
/// concurrently running requests without locking.
pub trait Embedder: Send + Sync {
    /// Embed a text into a vector of length [`Embedder::dimension`]
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Length of every vector this embedder returns
    fn dimension(&self) -> usize;
}
