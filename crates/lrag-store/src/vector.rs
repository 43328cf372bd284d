//! Vector-search store

use async_trait::async_trait;
use std::sync::Arc;

use lrag_core::{Document, DocumentStore, Error, Result, StoreStatus};

/// A nearest-neighbour hit returned by a [`VectorIndex`]
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub text: String,
    /// Cosine distance to the query vector (0 is identical)
    pub distance: f32,
}

/// Trait for external similarity-search indexes
///
/// The index is expected to handle its own internal concurrency; callers
/// share one instance between requests without additional locking.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Whether a point with this id is already stored
    async fn contains(&self, id: &str) -> Result<bool>;

    /// Write a document's vector and text into the index
    async fn upsert(&self, document: &Document) -> Result<()>;

    /// Return up to `limit` nearest documents to `vector`
    async fn nearest(&self, vector: &[f32], limit: usize) -> Result<Vec<IndexHit>>;
}

/// Store backed by an external vector index
pub struct VectorStore {
    index: Arc<dyn VectorIndex>,
    dimension: usize,
}

impl VectorStore {
    pub fn new(index: Arc<dyn VectorIndex>, dimension: usize) -> Self {
        Self { index, dimension }
    }
}

#[async_trait]
impl DocumentStore for VectorStore {
    async fn insert(&self, document: Document) -> Result<String> {
        Error::check_dimension(self.dimension, &document.vector)?;
        if self.index.contains(&document.id).await? {
            return Err(Error::DuplicateId(document.id));
        }

        self.index.upsert(&document).await?;
        tracing::debug!(id = %document.id, "upserted document into vector index");
        Ok(document.id)
    }

    /// Nearest neighbours by cosine distance, closest first.
    ///
    /// The query text is not used by this backend.
    async fn search(&self, vector: &[f32], _text: &str, limit: usize) -> Result<Vec<String>> {
        Error::check_dimension(self.dimension, vector)?;
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut hits = self.index.nearest(vector, limit).await?;
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(limit);

        Ok(hits.into_iter().map(|hit| hit.text).collect())
    }

    async fn status(&self) -> Result<StoreStatus> {
        Ok(StoreStatus {
            vector_search: true,
            fallback_docs: 0,
        })
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Cosine distance between two vectors (`1 - cosine similarity`)
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 1.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    1.0 - dot_product / (norm_a * norm_b)
}
