//! Document store trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Document, Result};

/// Observability record reported by a store.
///
/// `fallback_docs` is only meaningful when `vector_search` is false; vector
/// backed stores keep no local copy and always report zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatus {
    pub vector_search: bool,
    pub fallback_docs: usize,
}

/// Trait for document stores
///
/// A store owns its document collection. Inserts and searches may run
/// concurrently from many requests; each implementation is responsible for
/// keeping its collection consistent under that access.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a document and return its identifier
    async fn insert(&self, document: Document) -> Result<String>;

    /// Return up to `limit` stored texts relevant to the query
    ///
    /// Both the query vector and the raw query text are passed so that each
    /// backend can rank with whichever it understands. An empty store yields
    /// an empty result, never an error.
    async fn search(&self, vector: &[f32], text: &str, limit: usize) -> Result<Vec<String>>;

    /// Report backend capability and size
    async fn status(&self) -> Result<StoreStatus>;

    /// Vector length this store accepts
    fn dimension(&self) -> usize;
}
