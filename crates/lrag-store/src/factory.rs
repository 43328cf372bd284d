//! Backend selection
//!
//! The backend is chosen once, when the store is built, and never changes
//! afterwards: an unreachable index at startup yields a fallback store for
//! the whole life of the process, and a vector store never degrades to the
//! fallback mid-session.

use async_trait::async_trait;
use std::sync::Arc;

use lrag_core::{Document, DocumentStore, Result, StoreStatus};

use crate::config::StoreConfig;
use crate::fallback::FallbackStore;
use crate::qdrant::QdrantIndex;
use crate::vector::VectorStore;

/// The closed set of document store backends
pub enum Store {
    Vector(VectorStore),
    Fallback(FallbackStore),
}

impl Store {
    pub fn is_vector(&self) -> bool {
        matches!(self, Store::Vector(_))
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Vector(_) => "qdrant",
            Store::Fallback(_) => "in-memory",
        }
    }

    fn inner(&self) -> &dyn DocumentStore {
        match self {
            Store::Vector(store) => store,
            Store::Fallback(store) => store,
        }
    }
}

/// Build the document store described by `config`.
///
/// Tries to connect to the configured Qdrant endpoint; on any failure logs a
/// single warning and returns the in-memory fallback instead.
pub async fn connect_store(config: &StoreConfig) -> Store {
    match QdrantIndex::connect(config).await {
        Ok(index) => {
            tracing::info!(
                url = %config.qdrant_url,
                collection = %config.collection,
                "using Qdrant vector store"
            );
            Store::Vector(VectorStore::new(Arc::new(index), config.dimension))
        }
        Err(err) => {
            tracing::warn!(
                url = %config.qdrant_url,
                error = %err,
                "Qdrant not available, falling back to in-memory store"
            );
            Store::Fallback(FallbackStore::new(config.dimension))
        }
    }
}

#[async_trait]
impl DocumentStore for Store {
    async fn insert(&self, document: Document) -> Result<String> {
        self.inner().insert(document).await
    }

    async fn search(&self, vector: &[f32], text: &str, limit: usize) -> Result<Vec<String>> {
        self.inner().search(vector, text, limit).await
    }

    async fn status(&self) -> Result<StoreStatus> {
        self.inner().status().await
    }

    fn dimension(&self) -> usize {
        self.inner().dimension()
    }
}
