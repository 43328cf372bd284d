//! In-memory fallback store
//!
//! Used when no vector index is reachable at startup. Documents live in an
//! append-only list for the lifetime of the process and are matched by
//! case-insensitive substring rather than by vector similarity.

use async_trait::async_trait;
use std::sync::RwLock;

use lrag_core::{Document, DocumentStore, Error, Result, StoreStatus};

/// Append-only in-memory document store
pub struct FallbackStore {
    documents: RwLock<Vec<Document>>,
    dimension: usize,
}

impl FallbackStore {
    /// Create an empty fallback store accepting vectors of `dimension`
    pub fn new(dimension: usize) -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            dimension,
        }
    }

    /// Number of stored documents
    pub fn len(&self) -> Result<usize> {
        let docs = self
            .documents
            .read()
            .map_err(|e| Error::Store(format!("Lock error: {}", e)))?;
        Ok(docs.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl DocumentStore for FallbackStore {
    async fn insert(&self, document: Document) -> Result<String> {
        Error::check_dimension(self.dimension, &document.vector)?;

        let mut docs = self
            .documents
            .write()
            .map_err(|e| Error::Store(format!("Lock error: {}", e)))?;

        if docs.iter().any(|doc| doc.id == document.id) {
            return Err(Error::DuplicateId(document.id));
        }

        let id = document.id.clone();
        docs.push(document);
        tracing::debug!(id = %id, total = docs.len(), "stored document in fallback store");
        Ok(id)
    }

    /// Substring search over the stored texts.
    ///
    /// Every match is returned in insertion order, even when there are more
    /// matches than `limit`. When nothing matches, the first document ever
    /// inserted is returned on its own. The query vector is ignored.
    async fn search(&self, _vector: &[f32], text: &str, _limit: usize) -> Result<Vec<String>> {
        let docs = self
            .documents
            .read()
            .map_err(|e| Error::Store(format!("Lock error: {}", e)))?;

        let needle = text.to_lowercase();
        let matches: Vec<String> = docs
            .iter()
            .filter(|doc| doc.text.to_lowercase().contains(&needle))
            .map(|doc| doc.text.clone())
            .collect();

        if !matches.is_empty() {
            return Ok(matches);
        }

        Ok(docs.first().map(|doc| vec![doc.text.clone()]).unwrap_or_default())
    }

    async fn status(&self) -> Result<StoreStatus> {
        Ok(StoreStatus {
            vector_search: false,
            fallback_docs: self.len()?,
        })
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
