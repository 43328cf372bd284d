//! Document store backends for LRAG
//!
//! Two backends implement [`DocumentStore`]: [`VectorStore`], which delegates
//! to an external similarity index (Qdrant in production), and
//! [`FallbackStore`], an in-memory substring matcher. [`connect_store`] picks
//! one of them once at startup.

mod config;
mod factory;
mod fallback;
mod qdrant;
mod vector;

pub use config::{StoreConfig, DEFAULT_COLLECTION, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_QDRANT_URL};
pub use factory::{connect_store, Store};
pub use fallback::FallbackStore;
pub use qdrant::QdrantIndex;
pub use vector::{cosine_distance, IndexHit, VectorIndex, VectorStore};

// Re-export core types for convenience
pub use lrag_core::{Document, DocumentStore, Error, Result, StoreStatus};
