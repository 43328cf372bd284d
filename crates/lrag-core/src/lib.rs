//! Core traits and types for LRAG
//!
//! This crate defines the seams shared by the rest of the workspace: the
//! document model, the embedding interface, the document store interface,
//! and the error type every layer below the HTTP boundary reports with.

pub mod document;
pub mod embedder;
pub mod error;
pub mod store;

pub use document::Document;
pub use embedder::{Embedder, DEFAULT_DIMENSION};
pub use error::{Error, Result};
pub use store::{DocumentStore, StoreStatus};
