//! Retrieve-then-answer pipeline for LRAG
//!
//! This crate provides the deterministic [`HashEmbedder`] and the
//! [`RagPipeline`] that composes an embedder with a document store.

mod embedder;
mod pipeline;
mod state;

pub use embedder::HashEmbedder;
pub use pipeline::{
    compose_answer, RagPipeline, Stage, ANSWER_QUOTE_CHARS, CONTEXT_LIMIT, NO_ANSWER,
};
pub use state::{Phase, PipelineOutput, PipelineState};

// Re-export core types for convenience
pub use lrag_core::{Embedder, Error, Result};
