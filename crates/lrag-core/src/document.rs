//! Stored document type

use serde::{Deserialize, Serialize};

/// A document admitted to a store.
///
/// Documents are immutable once inserted: no store exposes an update or
/// delete operation. The `id` is opaque and must be unique per store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub vector: Vec<f32>,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            vector,
        }
    }
}
