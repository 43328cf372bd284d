//! Request and response bodies

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct DocumentRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub question: String,
    pub answer: String,
    pub context_used: Vec<String>,
    pub latency_sec: f64,
}

#[derive(Debug, Serialize)]
pub struct AddResponse {
    pub id: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub qdrant_ready: bool,
    pub in_memory_docs_count: usize,
    pub graph_ready: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}
