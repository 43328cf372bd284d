//! Route handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use std::time::Instant;

use lrag_core::{DocumentStore, Error};
use lrag_pipeline::{HashEmbedder, RagPipeline};
use lrag_store::Store;

use crate::schemas::{
    AddResponse, AskResponse, DocumentRequest, ErrorBody, QuestionRequest, StatusResponse,
};

/// Pipeline shared by every request handler
pub type SharedPipeline = Arc<RagPipeline<HashEmbedder, Store>>;

type ApiError = (StatusCode, Json<ErrorBody>);

/// Build the router for `/ask`, `/add` and `/status`
pub fn router(pipeline: SharedPipeline) -> Router {
    Router::new()
        .route("/ask", post(ask_handler))
        .route("/add", post(add_handler))
        .route("/status", get(status_handler))
        .with_state(pipeline)
}

async fn ask_handler(
    State(pipeline): State<SharedPipeline>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    if request.question.trim().is_empty() {
        return Err(unprocessable("question must not be empty"));
    }

    let start = Instant::now();
    let output = pipeline
        .process(&request.question)
        .await
        .map_err(internal_error)?;

    Ok(Json(AskResponse {
        question: request.question,
        answer: output.answer,
        context_used: output.context,
        latency_sec: round_millis(start.elapsed().as_secs_f64()),
    }))
}

async fn add_handler(
    State(pipeline): State<SharedPipeline>,
    Json(request): Json<DocumentRequest>,
) -> Result<Json<AddResponse>, ApiError> {
    let id = pipeline.ingest(&request.text).await.map_err(internal_error)?;

    Ok(Json(AddResponse {
        id,
        status: "added",
    }))
}

async fn status_handler(
    State(pipeline): State<SharedPipeline>,
) -> Result<Json<StatusResponse>, ApiError> {
    let status = pipeline.store().status().await.map_err(internal_error)?;

    Ok(Json(StatusResponse {
        qdrant_ready: status.vector_search,
        in_memory_docs_count: status.fallback_docs,
        graph_ready: pipeline.status(),
    }))
}

fn round_millis(secs: f64) -> f64 {
    (secs * 1000.0).round() / 1000.0
}

fn unprocessable(message: impl Into<String>) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorBody {
            detail: message.into(),
        }),
    )
}

fn internal_error(err: Error) -> ApiError {
    tracing::error!(error = %err, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            detail: err.to_string(),
        }),
    )
}
