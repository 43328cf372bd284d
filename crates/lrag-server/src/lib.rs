//! HTTP interface for LRAG
//!
//! Exposes the pipeline over three JSON routes:
//!
//! - `POST /ask {question}` runs the pipeline and returns the answer, the
//!   context it was drawn from and the run latency.
//! - `POST /add {text}` ingests a document and returns its generated id.
//! - `GET /status` reports backend capability, fallback document count and
//!   pipeline readiness.
//!
//! Every core failure becomes a 500 carrying the error message; core error
//! kinds are not distinguished at this boundary.

mod routes;
mod schemas;

use tokio::net::TcpListener;

pub use routes::{router, SharedPipeline};
pub use schemas::{
    AddResponse, AskResponse, DocumentRequest, ErrorBody, QuestionRequest, StatusResponse,
};

/// Serve the router on an already-bound listener until the server stops
pub async fn serve(listener: TcpListener, pipeline: SharedPipeline) -> std::io::Result<()> {
    axum::serve(listener, router(pipeline)).await
}
