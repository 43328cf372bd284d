//! Retrieve-then-answer pipeline

use std::sync::Arc;
use uuid::Uuid;

use lrag_core::{Document, DocumentStore, Embedder, Error, Result};

use crate::state::{PipelineOutput, PipelineState};

/// Number of documents the retrieve stage asks the store for
pub const CONTEXT_LIMIT: usize = 2;

/// Characters of the top document quoted in an answer
pub const ANSWER_QUOTE_CHARS: usize = 100;

/// Answer given when retrieval found nothing
pub const NO_ANSWER: &str = "Sorry, I don't know.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Retrieve,
    Answer,
}

const STAGES: [Stage; 2] = [Stage::Retrieve, Stage::Answer];

/// Two-stage question answering over a shared embedder and store.
///
/// The pipeline owns neither collaborator; both are shared with other
/// request handlers and outlive any single run.
pub struct RagPipeline<E: Embedder, S: DocumentStore> {
    embedder: Arc<E>,
    store: Arc<S>,
    stages: &'static [Stage],
}

impl<E: Embedder, S: DocumentStore> RagPipeline<E, S> {
    /// Create a pipeline. The embedder and store must agree on dimension.
    pub fn new(embedder: Arc<E>, store: Arc<S>) -> Result<Self> {
        if embedder.dimension() != store.dimension() {
            return Err(Error::DimensionMismatch {
                expected: store.dimension(),
                got: embedder.dimension(),
            });
        }

        Ok(Self {
            embedder,
            store,
            stages: &STAGES,
        })
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn embedder(&self) -> &Arc<E> {
        &self.embedder
    }

    /// Whether the stage sequence is in place. Always true once constructed.
    pub fn status(&self) -> bool {
        !self.stages.is_empty()
    }

    /// Answer a question by running every stage once.
    ///
    /// Any stage failure aborts the run; no partial state is returned.
    pub async fn process(&self, question: &str) -> Result<PipelineOutput> {
        let mut state = PipelineState::new(question);
        for stage in self.stages {
            self.run_stage(*stage, &mut state).await?;
        }
        state.into_output()
    }

    async fn run_stage(&self, stage: Stage, state: &mut PipelineState) -> Result<()> {
        match stage {
            Stage::Retrieve => self.retrieve(state).await,
            Stage::Answer => answer(state),
        }
    }

    async fn retrieve(&self, state: &mut PipelineState) -> Result<()> {
        let vector = self.embedder.embed(state.question())?;
        let context = self
            .store
            .search(&vector, state.question(), CONTEXT_LIMIT)
            .await?;
        tracing::debug!(question = state.question(), hits = context.len(), "retrieved context");
        state.set_context(context)
    }

    /// Embed and store a text under a freshly generated UUID.
    pub async fn ingest(&self, text: &str) -> Result<String> {
        self.ingest_with_id(Uuid::new_v4().to_string(), text).await
    }

    /// Embed and store a text under a caller-supplied identifier.
    pub async fn ingest_with_id(&self, id: impl Into<String>, text: &str) -> Result<String> {
        let vector = self.embedder.embed(text)?;
        let id = self.store.insert(Document::new(id, text, vector)).await?;
        tracing::debug!(id = %id, chars = text.chars().count(), "ingested document");
        Ok(id)
    }
}

fn answer(state: &mut PipelineState) -> Result<()> {
    let context = state
        .context()
        .ok_or_else(|| Error::Pipeline("answer stage ran before retrieve".to_string()))?;
    let answer = compose_answer(context);
    state.set_answer(answer)
}

/// Templated answer quoting the first context entry.
pub fn compose_answer(context: &[String]) -> String {
    match context.first() {
        Some(top) => {
            let quote: String = top.chars().take(ANSWER_QUOTE_CHARS).collect();
            format!("I found this: '{}...'", quote)
        }
        None => NO_ANSWER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HashEmbedder;
    use async_trait::async_trait;
    use insta::assert_yaml_snapshot;
    use lrag_core::StoreStatus;
    use lrag_store::FallbackStore;

    type TestPipeline = RagPipeline<HashEmbedder, FallbackStore>;

    fn pipeline() -> TestPipeline {
        RagPipeline::new(
            Arc::new(HashEmbedder::default()),
            Arc::new(FallbackStore::new(128)),
        )
        .unwrap()
    }

    /// Store whose every call fails, for error propagation tests.
    struct BrokenStore;

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn insert(&self, _document: Document) -> Result<String> {
            Err(Error::Store("insert failed".to_string()))
        }

        async fn search(&self, _vector: &[f32], _text: &str, _limit: usize) -> Result<Vec<String>> {
            Err(Error::Store("search failed".to_string()))
        }

        async fn status(&self) -> Result<StoreStatus> {
            Err(Error::Store("status failed".to_string()))
        }

        fn dimension(&self) -> usize {
            128
        }
    }

    #[tokio::test]
    async fn test_empty_store_gives_no_answer() {
        let pipeline = pipeline();

        let output = pipeline.process("what is x?").await.unwrap();
        assert_eq!(output.question, "what is x?");
        assert!(output.context.is_empty());
        assert_eq!(output.answer, NO_ANSWER);
    }

    #[tokio::test]
    async fn test_matching_document_is_quoted() {
        let pipeline = pipeline();
        pipeline.ingest("x is the unknown in algebra").await.unwrap();

        let output = pipeline.process("algebra").await.unwrap();
        assert_eq!(output.context, vec!["x is the unknown in algebra"]);
        assert_eq!(output.answer, "I found this: 'x is the unknown in algebra...'");
    }

    #[tokio::test]
    async fn test_no_match_output_snapshot() {
        let pipeline = pipeline();
        pipeline.ingest("alpha foo").await.unwrap();
        pipeline.ingest("beta bar").await.unwrap();

        let output = pipeline.process("zzz").await.unwrap();
        assert_yaml_snapshot!(output, @r#"
        question: zzz
        context:
          - alpha foo
        answer: "I found this: 'alpha foo...'"
        "#);
    }

    #[tokio::test]
    async fn test_answer_truncates_long_context() {
        let pipeline = pipeline();
        let long = "é".repeat(150);
        pipeline.ingest(&long).await.unwrap();

        let output = pipeline.process("é").await.unwrap();
        let quote = output
            .answer
            .strip_prefix("I found this: '")
            .and_then(|rest| rest.strip_suffix("...'"))
            .unwrap();
        assert_eq!(quote.chars().count(), ANSWER_QUOTE_CHARS);
        assert!(output.context[0].starts_with(quote));
    }

    #[test]
    fn test_answer_uses_only_first_context_entry() {
        assert_eq!(
            compose_answer(&["first".to_string(), "second".to_string()]),
            "I found this: 'first...'"
        );
        assert_eq!(compose_answer(&[]), NO_ANSWER);
    }

    #[tokio::test]
    async fn test_ingest_then_process_reads_back() {
        let pipeline = pipeline();
        pipeline.ingest("unrelated opening document").await.unwrap();
        let id = pipeline.ingest("the capital of France is Paris").await.unwrap();
        assert!(Uuid::parse_str(&id).is_ok());

        let output = pipeline.process("Paris").await.unwrap();
        assert!(output.context.contains(&"the capital of France is Paris".to_string()));
    }

    #[tokio::test]
    async fn test_ingest_with_id_echoes_id() {
        let pipeline = pipeline();

        let id = pipeline.ingest_with_id("doc-1", "text").await.unwrap();
        assert_eq!(id, "doc-1");
        assert!(pipeline.ingest_with_id("doc-1", "again").await.is_err());
    }

    #[tokio::test]
    async fn test_process_is_repeatable() {
        let pipeline = pipeline();
        pipeline.ingest("stable corpus entry").await.unwrap();

        let first = pipeline.process("corpus").await.unwrap();
        let second = pipeline.process("corpus").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_store_failure_aborts_run() {
        let pipeline =
            RagPipeline::new(Arc::new(HashEmbedder::default()), Arc::new(BrokenStore)).unwrap();

        let err = pipeline.process("anything").await.unwrap_err();
        assert!(matches!(err, Error::Store(_)));

        let err = pipeline.ingest("anything").await.unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let result = RagPipeline::new(
            Arc::new(HashEmbedder::new(64)),
            Arc::new(FallbackStore::new(128)),
        );
        assert!(matches!(
            result.err(),
            Some(Error::DimensionMismatch { expected: 128, got: 64 })
        ));
    }

    #[test]
    fn test_status_after_construction() {
        assert!(pipeline().status());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_ingest_and_process() {
        let pipeline = Arc::new(pipeline());
        let inserts = 64;

        let ingests = (0..inserts).map(|i| {
            let pipeline = pipeline.clone();
            tokio::spawn(async move { pipeline.ingest(&format!("document number {}", i)).await })
        });
        let queries = (0..inserts).map(|_| {
            let pipeline = pipeline.clone();
            tokio::spawn(async move { pipeline.process("document").await.map(|_| String::new()) })
        });

        let all: Vec<_> = ingests.chain(queries).collect();
        for result in futures::future::join_all(all).await {
            result.unwrap().unwrap();
        }

        let status = pipeline.store().status().await.unwrap();
        assert_eq!(status.fallback_docs, inserts);
    }
}
