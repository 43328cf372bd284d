//! Pipeline state threaded through the retrieve and answer stages

use serde::{Deserialize, Serialize};

use lrag_core::{Error, Result};

/// Where a [`PipelineState`] is in the `Start -> Retrieved -> Answered` run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Start,
    Retrieved,
    Answered,
}

/// Mutable record for one pipeline run.
///
/// `question` is fixed at creation, `context` is written once by the
/// retrieve stage, and `answer` is written once by the answer stage. Writes
/// out of that order are rejected.
#[derive(Debug, Clone)]
pub struct PipelineState {
    question: String,
    context: Option<Vec<String>>,
    answer: Option<String>,
}

/// Final state of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub question: String,
    pub context: Vec<String>,
    pub answer: String,
}

impl PipelineState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            context: None,
            answer: None,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn context(&self) -> Option<&[String]> {
        self.context.as_deref()
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn phase(&self) -> Phase {
        match (&self.context, &self.answer) {
            (_, Some(_)) => Phase::Answered,
            (Some(_), None) => Phase::Retrieved,
            (None, None) => Phase::Start,
        }
    }

    pub fn set_context(&mut self, context: Vec<String>) -> Result<()> {
        if self.phase() != Phase::Start {
            return Err(Error::Pipeline(format!(
                "context can only be set from Start, state is {:?}",
                self.phase()
            )));
        }
        self.context = Some(context);
        Ok(())
    }

    pub fn set_answer(&mut self, answer: String) -> Result<()> {
        if self.phase() != Phase::Retrieved {
            return Err(Error::Pipeline(format!(
                "answer can only be set from Retrieved, state is {:?}",
                self.phase()
            )));
        }
        self.answer = Some(answer);
        Ok(())
    }

    /// Consume a finished state. Fails unless the run reached `Answered`.
    pub fn into_output(self) -> Result<PipelineOutput> {
        match (self.context, self.answer) {
            (Some(context), Some(answer)) => Ok(PipelineOutput {
                question: self.question,
                context,
                answer,
            }),
            _ => Err(Error::Pipeline("pipeline run did not complete".to_string())),
        }
    }
}
