use serde::Serialize;

use crate::domain::query::ExecutionResults;

/// Final outcome of one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerResult {
    pub answer: String,
    pub data_sources: Vec<String>,
    /// Results shown to the engine; `None` when it answered without data.
    pub data_used: Option<ExecutionResults>,
}

impl AnswerResult {
    /// Answer given straight from the engine's own knowledge.
    pub fn from_general_knowledge(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            data_sources: vec![super::DataSource::GeneralKnowledge.citation().to_string()],
            data_used: None,
        }
    }

    pub fn from_data(
        answer: impl Into<String>,
        data_sources: Vec<String>,
        data_used: ExecutionResults,
    ) -> Self {
        Self {
            answer: answer.into(),
            data_sources,
            data_used: Some(data_used),
        }
    }
}
