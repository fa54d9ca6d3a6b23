//! ConversationOrchestrator - drives one question through the reasoning engine.
//!
//! Turn 1 sends the dataset context and the question. If the reply is a data
//! directive, the requests are executed and the results go back as turn 2;
//! the second reply is the answer. Any other first reply is the answer.

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::dataset::{DataSummary, TabularStore};
use crate::domain::foundation::{SessionId, StateMachine, ValidationError};
use crate::domain::qa::{
    cite, context_prompt, data_prompt, AnswerResult, ExchangeState, ModelReply,
};
use crate::domain::query::{DataRequestExecutor, ExecutorLimits};
use crate::ports::{AIError, AIProvider, CompletionRequest, Message, RequestMetadata};

/// Failure of a whole question.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error("reasoning engine request failed: {0}")]
    Provider(#[from] AIError),

    #[error("failed to encode data results: {0}")]
    Encoding(String),

    #[error("invalid exchange state: {0}")]
    State(#[from] ValidationError),
}

/// Sampling settings forwarded to the provider on every turn.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationSettings {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Stateless between questions; safe to share across tasks.
pub struct ConversationOrchestrator {
    ai_provider: Arc<dyn AIProvider>,
    executor: DataRequestExecutor,
    summary: DataSummary,
    generation: GenerationSettings,
}

impl ConversationOrchestrator {
    pub fn new(
        ai_provider: Arc<dyn AIProvider>,
        store: Arc<TabularStore>,
        limits: ExecutorLimits,
    ) -> Self {
        let summary = store.summary();
        Self {
            ai_provider,
            executor: DataRequestExecutor::new(store, limits),
            summary,
            generation: GenerationSettings::default(),
        }
    }

    pub fn with_generation(mut self, generation: GenerationSettings) -> Self {
        self.generation = generation;
        self
    }

    /// Answers one question. The only failure is the reasoning engine (or
    /// encoding the data for it); problems with individual data requests
    /// end up in the results instead.
    pub async fn answer(
        &self,
        question: &str,
        session_id: &SessionId,
    ) -> Result<AnswerResult, OrchestrationError> {
        let metadata = RequestMetadata::new(session_id.clone(), Uuid::new_v4().to_string());
        let mut state = ExchangeState::AwaitingFirstResponse;
        let mut turns = vec![Message::user(context_prompt(&self.summary, question))];

        let first = self.send(&metadata, &turns).await?;

        let directive = match ModelReply::parse(&first) {
            ModelReply::Prose(answer) => {
                state.transition_to(ExchangeState::Done)?;
                tracing::info!(
                    session_id = %session_id,
                    trace_id = %metadata.trace_id,
                    "Answered from general knowledge"
                );
                return Ok(AnswerResult::from_general_knowledge(answer));
            }
            ModelReply::Directive(directive) => directive,
        };

        state = state.transition_to(ExchangeState::DataRequested)?;
        let results = self.executor.execute(&directive.data_requests);
        tracing::info!(
            session_id = %session_id,
            trace_id = %metadata.trace_id,
            requests = directive.data_requests.len(),
            "Executed data requests"
        );

        let prompt = data_prompt(&results).map_err(|e| OrchestrationError::Encoding(e.to_string()))?;
        turns.push(Message::assistant(first));
        turns.push(Message::user(prompt));
        state = state.transition_to(ExchangeState::AwaitingFinalResponse)?;

        let answer = self.send(&metadata, &turns).await?;
        state.transition_to(ExchangeState::Done)?;

        let sources = cite(&results);
        tracing::info!(
            session_id = %session_id,
            trace_id = %metadata.trace_id,
            sources = sources.len(),
            "Answered with data"
        );
        Ok(AnswerResult::from_data(answer, sources, results))
    }

    async fn send(&self, metadata: &RequestMetadata, turns: &[Message]) -> Result<String, AIError> {
        let mut request = CompletionRequest::new(metadata.clone()).with_messages(turns.to_vec());
        if let Some(temperature) = self.generation.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.generation.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let response = self.ai_provider.complete(request).await?;
        tracing::debug!(
            trace_id = %metadata.trace_id,
            turn = turns.len(),
            tokens = response.usage.total_tokens,
            reply = %response.content,
            "Reasoning engine replied"
        );
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::domain::dataset::{CropRecord, RainfallRecord, Table};
    use crate::domain::qa::DataSource;
    use crate::domain::query::RequestOutcome;
    use crate::ports::MessageRole;

    fn store() -> Arc<TabularStore> {
        Arc::new(TabularStore::from_tables(
            Some(Table::new(
                vec!["State_Name".into(), "Crop".into()],
                vec![
                    CropRecord::new("Punjab", "Ludhiana", 2010, "Rabi", "Wheat", 100.0, 400.0),
                    CropRecord::new("Haryana", "Karnal", 2010, "Rabi", "Wheat", 90.0, 350.0),
                ],
            )),
            Some(Table::new(
                vec!["SD_Name".into(), "ANNUAL".into()],
                vec![RainfallRecord::new("Punjab", 2010, 600.0)],
            )),
            None,
        ))
    }

    fn orchestrator(provider: &MockAIProvider) -> ConversationOrchestrator {
        ConversationOrchestrator::new(Arc::new(provider.clone()), store(), ExecutorLimits::default())
    }

    fn session() -> SessionId {
        SessionId::new("session-1").unwrap()
    }

    #[tokio::test]
    async fn prose_reply_ends_in_one_turn() {
        let provider = MockAIProvider::new().with_response("Wheat is a rabi crop.");

        let result = orchestrator(&provider)
            .answer("Is wheat rabi or kharif?", &session())
            .await
            .unwrap();

        assert_eq!(result.answer, "Wheat is a rabi crop.");
        assert_eq!(result.data_sources, vec!["General knowledge"]);
        assert!(result.data_used.is_none());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn first_turn_carries_context_and_question() {
        let provider = MockAIProvider::new().with_response("ok");

        orchestrator(&provider)
            .answer("Compare Punjab and Haryana", &session())
            .await
            .unwrap();

        let calls = provider.get_calls();
        let first = &calls[0].messages;
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].role, MessageRole::User);
        assert!(first[0].content.contains("Sample states: Haryana, Punjab"));
        assert!(first[0].content.ends_with("User Question: Compare Punjab and Haryana"));
        assert_eq!(calls[0].metadata.session_id, session());
    }

    #[tokio::test]
    async fn fenced_directive_runs_data_requests() {
        let directive = r#"```json
{"requires_data": true, "data_requests": [
  {"type": "crop_production", "filters": {"state": "Punjab"}},
  {"type": "crop_production", "filters": {"state": "Haryana"}}
]}
```"#;
        let provider = MockAIProvider::new()
            .with_response(directive)
            .with_response("Punjab produced 400 tonnes, Haryana 350.");

        let result = orchestrator(&provider)
            .answer("Compare wheat in Punjab and Haryana", &session())
            .await
            .unwrap();

        assert_eq!(result.answer, "Punjab produced 400 tonnes, Haryana 350.");
        assert_eq!(
            result.data_sources,
            vec![DataSource::CropProduction.citation()]
        );
        let data = result.data_used.unwrap();
        assert!(matches!(data.get("crop_data_0"), Some(RequestOutcome::Crop(_))));
        assert!(matches!(data.get("crop_data_1"), Some(RequestOutcome::Crop(_))));

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 2);
        let second = &calls[1].messages;
        assert_eq!(second.len(), 3);
        assert_eq!(second[1].role, MessageRole::Assistant);
        assert_eq!(second[1].content, directive);
        assert!(second[2].content.starts_with("Here is the data you requested:"));
        assert_eq!(calls[0].metadata.trace_id, calls[1].metadata.trace_id);
    }

    #[tokio::test]
    async fn two_dataset_types_cite_both_once() {
        let provider = MockAIProvider::new()
            .with_response(
                r#"{"requires_data": true, "data_requests": [
                    {"type": "rainfall", "filters": {"state": "Punjab"}},
                    {"type": "crop_production", "filters": {"state": "Punjab"}},
                    {"type": "rainfall", "filters": {"state": "Nowhere"}}
                ]}"#,
            )
            .with_response("Answer.");

        let result = orchestrator(&provider).answer("q", &session()).await.unwrap();

        assert_eq!(result.data_sources.len(), 2);
        assert!(result
            .data_sources
            .contains(&DataSource::Rainfall.citation().to_string()));
        assert!(result
            .data_sources
            .contains(&DataSource::CropProduction.citation().to_string()));
    }

    #[tokio::test]
    async fn bad_requests_do_not_fail_the_question() {
        let provider = MockAIProvider::new()
            .with_response(r#"{"requires_data": true, "data_requests": [{"type": "soil"}]}"#)
            .with_response("I could not find soil data.");

        let result = orchestrator(&provider).answer("q", &session()).await.unwrap();

        assert_eq!(result.answer, "I could not find soil data.");
        assert!(result.data_sources.is_empty());
        assert_eq!(
            result.data_used.unwrap().get("error_0"),
            Some(&RequestOutcome::error("unsupported type"))
        );
    }

    #[tokio::test]
    async fn provider_failure_on_first_turn_propagates() {
        let provider = MockAIProvider::new().with_error(AIError::AuthenticationFailed);

        let err = orchestrator(&provider).answer("q", &session()).await.unwrap_err();

        assert!(matches!(err, OrchestrationError::Provider(AIError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn provider_failure_on_second_turn_propagates() {
        let provider = MockAIProvider::new()
            .with_response(r#"{"requires_data": true, "data_requests": []}"#)
            .with_error(AIError::unavailable("overloaded"));

        let err = orchestrator(&provider).answer("q", &session()).await.unwrap_err();

        assert!(err.to_string().contains("overloaded"));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn generation_settings_are_forwarded() {
        let provider = MockAIProvider::new().with_response("ok");
        let orchestrator = orchestrator(&provider).with_generation(GenerationSettings {
            temperature: Some(0.1),
            max_tokens: Some(512),
        });

        orchestrator.answer("q", &session()).await.unwrap();

        let call = &provider.get_calls()[0];
        assert_eq!(call.temperature, Some(0.1));
        assert_eq!(call.max_tokens, Some(512));
    }
}
