//! Axum router configuration for question answering endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{ask_question, chat_history, data_summary, health, sessions, QaAppState};

/// Routes mounted under `/api`.
///
/// - `GET /health`
/// - `GET /data/summary`
/// - `POST /qa/ask`
/// - `GET /qa/history/:session_id`
/// - `GET /qa/sessions`
pub fn qa_router() -> Router<QaAppState> {
    Router::new()
        .route("/health", get(health))
        .route("/data/summary", get(data_summary))
        .route("/qa/ask", post(ask_question))
        .route("/qa/history/:session_id", get(chat_history))
        .route("/qa/sessions", get(sessions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::history::InMemoryChatHistory;
    use crate::application::handlers::qa::{AskQuestionHandler, ConversationOrchestrator};
    use crate::domain::dataset::TabularStore;
    use crate::domain::query::ExecutorLimits;

    fn test_state() -> QaAppState {
        let store = Arc::new(TabularStore::default());
        let history = Arc::new(InMemoryChatHistory::new());
        let orchestrator = Arc::new(ConversationOrchestrator::new(
            Arc::new(MockAIProvider::new()),
            store.clone(),
            ExecutorLimits::default(),
        ));
        let ask = Arc::new(AskQuestionHandler::new(orchestrator, history.clone()));
        QaAppState::new(store, history, ask)
    }

    #[test]
    fn qa_router_creates_router() {
        let _: Router<()> = qa_router().with_state(test_state());
    }
}
