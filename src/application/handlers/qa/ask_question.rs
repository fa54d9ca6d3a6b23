//! AskQuestionHandler - answers a question and records it in the session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::foundation::SessionId;
use crate::domain::qa::AnswerResult;
use crate::ports::{ChatHistoryError, ChatHistoryRepository, ChatRecord};

use super::{ConversationOrchestrator, OrchestrationError};

/// Command to ask a question, optionally within an existing session.
#[derive(Debug, Clone)]
pub struct AskQuestionCommand {
    pub question: String,
    pub session_id: Option<String>,
}

impl AskQuestionCommand {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            session_id: None,
        }
    }

    pub fn in_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Result of asking a question.
#[derive(Debug, Clone)]
pub struct AskQuestionResult {
    pub session_id: SessionId,
    pub question: String,
    pub answer: AnswerResult,
}

#[derive(Debug, Error)]
pub enum AskQuestionError {
    #[error("Validation error: question cannot be empty")]
    EmptyQuestion,

    #[error(transparent)]
    Orchestration(#[from] OrchestrationError),

    #[error("Failed to record answer: {0}")]
    Storage(#[from] ChatHistoryError),
}

/// Handler for AskQuestion commands.
///
/// Questions of the same session run one at a time so their records keep the
/// order they were asked in; different sessions run concurrently.
pub struct AskQuestionHandler {
    orchestrator: Arc<ConversationOrchestrator>,
    history: Arc<dyn ChatHistoryRepository>,
    session_locks: SessionLocks,
}

// Std mutex: never held across .await.
type SessionLocks = StdMutex<HashMap<SessionId, Arc<Mutex<()>>>>;

/// Registration of one caller in the per-session lock map.
///
/// Dropping it removes the map entry once no other caller holds or waits on
/// the lock, including when the owning future is cancelled mid-turn.
struct SessionLockEntry<'a> {
    locks: &'a SessionLocks,
    session_id: SessionId,
    lock: Arc<Mutex<()>>,
}

impl<'a> SessionLockEntry<'a> {
    fn acquire(locks: &'a SessionLocks, session_id: &SessionId) -> Self {
        let lock = locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(session_id.clone())
            .or_default()
            .clone();
        Self {
            locks,
            session_id: session_id.clone(),
            lock,
        }
    }

    fn lock(&self) -> &Mutex<()> {
        &self.lock
    }
}

impl Drop for SessionLockEntry<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map plus ours means nobody else is waiting.
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.session_id);
        }
    }
}

impl AskQuestionHandler {
    pub fn new(
        orchestrator: Arc<ConversationOrchestrator>,
        history: Arc<dyn ChatHistoryRepository>,
    ) -> Self {
        Self {
            orchestrator,
            history,
            session_locks: StdMutex::new(HashMap::new()),
        }
    }

    pub async fn handle(
        &self,
        cmd: AskQuestionCommand,
    ) -> Result<AskQuestionResult, AskQuestionError> {
        let question = cmd.question.trim();
        if question.is_empty() {
            return Err(AskQuestionError::EmptyQuestion);
        }

        // Blank ids are treated like absent ones.
        let session_id = cmd
            .session_id
            .and_then(|id| SessionId::new(id).ok())
            .unwrap_or_else(SessionId::generate);

        let answer = {
            let entry = SessionLockEntry::acquire(&self.session_locks, &session_id);
            let _turn = entry.lock().lock().await;
            self.answer_and_record(&session_id, question).await?
        };
        Ok(AskQuestionResult {
            session_id,
            question: question.to_string(),
            answer,
        })
    }

    async fn answer_and_record(
        &self,
        session_id: &SessionId,
        question: &str,
    ) -> Result<AnswerResult, AskQuestionError> {
        let answer = self
            .orchestrator
            .answer(question, session_id)
            .await
            .map_err(|err| {
                tracing::error!(session_id = %session_id, error = %err, "Failed to answer question");
                err
            })?;

        let record = ChatRecord::new(
            session_id.clone(),
            question,
            answer.answer.clone(),
            answer.data_sources.clone(),
        );
        self.history.append(record).await?;
        Ok(answer)
    }

    #[cfg(test)]
    fn tracked_sessions(&self) -> usize {
        self.session_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::history::InMemoryChatHistory;
    use crate::domain::dataset::TabularStore;
    use crate::domain::query::ExecutorLimits;
    use crate::ports::AIError;
    use std::time::Duration;

    fn handler(provider: MockAIProvider, history: InMemoryChatHistory) -> AskQuestionHandler {
        let orchestrator = ConversationOrchestrator::new(
            Arc::new(provider),
            Arc::new(TabularStore::default()),
            ExecutorLimits::default(),
        );
        AskQuestionHandler::new(Arc::new(orchestrator), Arc::new(history))
    }

    #[tokio::test]
    async fn generates_session_and_records_answer() {
        let history = InMemoryChatHistory::new();
        let handler = handler(MockAIProvider::new().with_response("Rice."), history.clone());

        let result = handler
            .handle(AskQuestionCommand::new("  Main kharif crop?  "))
            .await
            .unwrap();

        assert_eq!(result.question, "Main kharif crop?");
        assert_eq!(result.answer.answer, "Rice.");
        let records = history.list_by_session(&result.session_id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "Main kharif crop?");
        assert_eq!(records[0].data_sources, vec!["General knowledge"]);
    }

    #[tokio::test]
    async fn keeps_given_session() {
        let history = InMemoryChatHistory::new();
        let handler = handler(MockAIProvider::new(), history.clone());

        let result = handler
            .handle(AskQuestionCommand::new("q").in_session("abc"))
            .await
            .unwrap();

        assert_eq!(result.session_id.as_str(), "abc");
        assert_eq!(history.list_sessions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_session_gets_generated() {
        let handler = handler(MockAIProvider::new(), InMemoryChatHistory::new());

        let result = handler
            .handle(AskQuestionCommand::new("q").in_session("   "))
            .await
            .unwrap();

        assert!(!result.session_id.as_str().trim().is_empty());
    }

    #[tokio::test]
    async fn empty_question_is_rejected() {
        let provider = MockAIProvider::new();
        let handler = handler(provider.clone(), InMemoryChatHistory::new());

        let err = handler.handle(AskQuestionCommand::new(" \n")).await.unwrap_err();

        assert!(matches!(err, AskQuestionError::EmptyQuestion));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn failed_answer_is_not_recorded() {
        let history = InMemoryChatHistory::new();
        let handler = handler(
            MockAIProvider::new().with_error(AIError::AuthenticationFailed),
            history.clone(),
        );

        let err = handler.handle(AskQuestionCommand::new("q")).await.unwrap_err();

        assert!(matches!(err, AskQuestionError::Orchestration(_)));
        assert_eq!(history.record_count().await, 0);
        assert_eq!(handler.tracked_sessions(), 0);
    }

    #[tokio::test]
    async fn same_session_questions_are_recorded_in_order() {
        let history = InMemoryChatHistory::new();
        let provider = MockAIProvider::new()
            .with_delay(Duration::from_millis(10))
            .with_response("first answer")
            .with_response("second answer");
        let handler = Arc::new(handler(provider, history.clone()));

        let first = {
            let handler = handler.clone();
            tokio::spawn(async move {
                handler
                    .handle(AskQuestionCommand::new("first").in_session("s"))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(2)).await;
        let second = handler
            .handle(AskQuestionCommand::new("second").in_session("s"))
            .await
            .unwrap();
        first.await.unwrap().unwrap();

        let records = history
            .list_by_session(&SessionId::new("s").unwrap())
            .await
            .unwrap();
        assert_eq!(second.answer.answer, "second answer");
        assert_eq!(
            records.iter().map(|r| r.question.as_str()).collect::<Vec<_>>(),
            vec!["first", "second"]
        );
        assert_eq!(handler.tracked_sessions(), 0);
    }

    #[tokio::test]
    async fn cancelled_question_releases_session_lock() {
        let handler = handler(
            MockAIProvider::new().with_delay(Duration::from_millis(200)),
            InMemoryChatHistory::new(),
        );

        let outcome = tokio::time::timeout(
            Duration::from_millis(20),
            handler.handle(AskQuestionCommand::new("q")),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(handler.tracked_sessions(), 0);
    }

    #[tokio::test]
    async fn cancelled_waiter_leaves_holder_entry_intact() {
        let handler = Arc::new(handler(
            MockAIProvider::new()
                .with_delay(Duration::from_millis(50))
                .with_response("done"),
            InMemoryChatHistory::new(),
        ));

        let holder = {
            let handler = handler.clone();
            tokio::spawn(async move {
                handler
                    .handle(AskQuestionCommand::new("first").in_session("s"))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;

        let waiter = tokio::time::timeout(
            Duration::from_millis(10),
            handler.handle(AskQuestionCommand::new("second").in_session("s")),
        )
        .await;
        assert!(waiter.is_err());
        assert_eq!(handler.tracked_sessions(), 1);

        holder.await.unwrap().unwrap();
        assert_eq!(handler.tracked_sessions(), 0);
    }
}
