//! Chat History Port - Interface for persisting answered questions.
//!
//! Every successful ask is stored as a `ChatRecord`. Records are grouped by
//! session and read back oldest first.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChatRecordId, SessionId, Timestamp};

/// Maximum number of records returned for one session.
pub const HISTORY_PAGE_LIMIT: usize = 100;

/// One answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: ChatRecordId,
    pub session_id: SessionId,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub data_sources: Vec<String>,
    pub timestamp: Timestamp,
}

impl ChatRecord {
    /// Creates a record stamped with the current time.
    pub fn new(
        session_id: SessionId,
        question: impl Into<String>,
        answer: impl Into<String>,
        data_sources: Vec<String>,
    ) -> Self {
        Self {
            id: ChatRecordId::new(),
            session_id,
            question: question.into(),
            answer: answer.into(),
            data_sources,
            timestamp: Timestamp::now(),
        }
    }
}

/// Errors from chat history storage.
#[derive(Debug, thiserror::Error)]
pub enum ChatHistoryError {
    #[error("Failed to serialize chat history: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize chat history: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for chat history persistence.
#[async_trait]
pub trait ChatHistoryRepository: Send + Sync {
    /// Stores a record.
    async fn append(&self, record: ChatRecord) -> Result<(), ChatHistoryError>;

    /// Records of a session, oldest first, at most [`HISTORY_PAGE_LIMIT`].
    /// An unknown session yields an empty list.
    async fn list_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<ChatRecord>, ChatHistoryError>;

    /// Distinct ids of every session with at least one record.
    async fn list_sessions(&self) -> Result<Vec<SessionId>, ChatHistoryError>;
}
