//! GetChatHistoryHandler - Query handler for a session's records.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::ports::{ChatHistoryError, ChatHistoryRepository, ChatRecord};

/// Query for one session's history.
#[derive(Debug, Clone)]
pub struct GetChatHistoryQuery {
    pub session_id: SessionId,
}

pub struct GetChatHistoryHandler {
    history: Arc<dyn ChatHistoryRepository>,
}

impl GetChatHistoryHandler {
    pub fn new(history: Arc<dyn ChatHistoryRepository>) -> Self {
        Self { history }
    }

    /// Oldest first; an unknown session has an empty history.
    pub async fn handle(
        &self,
        query: GetChatHistoryQuery,
    ) -> Result<Vec<ChatRecord>, ChatHistoryError> {
        self.history.list_by_session(&query.session_id).await
    }
}
