//! ListSessionsHandler - Query handler for every session with history.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::ports::{ChatHistoryError, ChatHistoryRepository};

pub struct ListSessionsHandler {
    history: Arc<dyn ChatHistoryRepository>,
}

impl ListSessionsHandler {
    pub fn new(history: Arc<dyn ChatHistoryRepository>) -> Self {
        Self { history }
    }

    pub async fn handle(&self) -> Result<Vec<SessionId>, ChatHistoryError> {
        self.history.list_sessions().await
    }
}
