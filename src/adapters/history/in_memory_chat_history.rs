//! In-Memory Chat History Adapter
//!
//! Keeps records in memory for the lifetime of the process.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionId;
use crate::ports::{ChatHistoryError, ChatHistoryRepository, ChatRecord, HISTORY_PAGE_LIMIT};

/// In-memory chat history, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatHistory {
    records: Arc<RwLock<Vec<ChatRecord>>>,
}

impl InMemoryChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records across all sessions.
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

#[async_trait]
impl ChatHistoryRepository for InMemoryChatHistory {
    async fn append(&self, record: ChatRecord) -> Result<(), ChatHistoryError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn list_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<ChatRecord>, ChatHistoryError> {
        let records = self.records.read().await;
        let mut matching: Vec<ChatRecord> = records
            .iter()
            .filter(|r| &r.session_id == session_id)
            .cloned()
            .collect();
        matching.sort_by_key(|r| r.timestamp);
        matching.truncate(HISTORY_PAGE_LIMIT);
        Ok(matching)
    }

    async fn list_sessions(&self) -> Result<Vec<SessionId>, ChatHistoryError> {
        let records = self.records.read().await;
        let mut sessions: Vec<SessionId> = Vec::new();
        for record in records.iter() {
            if !sessions.contains(&record.session_id) {
                sessions.push(record.session_id.clone());
            }
        }
        Ok(sessions)
    }
}
