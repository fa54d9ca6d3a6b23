//! Ports - Interfaces between the domain and the outside world.
//!
//! Adapters implement these traits; application handlers depend only on them.

mod ai_provider;
mod chat_history;
mod dataset_source;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use chat_history::{ChatHistoryError, ChatHistoryRepository, ChatRecord, HISTORY_PAGE_LIMIT};
pub use dataset_source::DatasetSource;
