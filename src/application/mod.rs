//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    AskQuestionCommand, AskQuestionError, AskQuestionHandler, AskQuestionResult,
    ConversationOrchestrator, GenerationSettings, GetChatHistoryHandler, GetChatHistoryQuery,
    GetDataSummaryHandler, ListSessionsHandler, OrchestrationError,
};
