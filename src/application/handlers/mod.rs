//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod qa;

pub use qa::{
    // Commands and results
    AskQuestionCommand,
    AskQuestionError,
    AskQuestionHandler,
    AskQuestionResult,
    // Queries
    GetChatHistoryHandler,
    GetChatHistoryQuery,
    GetDataSummaryHandler,
    ListSessionsHandler,
    // Orchestration
    ConversationOrchestrator,
    GenerationSettings,
    OrchestrationError,
};
