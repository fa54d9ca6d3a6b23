//! Question/answer command and query handlers.

mod ask_question;
mod get_chat_history;
mod get_data_summary;
mod list_sessions;
mod orchestrator;

pub use ask_question::{AskQuestionCommand, AskQuestionError, AskQuestionHandler, AskQuestionResult};
pub use get_chat_history::{GetChatHistoryHandler, GetChatHistoryQuery};
pub use get_data_summary::GetDataSummaryHandler;
pub use list_sessions::ListSessionsHandler;
pub use orchestrator::{ConversationOrchestrator, GenerationSettings, OrchestrationError};
