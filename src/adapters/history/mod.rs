//! Chat history adapters.
//!
//! - `InMemoryChatHistory` - process-local, the default
//! - `FileChatHistory` - one YAML file per session

mod file_chat_history;
mod in_memory_chat_history;

pub use file_chat_history::FileChatHistory;
pub use in_memory_chat_history::InMemoryChatHistory;
