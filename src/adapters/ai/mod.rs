//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `GeminiProvider` - Google Gemini models (default)
//! - `OpenAIProvider` - OpenAI chat completion models
//! - `MockAIProvider` - Scripted replies for tests and offline runs

mod gemini_provider;
mod mock_provider;
mod openai_provider;
mod retry;

pub use gemini_provider::{GeminiConfig, GeminiProvider};
pub use mock_provider::{MockAIProvider, DEFAULT_MOCK_REPLY};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
pub use retry::RetryPolicy;
