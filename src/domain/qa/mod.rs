//! Question/answer domain.
//!
//! The pieces of one question's exchange with the reasoning engine that do
//! not need I/O: reading the engine's replies, building prompts, tracking
//! the exchange state and deriving citations.

mod answer;
mod citation;
mod directive;
mod exchange;
mod prompt;

pub use answer::AnswerResult;
pub use citation::{cite, DataSource};
pub use directive::{strip_fences, Directive, ModelReply};
pub use exchange::ExchangeState;
pub use prompt::{context_prompt, data_prompt, CONTEXT_SAMPLE_LIMITS};
