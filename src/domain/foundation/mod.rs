//! Foundation module - Shared domain primitives.
//!
//! Contains the identifiers, timestamps, state machine trait and validation
//! errors that form the vocabulary of the Samarth domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{ChatRecordId, SessionId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
