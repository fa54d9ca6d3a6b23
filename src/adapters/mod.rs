//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - Reasoning engine clients (Gemini, OpenAI, mock)
//! - `datasets` - CSV and spreadsheet dataset loading
//! - `history` - Chat history storage (in-memory, YAML files)
//! - `http` - REST API

pub mod ai;
pub mod datasets;
pub mod history;
pub mod http;
