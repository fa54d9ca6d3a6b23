//! HTTP adapter for question answering endpoints.
//!
//! - `GET /` - Service banner
//! - `GET /api/health` - Liveness and dataset row counts
//! - `GET /api/data/summary` - Overview of the loaded datasets
//! - `POST /api/qa/ask` - Answer a question
//! - `GET /api/qa/history/:session_id` - A session's questions and answers
//! - `GET /api/qa/sessions` - Sessions with history

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::QaAppState;
pub use routes::qa_router;
