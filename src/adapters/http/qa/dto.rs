//! Request and response DTOs for question answering endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::qa::AskQuestionResult;
use crate::domain::query::ExecutionResults;
use crate::ports::ChatRecord;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to ask a question.
#[derive(Debug, Clone, Deserialize)]
pub struct AskQuestionRequest {
    pub question: String,
    /// Continue an existing session; a new one is started when absent.
    #[serde(default)]
    pub session_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Root banner.
#[derive(Debug, Clone, Serialize)]
pub struct BannerResponse {
    pub message: String,
    pub version: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub datasets: DatasetCounts,
}

/// Row counts per dataset; `null` when the dataset is absent.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetCounts {
    pub crop_production: Option<usize>,
    pub rainfall: Option<usize>,
    pub social_groups: Option<usize>,
}

/// Answer to one question.
#[derive(Debug, Clone, Serialize)]
pub struct AskQuestionResponse {
    pub session_id: String,
    pub question: String,
    pub answer: String,
    pub data_sources: Vec<String>,
    pub data_used: Option<ExecutionResults>,
}

impl From<AskQuestionResult> for AskQuestionResponse {
    fn from(result: AskQuestionResult) -> Self {
        Self {
            session_id: result.session_id.to_string(),
            question: result.question,
            answer: result.answer.answer,
            data_sources: result.answer.data_sources,
            data_used: result.answer.data_used,
        }
    }
}

/// One stored question and answer.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageResponse {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub data_sources: Vec<String>,
    pub timestamp: String,
}

impl From<ChatRecord> for ChatMessageResponse {
    fn from(record: ChatRecord) -> Self {
        Self {
            id: record.id.to_string(),
            question: record.question,
            answer: record.answer,
            data_sources: record.data_sources,
            timestamp: record.timestamp.to_rfc3339(),
        }
    }
}

/// A session's history, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct ChatHistoryResponse {
    pub session_id: String,
    pub messages: Vec<ChatMessageResponse>,
}

/// Every session with at least one record.
#[derive(Debug, Clone, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<String>,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::qa::AnswerResult;

    #[test]
    fn ask_request_session_is_optional() {
        let request: AskQuestionRequest =
            serde_json::from_str(r#"{"question": "Rice in Punjab?"}"#).unwrap();
        assert_eq!(request.question, "Rice in Punjab?");
        assert!(request.session_id.is_none());
    }

    #[test]
    fn ask_response_flattens_answer() {
        let result = AskQuestionResult {
            session_id: SessionId::new("s-9").unwrap(),
            question: "Hello?".to_string(),
            answer: AnswerResult::from_general_knowledge("Hi."),
        };
        let json = serde_json::to_value(AskQuestionResponse::from(result)).unwrap();
        assert_eq!(json["session_id"], "s-9");
        assert_eq!(json["answer"], "Hi.");
        assert_eq!(json["data_sources"][0], "General knowledge");
        assert!(json["data_used"].is_null());
    }

    #[test]
    fn chat_message_keeps_record_fields() {
        let record = ChatRecord::new(
            SessionId::new("s-1").unwrap(),
            "q",
            "a",
            vec!["India Meteorological Department - Rainfall Dataset".to_string()],
        );
        let id = record.id.to_string();
        let message = ChatMessageResponse::from(record);
        assert_eq!(message.id, id);
        assert_eq!(message.data_sources.len(), 1);
    }

    #[test]
    fn error_response_serializes_without_details_when_none() {
        let response = ErrorResponse::new("NOT_FOUND", "Not found");
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("details"));
    }

    #[test]
    fn error_response_with_details_includes_details() {
        let details = serde_json::json!({"field": "question"});
        let response = ErrorResponse::with_details("VALIDATION_FAILED", "Invalid", details.clone());
        assert_eq!(response.details, Some(details));
    }
}
