//! HTTP handlers for question answering endpoints.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::qa::{
    AskQuestionCommand, AskQuestionError, AskQuestionHandler, GetChatHistoryHandler,
    GetChatHistoryQuery, GetDataSummaryHandler, ListSessionsHandler,
};
use crate::domain::dataset::{DatasetKind, TabularStore};
use crate::domain::foundation::SessionId;
use crate::ports::{ChatHistoryError, ChatHistoryRepository};

use super::dto::{
    AskQuestionRequest, AskQuestionResponse, BannerResponse, ChatHistoryResponse,
    ChatMessageResponse, DatasetCounts, ErrorResponse, HealthResponse, SessionsResponse,
};

pub const BANNER: &str = "Project Samarth - Intelligent Q&A System";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state.
///
/// `ask_handler` is shared rather than built per request because it owns the
/// per-session locks.
#[derive(Clone)]
pub struct QaAppState {
    pub store: Arc<TabularStore>,
    pub history: Arc<dyn ChatHistoryRepository>,
    pub ask_handler: Arc<AskQuestionHandler>,
    pub summary_handler: Arc<GetDataSummaryHandler>,
}

impl QaAppState {
    pub fn new(
        store: Arc<TabularStore>,
        history: Arc<dyn ChatHistoryRepository>,
        ask_handler: Arc<AskQuestionHandler>,
    ) -> Self {
        let summary_handler = Arc::new(GetDataSummaryHandler::new(&store));
        Self {
            store,
            history,
            ask_handler,
            summary_handler,
        }
    }

    pub fn history_handler(&self) -> GetChatHistoryHandler {
        GetChatHistoryHandler::new(self.history.clone())
    }

    pub fn sessions_handler(&self) -> ListSessionsHandler {
        ListSessionsHandler::new(self.history.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /
pub async fn banner() -> impl IntoResponse {
    Json(BannerResponse {
        message: BANNER.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/health
pub async fn health(State(state): State<QaAppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        datasets: DatasetCounts {
            crop_production: state.store.row_count(DatasetKind::CropProduction),
            rainfall: state.store.row_count(DatasetKind::Rainfall),
            social_groups: state.store.row_count(DatasetKind::SocialGroups),
        },
    })
}

/// GET /api/data/summary
pub async fn data_summary(State(state): State<QaAppState>) -> impl IntoResponse {
    let summary = state.summary_handler.handle();
    Json(summary.as_ref().clone())
}

/// GET /api/qa/history/:session_id
pub async fn chat_history(
    State(state): State<QaAppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, QaApiError> {
    let session_id = SessionId::new(session_id).map_err(|e| QaApiError::BadRequest(e.to_string()))?;
    let records = state
        .history_handler()
        .handle(GetChatHistoryQuery {
            session_id: session_id.clone(),
        })
        .await?;

    Ok(Json(ChatHistoryResponse {
        session_id: session_id.to_string(),
        messages: records.into_iter().map(ChatMessageResponse::from).collect(),
    }))
}

/// GET /api/qa/sessions
pub async fn sessions(State(state): State<QaAppState>) -> Result<impl IntoResponse, QaApiError> {
    let sessions = state.sessions_handler().handle().await?;
    Ok(Json(SessionsResponse {
        sessions: sessions.into_iter().map(|id| id.to_string()).collect(),
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/qa/ask
pub async fn ask_question(
    State(state): State<QaAppState>,
    Json(request): Json<AskQuestionRequest>,
) -> Result<impl IntoResponse, QaApiError> {
    let mut cmd = AskQuestionCommand::new(request.question);
    if let Some(session_id) = request.session_id {
        cmd = cmd.in_session(session_id);
    }

    let result = state.ask_handler.handle(cmd).await?;
    tracing::info!(
        session_id = %result.session_id,
        sources = ?result.answer.data_sources,
        "Question answered"
    );

    Ok(Json(AskQuestionResponse::from(result)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub enum QaApiError {
    BadRequest(String),
    Ask(AskQuestionError),
    Storage(ChatHistoryError),
}

impl From<AskQuestionError> for QaApiError {
    fn from(err: AskQuestionError) -> Self {
        Self::Ask(err)
    }
}

impl From<ChatHistoryError> for QaApiError {
    fn from(err: ChatHistoryError) -> Self {
        Self::Storage(err)
    }
}

impl IntoResponse for QaApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self {
            QaApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", message.clone())
            }
            QaApiError::Ask(AskQuestionError::EmptyQuestion) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED",
                "Question cannot be empty".to_string(),
            ),
            QaApiError::Ask(AskQuestionError::Orchestration(err)) => (
                StatusCode::BAD_GATEWAY,
                "AI_PROVIDER_ERROR",
                format!("Error processing question: {err}"),
            ),
            QaApiError::Ask(AskQuestionError::Storage(err)) | QaApiError::Storage(err) => {
                tracing::error!(error = %err, "Chat history storage failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    err.to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::qa::OrchestrationError;
    use crate::ports::AIError;
    use axum::body::to_bytes;

    async fn body_of(error: QaApiError) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn empty_question_maps_to_bad_request() {
        let (status, body) = body_of(AskQuestionError::EmptyQuestion.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn provider_failure_maps_to_bad_gateway_with_reason() {
        let err = AskQuestionError::Orchestration(OrchestrationError::Provider(
            AIError::unavailable("quota exhausted"),
        ));
        let (status, body) = body_of(err.into()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.message.contains("quota exhausted"));
    }

    #[tokio::test]
    async fn storage_failure_maps_to_internal_error() {
        let err = ChatHistoryError::IoError("disk full".to_string());
        let (status, body) = body_of(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "STORAGE_ERROR");
    }
}
