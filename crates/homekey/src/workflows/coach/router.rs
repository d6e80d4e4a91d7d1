use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::repository::{RepositoryError, SessionId, SessionRepository};
use super::service::{CoachServiceError, CoachSessionService};
use crate::workflows::readiness::Phase;

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct DocumentRequest {
    pub document_type: String,
}

#[derive(Debug, Deserialize)]
pub struct DpaRequest {
    pub amount: f64,
}

/// HTTP endpoints for coaching sessions.
pub fn coach_router<R>(service: Arc<CoachSessionService<R>>) -> Router
where
    R: SessionRepository + 'static,
{
    Router::new()
        .route("/api/v1/coach/sessions", post(start_handler::<R>))
        .route("/api/v1/coach/sessions/:session_id", get(status_handler::<R>))
        .route(
            "/api/v1/coach/sessions/:session_id/messages",
            post(message_handler::<R>),
        )
        .route(
            "/api/v1/coach/sessions/:session_id/documents",
            post(document_handler::<R>),
        )
        .route("/api/v1/coach/sessions/:session_id/dpa", put(dpa_handler::<R>))
        .route(
            "/api/v1/coach/sessions/:session_id/phases/:phase",
            post(phase_handler::<R>),
        )
        .with_state(service)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub(crate) async fn start_handler<R>(State(service): State<Arc<CoachSessionService<R>>>) -> Response
where
    R: SessionRepository + 'static,
{
    let today = today();
    match service.start_session(today) {
        Ok(record) => (StatusCode::CREATED, Json(record.status_view(today))).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<CoachSessionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.get(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, Json(record.status_view(today()))).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn message_handler<R>(
    State(service): State<Arc<CoachSessionService<R>>>,
    Path(session_id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.send_message(&SessionId(session_id), &request.content) {
        Ok(outcome) => {
            let payload = json!({
                "reply": outcome.reply,
                "session": outcome.record.status_view(today()),
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn document_handler<R>(
    State(service): State<Arc<CoachSessionService<R>>>,
    Path(session_id): Path<String>,
    Json(request): Json<DocumentRequest>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let today = today();
    match service.record_document(&SessionId(session_id), &request.document_type, today) {
        Ok(record) => (StatusCode::OK, Json(record.status_view(today))).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn dpa_handler<R>(
    State(service): State<Arc<CoachSessionService<R>>>,
    Path(session_id): Path<String>,
    Json(request): Json<DpaRequest>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.set_dpa_amount(&SessionId(session_id), request.amount) {
        Ok(record) => (StatusCode::OK, Json(record.status_view(today()))).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn phase_handler<R>(
    State(service): State<Arc<CoachSessionService<R>>>,
    Path((session_id, phase)): Path<(String, String)>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let phase = match Phase::from_str(&phase) {
        Ok(phase) => phase,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match service.complete_phase(&SessionId(session_id), phase) {
        Ok(outcome) => {
            let payload = json!({
                "phase": outcome.phase,
                "newly_completed": outcome.newly_completed,
                "session": outcome.record.status_view(today()),
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

impl IntoResponse for CoachServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            CoachServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            CoachServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            CoachServiceError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            CoachServiceError::PhaseOutOfOrder { .. } => StatusCode::CONFLICT,
            CoachServiceError::ProfileIncomplete(_)
            | CoachServiceError::Packet(_)
            | CoachServiceError::InvalidDpaAmount(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CoachServiceError::Readiness(_) => StatusCode::BAD_REQUEST,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "coach request failed");
        }

        let payload = json!({ "error": self.to_string() });
        (status, Json(payload)).into_response()
    }
}
