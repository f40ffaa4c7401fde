//! Class session routes.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use classiq_shared::types::{ClassId, SessionId};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the session routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions/today", get(today_sessions))
        .route("/sessions/{session_id}", get(get_session))
        .route("/classes/{class_id}/sessions", post(start_session))
        .route("/classes/{class_id}/sessions/today", post(ensure_today))
}

/// Request body for an explicit start.
#[derive(Debug, Default, Deserialize)]
pub struct StartSessionRequest {
    /// Date to start, defaults to today in institution time.
    pub date: Option<NaiveDate>,
    /// Topic of the lecture.
    pub topic: Option<String>,
}

/// GET `/sessions/today` - Today's sessions for the caller, created on first access.
async fn today_sessions(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let sessions = state.sessions().today_for(principal, Utc::now()).await?;
    Ok(Json(json!({ "sessions": sessions })))
}

/// POST `/classes/{class_id}/sessions/today` - Get or create today's session.
async fn ensure_today(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(class_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .sessions()
        .ensure_today(principal, ClassId::from_uuid(class_id), Utc::now())
        .await?;
    Ok(Json(json!({ "session": view })))
}

/// POST `/classes/{class_id}/sessions` - Start a session for a date.
async fn start_session(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(class_id): Path<Uuid>,
    payload: Result<Json<StartSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let view = state
        .sessions()
        .start(
            principal,
            ClassId::from_uuid(class_id),
            request.date,
            request.topic,
            Utc::now(),
        )
        .await?;

    info!(
        session_id = %view.session.id,
        class_id = %class_id,
        started_by = %principal.id,
        "session started"
    );
    Ok(Json(json!({ "session": view })))
}

/// GET `/sessions/{session_id}` - A session with its computed status.
async fn get_session(
    State(state): State<AppState>,
    AuthUser(_principal): AuthUser,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .sessions()
        .get(SessionId::from_uuid(session_id), Utc::now())
        .await?;
    Ok(Json(json!({ "session": view })))
}
