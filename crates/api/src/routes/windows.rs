//! Attendance window routes.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use classiq_core::window::OpenWindowInput;
use classiq_shared::types::SessionId;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the window routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/attendance-window/open", post(open_window))
        .route("/attendance-window/close", post(close_window))
        .route("/attendance-window/status/{session_id}", get(window_status))
}

/// Request body for closing a window.
#[derive(Debug, Deserialize)]
pub struct CloseWindowRequest {
    /// Session whose window to close.
    pub session_id: SessionId,
}

/// POST `/attendance-window/open` - Open a window, replacing any open one.
async fn open_window(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    payload: Result<Json<OpenWindowInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let window = state.windows().open(principal, input, Utc::now()).await?;

    info!(
        session_id = %window.session_id,
        method = %window.method,
        closes_at = ?window.closes_at,
        allowed_network = ?window.allowed_network,
        "attendance window opened"
    );
    Ok(Json(json!({
        "message": format!("Attendance window opened for {}", window.method),
        "window_id": window.id,
        "opens_at": window.opens_at,
        "closes_at": window.closes_at,
        "window": window,
    })))
}

/// POST `/attendance-window/close` - Close the open window.
async fn close_window(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    payload: Result<Json<CloseWindowRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let window = state
        .windows()
        .close(principal, request.session_id, Utc::now())
        .await?;

    info!(session_id = %window.session_id, closed_by = %principal.id, "attendance window closed");
    Ok(Json(json!({
        "message": "Attendance window closed",
        "window": window,
    })))
}

/// GET `/attendance-window/status/{session_id}` - Open window and marking progress.
async fn window_status(
    State(state): State<AppState>,
    AuthUser(_principal): AuthUser,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let status = state
        .windows()
        .status(SessionId::from_uuid(session_id), Utc::now())
        .await?;
    Ok(Json(status))
}
