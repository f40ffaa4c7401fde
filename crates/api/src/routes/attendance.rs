//! Attendance record routes.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use classiq_core::attendance::BulkEntry;
use classiq_shared::types::SessionId;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extractors::ClientMeta, middleware::AuthUser};

/// Creates the attendance routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/attendance/mark-bulk", post(mark_bulk))
        .route("/attendance/session/{session_id}", get(session_records))
}

/// Request body for a manual roster.
#[derive(Debug, Deserialize)]
pub struct MarkBulkRequest {
    /// Session to mark.
    pub session_id: SessionId,
    /// One line per student.
    pub records: Vec<BulkEntry>,
}

/// POST `/attendance/mark-bulk` - Record a manual roster.
async fn mark_bulk(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ClientMeta(meta): ClientMeta,
    payload: Result<Json<MarkBulkRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let outcome = state
        .attendance()
        .mark_bulk(principal, request.session_id, request.records, meta, Utc::now())
        .await?;

    info!(
        session_id = %request.session_id,
        marked_by = %principal.id,
        submitted = outcome.submitted,
        changed = outcome.changed,
        "manual attendance recorded"
    );
    Ok(Json(json!({
        "message": format!("Attendance marked for {} students", outcome.submitted),
        "submitted": outcome.submitted,
        "changed": outcome.changed,
    })))
}

/// GET `/attendance/session/{session_id}` - Records of a session.
async fn session_records(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state
        .attendance()
        .list(principal, SessionId::from_uuid(session_id))
        .await?;
    Ok(Json(json!({ "records": records })))
}
