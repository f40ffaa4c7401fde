//! Face registration and verification routes.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::Utc;
use classiq_core::face::{EmbeddingInput, FaceError, VerifyInput, percent};
use classiq_shared::types::UserId;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extractors::{ClientMeta, client_ip},
    middleware::AuthUser,
};

/// Creates the face routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/face/register", post(register))
        .route("/face/verify", post(verify))
        .route("/face/status", get(status))
        .route("/face/reset", delete(reset_self))
        .route("/face/reset/{user_id}", delete(reset_user))
        .route("/face/network-check", get(network_check))
}

/// Request body for registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Captures of the caller's face.
    pub embeddings: Vec<EmbeddingInput>,
}

/// Result of the network pre-check.
#[derive(Debug, Serialize)]
pub struct NetworkCheckResponse {
    /// Whether verification would pass the allow-list.
    pub allowed: bool,
    /// Address as seen by the server.
    pub ip: Option<String>,
    /// Configured networks, empty when unrestricted.
    pub required_networks: Vec<String>,
    /// Human-readable verdict.
    pub message: String,
}

/// POST `/face/register` - Replace the caller's templates.
async fn register(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let count = state.faces().register(principal, request.embeddings).await?;

    info!(user_id = %principal.id, count, "face registered");
    Ok(Json(json!({
        "message": "Face registered successfully",
        "count": count,
    })))
}

/// GET `/face/status` - Whether the caller has templates.
async fn status(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let status = state.faces().status(principal).await?;
    Ok(Json(status))
}

/// POST `/face/verify` - Match a probe and mark attendance.
async fn verify(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ClientMeta(meta): ClientMeta,
    payload: Result<Json<VerifyInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let session_id = input.session_id;

    match state.faces().verify(principal, input, meta, Utc::now()).await {
        Ok(verification) => {
            info!(
                session_id = %session_id,
                student_id = %principal.id,
                score = verification.score,
                method = "facial",
                "attendance marked"
            );
            Ok(Json(json!({
                "message": "Attendance marked via face verification",
                "score": percent(verification.score),
                "session_id": session_id,
                "record": verification.record,
            })))
        }
        Err(err) => {
            if !matches!(err, FaceError::Store(_)) {
                warn!(
                    session_id = %session_id,
                    user_id = %principal.id,
                    result = err.error_code(),
                    score = ?err.score_percent(),
                    "face verification rejected"
                );
            }
            Err(err.into())
        }
    }
}

/// DELETE `/face/reset` - Remove the caller's templates.
async fn reset_self(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.faces().reset(principal, None).await?;
    info!(user_id = %principal.id, deleted, "face data reset");
    Ok(Json(json!({ "message": "Face data reset", "deleted": deleted })))
}

/// DELETE `/face/reset/{user_id}` - Remove another user's templates (admin).
async fn reset_user(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let target = UserId::from_uuid(user_id);
    let deleted = state.faces().reset(principal, Some(target)).await?;
    info!(user_id = %target, reset_by = %principal.id, deleted, "face data reset");
    Ok(Json(json!({ "message": "Face data reset", "deleted": deleted })))
}

/// GET `/face/network-check` - Whether the caller's address passes the
/// global allow-list.
async fn network_check(
    State(state): State<AppState>,
    AuthUser(_principal): AuthUser,
    request: axum::extract::Request,
) -> impl IntoResponse {
    let ip = client_ip(request.headers(), request.extensions(), state.trust_forwarded_for);
    let policy = &state.face.allowed_networks;
    let allowed = policy.allows(ip);
    let message = if allowed {
        "Network check passed"
    } else {
        "Connect to the campus network to verify attendance"
    };

    Json(NetworkCheckResponse {
        allowed,
        ip: ip.map(|ip| ip.to_string()),
        required_networks: policy.networks(),
        message: message.to_string(),
    })
}
