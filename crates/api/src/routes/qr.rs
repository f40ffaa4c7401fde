//! QR token routes.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use classiq_core::qr::IssuedToken;
use classiq_shared::AppError;
use classiq_shared::types::SessionId;
use qrcode::{QrCode, render::svg};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extractors::ClientMeta, middleware::AuthUser};

/// Creates the QR routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/qr/generate", post(generate))
        .route("/qr/validate", post(validate))
        .route("/qr/active/{session_id}", get(active))
}

/// Request body for issuing a token.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Session to admit to.
    pub session_id: SessionId,
    /// Lifetime in seconds, defaults to the configured value.
    pub expiry_seconds: Option<u32>,
}

/// Request body for redeeming a token.
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    /// Scanned bearer value.
    #[serde(default, alias = "token")]
    pub qr_token: String,
}

/// An issued token with its rendered image.
#[derive(Debug, Serialize)]
pub struct QrResponse {
    /// Bearer value.
    pub qr_token: String,
    /// Session.
    pub session_id: SessionId,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
    /// `data:image/svg+xml;base64,...` URL of the QR image.
    pub qr_image: String,
}

/// Renders the token payload as an SVG data URL.
fn render(issued: &IssuedToken) -> Result<String, AppError> {
    let payload =
        serde_json::to_string(issued).map_err(|e| AppError::Internal(e.to_string()))?;
    let code = QrCode::new(payload.as_bytes()).map_err(|e| AppError::Internal(e.to_string()))?;
    let image = code
        .render::<svg::Color>()
        .min_dimensions(400, 400)
        .dark_color(svg::Color("#1a1a2e"))
        .light_color(svg::Color("#ffffff"))
        .build();
    Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(image)))
}

impl TryFrom<IssuedToken> for QrResponse {
    type Error = AppError;

    fn try_from(issued: IssuedToken) -> Result<Self, Self::Error> {
        let qr_image = render(&issued)?;
        Ok(Self {
            qr_token: issued.token,
            session_id: issued.session_id,
            expires_at: issued.expires_at,
            qr_image,
        })
    }
}

/// POST `/qr/generate` - Issue a token, superseding the live one.
async fn generate(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let issued = state
        .qr_tokens()
        .issue(principal, request.session_id, request.expiry_seconds, Utc::now())
        .await?;

    info!(
        session_id = %issued.session_id,
        expires_at = %issued.expires_at,
        "qr token issued"
    );
    let response = QrResponse::try_from(issued)?;
    Ok(Json(response))
}

/// POST `/qr/validate` - Redeem a scanned token for the caller.
async fn validate(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ClientMeta(meta): ClientMeta,
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let redemption = state
        .qr_tokens()
        .redeem(principal, &request.qr_token, meta, Utc::now())
        .await?;

    info!(
        session_id = %redemption.session_id,
        student_id = %principal.id,
        method = "qr",
        "attendance marked"
    );
    Ok(Json(json!({
        "message": "Attendance marked via QR",
        "session_id": redemption.session_id,
        "record": redemption.record,
    })))
}

/// GET `/qr/active/{session_id}` - The live token, so a projector can resume.
async fn active(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state
        .qr_tokens()
        .active(principal, SessionId::from_uuid(session_id), Utc::now())
        .await?
        .map(QrResponse::try_from)
        .transpose()?;
    Ok(Json(json!({ "active": token })))
}
