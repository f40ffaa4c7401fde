//! JSON error responses.
//!
//! Every failure leaves the API as `{"error": <code>, "message": <text>}`;
//! face mismatches also carry the rounded `score`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use classiq_core::attendance::AttendanceError;
use classiq_core::face::FaceError;
use classiq_core::qr::QrError;
use classiq_core::session::SessionError;
use classiq_core::window::WindowError;
use classiq_shared::AppError;
use serde::Serialize;
use tracing::{error, warn};

/// An error rendered as a JSON response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    score: Option<u8>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<u8>,
}

impl ApiError {
    /// Builds an error from a raw status and code.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            score: None,
        }
    }

    fn from_parts(status: u16, code: &'static str, message: String) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        // Store details stay in the log.
        let message = if status.is_server_error() {
            error!(code, error = %message, "request failed");
            "An error occurred".to_string()
        } else {
            message
        };
        Self::new(status, code, message)
    }

    /// HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code,
            message: &self.message,
            score: self.score,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::from_parts(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self::from_parts(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<WindowError> for ApiError {
    fn from(err: WindowError) -> Self {
        Self::from_parts(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<QrError> for ApiError {
    fn from(err: QrError) -> Self {
        Self::from_parts(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<FaceError> for ApiError {
    fn from(err: FaceError) -> Self {
        let score = err.score_percent();
        let mut api = Self::from_parts(err.status_code(), err.error_code(), err.to_string());
        api.score = score;
        api
    }
}

impl From<AttendanceError> for ApiError {
    fn from(err: AttendanceError) -> Self {
        Self::from_parts(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let detail = rejection.body_text();
        warn!(error = %detail, "rejected request body");
        AppError::Validation(detail).into()
    }
}
