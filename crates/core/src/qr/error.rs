//! QR token errors.

use classiq_shared::types::SessionId;
use thiserror::Error;

use crate::store::StoreError;
use crate::window::WindowError;

/// Errors that can occur while issuing or redeeming tokens.
#[derive(Debug, Error)]
pub enum QrError {
    /// Token missing from the request.
    #[error("QR token is required")]
    MissingToken,

    /// Requested lifetime out of range.
    #[error("Expiry must be between 1 and {max} seconds")]
    InvalidExpiry {
        /// Upper bound.
        max: u32,
    },

    /// Unknown or superseded token.
    #[error("Invalid QR code")]
    InvalidToken,

    /// Token lapsed.
    #[error("QR code has expired")]
    Expired,

    /// Session not found.
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),

    /// Caller does not teach the class.
    #[error("Only the class faculty or an admin can issue QR codes")]
    NotOwner,

    /// Caller is not enrolled in the session's class.
    #[error("You are not enrolled in this class")]
    NotEnrolled,

    /// Window closed or wrong method.
    #[error(transparent)]
    Window(#[from] WindowError),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QrError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MissingToken | Self::InvalidExpiry { .. } => 400,
            Self::NotOwner | Self::NotEnrolled => 403,
            Self::InvalidToken | Self::SessionNotFound(_) => 404,
            Self::Expired => 410,
            Self::Window(e) => e.status_code(),
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::InvalidExpiry { .. } => "invalid_expiry",
            Self::InvalidToken => "invalid_token",
            Self::Expired => "token_expired",
            Self::SessionNotFound(_) => "session_not_found",
            Self::NotOwner => "forbidden",
            Self::NotEnrolled => "not_enrolled",
            Self::Window(e) => e.error_code(),
            Self::Store(_) => "internal_error",
        }
    }
}
