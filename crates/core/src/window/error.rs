//! Window controller errors.

use classiq_shared::types::SessionId;
use thiserror::Error;

use super::types::WindowMethod;
use crate::store::StoreError;

/// Errors that can occur during window operations and window checks.
#[derive(Debug, Error)]
pub enum WindowError {
    /// Session not found.
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),

    /// Caller does not teach the session's class.
    #[error("Only the class faculty or an admin can manage this window")]
    NotOwner,

    /// Close requested with nothing open.
    #[error("No active attendance window for this session")]
    NoActiveWindow,

    /// No window is open for marking.
    #[error("Attendance window is closed")]
    Closed,

    /// The open window does not accept this method.
    #[error("This session only accepts {accepted} attendance")]
    WrongMethod {
        /// What the window accepts.
        accepted: WindowMethod,
    },

    /// `allowed_network` could not be parsed.
    #[error("Invalid network restriction: {0}")]
    InvalidNetwork(String),

    /// Timed duration beyond the supported maximum.
    #[error("Window duration may be at most {max} minutes")]
    InvalidDuration {
        /// Upper bound in minutes.
        max: i64,
    },

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WindowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::WrongMethod { .. } | Self::InvalidNetwork(_) | Self::InvalidDuration { .. } => {
                400
            }
            Self::NotOwner => 403,
            Self::SessionNotFound(_) | Self::NoActiveWindow => 404,
            Self::Closed => 410,
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::SessionNotFound(_) => "session_not_found",
            Self::NotOwner => "forbidden",
            Self::NoActiveWindow => "no_active_window",
            Self::Closed => "window_closed",
            Self::WrongMethod { .. } => "wrong_method",
            Self::InvalidNetwork(_) => "invalid_network",
            Self::InvalidDuration { .. } => "invalid_duration",
            Self::Store(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(WindowError::Closed.status_code(), 410);
        assert_eq!(
            WindowError::WrongMethod {
                accepted: WindowMethod::Qr
            }
            .status_code(),
            400
        );
        assert_eq!(WindowError::NoActiveWindow.status_code(), 404);
        assert_eq!(WindowError::NotOwner.status_code(), 403);
        assert_eq!(WindowError::InvalidDuration { max: 60 }.status_code(), 400);
        assert_eq!(WindowError::Store(StoreError::new("down")).status_code(), 500);
    }

    #[test]
    fn test_wrong_method_message_names_accepted_method() {
        let err = WindowError::WrongMethod {
            accepted: WindowMethod::Qr,
        };
        assert_eq!(err.to_string(), "This session only accepts qr attendance");
    }
}
