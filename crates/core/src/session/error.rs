//! Session lifecycle errors.

use classiq_shared::types::{ClassId, SessionId};
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Class not found.
    #[error("Class {0} not found")]
    ClassNotFound(ClassId),

    /// Session not found.
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),

    /// Caller may not act on this class.
    #[error("Not allowed to manage sessions of this class")]
    Forbidden,

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::ClassNotFound(_) | Self::SessionNotFound(_) => 404,
            Self::Forbidden => 403,
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ClassNotFound(_) => "class_not_found",
            Self::SessionNotFound(_) => "session_not_found",
            Self::Forbidden => "forbidden",
            Self::Store(_) => "internal_error",
        }
    }
}
