//! Application-wide error types.

use thiserror::Error;

/// Failures raised outside the engine: authentication, request parsing and
/// response rendering.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Validation(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::Validation(_) => "validation_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
