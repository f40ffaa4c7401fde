//! Face engine errors.

use classiq_shared::types::SessionId;
use thiserror::Error;

use crate::store::StoreError;
use crate::window::WindowError;

/// Errors that can occur during registration, verification or reset.
#[derive(Debug, Error)]
pub enum FaceError {
    /// Descriptor has the wrong length.
    #[error("Descriptor must have {expected} values, got {actual}")]
    InvalidDescriptor {
        /// Required length.
        expected: usize,
        /// Submitted length.
        actual: usize,
    },

    /// Descriptor contains NaN or infinity.
    #[error("Descriptor values must be finite numbers")]
    NonFiniteDescriptor,

    /// Registration with too few or too many captures.
    #[error("Between {min} and {max} face captures are required, got {actual}")]
    InvalidEmbeddingCount {
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
        /// Submitted count.
        actual: usize,
    },

    /// Template label over the column limit.
    #[error("Face capture labels may be at most {max} characters")]
    LabelTooLong {
        /// Upper bound in characters.
        max: usize,
    },

    /// Client reported failed liveness.
    #[error("Liveness check failed. Please blink when prompted")]
    LivenessFailed,

    /// Window closed or wrong method.
    #[error(transparent)]
    Window(#[from] WindowError),

    /// Client address outside the window's network.
    #[error("Face scans for this session are only accepted from {required}")]
    NetworkDenied {
        /// The required network.
        required: String,
    },

    /// Session not found.
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),

    /// Caller not enrolled in the session's class.
    #[error("You are not enrolled in this class")]
    NotEnrolled,

    /// Caller has no templates.
    #[error("Face not registered. Please register your face first")]
    NotRegistered,

    /// Best score below threshold.
    #[error("Face did not match (confidence {}%)", percent(*.score))]
    NoMatch {
        /// Best similarity.
        score: f64,
    },

    /// Non-admin tried to reset someone else.
    #[error("Only admins can reset another user's face data")]
    CrossUserReset,

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Rounds a similarity to a whole percentage.
#[must_use]
pub fn percent(score: f64) -> u8 {
    // Clamped to [0, 100] before the cast.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pct = (score.clamp(0.0, 1.0) * 100.0).round() as u8;
    pct
}

impl FaceError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidDescriptor { .. }
            | Self::NonFiniteDescriptor
            | Self::InvalidEmbeddingCount { .. }
            | Self::LabelTooLong { .. } => 400,
            Self::LivenessFailed
            | Self::NetworkDenied { .. }
            | Self::NotEnrolled
            | Self::NoMatch { .. }
            | Self::CrossUserReset => 403,
            Self::SessionNotFound(_) | Self::NotRegistered => 404,
            Self::Window(e) => e.status_code(),
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDescriptor { .. } | Self::NonFiniteDescriptor => "invalid_descriptor",
            Self::InvalidEmbeddingCount { .. } => "invalid_embedding_count",
            Self::LabelTooLong { .. } => "label_too_long",
            Self::LivenessFailed => "liveness_fail",
            Self::Window(e) => e.error_code(),
            Self::NetworkDenied { .. } => "network_denied",
            Self::SessionNotFound(_) => "session_not_found",
            Self::NotEnrolled => "not_enrolled",
            Self::NotRegistered => "face_not_registered",
            Self::NoMatch { .. } => "no_match",
            Self::CrossUserReset => "forbidden",
            Self::Store(_) => "internal_error",
        }
    }

    /// The rounded match percentage, for mismatches.
    #[must_use]
    pub fn score_percent(&self) -> Option<u8> {
        match self {
            Self::NoMatch { score } => Some(percent(*score)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounds() {
        assert_eq!(percent(0.854), 85);
        assert_eq!(percent(0.856), 86);
        assert_eq!(percent(1.2), 100);
        assert_eq!(percent(-0.1), 0);
    }

    #[test]
    fn test_no_match_carries_score() {
        let err = FaceError::NoMatch { score: 0.42 };
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.score_percent(), Some(42));
        assert_eq!(err.to_string(), "Face did not match (confidence 42%)");
        assert_eq!(FaceError::NotRegistered.score_percent(), None);
    }

    #[test]
    fn test_window_errors_pass_through() {
        let err = FaceError::from(WindowError::Closed);
        assert_eq!(err.status_code(), 410);
        assert_eq!(err.error_code(), "window_closed");
    }
}
