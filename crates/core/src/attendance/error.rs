//! Attendance record store errors.

use classiq_shared::types::{SessionId, UserId};
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during record operations.
#[derive(Debug, Error)]
pub enum AttendanceError {
    /// Empty roster.
    #[error("At least one attendance entry is required")]
    EmptyRoster,

    /// The same student appears twice in a roster.
    #[error("Student {0} appears more than once")]
    DuplicateStudent(UserId),

    /// Roster names a student outside the class.
    #[error("Student {0} is not enrolled in this class")]
    StudentNotEnrolled(UserId),

    /// Session not found.
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),

    /// Caller may not read or write these records.
    #[error("Not allowed to access attendance for this session")]
    Forbidden,

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AttendanceError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::EmptyRoster | Self::DuplicateStudent(_) | Self::StudentNotEnrolled(_) => 400,
            Self::Forbidden => 403,
            Self::SessionNotFound(_) => 404,
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyRoster => "empty_roster",
            Self::DuplicateStudent(_) => "duplicate_student",
            Self::StudentNotEnrolled(_) => "student_not_enrolled",
            Self::SessionNotFound(_) => "session_not_found",
            Self::Forbidden => "forbidden",
            Self::Store(_) => "internal_error",
        }
    }
}
