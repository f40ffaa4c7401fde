//! Window domain types.

use chrono::{DateTime, Utc};
use classiq_shared::types::{SessionId, UserId, WindowId};
use serde::{Deserialize, Serialize};

/// Longest timed window, one day.
pub const MAX_WINDOW_MINUTES: i64 = 24 * 60;

/// Methods a window accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMethod {
    /// Face verification only.
    Face,
    /// QR tokens only.
    Qr,
    /// Either.
    Both,
}

impl WindowMethod {
    /// Whether a submission via `method` is allowed.
    #[must_use]
    pub const fn accepts(self, method: VerificationMethod) -> bool {
        matches!(
            (self, method),
            (Self::Both, _)
                | (Self::Face, VerificationMethod::Face)
                | (Self::Qr, VerificationMethod::Qr)
        )
    }
}

impl std::fmt::Display for WindowMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Face => write!(f, "face"),
            Self::Qr => write!(f, "qr"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// The channel a marking attempt arrives through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationMethod {
    /// Face descriptor.
    Face,
    /// QR token.
    Qr,
}

/// A stored window row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceWindow {
    /// Window ID.
    pub id: WindowId,
    /// Session the window belongs to.
    pub session_id: SessionId,
    /// Who opened it.
    pub opened_by: UserId,
    /// Accepted methods.
    pub method: WindowMethod,
    /// When it opened.
    pub opens_at: DateTime<Utc>,
    /// When it closes; `None` means manual close only.
    pub closes_at: Option<DateTime<Utc>>,
    /// Stored flag. Not enough on its own: see [`AttendanceWindow::is_open_at`].
    pub is_active: bool,
    /// Optional CIDR or address restricting face scans.
    pub allowed_network: Option<String>,
}

impl AttendanceWindow {
    /// Active and not past `closes_at`.
    #[must_use]
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.closes_at.is_none_or(|closes| closes > now)
    }
}

/// Input for inserting a window.
#[derive(Debug, Clone)]
pub struct NewWindow {
    /// Session.
    pub session_id: SessionId,
    /// Opener.
    pub opened_by: UserId,
    /// Accepted methods.
    pub method: WindowMethod,
    /// Open instant.
    pub opens_at: DateTime<Utc>,
    /// Close instant, if timed.
    pub closes_at: Option<DateTime<Utc>>,
    /// Network restriction.
    pub allowed_network: Option<String>,
}

/// Request to open a window.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenWindowInput {
    /// Session to open for.
    pub session_id: SessionId,
    /// Accepted methods.
    pub method: WindowMethod,
    /// Minutes until automatic close; absent or non-positive means manual.
    /// At most [`MAX_WINDOW_MINUTES`].
    pub duration_minutes: Option<i64>,
    /// Network restriction for face scans.
    pub allowed_network: Option<String>,
}

/// Faculty-facing window state with progress counters.
#[derive(Debug, Clone, Serialize)]
pub struct WindowStatus {
    /// Whether a window is open right now.
    pub active: bool,
    /// The open window, if any.
    pub window: Option<AttendanceWindow>,
    /// Students with a record for the session.
    pub marked: u64,
    /// Students enrolled in the class.
    pub total_students: u64,
}
