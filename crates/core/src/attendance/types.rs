//! Attendance record types.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use classiq_shared::types::{RecordId, SessionId, UserId};
use serde::{Deserialize, Serialize};

/// Longest stored user agent, in characters.
pub const MAX_DEVICE_LEN: usize = 255;

/// Attendance outcome for a student in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Attended.
    Present,
    /// Did not attend.
    Absent,
    /// Attended late.
    Late,
    /// Absence excused.
    Excused,
}

/// Which channel made the latest write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkedBy {
    /// Faculty roster.
    Manual,
    /// QR token scan.
    Qr,
    /// Face verification.
    Facial,
}

impl std::fmt::Display for MarkedBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Qr => write!(f, "qr"),
            Self::Facial => write!(f, "facial"),
        }
    }
}

/// Where a request came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestMeta {
    /// Client address.
    pub ip: Option<IpAddr>,
    /// User agent, at most [`MAX_DEVICE_LEN`] characters.
    pub device: Option<String>,
}

impl RequestMeta {
    /// Builds request metadata, truncating the user agent to the stored width.
    #[must_use]
    pub fn new(ip: Option<IpAddr>, device: Option<&str>) -> Self {
        Self {
            ip,
            device: device.map(|agent| agent.chars().take(MAX_DEVICE_LEN).collect()),
        }
    }
}

/// One write to the record store.
#[derive(Debug, Clone)]
pub struct AttendanceMark {
    /// Session.
    pub session_id: SessionId,
    /// Student.
    pub student_id: UserId,
    /// New status.
    pub status: AttendanceStatus,
    /// Channel.
    pub marked_by: MarkedBy,
    /// Write instant.
    pub marked_at: DateTime<Utc>,
    /// Request metadata.
    pub meta: RequestMeta,
}

/// A stored attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    /// Record ID.
    pub id: RecordId,
    /// Session.
    pub session_id: SessionId,
    /// Student.
    pub student_id: UserId,
    /// Current status.
    pub status: AttendanceStatus,
    /// Channel of the latest write.
    pub marked_by: MarkedBy,
    /// Instant of the latest write.
    pub marked_at: DateTime<Utc>,
    /// Metadata of the latest write.
    pub meta: RequestMeta,
}

/// One roster line in a manual bulk mark.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BulkEntry {
    /// Student.
    pub student_id: UserId,
    /// Status to record.
    pub status: AttendanceStatus,
}

/// Result of a bulk mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    /// Entries submitted.
    pub submitted: usize,
    /// Records inserted or whose status changed.
    pub changed: u64,
}
