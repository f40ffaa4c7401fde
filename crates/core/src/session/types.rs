//! Session domain types.

use chrono::{NaiveDate, NaiveTime, Weekday};
use classiq_shared::types::{ClassId, SessionId, UserId};
use serde::{Deserialize, Serialize};

/// Stored or computed status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Not started yet (or a later date).
    Scheduled,
    /// Inside the class hours today.
    Ongoing,
    /// Past the class hours or an earlier date.
    Completed,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Ongoing => write!(f, "ongoing"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// The recurring class a session belongs to, as far as the engine needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSchedule {
    /// Class ID.
    pub id: ClassId,
    /// Faculty member teaching the class.
    pub faculty_id: UserId,
    /// Display name.
    pub name: String,
    /// Weekday the class meets on, if fixed.
    pub day_of_week: Option<Weekday>,
    /// Start of class hours, local time.
    pub start_time: Option<NaiveTime>,
    /// End of class hours, local time.
    pub end_time: Option<NaiveTime>,
}

impl ClassSchedule {
    /// Start of class hours, defaulting to midnight.
    #[must_use]
    pub fn starts_at(&self) -> NaiveTime {
        self.start_time.unwrap_or(NaiveTime::MIN)
    }

    /// End of class hours, defaulting to 23:59.
    #[must_use]
    pub fn ends_at(&self) -> NaiveTime {
        self.end_time
            .or_else(|| NaiveTime::from_hms_opt(23, 59, 0))
            .unwrap_or(NaiveTime::MIN)
    }
}

/// A stored session row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSession {
    /// Session ID.
    pub id: SessionId,
    /// Owning class.
    pub class_id: ClassId,
    /// Calendar date in institution time.
    pub session_date: NaiveDate,
    /// Optional topic set by faculty.
    pub topic: Option<String>,
    /// Advisory status as stored.
    pub status: SessionStatus,
}

/// Input for the insert-ignore create.
#[derive(Debug, Clone)]
pub struct NewSession {
    /// Owning class.
    pub class_id: ClassId,
    /// Calendar date.
    pub session_date: NaiveDate,
    /// Optional topic.
    pub topic: Option<String>,
    /// Status to store if the row is new.
    pub status: SessionStatus,
}

/// A session joined with its class.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// The session.
    pub session: ClassSession,
    /// Its class.
    pub class: ClassSchedule,
}

/// A session with its status recomputed for the current instant.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    /// The session.
    #[serde(flatten)]
    pub session: ClassSession,
    /// Its class.
    pub class: ClassSchedule,
    /// Status derived from the schedule and the clock.
    pub computed_status: SessionStatus,
}
