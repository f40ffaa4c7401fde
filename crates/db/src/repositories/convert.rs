//! Row ↔ engine type conversions.

use chrono::{DateTime, Utc, Weekday};
use classiq_core::StoreError;
use classiq_core::attendance::{AttendanceRecord, AttendanceStatus, MarkedBy, RequestMeta};
use classiq_core::face::{Descriptor, FaceEmbedding, ScanResult};
use classiq_core::qr::QrToken;
use classiq_core::session::{ClassSchedule, ClassSession, SessionStatus};
use classiq_core::window::{AttendanceWindow, WindowMethod};
use classiq_shared::types::{
    ClassId, EmbeddingId, QrTokenId, RecordId, SessionId, UserId, WindowId,
};
use sea_orm::DbErr;
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::entities::sea_orm_active_enums as db;
use crate::entities::{
    attendance_records, attendance_windows, class_sessions, classes, face_embeddings, qr_tokens,
};

pub(crate) fn store_err(e: DbErr) -> StoreError {
    tracing::error!(error = %e, "database operation failed");
    StoreError::new(e.to_string())
}

pub(crate) fn utc(at: DateTimeWithTimeZone) -> DateTime<Utc> {
    at.with_timezone(&Utc)
}

/// Spelling stored in `classes.day_of_week`.
pub(crate) const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

pub(crate) fn meta_columns(meta: &RequestMeta) -> (Option<String>, Option<String>) {
    (meta.ip.map(|ip| ip.to_string()), meta.device.clone())
}

fn meta_from_columns(ip: Option<&str>, device: Option<String>) -> RequestMeta {
    RequestMeta {
        ip: ip.and_then(|ip| ip.parse().ok()),
        device,
    }
}

impl From<SessionStatus> for db::SessionStatus {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Scheduled => Self::Scheduled,
            SessionStatus::Ongoing => Self::Ongoing,
            SessionStatus::Completed => Self::Completed,
        }
    }
}

impl From<db::SessionStatus> for SessionStatus {
    fn from(status: db::SessionStatus) -> Self {
        match status {
            db::SessionStatus::Scheduled => Self::Scheduled,
            db::SessionStatus::Ongoing => Self::Ongoing,
            db::SessionStatus::Completed => Self::Completed,
        }
    }
}

impl From<WindowMethod> for db::WindowMethod {
    fn from(method: WindowMethod) -> Self {
        match method {
            WindowMethod::Face => Self::Face,
            WindowMethod::Qr => Self::Qr,
            WindowMethod::Both => Self::Both,
        }
    }
}

impl From<db::WindowMethod> for WindowMethod {
    fn from(method: db::WindowMethod) -> Self {
        match method {
            db::WindowMethod::Face => Self::Face,
            db::WindowMethod::Qr => Self::Qr,
            db::WindowMethod::Both => Self::Both,
        }
    }
}

impl From<ScanResult> for db::ScanResult {
    fn from(result: ScanResult) -> Self {
        match result {
            ScanResult::Success => Self::Success,
            ScanResult::NoMatch => Self::NoMatch,
            ScanResult::LivenessFail => Self::LivenessFail,
            ScanResult::Error => Self::Error,
        }
    }
}

impl From<AttendanceStatus> for db::AttendanceStatus {
    fn from(status: AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::Present => Self::Present,
            AttendanceStatus::Absent => Self::Absent,
            AttendanceStatus::Late => Self::Late,
            AttendanceStatus::Excused => Self::Excused,
        }
    }
}

impl From<db::AttendanceStatus> for AttendanceStatus {
    fn from(status: db::AttendanceStatus) -> Self {
        match status {
            db::AttendanceStatus::Present => Self::Present,
            db::AttendanceStatus::Absent => Self::Absent,
            db::AttendanceStatus::Late => Self::Late,
            db::AttendanceStatus::Excused => Self::Excused,
        }
    }
}

impl From<MarkedBy> for db::MarkedBy {
    fn from(marked_by: MarkedBy) -> Self {
        match marked_by {
            MarkedBy::Manual => Self::Manual,
            MarkedBy::Qr => Self::Qr,
            MarkedBy::Facial => Self::Facial,
        }
    }
}

impl From<db::MarkedBy> for MarkedBy {
    fn from(marked_by: db::MarkedBy) -> Self {
        match marked_by {
            db::MarkedBy::Manual => Self::Manual,
            db::MarkedBy::Qr => Self::Qr,
            db::MarkedBy::Facial => Self::Facial,
        }
    }
}

impl From<classes::Model> for ClassSchedule {
    fn from(m: classes::Model) -> Self {
        Self {
            id: ClassId::from_uuid(m.id),
            faculty_id: UserId::from_uuid(m.faculty_id),
            name: m.name,
            day_of_week: m.day_of_week.as_deref().and_then(|d| d.parse().ok()),
            start_time: m.start_time,
            end_time: m.end_time,
        }
    }
}

impl From<class_sessions::Model> for ClassSession {
    fn from(m: class_sessions::Model) -> Self {
        Self {
            id: SessionId::from_uuid(m.id),
            class_id: ClassId::from_uuid(m.class_id),
            session_date: m.session_date,
            topic: m.topic,
            status: m.status.into(),
        }
    }
}

impl From<attendance_windows::Model> for AttendanceWindow {
    fn from(m: attendance_windows::Model) -> Self {
        Self {
            id: WindowId::from_uuid(m.id),
            session_id: SessionId::from_uuid(m.session_id),
            opened_by: UserId::from_uuid(m.opened_by),
            method: m.method.into(),
            opens_at: utc(m.opens_at),
            closes_at: m.closes_at.map(utc),
            is_active: m.is_active,
            allowed_network: m.allowed_network,
        }
    }
}

impl From<qr_tokens::Model> for QrToken {
    fn from(m: qr_tokens::Model) -> Self {
        Self {
            id: QrTokenId::from_uuid(m.id),
            session_id: SessionId::from_uuid(m.session_id),
            token: m.token,
            expires_at: utc(m.expires_at),
            is_active: m.is_active,
        }
    }
}

impl From<attendance_records::Model> for AttendanceRecord {
    fn from(m: attendance_records::Model) -> Self {
        Self {
            id: RecordId::from_uuid(m.id),
            session_id: SessionId::from_uuid(m.session_id),
            student_id: UserId::from_uuid(m.student_id),
            status: m.status.into(),
            marked_by: m.marked_by.into(),
            marked_at: utc(m.marked_at),
            meta: meta_from_columns(m.ip_address.as_deref(), m.device_info),
        }
    }
}

impl TryFrom<face_embeddings::Model> for FaceEmbedding {
    type Error = StoreError;

    fn try_from(m: face_embeddings::Model) -> Result<Self, Self::Error> {
        let descriptor: Descriptor = serde_json::from_value(m.descriptor)
            .map_err(|e| StoreError::new(format!("corrupt descriptor {}: {e}", m.id)))?;
        Ok(Self {
            id: EmbeddingId::from_uuid(m.id),
            user_id: UserId::from_uuid(m.user_id),
            descriptor,
            label: m.label,
            is_primary: m.is_primary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_names_parse_back() {
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            assert_eq!(weekday_name(day).parse::<Weekday>().ok(), Some(day));
        }
    }

    #[test]
    fn test_meta_columns_roundtrip_ip() {
        let meta = RequestMeta {
            ip: Some("10.1.2.3".parse().unwrap()),
            device: Some("curl/8".into()),
        };
        let (ip, device) = meta_columns(&meta);
        assert_eq!(ip.as_deref(), Some("10.1.2.3"));
        assert_eq!(meta_from_columns(ip.as_deref(), device), meta);
    }

    #[test]
    fn test_unparseable_ip_column_is_dropped() {
        let meta = meta_from_columns(Some("unknown"), None);
        assert!(meta.ip.is_none());
    }
}
