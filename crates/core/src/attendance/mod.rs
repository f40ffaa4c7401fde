//! Attendance record store.
//!
//! The single sink both verification paths and manual marking write to.
//! Exactly one record exists per `(session_id, student_id)`; later writes
//! overwrite earlier ones.

mod error;
mod service;
mod types;

#[cfg(test)]
mod service_props;

pub use error::AttendanceError;
pub use service::{AttendanceRepository, AttendanceService, mark_present};
pub use types::{
    AttendanceMark, AttendanceRecord, AttendanceStatus, BulkEntry, BulkOutcome, MAX_DEVICE_LEN,
    MarkedBy, RequestMeta,
};
