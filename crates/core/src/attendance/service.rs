//! Attendance record store service.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use classiq_shared::types::{SessionId, UserId};

use super::error::AttendanceError;
use super::types::{
    AttendanceMark, AttendanceRecord, AttendanceStatus, BulkEntry, BulkOutcome, MarkedBy,
    RequestMeta,
};
use crate::auth::{Principal, Role};
use crate::enrollment::EnrollmentDirectory;
use crate::session::SessionRepository;
use crate::store::{StoreError, Stores};

/// Repository trait for attendance records.
pub trait AttendanceRepository: Send + Sync {
    /// Inserts the record or, on `(session_id, student_id)` conflict,
    /// overwrites status, channel, timestamp and metadata.
    fn upsert(
        &self,
        mark: AttendanceMark,
    ) -> impl Future<Output = Result<AttendanceRecord, StoreError>> + Send;

    /// Upserts a roster. Existing rows whose status is unchanged keep their
    /// `marked_by` and `marked_at`. Returns the number of rows inserted or
    /// changed.
    fn upsert_bulk(
        &self,
        session_id: SessionId,
        entries: Vec<BulkEntry>,
        marked_by: MarkedBy,
        marked_at: DateTime<Utc>,
        meta: RequestMeta,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Number of records for the session.
    fn count_for_session(
        &self,
        session_id: SessionId,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// All records for the session.
    fn list_for_session(
        &self,
        session_id: SessionId,
    ) -> impl Future<Output = Result<Vec<AttendanceRecord>, StoreError>> + Send;
}

/// Records `present` for a verified student. Shared by both verification paths.
///
/// # Errors
///
/// Returns a store error if the upsert fails.
pub async fn mark_present<R: AttendanceRepository>(
    records: &R,
    session_id: SessionId,
    student_id: UserId,
    marked_by: MarkedBy,
    meta: RequestMeta,
    now: DateTime<Utc>,
) -> Result<AttendanceRecord, StoreError> {
    records
        .upsert(AttendanceMark {
            session_id,
            student_id,
            status: AttendanceStatus::Present,
            marked_by,
            marked_at: now,
            meta,
        })
        .await
}

/// Manual marking and record listing.
pub struct AttendanceService<R: Stores> {
    stores: Arc<R>,
}

impl<R: Stores> AttendanceService<R> {
    /// Creates a new attendance service.
    #[must_use]
    pub fn new(stores: Arc<R>) -> Self {
        Self { stores }
    }

    /// Applies a faculty roster as manual marks.
    ///
    /// # Errors
    ///
    /// `EmptyRoster` or `DuplicateStudent` before any store access;
    /// `SessionNotFound`, `Forbidden` for non-owners, or
    /// `StudentNotEnrolled` for a roster line outside the class.
    pub async fn mark_bulk(
        &self,
        principal: Principal,
        session_id: SessionId,
        entries: Vec<BulkEntry>,
        meta: RequestMeta,
        now: DateTime<Utc>,
    ) -> Result<BulkOutcome, AttendanceError> {
        if entries.is_empty() {
            return Err(AttendanceError::EmptyRoster);
        }
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.student_id) {
                return Err(AttendanceError::DuplicateStudent(entry.student_id));
            }
        }

        let ctx = self
            .stores
            .sessions()
            .find_by_id(session_id)
            .await?
            .ok_or(AttendanceError::SessionNotFound(session_id))?;
        if !principal.manages(ctx.class.faculty_id) {
            return Err(AttendanceError::Forbidden);
        }

        for entry in &entries {
            let enrolled = self
                .stores
                .enrollment()
                .is_enrolled(ctx.class.id, entry.student_id)
                .await?;
            if !enrolled {
                return Err(AttendanceError::StudentNotEnrolled(entry.student_id));
            }
        }

        let submitted = entries.len();
        let changed = self
            .stores
            .records()
            .upsert_bulk(session_id, entries, MarkedBy::Manual, now, meta)
            .await?;

        Ok(BulkOutcome { submitted, changed })
    }

    /// Lists records for a session. Faculty of the class and admins see the
    /// whole roster; an enrolled student sees only their own record.
    ///
    /// # Errors
    ///
    /// `SessionNotFound`, or `Forbidden` for anyone else.
    pub async fn list(
        &self,
        principal: Principal,
        session_id: SessionId,
    ) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        let ctx = self
            .stores
            .sessions()
            .find_by_id(session_id)
            .await?
            .ok_or(AttendanceError::SessionNotFound(session_id))?;

        if principal.manages(ctx.class.faculty_id) {
            return Ok(self.stores.records().list_for_session(session_id).await?);
        }
        let own_class = principal.role == Role::Student
            && self
                .stores
                .enrollment()
                .is_enrolled(ctx.class.id, principal.id)
                .await?;
        if own_class {
            let records = self.stores.records().list_for_session(session_id).await?;
            return Ok(records
                .into_iter()
                .filter(|r| r.student_id == principal.id)
                .collect());
        }
        Err(AttendanceError::Forbidden)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
