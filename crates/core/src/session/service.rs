//! Session lifecycle service.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use classiq_shared::types::{ClassId, SessionId};

use super::clock::InstitutionClock;
use super::error::SessionError;
use super::status::compute_status;
use super::types::{
    ClassSchedule, ClassSession, NewSession, SessionContext, SessionStatus, SessionView,
};
use crate::auth::{Principal, Role};
use crate::enrollment::EnrollmentDirectory;
use crate::store::{StoreError, Stores};

/// Repository trait for session persistence.
pub trait SessionRepository: Send + Sync {
    /// Finds a class by ID.
    fn find_class(
        &self,
        class_id: ClassId,
    ) -> impl Future<Output = Result<Option<ClassSchedule>, StoreError>> + Send;

    /// Classes meeting on `day` that are visible to the principal: taught
    /// classes for faculty, enrolled classes for students, all for admins.
    fn classes_on(
        &self,
        principal: Principal,
        day: Weekday,
    ) -> impl Future<Output = Result<Vec<ClassSchedule>, StoreError>> + Send;

    /// Inserts the session unless `(class_id, session_date)` already exists,
    /// then returns the stored row. Safe under concurrent callers.
    fn insert_ignore(
        &self,
        session: NewSession,
    ) -> impl Future<Output = Result<ClassSession, StoreError>> + Send;

    /// Finds a session together with its class.
    fn find_by_id(
        &self,
        session_id: SessionId,
    ) -> impl Future<Output = Result<Option<SessionContext>, StoreError>> + Send;
}

/// Session lifecycle manager.
pub struct SessionService<R: Stores> {
    stores: Arc<R>,
    clock: InstitutionClock,
}

impl<R: Stores> SessionService<R> {
    /// Creates a new session service.
    #[must_use]
    pub fn new(stores: Arc<R>, clock: InstitutionClock) -> Self {
        Self { stores, clock }
    }

    fn view(&self, session: ClassSession, class: ClassSchedule, now: DateTime<Utc>) -> SessionView {
        let computed_status = compute_status(
            session.session_date,
            class.starts_at(),
            class.ends_at(),
            self.clock.local(now),
        );
        SessionView {
            session,
            class,
            computed_status,
        }
    }

    async fn may_view(&self, principal: Principal, class: &ClassSchedule) -> Result<bool, StoreError> {
        if principal.manages(class.faculty_id) {
            return Ok(true);
        }
        if principal.role == Role::Student {
            return self
                .stores
                .enrollment()
                .is_enrolled(class.id, principal.id)
                .await;
        }
        Ok(false)
    }

    /// Get-or-create today's session for a class.
    ///
    /// # Errors
    ///
    /// Returns `ClassNotFound` for unknown classes and `Forbidden` when the
    /// caller neither runs nor attends the class.
    pub async fn ensure_today(
        &self,
        principal: Principal,
        class_id: ClassId,
        now: DateTime<Utc>,
    ) -> Result<SessionView, SessionError> {
        let class = self
            .stores
            .sessions()
            .find_class(class_id)
            .await?
            .ok_or(SessionError::ClassNotFound(class_id))?;

        if !self.may_view(principal, &class).await? {
            return Err(SessionError::Forbidden);
        }

        let session = self
            .stores
            .sessions()
            .insert_ignore(NewSession {
                class_id,
                session_date: self.clock.today(now),
                topic: None,
                status: SessionStatus::Scheduled,
            })
            .await?;

        Ok(self.view(session, class, now))
    }

    /// Explicitly starts a session (default: today). Returns the existing row
    /// if one is already stored for that date.
    ///
    /// # Errors
    ///
    /// Returns `ClassNotFound` for unknown classes and `Forbidden` unless the
    /// caller teaches the class or is an admin.
    pub async fn start(
        &self,
        principal: Principal,
        class_id: ClassId,
        date: Option<NaiveDate>,
        topic: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<SessionView, SessionError> {
        let class = self
            .stores
            .sessions()
            .find_class(class_id)
            .await?
            .ok_or(SessionError::ClassNotFound(class_id))?;

        if !principal.manages(class.faculty_id) {
            return Err(SessionError::Forbidden);
        }

        let session = self
            .stores
            .sessions()
            .insert_ignore(NewSession {
                class_id,
                session_date: date.unwrap_or_else(|| self.clock.today(now)),
                topic: topic.filter(|t| !t.trim().is_empty()),
                status: SessionStatus::Ongoing,
            })
            .await?;

        Ok(self.view(session, class, now))
    }

    /// Fetches a session with its computed status.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` for unknown sessions.
    pub async fn get(
        &self,
        session_id: SessionId,
        now: DateTime<Utc>,
    ) -> Result<SessionView, SessionError> {
        let ctx = self
            .stores
            .sessions()
            .find_by_id(session_id)
            .await?
            .ok_or(SessionError::SessionNotFound(session_id))?;

        Ok(self.view(ctx.session, ctx.class, now))
    }

    /// Ensures and lists today's sessions for every class the principal
    /// sees on the current local weekday, ordered by start time.
    ///
    /// # Errors
    ///
    /// Returns a store error if any lookup or insert fails.
    pub async fn today_for(
        &self,
        principal: Principal,
        now: DateTime<Utc>,
    ) -> Result<Vec<SessionView>, SessionError> {
        let today = self.clock.today(now);
        let mut classes = self
            .stores
            .sessions()
            .classes_on(principal, today.weekday())
            .await?;
        classes.sort_by_key(ClassSchedule::starts_at);

        let mut views = Vec::with_capacity(classes.len());
        for class in classes {
            let session = self
                .stores
                .sessions()
                .insert_ignore(NewSession {
                    class_id: class.id,
                    session_date: today,
                    topic: None,
                    status: SessionStatus::Scheduled,
                })
                .await?;
            views.push(self.view(session, class, now));
        }
        Ok(views)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
