//! Window controller service.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use classiq_shared::types::SessionId;

use super::error::WindowError;
use super::types::{
    AttendanceWindow, MAX_WINDOW_MINUTES, NewWindow, OpenWindowInput, WindowStatus,
};
use crate::attendance::AttendanceRepository;
use crate::auth::Principal;
use crate::enrollment::EnrollmentDirectory;
use crate::network::parse_network;
use crate::session::SessionRepository;
use crate::store::{StoreError, Stores};

/// Repository trait for window persistence.
pub trait WindowRepository: Send + Sync {
    /// Atomically deactivates every active window of the session and inserts
    /// the new one as the only active window.
    fn replace_active(
        &self,
        window: NewWindow,
    ) -> impl Future<Output = Result<AttendanceWindow, StoreError>> + Send;

    /// Deactivates the active window, stamping `closes_at = at`.
    /// Returns the closed window, or `None` if none was active.
    fn close_active(
        &self,
        session_id: SessionId,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<AttendanceWindow>, StoreError>> + Send;

    /// The row with `is_active = true`, if any. Expiry is not applied here.
    fn find_active(
        &self,
        session_id: SessionId,
    ) -> impl Future<Output = Result<Option<AttendanceWindow>, StoreError>> + Send;
}

/// Attendance window controller.
pub struct WindowService<R: Stores> {
    stores: Arc<R>,
}

impl<R: Stores> WindowService<R> {
    /// Creates a new window service.
    #[must_use]
    pub fn new(stores: Arc<R>) -> Self {
        Self { stores }
    }

    async fn authorize(&self, principal: Principal, session_id: SessionId) -> Result<(), WindowError> {
        let ctx = self
            .stores
            .sessions()
            .find_by_id(session_id)
            .await?
            .ok_or(WindowError::SessionNotFound(session_id))?;

        if !principal.manages(ctx.class.faculty_id) {
            return Err(WindowError::NotOwner);
        }
        Ok(())
    }

    /// Opens a window, superseding any active one.
    ///
    /// # Errors
    ///
    /// `InvalidDuration` past [`MAX_WINDOW_MINUTES`], `InvalidNetwork` for an
    /// unparsable restriction, `SessionNotFound`, or `NotOwner` when the
    /// caller does not teach the class.
    pub async fn open(
        &self,
        principal: Principal,
        input: OpenWindowInput,
        now: DateTime<Utc>,
    ) -> Result<AttendanceWindow, WindowError> {
        let too_long = WindowError::InvalidDuration {
            max: MAX_WINDOW_MINUTES,
        };
        let closes_at = match input.duration_minutes.filter(|m| *m > 0) {
            None => None,
            Some(m) if m > MAX_WINDOW_MINUTES => return Err(too_long),
            Some(m) => Some(
                Duration::try_minutes(m)
                    .and_then(|d| now.checked_add_signed(d))
                    .ok_or(too_long)?,
            ),
        };

        let allowed_network = match input.allowed_network.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                parse_network(raw).map_err(|_| WindowError::InvalidNetwork(raw.to_string()))?;
                Some(raw.to_string())
            }
        };

        self.authorize(principal, input.session_id).await?;

        let window = self
            .stores
            .windows()
            .replace_active(NewWindow {
                session_id: input.session_id,
                opened_by: principal.id,
                method: input.method,
                opens_at: now,
                closes_at,
                allowed_network,
            })
            .await?;

        Ok(window)
    }

    /// Closes the active window.
    ///
    /// # Errors
    ///
    /// `SessionNotFound`, `NotOwner`, or `NoActiveWindow`.
    pub async fn close(
        &self,
        principal: Principal,
        session_id: SessionId,
        now: DateTime<Utc>,
    ) -> Result<AttendanceWindow, WindowError> {
        self.authorize(principal, session_id).await?;

        self.stores
            .windows()
            .close_active(session_id, now)
            .await?
            .ok_or(WindowError::NoActiveWindow)
    }

    /// Current window state and marking progress. Lapsed windows report
    /// inactive even while their stored flag is still set.
    ///
    /// # Errors
    ///
    /// Returns a store error only.
    pub async fn status(
        &self,
        session_id: SessionId,
        now: DateTime<Utc>,
    ) -> Result<WindowStatus, WindowError> {
        let window = self
            .stores
            .windows()
            .find_active(session_id)
            .await?
            .filter(|w| w.is_open_at(now));

        let marked = self.stores.records().count_for_session(session_id).await?;
        let total_students = match self.stores.sessions().find_by_id(session_id).await? {
            Some(ctx) => self.stores.enrollment().count_enrolled(ctx.class.id).await?,
            None => 0,
        };

        Ok(WindowStatus {
            active: window.is_some(),
            window,
            marked,
            total_students,
        })
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
