//! QR token service.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use classiq_shared::types::{QrTokenId, SessionId};

use super::error::QrError;
use super::token::generate_token;
use super::types::{IssuedToken, NewQrToken, QrRedemption, QrToken};
use crate::attendance::{MarkedBy, RequestMeta, mark_present};
use crate::auth::Principal;
use crate::enrollment::EnrollmentDirectory;
use crate::session::SessionRepository;
use crate::store::{StoreError, Stores};
use crate::window::{VerificationMethod, WindowRepository, require_open};

/// Repository trait for QR tokens.
pub trait QrTokenRepository: Send + Sync {
    /// Atomically deactivates every token of the session and inserts the new
    /// one.
    fn replace_for_session(
        &self,
        token: NewQrToken,
    ) -> impl Future<Output = Result<QrToken, StoreError>> + Send;

    /// Looks a token up by value regardless of its flag.
    fn find_by_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<QrToken>, StoreError>> + Send;

    /// Clears the active flag.
    fn deactivate(&self, id: QrTokenId) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// The token with `is_active = true` for the session, if any.
    fn find_active_for_session(
        &self,
        session_id: SessionId,
    ) -> impl Future<Output = Result<Option<QrToken>, StoreError>> + Send;
}

/// Token lifetime bounds.
#[derive(Debug, Clone, Copy)]
pub struct QrSettings {
    /// Lifetime used when the request names none.
    pub default_expiry_secs: u32,
    /// Largest accepted lifetime.
    pub max_expiry_secs: u32,
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            default_expiry_secs: 60,
            max_expiry_secs: 3600,
        }
    }
}

/// QR token service.
pub struct QrService<R: Stores> {
    stores: Arc<R>,
    settings: QrSettings,
}

impl<R: Stores> QrService<R> {
    /// Creates a new QR service.
    #[must_use]
    pub fn new(stores: Arc<R>, settings: QrSettings) -> Self {
        Self { stores, settings }
    }

    async fn authorize(&self, principal: Principal, session_id: SessionId) -> Result<(), QrError> {
        let ctx = self
            .stores
            .sessions()
            .find_by_id(session_id)
            .await?
            .ok_or(QrError::SessionNotFound(session_id))?;
        if !principal.manages(ctx.class.faculty_id) {
            return Err(QrError::NotOwner);
        }
        Ok(())
    }

    /// Issues a new token for the session, superseding older ones.
    ///
    /// # Errors
    ///
    /// `InvalidExpiry` before any store access, then `SessionNotFound` or
    /// `NotOwner`.
    pub async fn issue(
        &self,
        principal: Principal,
        session_id: SessionId,
        expiry_seconds: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, QrError> {
        let expiry = expiry_seconds.unwrap_or(self.settings.default_expiry_secs);
        if expiry == 0 || expiry > self.settings.max_expiry_secs {
            return Err(QrError::InvalidExpiry {
                max: self.settings.max_expiry_secs,
            });
        }

        self.authorize(principal, session_id).await?;

        let token = self
            .stores
            .tokens()
            .replace_for_session(NewQrToken {
                session_id,
                token: generate_token(),
                expires_at: now + Duration::seconds(i64::from(expiry)),
            })
            .await?;

        Ok(token.into())
    }

    /// Redeems a token for the calling student.
    ///
    /// The token is not consumed; it stays valid for other students until it
    /// expires or is superseded.
    ///
    /// # Errors
    ///
    /// In order: `MissingToken`, `InvalidToken` (unknown or superseded),
    /// `Expired`, window `Closed`/`WrongMethod`, `SessionNotFound`,
    /// `NotEnrolled`.
    pub async fn redeem(
        &self,
        principal: Principal,
        token: &str,
        meta: RequestMeta,
        now: DateTime<Utc>,
    ) -> Result<QrRedemption, QrError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(QrError::MissingToken);
        }

        let stored = self
            .stores
            .tokens()
            .find_by_token(token)
            .await?
            .ok_or(QrError::InvalidToken)?;

        if stored.is_expired_at(now) {
            if stored.is_active {
                self.stores.tokens().deactivate(stored.id).await?;
            }
            return Err(QrError::Expired);
        }
        if !stored.is_active {
            return Err(QrError::InvalidToken);
        }

        let session_id = stored.session_id;
        let window = self.stores.windows().find_active(session_id).await?;
        require_open(window, VerificationMethod::Qr, now)?;

        let ctx = self
            .stores
            .sessions()
            .find_by_id(session_id)
            .await?
            .ok_or(QrError::SessionNotFound(session_id))?;

        let enrolled = self
            .stores
            .enrollment()
            .is_enrolled(ctx.class.id, principal.id)
            .await?;
        if !enrolled {
            return Err(QrError::NotEnrolled);
        }

        let record = mark_present(
            self.stores.records(),
            session_id,
            principal.id,
            MarkedBy::Qr,
            meta,
            now,
        )
        .await?;

        Ok(QrRedemption { session_id, record })
    }

    /// The live token for a session, so a projector page can resume showing
    /// it without issuing a new one.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` or `NotOwner`.
    pub async fn active(
        &self,
        principal: Principal,
        session_id: SessionId,
        now: DateTime<Utc>,
    ) -> Result<Option<IssuedToken>, QrError> {
        self.authorize(principal, session_id).await?;

        let token = self
            .stores
            .tokens()
            .find_active_for_session(session_id)
            .await?
            .filter(|t| !t.is_expired_at(now));

        Ok(token.map(Into::into))
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
