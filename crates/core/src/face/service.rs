//! Face verification service.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use classiq_shared::types::{SessionId, UserId};

use super::error::FaceError;
use super::matcher::best_score;
use super::types::{
    Descriptor, EmbeddingInput, FaceEmbedding, FaceStatus, MAX_EMBEDDINGS, MAX_LABEL_LEN,
    MIN_EMBEDDINGS, NewEmbedding, NewScanLog, ScanResult, Verification, VerifyInput,
};
use crate::attendance::{MarkedBy, RequestMeta, mark_present};
use crate::auth::Principal;
use crate::enrollment::EnrollmentDirectory;
use crate::network::{NetworkPolicy, parse_network};
use crate::session::SessionRepository;
use crate::store::{StoreError, Stores};
use crate::window::{VerificationMethod, WindowRepository, require_open};

/// Repository trait for face templates.
pub trait EmbeddingRepository: Send + Sync {
    /// Replaces the user's whole template set in one transaction.
    /// Returns the number of templates stored.
    fn replace_all(
        &self,
        user_id: UserId,
        embeddings: Vec<NewEmbedding>,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// All templates of the user.
    fn list_for_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<FaceEmbedding>, StoreError>> + Send;

    /// Number of templates of the user.
    fn count_for_user(&self, user_id: UserId)
    -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Deletes all templates of the user. Returns the number removed.
    fn delete_for_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;
}

/// Append-only audit log of verification attempts.
pub trait ScanLogRepository: Send + Sync {
    /// Appends one row.
    fn append(&self, entry: NewScanLog) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Matching configuration.
#[derive(Debug, Clone)]
pub struct FaceSettings {
    /// Minimum best-of-N similarity accepted as a match.
    pub match_threshold: f64,
    /// Institution-wide allow-list; empty admits every client.
    pub allowed_networks: NetworkPolicy,
}

impl Default for FaceSettings {
    fn default() -> Self {
        Self {
            match_threshold: 0.6,
            allowed_networks: NetworkPolicy::default(),
        }
    }
}

/// Face verification engine.
pub struct FaceService<R: Stores> {
    stores: Arc<R>,
    settings: FaceSettings,
}

impl<R: Stores> FaceService<R> {
    /// Creates a new face service.
    #[must_use]
    pub fn new(stores: Arc<R>, settings: FaceSettings) -> Self {
        Self { stores, settings }
    }

    /// Replaces the caller's templates with a new capture set.
    ///
    /// # Errors
    ///
    /// `InvalidEmbeddingCount`, `InvalidDescriptor` or `LabelTooLong` before
    /// any store access.
    pub async fn register(
        &self,
        principal: Principal,
        captures: Vec<EmbeddingInput>,
    ) -> Result<u64, FaceError> {
        if !(MIN_EMBEDDINGS..=MAX_EMBEDDINGS).contains(&captures.len()) {
            return Err(FaceError::InvalidEmbeddingCount {
                min: MIN_EMBEDDINGS,
                max: MAX_EMBEDDINGS,
                actual: captures.len(),
            });
        }

        let embeddings = captures
            .into_iter()
            .enumerate()
            .map(|(i, capture)| {
                let label = capture
                    .label
                    .map(|l| l.trim().to_string())
                    .filter(|l| !l.is_empty())
                    .unwrap_or_else(|| format!("capture_{}", i + 1));
                if label.chars().count() > MAX_LABEL_LEN {
                    return Err(FaceError::LabelTooLong { max: MAX_LABEL_LEN });
                }
                Ok(NewEmbedding {
                    descriptor: Descriptor::try_from(capture.descriptor)?,
                    label,
                    photo: capture.photo,
                    is_primary: i == 0,
                })
            })
            .collect::<Result<Vec<_>, FaceError>>()?;

        Ok(self
            .stores
            .embeddings()
            .replace_all(principal.id, embeddings)
            .await?)
    }

    /// Registration state of the caller.
    ///
    /// # Errors
    ///
    /// Returns a store error only.
    pub async fn status(&self, principal: Principal) -> Result<FaceStatus, FaceError> {
        let count = self.stores.embeddings().count_for_user(principal.id).await?;
        Ok(FaceStatus {
            registered: count > 0,
            count,
        })
    }

    /// Deletes templates of the caller, or of `target` when the caller is an
    /// admin. Returns the number removed.
    ///
    /// # Errors
    ///
    /// `CrossUserReset` when a non-admin names another user.
    pub async fn reset(
        &self,
        principal: Principal,
        target: Option<UserId>,
    ) -> Result<u64, FaceError> {
        let user_id = target.unwrap_or(principal.id);
        if user_id != principal.id && !principal.is_admin() {
            return Err(FaceError::CrossUserReset);
        }
        Ok(self.stores.embeddings().delete_for_user(user_id).await?)
    }

    /// Verifies the caller's face for a session and marks them present.
    ///
    /// Preconditions fail fast in order: descriptor shape, liveness, global
    /// network, window, window network, session, enrollment, registration,
    /// match. Every attempt past the shape check appends exactly one scan log
    /// row, written before the attendance record.
    ///
    /// # Errors
    ///
    /// The first failing precondition.
    pub async fn verify(
        &self,
        principal: Principal,
        input: VerifyInput,
        meta: RequestMeta,
        now: DateTime<Utc>,
    ) -> Result<Verification, FaceError> {
        let probe = Descriptor::try_from(input.descriptor)?;

        let outcome = if input.liveness_passed {
            self.check(principal, &probe, input.session_id, &meta, now)
                .await
        } else {
            Err(FaceError::LivenessFailed)
        };

        let (match_score, result) = match &outcome {
            Ok(score) => (*score, ScanResult::Success),
            Err(FaceError::NoMatch { score }) => (*score, ScanResult::NoMatch),
            Err(FaceError::LivenessFailed) => (0.0, ScanResult::LivenessFail),
            Err(_) => (0.0, ScanResult::Error),
        };

        self.stores
            .scan_logs()
            .append(NewScanLog {
                user_id: principal.id,
                session_id: input.session_id,
                match_score,
                liveness_passed: input.liveness_passed,
                result,
                meta: meta.clone(),
                scan_photo: input.scan_photo,
                scanned_at: now,
            })
            .await?;

        let score = outcome?;
        let record = mark_present(
            self.stores.records(),
            input.session_id,
            principal.id,
            MarkedBy::Facial,
            meta,
            now,
        )
        .await?;
        Ok(Verification { score, record })
    }

    /// Steps after liveness; returns the best score on a match.
    async fn check(
        &self,
        principal: Principal,
        probe: &Descriptor,
        session_id: SessionId,
        meta: &RequestMeta,
        now: DateTime<Utc>,
    ) -> Result<f64, FaceError> {
        let global = &self.settings.allowed_networks;
        if !global.allows(meta.ip) {
            return Err(FaceError::NetworkDenied {
                required: global.networks().join(", "),
            });
        }

        let window = self.stores.windows().find_active(session_id).await?;
        let window = require_open(window, VerificationMethod::Face, now)?;

        if let Some(required) = window.allowed_network.as_deref() {
            let admitted = parse_network(required)
                .map(NetworkPolicy::single)
                .is_ok_and(|policy| policy.allows(meta.ip));
            if !admitted {
                return Err(FaceError::NetworkDenied {
                    required: required.to_string(),
                });
            }
        }

        let ctx = self
            .stores
            .sessions()
            .find_by_id(session_id)
            .await?
            .ok_or(FaceError::SessionNotFound(session_id))?;

        let enrolled = self
            .stores
            .enrollment()
            .is_enrolled(ctx.class.id, principal.id)
            .await?;
        if !enrolled {
            return Err(FaceError::NotEnrolled);
        }

        let stored = self.stores.embeddings().list_for_user(principal.id).await?;
        if stored.is_empty() {
            return Err(FaceError::NotRegistered);
        }

        let score = best_score(probe, stored.iter().map(|e| &e.descriptor));
        if score < self.settings.match_threshold {
            return Err(FaceError::NoMatch { score });
        }
        Ok(score)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
