//! QR token types.

use chrono::{DateTime, Utc};
use classiq_shared::types::{QrTokenId, SessionId};
use serde::Serialize;

use crate::attendance::AttendanceRecord;

/// A stored token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrToken {
    /// Token ID.
    pub id: QrTokenId,
    /// Session the token admits to.
    pub session_id: SessionId,
    /// Bearer value.
    pub token: String,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Stored flag; cleared when superseded or found expired.
    pub is_active: bool,
}

impl QrToken {
    /// Whether the token has lapsed at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Input for inserting a token.
#[derive(Debug, Clone)]
pub struct NewQrToken {
    /// Session.
    pub session_id: SessionId,
    /// Bearer value.
    pub token: String,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}

/// What goes into the QR image: everything a scanner needs without another
/// round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    /// Bearer value.
    pub token: String,
    /// Session.
    pub session_id: SessionId,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}

impl From<QrToken> for IssuedToken {
    fn from(token: QrToken) -> Self {
        Self {
            token: token.token,
            session_id: token.session_id,
            expires_at: token.expires_at,
        }
    }
}

/// A successful redemption.
#[derive(Debug, Clone)]
pub struct QrRedemption {
    /// Session attended.
    pub session_id: SessionId,
    /// The upserted record.
    pub record: AttendanceRecord,
}
