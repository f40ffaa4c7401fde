//! Face engine types.

use chrono::{DateTime, Utc};
use classiq_shared::types::{EmbeddingId, SessionId, UserId};
use serde::{Deserialize, Serialize};

use super::error::FaceError;
use crate::attendance::{AttendanceRecord, RequestMeta};

/// Dimensionality of a face descriptor.
pub const DESCRIPTOR_LEN: usize = 128;
/// Fewest captures accepted at registration.
pub const MIN_EMBEDDINGS: usize = 3;
/// Most captures accepted at registration.
pub const MAX_EMBEDDINGS: usize = 10;
/// Longest template label, in characters.
pub const MAX_LABEL_LEN: usize = 50;

/// A validated descriptor: exactly [`DESCRIPTOR_LEN`] finite values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Descriptor(Vec<f64>);

impl Descriptor {
    /// The raw values.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for Descriptor {
    type Error = FaceError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        if values.len() != DESCRIPTOR_LEN {
            return Err(FaceError::InvalidDescriptor {
                expected: DESCRIPTOR_LEN,
                actual: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(FaceError::NonFiniteDescriptor);
        }
        Ok(Self(values))
    }
}

impl From<Descriptor> for Vec<f64> {
    fn from(descriptor: Descriptor) -> Self {
        descriptor.0
    }
}

/// One capture submitted at registration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingInput {
    /// Raw descriptor.
    pub descriptor: Vec<f64>,
    /// Optional label, defaults to `capture_<n>`.
    pub label: Option<String>,
    /// Optional capture photo (data URL).
    pub photo: Option<String>,
}

/// A stored template.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceEmbedding {
    /// Template ID.
    pub id: EmbeddingId,
    /// Owner.
    pub user_id: UserId,
    /// Descriptor.
    pub descriptor: Descriptor,
    /// Label.
    pub label: String,
    /// First capture of the set.
    pub is_primary: bool,
}

/// Input for inserting a template.
#[derive(Debug, Clone)]
pub struct NewEmbedding {
    /// Descriptor.
    pub descriptor: Descriptor,
    /// Label.
    pub label: String,
    /// Capture photo.
    pub photo: Option<String>,
    /// First capture of the set.
    pub is_primary: bool,
}

/// Outcome category of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanResult {
    /// Matched and marked.
    Success,
    /// Best score below threshold.
    NoMatch,
    /// Client reported failed liveness.
    LivenessFail,
    /// Rejected for any other reason after input validation.
    Error,
}

impl std::fmt::Display for ScanResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::NoMatch => write!(f, "no_match"),
            Self::LivenessFail => write!(f, "liveness_fail"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One audit row.
#[derive(Debug, Clone)]
pub struct NewScanLog {
    /// Who scanned.
    pub user_id: UserId,
    /// Session claimed.
    pub session_id: SessionId,
    /// Best similarity (0 when not computed).
    pub match_score: f64,
    /// Client-reported liveness.
    pub liveness_passed: bool,
    /// Outcome.
    pub result: ScanResult,
    /// Request metadata.
    pub meta: RequestMeta,
    /// Optional scan photo.
    pub scan_photo: Option<String>,
    /// Attempt instant.
    pub scanned_at: DateTime<Utc>,
}

/// A verification request.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyInput {
    /// Session to mark.
    pub session_id: SessionId,
    /// Probe descriptor.
    pub descriptor: Vec<f64>,
    /// Client-reported liveness.
    pub liveness_passed: bool,
    /// Optional scan photo.
    pub scan_photo: Option<String>,
}

/// A successful verification.
#[derive(Debug, Clone)]
pub struct Verification {
    /// Best similarity.
    pub score: f64,
    /// The upserted record.
    pub record: AttendanceRecord,
}

/// Registration state of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaceStatus {
    /// Whether any template exists.
    pub registered: bool,
    /// Number of templates.
    pub count: u64,
}
