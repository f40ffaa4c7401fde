//! Persistence seams shared by every engine component.
//!
//! Each component owns one repository trait; `Stores` bundles them so a
//! service can be handed a single object while tests swap any of them for an
//! in-memory fake.

use thiserror::Error;

use crate::attendance::AttendanceRepository;
use crate::enrollment::EnrollmentDirectory;
use crate::face::{EmbeddingRepository, ScanLogRepository};
use crate::qr::QrTokenRepository;
use crate::session::SessionRepository;
use crate::window::WindowRepository;

/// Failure reported by a storage backend.
#[derive(Debug, Clone, Error)]
#[error("store unavailable: {0}")]
pub struct StoreError(pub String);

impl StoreError {
    /// Wraps a backend message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The set of repositories the engine runs against.
pub trait Stores: Send + Sync + 'static {
    /// Session store.
    type Sessions: SessionRepository;
    /// Enrollment lookups (read-only).
    type Enrollment: EnrollmentDirectory;
    /// Window store.
    type Windows: WindowRepository;
    /// QR token store.
    type Tokens: QrTokenRepository;
    /// Face template store.
    type Embeddings: EmbeddingRepository;
    /// Append-only scan audit log.
    type ScanLogs: ScanLogRepository;
    /// Attendance record store.
    type Records: AttendanceRepository;

    /// Returns the session store.
    fn sessions(&self) -> &Self::Sessions;
    /// Returns the enrollment directory.
    fn enrollment(&self) -> &Self::Enrollment;
    /// Returns the window store.
    fn windows(&self) -> &Self::Windows;
    /// Returns the token store.
    fn tokens(&self) -> &Self::Tokens;
    /// Returns the embedding store.
    fn embeddings(&self) -> &Self::Embeddings;
    /// Returns the scan log.
    fn scan_logs(&self) -> &Self::ScanLogs;
    /// Returns the record store.
    fn records(&self) -> &Self::Records;
}
