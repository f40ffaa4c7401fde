//! Postgres-backed store bundle.

use classiq_core::Stores;
use sea_orm::DatabaseConnection;

use super::embedding::{EmbeddingStore, ScanLogStore};
use super::enrollment::EnrollmentStore;
use super::qr_token::QrTokenStore;
use super::record::RecordStore;
use super::session::SessionStore;
use super::window::WindowStore;

/// Every engine repository over one connection pool.
#[derive(Debug, Clone)]
pub struct PgStores {
    sessions: SessionStore,
    enrollment: EnrollmentStore,
    windows: WindowStore,
    tokens: QrTokenStore,
    embeddings: EmbeddingStore,
    scan_logs: ScanLogStore,
    records: RecordStore,
}

impl PgStores {
    /// Builds all repositories over `db`. The connection is a pool handle
    /// and cheap to clone.
    #[must_use]
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            sessions: SessionStore::new(db.clone()),
            enrollment: EnrollmentStore::new(db.clone()),
            windows: WindowStore::new(db.clone()),
            tokens: QrTokenStore::new(db.clone()),
            embeddings: EmbeddingStore::new(db.clone()),
            scan_logs: ScanLogStore::new(db.clone()),
            records: RecordStore::new(db.clone()),
        }
    }
}

impl Stores for PgStores {
    type Sessions = SessionStore;
    type Enrollment = EnrollmentStore;
    type Windows = WindowStore;
    type Tokens = QrTokenStore;
    type Embeddings = EmbeddingStore;
    type ScanLogs = ScanLogStore;
    type Records = RecordStore;

    fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    fn enrollment(&self) -> &EnrollmentStore {
        &self.enrollment
    }

    fn windows(&self) -> &WindowStore {
        &self.windows
    }

    fn tokens(&self) -> &QrTokenStore {
        &self.tokens
    }

    fn embeddings(&self) -> &EmbeddingStore {
        &self.embeddings
    }

    fn scan_logs(&self) -> &ScanLogStore {
        &self.scan_logs
    }

    fn records(&self) -> &RecordStore {
        &self.records
    }
}
