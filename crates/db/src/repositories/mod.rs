//! Repository implementations for data access.
//!
//! Each store implements one engine repository trait from `classiq-core`
//! over `SeaORM`; [`PgStores`] bundles them for the services.

mod convert;
pub mod embedding;
pub mod enrollment;
pub mod qr_token;
pub mod record;
pub mod session;
pub mod stores;
pub mod window;

pub use embedding::{EmbeddingStore, ScanLogStore};
pub use enrollment::EnrollmentStore;
pub use qr_token::QrTokenStore;
pub use record::RecordStore;
pub use session::SessionStore;
pub use stores::PgStores;
pub use window::WindowStore;
