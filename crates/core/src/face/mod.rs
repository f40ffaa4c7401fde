//! Face verification engine.
//!
//! Descriptors are produced client-side; the engine only compares them.
//! Verification is 1:1: the claimed identity comes from the authenticated
//! principal and the probe is matched against that user's own templates,
//! best-of-N.
//!
//! Liveness is reported by the client and is not re-derived here. A replayed
//! `liveness_passed: true` is accepted as-is.

mod error;
mod matcher;
mod service;
mod types;

#[cfg(test)]
mod matcher_props;

pub use error::{FaceError, percent};
pub use matcher::{best_score, euclidean_distance, similarity};
pub use service::{EmbeddingRepository, FaceService, FaceSettings, ScanLogRepository};
pub use types::{
    DESCRIPTOR_LEN, Descriptor, EmbeddingInput, FaceEmbedding, FaceStatus, MAX_EMBEDDINGS,
    MAX_LABEL_LEN, MIN_EMBEDDINGS, NewEmbedding, NewScanLog, ScanResult, Verification, VerifyInput,
};
