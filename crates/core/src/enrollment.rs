//! Read-only view of class membership.

use std::future::Future;

use classiq_shared::types::{ClassId, UserId};

use crate::store::StoreError;

/// Answers who belongs to a class. Owned outside the engine.
pub trait EnrollmentDirectory: Send + Sync {
    /// Whether the student is enrolled in the class.
    fn is_enrolled(
        &self,
        class_id: ClassId,
        student_id: UserId,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Number of students enrolled in the class.
    fn count_enrolled(
        &self,
        class_id: ClassId,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;
}
