//! Read-only enrollment lookups.

use classiq_core::StoreError;
use classiq_core::enrollment::EnrollmentDirectory;
use classiq_shared::types::{ClassId, UserId};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use super::convert::store_err;
use crate::entities::student_classes;

/// Enrollment directory backed by `student_classes`.
#[derive(Debug, Clone)]
pub struct EnrollmentStore {
    db: DatabaseConnection,
}

impl EnrollmentStore {
    /// Creates a new enrollment store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl EnrollmentDirectory for EnrollmentStore {
    async fn is_enrolled(&self, class_id: ClassId, student_id: UserId) -> Result<bool, StoreError> {
        let row = student_classes::Entity::find_by_id((student_id.into_inner(), class_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(row.is_some())
    }

    async fn count_enrolled(&self, class_id: ClassId) -> Result<u64, StoreError> {
        student_classes::Entity::find()
            .filter(student_classes::Column::ClassId.eq(class_id.into_inner()))
            .count(&self.db)
            .await
            .map_err(store_err)
    }
}
