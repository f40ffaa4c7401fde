//! Face template and scan log repositories.

use chrono::Utc;
use classiq_core::StoreError;
use classiq_core::face::{
    EmbeddingRepository, FaceEmbedding, NewEmbedding, NewScanLog, ScanLogRepository,
};
use classiq_shared::types::{EmbeddingId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::convert::{meta_columns, store_err};
use crate::entities::{face_embeddings, face_scan_logs};

/// Face template store.
#[derive(Debug, Clone)]
pub struct EmbeddingStore {
    db: DatabaseConnection,
}

impl EmbeddingStore {
    /// Creates a new embedding store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl EmbeddingRepository for EmbeddingStore {
    async fn replace_all(
        &self,
        user_id: UserId,
        embeddings: Vec<NewEmbedding>,
    ) -> Result<u64, StoreError> {
        let now = Utc::now().into();
        let rows = embeddings
            .into_iter()
            .map(|e| {
                let descriptor = serde_json::to_value(&e.descriptor)
                    .map_err(|err| StoreError::new(err.to_string()))?;
                Ok(face_embeddings::ActiveModel {
                    id: Set(EmbeddingId::new().into_inner()),
                    user_id: Set(user_id.into_inner()),
                    descriptor: Set(descriptor),
                    label: Set(e.label),
                    photo_data: Set(e.photo),
                    is_primary: Set(e.is_primary),
                    created_at: Set(now),
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        let count = rows.len() as u64;

        let txn = self.db.begin().await.map_err(store_err)?;

        face_embeddings::Entity::delete_many()
            .filter(face_embeddings::Column::UserId.eq(user_id.into_inner()))
            .exec(&txn)
            .await
            .map_err(store_err)?;

        if !rows.is_empty() {
            face_embeddings::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await
                .map_err(store_err)?;
        }

        txn.commit().await.map_err(store_err)?;
        tracing::info!(user_id = %user_id, count, "face templates replaced");
        Ok(count)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<FaceEmbedding>, StoreError> {
        let rows = face_embeddings::Entity::find()
            .filter(face_embeddings::Column::UserId.eq(user_id.into_inner()))
            .order_by_desc(face_embeddings::Column::IsPrimary)
            .order_by_asc(face_embeddings::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        rows.into_iter().map(FaceEmbedding::try_from).collect()
    }

    async fn count_for_user(&self, user_id: UserId) -> Result<u64, StoreError> {
        face_embeddings::Entity::find()
            .filter(face_embeddings::Column::UserId.eq(user_id.into_inner()))
            .count(&self.db)
            .await
            .map_err(store_err)
    }

    async fn delete_for_user(&self, user_id: UserId) -> Result<u64, StoreError> {
        let result = face_embeddings::Entity::delete_many()
            .filter(face_embeddings::Column::UserId.eq(user_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected)
    }
}

/// Append-only scan audit log.
#[derive(Debug, Clone)]
pub struct ScanLogStore {
    db: DatabaseConnection,
}

impl ScanLogStore {
    /// Creates a new scan log store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ScanLogRepository for ScanLogStore {
    async fn append(&self, entry: NewScanLog) -> Result<(), StoreError> {
        let (ip_address, device_info) = meta_columns(&entry.meta);
        face_scan_logs::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(entry.user_id.into_inner()),
            session_id: Set(entry.session_id.into_inner()),
            match_score: Set(entry.match_score),
            liveness_passed: Set(entry.liveness_passed),
            result: Set(entry.result.into()),
            ip_address: Set(ip_address),
            device_info: Set(device_info),
            scan_photo: Set(entry.scan_photo),
            created_at: Set(entry.scanned_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(store_err)?;
        Ok(())
    }
}
