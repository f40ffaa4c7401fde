//! Attendance record repository.
//!
//! Both writes are single `INSERT .. ON CONFLICT (session_id, student_id)`
//! statements, so concurrent markers for the same student serialize on the
//! unique index and the later statement wins.

use chrono::{DateTime, Utc};
use classiq_core::StoreError;
use classiq_core::attendance::{
    AttendanceMark, AttendanceRecord, AttendanceRepository, BulkEntry, MarkedBy, RequestMeta,
};
use classiq_shared::types::{RecordId, SessionId};
use sea_orm::sea_query::{Alias, Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::convert::{meta_columns, store_err};
use crate::entities::attendance_records::{self, Column};

fn overwrite_on_conflict() -> OnConflict {
    OnConflict::columns([Column::SessionId, Column::StudentId])
        .update_columns([
            Column::Status,
            Column::MarkedBy,
            Column::MarkedAt,
            Column::IpAddress,
            Column::DeviceInfo,
        ])
        .to_owned()
}

/// Record store.
#[derive(Debug, Clone)]
pub struct RecordStore {
    db: DatabaseConnection,
}

impl RecordStore {
    /// Creates a new record store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl AttendanceRepository for RecordStore {
    async fn upsert(&self, mark: AttendanceMark) -> Result<AttendanceRecord, StoreError> {
        let (ip_address, device_info) = meta_columns(&mark.meta);
        let row = attendance_records::ActiveModel {
            id: Set(RecordId::new().into_inner()),
            session_id: Set(mark.session_id.into_inner()),
            student_id: Set(mark.student_id.into_inner()),
            status: Set(mark.status.into()),
            marked_by: Set(mark.marked_by.into()),
            marked_at: Set(mark.marked_at.into()),
            ip_address: Set(ip_address),
            device_info: Set(device_info),
        };

        let stored = attendance_records::Entity::insert(row)
            .on_conflict(overwrite_on_conflict())
            .exec_with_returning(&self.db)
            .await
            .map_err(store_err)?;

        tracing::info!(
            session_id = %stored.session_id,
            student_id = %stored.student_id,
            marked_by = %mark.marked_by,
            "attendance marked"
        );
        Ok(stored.into())
    }

    async fn upsert_bulk(
        &self,
        session_id: SessionId,
        entries: Vec<BulkEntry>,
        marked_by: MarkedBy,
        marked_at: DateTime<Utc>,
        meta: RequestMeta,
    ) -> Result<u64, StoreError> {
        if entries.is_empty() {
            return Ok(0);
        }
        let (ip_address, device_info) = meta_columns(&meta);
        let rows = entries.into_iter().map(|entry| attendance_records::ActiveModel {
            id: Set(RecordId::new().into_inner()),
            session_id: Set(session_id.into_inner()),
            student_id: Set(entry.student_id.into_inner()),
            status: Set(entry.status.into()),
            marked_by: Set(marked_by.into()),
            marked_at: Set(marked_at.into()),
            ip_address: Set(ip_address.clone()),
            device_info: Set(device_info.clone()),
        });

        // Rows whose status is unchanged keep their original write.
        let mut on_conflict = overwrite_on_conflict();
        on_conflict.action_and_where(
            Expr::col((attendance_records::Entity, Column::Status))
                .ne(Expr::col((Alias::new("excluded"), Column::Status))),
        );

        let changed = attendance_records::Entity::insert_many(rows)
            .on_conflict(on_conflict)
            .exec_without_returning(&self.db)
            .await
            .map_err(store_err)?;

        tracing::info!(session_id = %session_id, changed, "bulk attendance applied");
        Ok(changed)
    }

    async fn count_for_session(&self, session_id: SessionId) -> Result<u64, StoreError> {
        attendance_records::Entity::find()
            .filter(Column::SessionId.eq(session_id.into_inner()))
            .count(&self.db)
            .await
            .map_err(store_err)
    }

    async fn list_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let rows = attendance_records::Entity::find()
            .filter(Column::SessionId.eq(session_id.into_inner()))
            .order_by_asc(Column::MarkedAt)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
