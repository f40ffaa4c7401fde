//! Attendance window repository.

use chrono::{DateTime, Utc};
use classiq_core::StoreError;
use classiq_core::window::{AttendanceWindow, NewWindow, WindowRepository};
use classiq_shared::types::{SessionId, WindowId};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};

use super::convert::store_err;
use crate::entities::{attendance_windows, class_sessions};

/// Takes a row lock on the owning session so concurrent writers of
/// per-session singletons serialize.
pub(crate) async fn lock_session(
    txn: &DatabaseTransaction,
    session_id: SessionId,
) -> Result<(), StoreError> {
    class_sessions::Entity::find_by_id(session_id.into_inner())
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(store_err)?
        .ok_or_else(|| StoreError::new(format!("session {session_id} not found")))?;
    Ok(())
}

/// Window store.
#[derive(Debug, Clone)]
pub struct WindowStore {
    db: DatabaseConnection,
}

impl WindowStore {
    /// Creates a new window store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl WindowRepository for WindowStore {
    async fn replace_active(&self, window: NewWindow) -> Result<AttendanceWindow, StoreError> {
        let txn = self.db.begin().await.map_err(store_err)?;
        lock_session(&txn, window.session_id).await?;

        attendance_windows::Entity::update_many()
            .col_expr(attendance_windows::Column::IsActive, Expr::value(false))
            .filter(attendance_windows::Column::SessionId.eq(window.session_id.into_inner()))
            .filter(attendance_windows::Column::IsActive.eq(true))
            .exec(&txn)
            .await
            .map_err(store_err)?;

        let now = Utc::now().into();
        let inserted = attendance_windows::ActiveModel {
            id: Set(WindowId::new().into_inner()),
            session_id: Set(window.session_id.into_inner()),
            opened_by: Set(window.opened_by.into_inner()),
            method: Set(window.method.into()),
            opens_at: Set(window.opens_at.into()),
            closes_at: Set(window.closes_at.map(Into::into)),
            is_active: Set(true),
            allowed_network: Set(window.allowed_network),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(store_err)?;

        txn.commit().await.map_err(store_err)?;
        Ok(inserted.into())
    }

    async fn close_active(
        &self,
        session_id: SessionId,
        at: DateTime<Utc>,
    ) -> Result<Option<AttendanceWindow>, StoreError> {
        let txn = self.db.begin().await.map_err(store_err)?;

        let active = attendance_windows::Entity::find()
            .filter(attendance_windows::Column::SessionId.eq(session_id.into_inner()))
            .filter(attendance_windows::Column::IsActive.eq(true))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(store_err)?;

        let Some(active) = active else {
            txn.commit().await.map_err(store_err)?;
            return Ok(None);
        };

        let mut row: attendance_windows::ActiveModel = active.into();
        row.is_active = Set(false);
        row.closes_at = Set(Some(at.into()));
        let closed = row.update(&txn).await.map_err(store_err)?;

        txn.commit().await.map_err(store_err)?;
        Ok(Some(closed.into()))
    }

    async fn find_active(
        &self,
        session_id: SessionId,
    ) -> Result<Option<AttendanceWindow>, StoreError> {
        let row = attendance_windows::Entity::find()
            .filter(attendance_windows::Column::SessionId.eq(session_id.into_inner()))
            .filter(attendance_windows::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(row.map(Into::into))
    }
}
