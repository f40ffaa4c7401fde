//! QR token repository.

use chrono::Utc;
use classiq_core::StoreError;
use classiq_core::qr::{NewQrToken, QrToken, QrTokenRepository};
use classiq_shared::types::{QrTokenId, SessionId};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::convert::store_err;
use super::window::lock_session;
use crate::entities::qr_tokens;

/// QR token store.
#[derive(Debug, Clone)]
pub struct QrTokenStore {
    db: DatabaseConnection,
}

impl QrTokenStore {
    /// Creates a new token store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl QrTokenRepository for QrTokenStore {
    async fn replace_for_session(&self, token: NewQrToken) -> Result<QrToken, StoreError> {
        let txn = self.db.begin().await.map_err(store_err)?;
        lock_session(&txn, token.session_id).await?;

        qr_tokens::Entity::update_many()
            .col_expr(qr_tokens::Column::IsActive, Expr::value(false))
            .filter(qr_tokens::Column::SessionId.eq(token.session_id.into_inner()))
            .filter(qr_tokens::Column::IsActive.eq(true))
            .exec(&txn)
            .await
            .map_err(store_err)?;

        let inserted = qr_tokens::ActiveModel {
            id: Set(QrTokenId::new().into_inner()),
            session_id: Set(token.session_id.into_inner()),
            token: Set(token.token),
            expires_at: Set(token.expires_at.into()),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await
        .map_err(store_err)?;

        txn.commit().await.map_err(store_err)?;
        Ok(inserted.into())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<QrToken>, StoreError> {
        let row = qr_tokens::Entity::find()
            .filter(qr_tokens::Column::Token.eq(token))
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(row.map(Into::into))
    }

    async fn deactivate(&self, id: QrTokenId) -> Result<(), StoreError> {
        qr_tokens::Entity::update_many()
            .col_expr(qr_tokens::Column::IsActive, Expr::value(false))
            .filter(qr_tokens::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn find_active_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<Option<QrToken>, StoreError> {
        let row = qr_tokens::Entity::find()
            .filter(qr_tokens::Column::SessionId.eq(session_id.into_inner()))
            .filter(qr_tokens::Column::IsActive.eq(true))
            .order_by_desc(qr_tokens::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(row.map(Into::into))
    }
}
