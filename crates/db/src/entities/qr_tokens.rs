//! `SeaORM` Entity for `qr_tokens` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "qr_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub session_id: Uuid,
    #[sea_orm(unique)]
    pub token: String,
    pub expires_at: DateTimeWithTimeZone,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class_sessions::Entity",
        from = "Column::SessionId",
        to = "super::class_sessions::Column::Id"
    )]
    ClassSessions,
}

impl Related<super::class_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
