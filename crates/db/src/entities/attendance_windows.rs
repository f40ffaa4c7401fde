//! `SeaORM` Entity for `attendance_windows` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::WindowMethod;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance_windows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub session_id: Uuid,
    pub opened_by: Uuid,
    pub method: WindowMethod,
    pub opens_at: DateTimeWithTimeZone,
    pub closes_at: Option<DateTimeWithTimeZone>,
    pub is_active: bool,
    pub allowed_network: Option<String>,
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
