//! `SeaORM` Entity for `attendance_records` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{AttendanceStatus, MarkedBy};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub session_id: Uuid,
    pub student_id: Uuid,
    pub status: AttendanceStatus,
    pub marked_by: MarkedBy,
    pub marked_at: DateTimeWithTimeZone,
    pub ip_address: Option<String>,
    pub device_info: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class_sessions::Entity",
        from = "Column::SessionId",
        to = "super::class_sessions::Column::Id"
    )]
    ClassSessions,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::class_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
