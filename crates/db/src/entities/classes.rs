//! `SeaORM` Entity for classes table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub faculty_id: Uuid,
    pub name: String,
    pub room_no: Option<String>,
    /// Lowercase English weekday name, e.g. `tuesday`.
    pub day_of_week: Option<String>,
    pub start_time: Option<Time>,
    pub end_time: Option<Time>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::FacultyId",
        to = "super::users::Column::Id"
    )]
    Faculty,
    #[sea_orm(has_many = "super::class_sessions::Entity")]
    ClassSessions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Faculty.def()
    }
}

impl Related<super::class_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
