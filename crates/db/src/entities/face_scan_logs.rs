//! `SeaORM` Entity for `face_scan_logs` table.
//!
//! No foreign keys: rows outlive the users and sessions they reference.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ScanResult;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "face_scan_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_id: Uuid,
    #[sea_orm(column_type = "Double")]
    pub match_score: f64,
    pub liveness_passed: bool,
    pub result: ScanResult,
    pub ip_address: Option<String>,
    pub device_info: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub scan_photo: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
