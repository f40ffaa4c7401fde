//! `SeaORM` entity definitions.

pub mod attendance_records;
pub mod attendance_windows;
pub mod class_sessions;
pub mod classes;
pub mod face_embeddings;
pub mod face_scan_logs;
pub mod qr_tokens;
pub mod sea_orm_active_enums;
pub mod student_classes;
pub mod users;
