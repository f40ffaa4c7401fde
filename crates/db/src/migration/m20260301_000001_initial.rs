//! Initial database migration.
//!
//! Creates the directory tables (users, classes, enrollments) and the
//! attendance engine tables with their uniqueness guarantees.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: DIRECTORY (read-only for the engine)
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(CLASSES_SQL).await?;
        db.execute_unprepared(STUDENT_CLASSES_SQL).await?;

        // ============================================================
        // PART 3: SESSIONS & WINDOWS
        // ============================================================
        db.execute_unprepared(CLASS_SESSIONS_SQL).await?;
        db.execute_unprepared(ATTENDANCE_WINDOWS_SQL).await?;

        // ============================================================
        // PART 4: VERIFICATION
        // ============================================================
        db.execute_unprepared(QR_TOKENS_SQL).await?;
        db.execute_unprepared(FACE_EMBEDDINGS_SQL).await?;
        db.execute_unprepared(FACE_SCAN_LOGS_SQL).await?;

        // ============================================================
        // PART 5: RECORDS
        // ============================================================
        db.execute_unprepared(ATTENDANCE_RECORDS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE user_role AS ENUM ('student', 'faculty', 'admin');

CREATE TYPE session_status AS ENUM ('scheduled', 'ongoing', 'completed');

CREATE TYPE window_method AS ENUM ('face', 'qr', 'both');

CREATE TYPE scan_result AS ENUM ('success', 'no_match', 'liveness_fail', 'error');

CREATE TYPE attendance_status AS ENUM ('present', 'absent', 'late', 'excused');

CREATE TYPE marked_by AS ENUM ('manual', 'qr', 'facial');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    full_name VARCHAR(255) NOT NULL,
    role user_role NOT NULL DEFAULT 'student',
    enrollment_no VARCHAR(50),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CLASSES_SQL: &str = r"
CREATE TABLE classes (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    faculty_id UUID NOT NULL REFERENCES users(id),
    name VARCHAR(255) NOT NULL,
    room_no VARCHAR(50),
    day_of_week VARCHAR(10),
    start_time TIME,
    end_time TIME,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_day_of_week CHECK (day_of_week IN (
        'monday', 'tuesday', 'wednesday', 'thursday', 'friday', 'saturday', 'sunday'
    ))
);

CREATE INDEX idx_classes_faculty ON classes(faculty_id);
CREATE INDEX idx_classes_day ON classes(day_of_week);
";

const STUDENT_CLASSES_SQL: &str = r"
CREATE TABLE student_classes (
    student_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    class_id UUID NOT NULL REFERENCES classes(id) ON DELETE CASCADE,
    enrolled_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (student_id, class_id)
);

CREATE INDEX idx_student_classes_class ON student_classes(class_id);
";

const CLASS_SESSIONS_SQL: &str = r"
CREATE TABLE class_sessions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    class_id UUID NOT NULL REFERENCES classes(id) ON DELETE CASCADE,
    session_date DATE NOT NULL,
    topic VARCHAR(255),
    status session_status NOT NULL DEFAULT 'scheduled',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_class_sessions_class_date UNIQUE (class_id, session_date)
);

CREATE INDEX idx_class_sessions_date ON class_sessions(session_date);
";

const ATTENDANCE_WINDOWS_SQL: &str = r"
CREATE TABLE attendance_windows (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    session_id UUID NOT NULL REFERENCES class_sessions(id) ON DELETE CASCADE,
    opened_by UUID NOT NULL REFERENCES users(id),
    method window_method NOT NULL DEFAULT 'face',
    opens_at TIMESTAMPTZ NOT NULL,
    closes_at TIMESTAMPTZ,
    is_active BOOLEAN NOT NULL DEFAULT true,
    allowed_network VARCHAR(100),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- At most one active window per session
CREATE UNIQUE INDEX uq_attendance_windows_active
    ON attendance_windows(session_id) WHERE is_active;
";

const QR_TOKENS_SQL: &str = r"
CREATE TABLE qr_tokens (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    session_id UUID NOT NULL REFERENCES class_sessions(id) ON DELETE CASCADE,
    token VARCHAR(128) NOT NULL UNIQUE,
    expires_at TIMESTAMPTZ NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- At most one active token per session
CREATE UNIQUE INDEX uq_qr_tokens_active
    ON qr_tokens(session_id) WHERE is_active;
";

const FACE_EMBEDDINGS_SQL: &str = r"
CREATE TABLE face_embeddings (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    descriptor JSONB NOT NULL,
    label VARCHAR(50) NOT NULL,
    photo_data TEXT,
    is_primary BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_descriptor_length CHECK (jsonb_array_length(descriptor) = 128)
);

CREATE INDEX idx_face_embeddings_user ON face_embeddings(user_id);
";

const FACE_SCAN_LOGS_SQL: &str = r"
-- Audit trail: no foreign keys so rows survive user and session deletion
CREATE TABLE face_scan_logs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL,
    session_id UUID NOT NULL,
    match_score DOUBLE PRECISION NOT NULL DEFAULT 0,
    liveness_passed BOOLEAN NOT NULL DEFAULT false,
    result scan_result NOT NULL,
    ip_address VARCHAR(45),
    device_info VARCHAR(255),
    scan_photo TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_face_scan_logs_user ON face_scan_logs(user_id);
CREATE INDEX idx_face_scan_logs_session ON face_scan_logs(session_id);
";

const ATTENDANCE_RECORDS_SQL: &str = r"
CREATE TABLE attendance_records (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    session_id UUID NOT NULL REFERENCES class_sessions(id) ON DELETE CASCADE,
    student_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    status attendance_status NOT NULL,
    marked_by marked_by NOT NULL,
    marked_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    ip_address VARCHAR(45),
    device_info VARCHAR(255),

    CONSTRAINT uq_attendance_records_session_student UNIQUE (session_id, student_id)
);

CREATE INDEX idx_attendance_records_student ON attendance_records(student_id);
";

const DROP_ALL_SQL: &str = r"
-- Drop tables (reverse order of creation)
DROP TABLE IF EXISTS attendance_records CASCADE;
DROP TABLE IF EXISTS face_scan_logs CASCADE;
DROP TABLE IF EXISTS face_embeddings CASCADE;
DROP TABLE IF EXISTS qr_tokens CASCADE;
DROP TABLE IF EXISTS attendance_windows CASCADE;
DROP TABLE IF EXISTS class_sessions CASCADE;
DROP TABLE IF EXISTS student_classes CASCADE;
DROP TABLE IF EXISTS classes CASCADE;
DROP TABLE IF EXISTS users CASCADE;

-- Drop enums
DROP TYPE IF EXISTS marked_by;
DROP TYPE IF EXISTS attendance_status;
DROP TYPE IF EXISTS scan_result;
DROP TYPE IF EXISTS window_method;
DROP TYPE IF EXISTS session_status;
DROP TYPE IF EXISTS user_role;
";
