//! Database seeder for Classiq development and testing.
//!
//! Seeds one faculty member, an admin, a handful of students and one class per
//! weekday (so there is always a session to open today), then prints
//! development access tokens for each user.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{NaiveTime, Utc, Weekday};
use sea_orm::{
    DatabaseConnection, EntityTrait, Set,
    sea_query::OnConflict,
};
use uuid::Uuid;

use classiq_db::entities::{classes, sea_orm_active_enums::UserRole, student_classes, users};
use classiq_shared::{AppConfig, JwtService};

/// Faculty user ID (consistent for all seeds)
const FACULTY_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Admin user ID (consistent for all seeds)
const ADMIN_ID: &str = "00000000-0000-0000-0000-000000000002";

const STUDENTS: [(&str, &str, &str); 4] = [
    ("00000000-0000-0000-0000-000000000101", "Aarav Sharma", "CS2026001"),
    ("00000000-0000-0000-0000-000000000102", "Diya Patel", "CS2026002"),
    ("00000000-0000-0000-0000-000000000103", "Kabir Rao", "CS2026003"),
    ("00000000-0000-0000-0000-000000000104", "Meera Iyer", "CS2026004"),
];

const COURSES: [(Weekday, &str, &str); 7] = [
    (Weekday::Mon, "Data Structures", "A-101"),
    (Weekday::Tue, "Operating Systems", "A-102"),
    (Weekday::Wed, "Computer Networks", "B-201"),
    (Weekday::Thu, "Database Systems", "B-202"),
    (Weekday::Fri, "Compiler Design", "C-301"),
    (Weekday::Sat, "Systems Lab", "Lab-1"),
    (Weekday::Sun, "Weekend Tutorial", "Lab-2"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    println!("Connecting to database...");
    let db = classiq_db::connect(&config.database.url, 2, 1)
        .await
        .context("failed to connect to database")?;

    println!("Seeding users...");
    let faculty_id = parse(FACULTY_ID)?;
    let admin_id = parse(ADMIN_ID)?;
    seed_user(&db, faculty_id, "faculty@classiq.dev", "Dr. Ananya Sen", UserRole::Faculty, None).await?;
    seed_user(&db, admin_id, "admin@classiq.dev", "Campus Admin", UserRole::Admin, None).await?;

    let mut student_ids = Vec::with_capacity(STUDENTS.len());
    for (id, name, enrollment_no) in STUDENTS {
        let id = parse(id)?;
        let email = format!("{}@students.classiq.dev", enrollment_no.to_lowercase());
        seed_user(&db, id, &email, name, UserRole::Student, Some(enrollment_no)).await?;
        student_ids.push(id);
    }

    println!("Seeding classes...");
    for (index, (day, name, room)) in COURSES.into_iter().enumerate() {
        let class_id = class_id(index)?;
        seed_class(&db, class_id, faculty_id, name, room, day).await?;
        enroll(&db, class_id, &student_ids).await?;
    }
    println!("  Seeded {} classes with {} students each", COURSES.len(), student_ids.len());

    let jwt = JwtService::new(config.jwt.clone());
    println!("Development tokens:");
    println!("  faculty: {}", jwt.generate_access_token(faculty_id, "faculty")?);
    println!("  admin:   {}", jwt.generate_access_token(admin_id, "admin")?);
    for id in &student_ids {
        println!("  student {id}: {}", jwt.generate_access_token(*id, "student")?);
    }

    println!("Seeding complete!");
    Ok(())
}

fn parse(id: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(id).with_context(|| format!("bad seed id {id}"))
}

fn class_id(index: usize) -> anyhow::Result<Uuid> {
    parse(&format!("00000000-0000-0000-0000-0000000002{index:02}"))
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Seeds a user, leaving an existing row untouched.
async fn seed_user(
    db: &DatabaseConnection,
    id: Uuid,
    email: &str,
    full_name: &str,
    role: UserRole,
    enrollment_no: Option<&str>,
) -> anyhow::Result<()> {
    let user = users::ActiveModel {
        id: Set(id),
        email: Set(email.to_string()),
        full_name: Set(full_name.to_string()),
        role: Set(role),
        enrollment_no: Set(enrollment_no.map(str::to_string)),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    users::Entity::insert(user)
        .on_conflict(OnConflict::column(users::Column::Id).do_nothing().to_owned())
        .exec_without_returning(db)
        .await
        .with_context(|| format!("failed to seed user {email}"))?;
    println!("  {email}");
    Ok(())
}

/// Seeds a class meeting 09:00-10:00 on `day`.
async fn seed_class(
    db: &DatabaseConnection,
    id: Uuid,
    faculty_id: Uuid,
    name: &str,
    room: &str,
    day: Weekday,
) -> anyhow::Result<()> {
    let class = classes::ActiveModel {
        id: Set(id),
        faculty_id: Set(faculty_id),
        name: Set(name.to_string()),
        room_no: Set(Some(room.to_string())),
        day_of_week: Set(Some(weekday_name(day).to_string())),
        start_time: Set(NaiveTime::from_hms_opt(9, 0, 0)),
        end_time: Set(NaiveTime::from_hms_opt(10, 0, 0)),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    classes::Entity::insert(class)
        .on_conflict(OnConflict::column(classes::Column::Id).do_nothing().to_owned())
        .exec_without_returning(db)
        .await
        .with_context(|| format!("failed to seed class {name}"))?;
    Ok(())
}

async fn enroll(db: &DatabaseConnection, class_id: Uuid, students: &[Uuid]) -> anyhow::Result<()> {
    let rows = students.iter().map(|student_id| student_classes::ActiveModel {
        student_id: Set(*student_id),
        class_id: Set(class_id),
        enrolled_at: Set(Utc::now().into()),
    });

    student_classes::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::columns([
                student_classes::Column::StudentId,
                student_classes::Column::ClassId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await
        .context("failed to enroll students")?;
    Ok(())
}
