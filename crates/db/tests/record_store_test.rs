//! Integration tests for attendance records and face templates.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use classiq_core::attendance::{
    AttendanceRepository, AttendanceStatus, BulkEntry, MAX_DEVICE_LEN, MarkedBy, RequestMeta,
    mark_present,
};
use classiq_core::face::{Descriptor, EmbeddingRepository, NewEmbedding};
use classiq_db::entities::sea_orm_active_enums::UserRole;
use classiq_db::repositories::{EmbeddingStore, RecordStore};
use futures::future::join_all;

fn meta() -> RequestMeta {
    RequestMeta {
        ip: Some("192.168.1.20".parse().unwrap()),
        device: Some("integration".to_string()),
    }
}

#[tokio::test]
#[ignore = "requires a migrated Postgres at DATABASE_URL"]
async fn test_later_mark_overwrites_in_place() {
    let db = common::connect().await;
    let seeded = common::seed(&db).await;
    let store = RecordStore::new(db.clone());
    let now = Utc::now();

    let qr = mark_present(&store, seeded.session.id, seeded.student.id, MarkedBy::Qr, meta(), now)
        .await
        .unwrap();
    let face = mark_present(
        &store,
        seeded.session.id,
        seeded.student.id,
        MarkedBy::Facial,
        RequestMeta::default(),
        now + Duration::seconds(5),
    )
    .await
    .unwrap();

    assert_eq!(qr.id, face.id);
    assert_eq!(face.marked_by, MarkedBy::Facial);
    assert!(face.meta.ip.is_none());
    assert_eq!(store.count_for_session(seeded.session.id).await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires a migrated Postgres at DATABASE_URL"]
async fn test_long_user_agent_fits_device_column() {
    let db = common::connect().await;
    let seeded = common::seed(&db).await;
    let store = RecordStore::new(db.clone());
    let agent = "Mozilla/5.0 (Linux; Android 14) ".repeat(12);

    let record = mark_present(
        &store,
        seeded.session.id,
        seeded.student.id,
        MarkedBy::Facial,
        RequestMeta::new(None, Some(&agent)),
        Utc::now(),
    )
    .await
    .unwrap();

    assert_eq!(record.meta.device.map(|d| d.chars().count()), Some(MAX_DEVICE_LEN));
}

#[tokio::test]
#[ignore = "requires a migrated Postgres at DATABASE_URL"]
async fn test_concurrent_marks_keep_one_row() {
    let db = common::connect().await;
    let seeded = common::seed(&db).await;
    let store = Arc::new(RecordStore::new(db.clone()));

    let writers = [MarkedBy::Qr, MarkedBy::Facial, MarkedBy::Qr, MarkedBy::Facial]
        .into_iter()
        .map(|channel| {
            let store = Arc::clone(&store);
            let session_id = seeded.session.id;
            let student_id = seeded.student.id;
            tokio::spawn(async move {
                mark_present(store.as_ref(), session_id, student_id, channel, meta(), Utc::now())
                    .await
            })
        });
    for joined in join_all(writers).await {
        joined.unwrap().unwrap();
    }

    let rows = store.list_for_session(seeded.session.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, AttendanceStatus::Present);
}

#[tokio::test]
#[ignore = "requires a migrated Postgres at DATABASE_URL"]
async fn test_bulk_skips_unchanged_rows() {
    let db = common::connect().await;
    let seeded = common::seed(&db).await;
    let second = common::create_user(&db, UserRole::Student).await;
    common::enroll(&db, seeded.class_id, second.id).await;
    let store = RecordStore::new(db.clone());
    let first_at = Utc::now();

    let marked = mark_present(&store, seeded.session.id, seeded.student.id, MarkedBy::Qr, meta(), first_at)
        .await
        .unwrap();

    let changed = store
        .upsert_bulk(
            seeded.session.id,
            vec![
                BulkEntry {
                    student_id: seeded.student.id,
                    status: AttendanceStatus::Present,
                },
                BulkEntry {
                    student_id: second.id,
                    status: AttendanceStatus::Absent,
                },
            ],
            MarkedBy::Manual,
            first_at + Duration::minutes(1),
            RequestMeta::default(),
        )
        .await
        .unwrap();
    assert_eq!(changed, 1);

    let rows = store.list_for_session(seeded.session.id).await.unwrap();
    let kept = rows.iter().find(|r| r.student_id == seeded.student.id).unwrap();
    assert_eq!(kept.marked_by, MarkedBy::Qr);
    assert_eq!(kept.marked_at.timestamp_micros(), marked.marked_at.timestamp_micros());

    let changed = store
        .upsert_bulk(
            seeded.session.id,
            vec![BulkEntry {
                student_id: seeded.student.id,
                status: AttendanceStatus::Late,
            }],
            MarkedBy::Manual,
            first_at + Duration::minutes(2),
            RequestMeta::default(),
        )
        .await
        .unwrap();
    assert_eq!(changed, 1);
}

#[tokio::test]
#[ignore = "requires a migrated Postgres at DATABASE_URL"]
async fn test_embeddings_replace_and_reload() {
    let db = common::connect().await;
    let seeded = common::seed(&db).await;
    let store = EmbeddingStore::new(db.clone());

    let capture = |v: f64, primary: bool| NewEmbedding {
        descriptor: Descriptor::try_from(vec![v; 128]).unwrap(),
        label: format!("capture_{v}"),
        photo: None,
        is_primary: primary,
    };

    store
        .replace_all(seeded.student.id, vec![capture(0.1, true), capture(0.2, false), capture(0.3, false)])
        .await
        .unwrap();
    store
        .replace_all(seeded.student.id, vec![capture(0.4, true), capture(0.5, false), capture(0.6, false)])
        .await
        .unwrap();

    let stored = store.list_for_user(seeded.student.id).await.unwrap();
    assert_eq!(stored.len(), 3);
    assert!(stored[0].is_primary);
    assert_eq!(stored[0].descriptor.as_slice()[0], 0.4);

    assert_eq!(store.delete_for_user(seeded.student.id).await.unwrap(), 3);
    assert_eq!(store.count_for_user(seeded.student.id).await.unwrap(), 0);
}
