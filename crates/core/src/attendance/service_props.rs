//! Property tests for the record store: one row per student, last writer wins.

use chrono::Duration;
use proptest::prelude::*;

use super::service::mark_present;
use super::types::{AttendanceStatus, BulkEntry, MarkedBy, RequestMeta};
use super::AttendanceRepository;
use crate::test_support::{Fixture, class_time};

#[derive(Debug, Clone, Copy)]
enum Write {
    Verified(MarkedBy),
    Manual(AttendanceStatus),
}

fn write_strategy() -> impl Strategy<Value = Write> {
    prop_oneof![
        Just(Write::Verified(MarkedBy::Qr)),
        Just(Write::Verified(MarkedBy::Facial)),
        Just(Write::Manual(AttendanceStatus::Present)),
        Just(Write::Manual(AttendanceStatus::Absent)),
        Just(Write::Manual(AttendanceStatus::Late)),
        Just(Write::Manual(AttendanceStatus::Excused)),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Whatever sequence of channels writes, exactly one record remains and
    /// its status matches the last write. `marked_by` matches the last write
    /// that changed something.
    #[test]
    fn prop_last_writer_wins(writes in prop::collection::vec(write_strategy(), 1..12)) {
        let fx = Fixture::new();
        let rt = runtime();

        let mut expected_status = AttendanceStatus::Present;
        let mut expected_by = MarkedBy::Manual;
        let mut expected_at = class_time();

        for (i, write) in writes.iter().enumerate() {
            let at = class_time() + Duration::seconds(i64::try_from(i).unwrap());
            match *write {
                Write::Verified(channel) => {
                    rt.block_on(mark_present(
                        fx.store.as_ref(),
                        fx.session.id,
                        fx.student.id,
                        channel,
                        RequestMeta::default(),
                        at,
                    ))
                    .unwrap();
                    expected_status = AttendanceStatus::Present;
                    expected_by = channel;
                    expected_at = at;
                }
                Write::Manual(status) => {
                    let changed = rt
                        .block_on(fx.store.upsert_bulk(
                            fx.session.id,
                            vec![BulkEntry { student_id: fx.student.id, status }],
                            MarkedBy::Manual,
                            at,
                            RequestMeta::default(),
                        ))
                        .unwrap();
                    let is_first = i == 0;
                    if is_first || status != expected_status {
                        prop_assert_eq!(changed, 1);
                        expected_status = status;
                        expected_by = MarkedBy::Manual;
                        expected_at = at;
                    } else {
                        prop_assert_eq!(changed, 0);
                    }
                }
            }
        }

        prop_assert_eq!(fx.store.record_count(), 1);
        let record = fx.store.record(fx.session.id, fx.student.id).unwrap();
        prop_assert_eq!(record.status, expected_status);
        prop_assert_eq!(record.marked_by, expected_by);
        prop_assert_eq!(record.marked_at, expected_at);
    }
}
