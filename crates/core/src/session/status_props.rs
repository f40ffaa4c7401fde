//! Property-based tests for session status computation.

use chrono::{Duration, NaiveDate, NaiveTime};
use proptest::prelude::*;

use super::status::compute_status;
use super::types::SessionStatus;

fn arb_time() -> impl Strategy<Value = NaiveTime> {
    (0u32..24, 0u32..60).prop_map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap())
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Past dates are always completed, future dates always scheduled.
    #[test]
    fn prop_other_dates_ignore_clock(
        offset in 1i64..400,
        start in arb_time(),
        end in arb_time(),
        now in arb_time(),
    ) {
        let today = base_date() + Duration::days(200);
        let now = today.and_time(now);

        prop_assert_eq!(
            compute_status(today - Duration::days(offset), start, end, now),
            SessionStatus::Completed
        );
        prop_assert_eq!(
            compute_status(today + Duration::days(offset), start, end, now),
            SessionStatus::Scheduled
        );
    }

    /// For a same-day class, "ongoing" is exactly the half-open interval.
    #[test]
    fn prop_same_day_ongoing_iff_inside_interval(
        start in arb_time(),
        end in arb_time(),
        now in arb_time(),
    ) {
        prop_assume!(start <= end);
        let today = base_date();
        let status = compute_status(today, start, end, today.and_time(now));

        let inside = now >= start && now < end;
        prop_assert_eq!(status == SessionStatus::Ongoing, inside);
        prop_assert_eq!(status == SessionStatus::Completed, now >= end);
    }

    /// A midnight-spanning class is never completed on its own date.
    #[test]
    fn prop_spanning_class_never_completes_same_day(
        start in arb_time(),
        end in arb_time(),
        now in arb_time(),
    ) {
        prop_assume!(start > end);
        let today = base_date();
        let status = compute_status(today, start, end, today.and_time(now));

        prop_assert_ne!(status, SessionStatus::Completed);
        prop_assert_eq!(status == SessionStatus::Ongoing, now >= start);
    }
}
