//! Pure session status computation.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::types::SessionStatus;

const fn minute_of_day(hour: u32, minute: u32) -> u32 {
    hour * 60 + minute
}

fn minutes(time: NaiveTime) -> u32 {
    minute_of_day(time.hour(), time.minute())
}

/// Computes a session's status at `now` (institution-local).
///
/// Earlier dates are completed and later dates are scheduled. On the session
/// date, class hours form the half-open interval `[start, end)` at minute
/// resolution. When `end < start` the class spans midnight and counts as
/// ongoing from `start` until the end of the day.
#[must_use]
pub fn compute_status(
    session_date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    now: NaiveDateTime,
) -> SessionStatus {
    let today = now.date();
    if session_date < today {
        return SessionStatus::Completed;
    }
    if session_date > today {
        return SessionStatus::Scheduled;
    }

    let now_min = minutes(now.time());
    let start_min = minutes(start);
    let end_min = minutes(end);

    if start_min > end_min {
        if now_min >= start_min {
            SessionStatus::Ongoing
        } else {
            SessionStatus::Scheduled
        }
    } else if now_min >= end_min {
        SessionStatus::Completed
    } else if now_min >= start_min {
        SessionStatus::Ongoing
    } else {
        SessionStatus::Scheduled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[rstest]
    #[case(t(8, 59), SessionStatus::Scheduled)]
    #[case(t(9, 0), SessionStatus::Ongoing)]
    #[case(t(9, 59), SessionStatus::Ongoing)]
    #[case(t(10, 0), SessionStatus::Completed)]
    #[case(t(23, 0), SessionStatus::Completed)]
    fn test_same_day_half_open_interval(#[case] now: NaiveTime, #[case] expected: SessionStatus) {
        let status = compute_status(day(), t(9, 0), t(10, 0), day().and_time(now));
        assert_eq!(status, expected);
    }

    #[rstest]
    #[case(t(20, 59), SessionStatus::Scheduled)]
    #[case(t(21, 0), SessionStatus::Ongoing)]
    #[case(t(23, 59), SessionStatus::Ongoing)]
    #[case(t(0, 30), SessionStatus::Scheduled)]
    fn test_midnight_spanning_class(#[case] now: NaiveTime, #[case] expected: SessionStatus) {
        let status = compute_status(day(), t(21, 0), t(1, 0), day().and_time(now));
        assert_eq!(status, expected);
    }

    #[test]
    fn test_other_dates() {
        let now = day().and_time(t(9, 30));
        let yesterday = day().pred_opt().unwrap();
        let tomorrow = day().succ_opt().unwrap();

        assert_eq!(
            compute_status(yesterday, t(9, 0), t(10, 0), now),
            SessionStatus::Completed
        );
        assert_eq!(
            compute_status(tomorrow, t(9, 0), t(10, 0), now),
            SessionStatus::Scheduled
        );
    }

    #[test]
    fn test_seconds_are_ignored() {
        let now = day().and_hms_opt(9, 59, 59).unwrap();
        assert_eq!(
            compute_status(day(), t(9, 0), t(10, 0), now),
            SessionStatus::Ongoing
        );
    }
}
