//! Property-based tests for lazy window expiry.

use chrono::{Duration, TimeZone, Utc};
use classiq_shared::types::{SessionId, UserId, WindowId};
use proptest::prelude::*;

use super::guard::require_open;
use super::types::{AttendanceWindow, VerificationMethod, WindowMethod};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A timed window is open strictly before `closes_at` and closed from it
    /// onwards, whatever the stored flag says.
    #[test]
    fn prop_timed_window_expires_lazily(
        duration in 1i64..600,
        elapsed_secs in 0i64..(700 * 60),
    ) {
        let opened = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let window = AttendanceWindow {
            id: WindowId::new(),
            session_id: SessionId::new(),
            opened_by: UserId::new(),
            method: WindowMethod::Both,
            opens_at: opened,
            closes_at: Some(opened + Duration::minutes(duration)),
            is_active: true,
            allowed_network: None,
        };
        let now = opened + Duration::seconds(elapsed_secs);

        let open = require_open(Some(window), VerificationMethod::Face, now).is_ok();
        prop_assert_eq!(open, elapsed_secs < duration * 60);
    }

    /// A manual window never lapses on its own.
    #[test]
    fn prop_manual_window_stays_open(elapsed_days in 0i64..3650) {
        let opened = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let window = AttendanceWindow {
            id: WindowId::new(),
            session_id: SessionId::new(),
            opened_by: UserId::new(),
            method: WindowMethod::Qr,
            opens_at: opened,
            closes_at: None,
            is_active: true,
            allowed_network: None,
        };
        let now = opened + Duration::days(elapsed_days);
        prop_assert!(require_open(Some(window), VerificationMethod::Qr, now).is_ok());
    }
}
