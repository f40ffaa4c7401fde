//! Institution-local time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Converts instants into the institution's wall-clock time.
#[derive(Debug, Clone, Copy)]
pub struct InstitutionClock {
    tz: Tz,
}

impl InstitutionClock {
    /// Creates a clock for the given zone.
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// The configured zone.
    #[must_use]
    pub const fn tz(&self) -> Tz {
        self.tz
    }

    /// Local wall-clock date and time at `now`.
    #[must_use]
    pub fn local(&self, now: DateTime<Utc>) -> NaiveDateTime {
        now.with_timezone(&self.tz).naive_local()
    }

    /// Local calendar date at `now`.
    #[must_use]
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.local(now).date()
    }
}

impl Default for InstitutionClock {
    fn default() -> Self {
        Self::new(chrono_tz::Asia::Kolkata)
    }
}
