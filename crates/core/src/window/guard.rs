//! The marking-time window check shared by both verification paths.

use chrono::{DateTime, Utc};

use super::error::WindowError;
use super::types::{AttendanceWindow, VerificationMethod};

/// Returns the window if it is open at `now` and accepts `method`.
///
/// # Errors
///
/// `Closed` if there is no window or it lapsed, `WrongMethod` if it is open
/// for the other method only.
pub fn require_open(
    window: Option<AttendanceWindow>,
    method: VerificationMethod,
    now: DateTime<Utc>,
) -> Result<AttendanceWindow, WindowError> {
    let window = window
        .filter(|w| w.is_open_at(now))
        .ok_or(WindowError::Closed)?;

    if !window.method.accepts(method) {
        return Err(WindowError::WrongMethod {
            accepted: window.method,
        });
    }
    Ok(window)
}
