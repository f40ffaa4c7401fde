//! Attendance window controller.
//!
//! A window is the faculty's authorization to mark attendance for one
//! session via one method. At most one window per session is active; it ends
//! on explicit close or, lazily, once `closes_at` has passed. Both
//! verification paths re-check the window at the moment they mark.

mod error;
mod guard;
mod service;
mod types;

#[cfg(test)]
mod guard_props;

pub use error::WindowError;
pub use guard::require_open;
pub use service::{WindowRepository, WindowService};
pub use types::{
    AttendanceWindow, MAX_WINDOW_MINUTES, NewWindow, OpenWindowInput, VerificationMethod,
    WindowMethod, WindowStatus,
};
