//! Session lifecycle.
//!
//! A session is one dated occurrence of a recurring class. Sessions are
//! created lazily (insert-ignore on `(class_id, session_date)`) and carry a
//! status that is recomputed from the class schedule on every read. The
//! computed status is advisory; verification is gated by attendance windows.

mod clock;
mod error;
mod service;
mod status;
mod types;

#[cfg(test)]
mod status_props;

pub use clock::InstitutionClock;
pub use error::SessionError;
pub use service::{SessionRepository, SessionService};
pub use status::compute_status;
pub use types::{ClassSchedule, ClassSession, NewSession, SessionContext, SessionStatus, SessionView};
