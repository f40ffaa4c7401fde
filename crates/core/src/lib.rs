//! Attendance verification engine for Classiq.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Every read and write goes through the repository traits in [`store`].
//!
//! # Modules
//!
//! - `session` - Daily class occurrences and their computed status
//! - `window` - Faculty-controlled marking windows
//! - `qr` - Short-lived QR bearer tokens
//! - `face` - Descriptor matching and the verification pipeline
//! - `attendance` - The one-record-per-student sink
//! - `network` - Client address allow-listing

pub mod attendance;
pub mod auth;
pub mod enrollment;
pub mod face;
pub mod network;
pub mod qr;
pub mod session;
pub mod store;
pub mod window;

#[cfg(test)]
mod test_support;

pub use auth::{Principal, Role};
pub use store::{StoreError, Stores};
