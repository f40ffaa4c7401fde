//! QR token service.
//!
//! Issues one live bearer token per session. A token stays redeemable by any
//! enrolled student until it expires or a newer token supersedes it.

mod error;
mod service;
mod token;
mod types;

pub use error::QrError;
pub use service::{QrSettings, QrService, QrTokenRepository};
pub use token::generate_token;
pub use types::{IssuedToken, NewQrToken, QrRedemption, QrToken};
