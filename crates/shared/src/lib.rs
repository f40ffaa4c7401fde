//! Shared types, errors, and configuration for Classiq.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token validation

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::{AppConfig, AttendanceConfig, JwtConfig};
pub use error::AppError;
pub use jwt::{JwtError, JwtService};

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
