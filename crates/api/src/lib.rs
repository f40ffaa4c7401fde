//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for every engine operation
//! - Authentication middleware
//! - Request extractors (principal, client metadata)
//! - Error rendering

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use classiq_core::attendance::AttendanceService;
use classiq_core::face::{FaceService, FaceSettings};
use classiq_core::network::NetworkPolicy;
use classiq_core::qr::{QrService, QrSettings};
use classiq_core::session::{InstitutionClock, SessionService};
use classiq_core::window::WindowService;
use classiq_db::PgStores;
use classiq_shared::{AttendanceConfig, JwtService};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Engine repositories over the connection pool.
    pub stores: Arc<PgStores>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Institution wall clock.
    pub clock: InstitutionClock,
    /// Face matching settings, including the global allow-list.
    pub face: FaceSettings,
    /// QR token lifetimes.
    pub qr: QrSettings,
    /// Take the client address from `X-Forwarded-For`.
    pub trust_forwarded_for: bool,
}

impl AppState {
    /// Wires the engine over `db`.
    ///
    /// Allow-list entries that fail to parse are skipped with a warning.
    #[must_use]
    pub fn new(
        db: &DatabaseConnection,
        jwt_service: JwtService,
        clock: InstitutionClock,
        config: &AttendanceConfig,
    ) -> Self {
        let (allowed_networks, rejected) = NetworkPolicy::from_entries(&config.allowed_networks);
        for entry in rejected {
            tracing::warn!(entry = %entry, "ignoring invalid allowed network");
        }

        Self {
            stores: Arc::new(PgStores::new(db)),
            jwt_service: Arc::new(jwt_service),
            clock,
            face: FaceSettings {
                match_threshold: config.face_match_threshold,
                allowed_networks,
            },
            qr: QrSettings {
                default_expiry_secs: config.qr_default_expiry_secs,
                max_expiry_secs: config.qr_max_expiry_secs,
            },
            trust_forwarded_for: config.trust_forwarded_for,
        }
    }

    /// Session lifecycle manager.
    #[must_use]
    pub fn sessions(&self) -> SessionService<PgStores> {
        SessionService::new(Arc::clone(&self.stores), self.clock)
    }

    /// Window controller.
    #[must_use]
    pub fn windows(&self) -> WindowService<PgStores> {
        WindowService::new(Arc::clone(&self.stores))
    }

    /// QR token service.
    #[must_use]
    pub fn qr_tokens(&self) -> QrService<PgStores> {
        QrService::new(Arc::clone(&self.stores), self.qr)
    }

    /// Face verification engine.
    #[must_use]
    pub fn faces(&self) -> FaceService<PgStores> {
        FaceService::new(Arc::clone(&self.stores), self.face.clone())
    }

    /// Attendance record store.
    #[must_use]
    pub fn attendance(&self) -> AttendanceService<PgStores> {
        AttendanceService::new(Arc::clone(&self.stores))
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
