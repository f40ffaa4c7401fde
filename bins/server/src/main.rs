//! Classiq API Server
//!
//! Main entry point for the attendance verification service.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use classiq_api::{AppState, create_router};
use classiq_core::session::InstitutionClock;
use classiq_db::connect;
use classiq_shared::{AppConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "classiq=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    let tz = config.attendance.time_zone()?;

    // Connect to database
    let db = connect(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    let jwt_service = JwtService::new(config.jwt.clone());

    info!(
        timezone = %tz,
        face_match_threshold = config.attendance.face_match_threshold,
        allowed_networks = ?config.attendance.allowed_networks,
        trust_forwarded_for = config.attendance.trust_forwarded_for,
        "Attendance engine configured"
    );
    let state = AppState::new(&db, jwt_service, InstitutionClock::new(tz), &config.attendance);

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
