//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Postgres implementations of the engine's repository traits
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use migration::Migrator;
pub use repositories::PgStores;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool to the database, keeping at least
/// `min_connections` idle connections open.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    Database::connect(pool_options(database_url, max_connections, min_connections)).await
}

fn pool_options(database_url: &str, max_connections: u32, min_connections: u32) -> ConnectOptions {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(max_connections)
        .min_connections(min_connections.min(max_connections))
        .sqlx_logging(false);
    options
}
