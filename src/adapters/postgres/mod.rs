//! PostgreSQL adapters - document-store implementations of the membership ports.
//!
//! - `PostgresMemberRepository` - member documents, upsert on save
//! - `PostgresPlanCatalog` - plan documents, validated on load

mod member_repository;
mod plan_catalog;

pub use member_repository::PostgresMemberRepository;
pub use plan_catalog::PostgresPlanCatalog;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::domain::foundation::DomainError;

/// Opens a connection pool sized from configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::database(format!("Failed to connect: {}", e)))?;

    tracing::info!(max_connections = config.max_connections, "PostgreSQL connection pool established");
    Ok(pool)
}

/// Applies the bundled migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), DomainError> {
    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DomainError::database(format!("Migration failed: {}", e)))?;
    tracing::info!("Database migrations completed");
    Ok(())
}
