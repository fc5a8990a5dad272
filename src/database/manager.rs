use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATE_PRODUCTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id          UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name        TEXT NOT NULL,
    description TEXT,
    price       NUMERIC(17, 2) NOT NULL CHECK (price >= 0)
)
"#;

/// Connection pool setup and schema bootstrap for the products database
pub struct DatabaseManager;

impl DatabaseManager {
    /// Build a pool from the `database` config section. Fails if DATABASE_URL is unset.
    pub async fn from_config(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        Self::connect(url, config.max_connections, config.connection_timeout).await
    }

    pub async fn connect(
        url: &str,
        max_connections: u32,
        connection_timeout_secs: u64,
    ) -> Result<PgPool, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(connection_timeout_secs))
            .connect(url)
            .await?;

        info!("Created database pool (max_connections={})", max_connections);
        Ok(pool)
    }

    /// Create the products table if it does not exist yet
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_PRODUCTS_TABLE)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

        info!("Products schema is up to date");
        Ok(())
    }

    pub async fn close(pool: PgPool) {
        pool.close().await;
        info!("Closed database pool");
    }
}
