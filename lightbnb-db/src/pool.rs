//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. One pool is shared by
//! every repository; sqlx hands out connections per query and returns them
//! when the future completes.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::error::Result;

/// Default maximum connections for the pool.
/// Kept low for a single web process.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Create a PostgreSQL connection pool.
///
/// # Arguments
///
/// * `database_url` - PostgreSQL connection string
///
/// # Errors
///
/// Returns an error if the connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/lightbnb").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    create_pool_with_options(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Create a PostgreSQL connection pool with custom options.
///
/// # Arguments
///
/// * `database_url` - PostgreSQL connection string
/// * `max_connections` - Maximum number of connections in the pool
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Open a pool from a [`DatabaseConfig`].
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = create_pool_with_options(&config.url(), config.max_connections).await?;
    Ok(pool)
}
