//! Schema setup for the LightBnB tables

use sqlx::PgPool;

use crate::error::Result;

/// Create the LightBnB tables and indexes if they do not exist yet.
pub async fn run(pool: &PgPool) -> Result<()> {
    tracing::info!("Running LightBnB migrations...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            password VARCHAR(255) NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create properties table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS properties (
            id SERIAL PRIMARY KEY,
            owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title VARCHAR(255) NOT NULL,
            description TEXT NOT NULL,
            thumbnail_photo_url VARCHAR(255) NOT NULL,
            cover_photo_url VARCHAR(255) NOT NULL,
            cost_per_night INTEGER NOT NULL DEFAULT 0,
            parking_spaces INTEGER NOT NULL DEFAULT 0,
            number_of_bathrooms INTEGER NOT NULL DEFAULT 0,
            number_of_bedrooms INTEGER NOT NULL DEFAULT 0,
            country VARCHAR(255) NOT NULL,
            street VARCHAR(255) NOT NULL,
            city VARCHAR(255) NOT NULL,
            province VARCHAR(255) NOT NULL,
            post_code VARCHAR(255) NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create reservations table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reservations (
            id SERIAL PRIMARY KEY,
            guest_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create property_reviews table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS property_reviews (
            id SERIAL PRIMARY KEY,
            property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
            rating SMALLINT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common queries
    create_indexes(pool).await?;

    tracing::info!("LightBnB migrations complete");
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<()> {
    // Property indexes: the search filters on city, owner, and price
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_properties_city ON properties(city)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_properties_owner ON properties(owner_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_properties_cost ON properties(cost_per_night)")
        .execute(pool)
        .await?;

    // Reservation indexes
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reservations_guest ON reservations(guest_id)")
        .execute(pool)
        .await?;

    // Review indexes: reviews are always aggregated per property
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_property_reviews_property ON property_reviews(property_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
