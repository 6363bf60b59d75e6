//! Property repository
//!
//! Searches go through the query built in [`crate::search`]; inserts apply
//! the numeric defaults before binding.

use sqlx::PgPool;

use crate::error::Result;
use crate::models::{NewProperty, Property, PropertyListing};
use crate::search::{self, PropertyFilters};

/// Property repository
pub struct PropertyRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PropertyRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Search listings matching the filters, cheapest first.
    ///
    /// Only reviewed properties can match; the aggregation joins reviews
    /// inner, so a listing with no reviews has no average to report.
    pub async fn search(
        &self,
        filters: &PropertyFilters,
        limit: i64,
    ) -> Result<Vec<PropertyListing>> {
        let mut query = search::listing_query(filters, limit);
        let listings = query
            .build_query_as::<PropertyListing>()
            .fetch_all(self.pool)
            .await?;

        Ok(listings)
    }

    /// Insert a listing and return the stored row, id included.
    ///
    /// Omitted numeric fields are written as 0, matching the column defaults.
    pub async fn create(&self, property: &NewProperty) -> Result<Property> {
        let created = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (
                owner_id, title, description, thumbnail_photo_url, cover_photo_url,
                cost_per_night, parking_spaces, number_of_bathrooms, number_of_bedrooms,
                country, street, city, province, post_code
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(property.owner_id)
        .bind(&property.title)
        .bind(&property.description)
        .bind(&property.thumbnail_photo_url)
        .bind(&property.cover_photo_url)
        .bind(property.cost_per_night.unwrap_or(0))
        .bind(property.parking_spaces.unwrap_or(0))
        .bind(property.number_of_bathrooms.unwrap_or(0))
        .bind(property.number_of_bedrooms.unwrap_or(0))
        .bind(&property.country)
        .bind(&property.street)
        .bind(&property.city)
        .bind(&property.province)
        .bind(&property.post_code)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }
}
