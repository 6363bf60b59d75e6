//! Reservation repository

use sqlx::PgPool;

use crate::error::Result;
use crate::models::ReservationSummary;

/// Reservation repository
pub struct ReservationRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ReservationRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a guest's completed stays, oldest first.
    ///
    /// A stay counts as completed once its end date is strictly before
    /// today, by the database server's clock. Each row carries the booked
    /// property's columns and its average review rating. The review join is
    /// inner, so stays at never-reviewed properties do not appear.
    pub async fn completed_for_guest(
        &self,
        guest_id: i32,
        limit: i64,
    ) -> Result<Vec<ReservationSummary>> {
        let stays = sqlx::query_as::<_, ReservationSummary>(
            r#"
            SELECT
                reservations.id,
                reservations.guest_id,
                reservations.property_id,
                reservations.start_date,
                reservations.end_date,
                properties.owner_id,
                properties.title,
                properties.description,
                properties.thumbnail_photo_url,
                properties.cover_photo_url,
                properties.cost_per_night,
                properties.parking_spaces,
                properties.number_of_bathrooms,
                properties.number_of_bedrooms,
                properties.country,
                properties.street,
                properties.city,
                properties.province,
                properties.post_code,
                avg(property_reviews.rating)::float8 AS average_rating
            FROM properties
            JOIN reservations ON reservations.property_id = properties.id
            JOIN property_reviews ON property_reviews.property_id = properties.id
            WHERE reservations.guest_id = $1
              AND reservations.end_date < now()::date
            GROUP BY properties.id, reservations.id
            ORDER BY reservations.start_date
            LIMIT $2
            "#,
        )
        .bind(guest_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(stays)
    }
}
