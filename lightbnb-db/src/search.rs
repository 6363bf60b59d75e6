//! Property search filters and the query that applies them.
//!
//! The filter set mirrors the search form: every field optional, all active
//! filters ANDed together. The query is assembled with `sqlx::QueryBuilder`
//! from a fixed skeleton, so there is exactly one `WHERE` clause no matter
//! which combination of filters is active, and every value is bound rather
//! than spliced into the SQL text.

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

/// Optional criteria for narrowing a property search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilters {
    /// Substring match on the city, case-insensitive.
    pub city: Option<String>,
    /// Restrict to one owner's listings.
    pub owner_id: Option<i32>,
    /// Lowest acceptable nightly price, in whole currency units.
    pub minimum_price_per_night: Option<i32>,
    /// Highest acceptable nightly price, in whole currency units.
    pub maximum_price_per_night: Option<i32>,
    /// Keep only properties whose average review rating reaches this value.
    pub minimum_rating: Option<i16>,
}

impl PropertyFilters {
    /// Minimum price converted to the stored cents scale.
    ///
    /// Widened to `i64` so the conversion holds any `i32` price; Postgres
    /// compares the `integer` column against a `bigint` bind directly.
    pub fn minimum_cents(&self) -> Option<i64> {
        self.minimum_price_per_night
            .map(|price| i64::from(price) * 100)
    }

    /// Maximum price converted to the stored cents scale.
    pub fn maximum_cents(&self) -> Option<i64> {
        self.maximum_price_per_night
            .map(|price| i64::from(price) * 100)
    }
}

/// Build the listing search query for the given filters.
///
/// The skeleton always reads `... WHERE 1=1`, and each active filter appends
/// an `AND` predicate with a bound parameter. The rating filter applies to
/// the per-property average, so it lands in `HAVING` after the `GROUP BY`
/// rather than in `WHERE`. Rows decode into
/// [`PropertyListing`](crate::models::PropertyListing), cheapest first.
pub fn listing_query(filters: &PropertyFilters, limit: i64) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "SELECT properties.*, avg(property_reviews.rating)::float8 AS average_rating \
         FROM properties \
         JOIN property_reviews ON property_reviews.property_id = properties.id \
         WHERE 1=1",
    );

    if let Some(city) = &filters.city {
        builder.push(" AND properties.city ILIKE ");
        builder.push_bind(format!("%{city}%"));
    }
    if let Some(owner_id) = filters.owner_id {
        builder.push(" AND properties.owner_id = ");
        builder.push_bind(owner_id);
    }
    if let Some(minimum) = filters.minimum_cents() {
        builder.push(" AND properties.cost_per_night >= ");
        builder.push_bind(minimum);
    }
    if let Some(maximum) = filters.maximum_cents() {
        builder.push(" AND properties.cost_per_night <= ");
        builder.push_bind(maximum);
    }

    builder.push(" GROUP BY properties.id");

    if let Some(rating) = filters.minimum_rating {
        builder.push(" HAVING avg(property_reviews.rating) >= ");
        builder.push_bind(rating);
    }

    builder.push(" ORDER BY properties.cost_per_night LIMIT ");
    builder.push_bind(limit);

    builder
}
