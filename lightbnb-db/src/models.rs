//! Row types and input records for the LightBnB schema.
//!
//! Entities derive both `serde` traits and `sqlx::FromRow`, so the same
//! structs move between Postgres rows and JSON output. The `New*` structs
//! carry caller-supplied fields for inserts; ids are always assigned by the
//! store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ==== Users ====

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Stored as plain text in the legacy schema. What actually gets written
    /// here is decided by [`crate::store::PasswordMode`].
    pub password: String,
}

/// Fields required to register a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

// ==== Properties ====

/// A rental listing as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Property {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Nightly price in cents.
    pub cost_per_night: i32,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
}

/// Fields for creating a listing. Omitted numeric fields are stored as 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProperty {
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Nightly price in cents.
    pub cost_per_night: Option<i32>,
    pub parking_spaces: Option<i32>,
    pub number_of_bathrooms: Option<i32>,
    pub number_of_bedrooms: Option<i32>,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
}

/// A property row joined with its aggregated review score.
///
/// Produced by the search query, which groups on `properties.id` and averages
/// `property_reviews.rating`. Serialized flat, so JSON consumers see the
/// property columns alongside `average_rating`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PropertyListing {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub property: Property,
    pub average_rating: f64,
}

// ==== Reservations & reviews ====

/// A booking made by a guest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: i32,
    pub guest_id: i32,
    pub property_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// One row of a guest's completed-stay listing: the reservation, the property
/// it was for (every column except the property's own id, which would collide
/// with the reservation id), and the property's average review rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ReservationSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub reservation: Reservation,
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i32,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub average_rating: f64,
}

/// A guest's star rating for a property. Read only through aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i32,
    pub property_id: i32,
    pub rating: i16,
}
