//! In-memory [`Store`] for tests and offline development.
//!
//! Keeps plain `Vec`s behind a mutex and reimplements each query's observable
//! behavior: the same filters, the same ordering, the same defaults. Ids are
//! assigned per table the way SERIAL columns would.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::error::{DbError, Result};
use crate::models::{
    NewProperty, NewUser, Property, PropertyListing, Reservation, ReservationSummary, Review, User,
};
use crate::search::PropertyFilters;
use crate::store::{effective_limit, PasswordMode, Store};

#[derive(Debug, Default)]
struct Inner {
    users: Vec<User>,
    properties: Vec<Property>,
    reservations: Vec<Reservation>,
    reviews: Vec<Review>,
    next_user_id: i32,
    next_property_id: i32,
    next_reservation_id: i32,
    next_review_id: i32,
}

/// An in-memory [`Store`] backed by mutex-guarded `Vec`s.
///
/// Users and properties enter through the [`Store`] methods, exactly as
/// production code would add them. Reservations and reviews have no insert
/// operation in this layer, so test setup records them through
/// [`MemoryStore::add_reservation`] and [`MemoryStore::add_review`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    passwords: PasswordMode,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_password_mode(passwords: PasswordMode) -> Self {
        Self {
            passwords,
            ..Self::default()
        }
    }

    /// Record a booking directly. Test setup only.
    pub fn add_reservation(
        &self,
        guest_id: i32,
        property_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Reservation {
        let mut inner = self.inner.lock().unwrap();
        let id = next_id(&mut inner.next_reservation_id);
        let reservation = Reservation {
            id,
            guest_id,
            property_id,
            start_date,
            end_date,
        };
        inner.reservations.push(reservation.clone());
        reservation
    }

    /// Record a review directly. Test setup only.
    pub fn add_review(&self, property_id: i32, rating: i16) -> Review {
        let mut inner = self.inner.lock().unwrap();
        let id = next_id(&mut inner.next_review_id);
        let review = Review {
            id,
            property_id,
            rating,
        };
        inner.reviews.push(review.clone());
        review
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn user_with_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|user| user.email == email).cloned())
    }

    async fn user_with_id(&self, id: i32) -> Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|user| user.id == id).cloned())
    }

    async fn add_user(&self, user: NewUser) -> Result<User> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .users
            .iter()
            .any(|existing| existing.email == user.email)
        {
            return Err(DbError::duplicate("user email", user.email));
        }
        let id = next_id(&mut inner.next_user_id);
        let stored = User {
            id,
            name: user.name,
            email: user.email,
            password: self.passwords.stored(&user.password).to_string(),
        };
        inner.users.push(stored.clone());
        Ok(stored)
    }

    async fn reservations_for_guest(
        &self,
        guest_id: i32,
        limit: Option<i64>,
    ) -> Result<Vec<ReservationSummary>> {
        let inner = self.inner.lock().unwrap();
        let today = Utc::now().date_naive();

        let mut stays: Vec<ReservationSummary> = inner
            .reservations
            .iter()
            .filter(|reservation| reservation.guest_id == guest_id && reservation.end_date < today)
            .filter_map(|reservation| {
                let property = inner
                    .properties
                    .iter()
                    .find(|property| property.id == reservation.property_id)?;
                // The review join is inner: stays at unreviewed properties drop out.
                let average = average_rating(&inner.reviews, property.id)?;
                Some(summarize(reservation.clone(), property, average))
            })
            .collect();

        stays.sort_by_key(|stay| stay.reservation.start_date);
        stays.truncate(effective_limit(limit) as usize);
        Ok(stays)
    }

    async fn search_properties(
        &self,
        filters: &PropertyFilters,
        limit: Option<i64>,
    ) -> Result<Vec<PropertyListing>> {
        let inner = self.inner.lock().unwrap();

        let mut listings: Vec<PropertyListing> = inner
            .properties
            .iter()
            .filter_map(|property| {
                let average = average_rating(&inner.reviews, property.id)?;
                matches(filters, property, average).then(|| PropertyListing {
                    property: property.clone(),
                    average_rating: average,
                })
            })
            .collect();

        // Ties broken by id so equal prices list in a stable order.
        listings.sort_by_key(|listing| (listing.property.cost_per_night, listing.property.id));
        listings.truncate(effective_limit(limit) as usize);
        Ok(listings)
    }

    async fn add_property(&self, property: NewProperty) -> Result<Property> {
        let mut inner = self.inner.lock().unwrap();
        let id = next_id(&mut inner.next_property_id);
        let stored = Property {
            id,
            owner_id: property.owner_id,
            title: property.title,
            description: property.description,
            thumbnail_photo_url: property.thumbnail_photo_url,
            cover_photo_url: property.cover_photo_url,
            cost_per_night: property.cost_per_night.unwrap_or(0),
            parking_spaces: property.parking_spaces.unwrap_or(0),
            number_of_bathrooms: property.number_of_bathrooms.unwrap_or(0),
            number_of_bedrooms: property.number_of_bedrooms.unwrap_or(0),
            country: property.country,
            street: property.street,
            city: property.city,
            province: property.province,
            post_code: property.post_code,
        };
        inner.properties.push(stored.clone());
        Ok(stored)
    }
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

fn average_rating(reviews: &[Review], property_id: i32) -> Option<f64> {
    let ratings: Vec<f64> = reviews
        .iter()
        .filter(|review| review.property_id == property_id)
        .map(|review| f64::from(review.rating))
        .collect();
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
}

fn matches(filters: &PropertyFilters, property: &Property, average_rating: f64) -> bool {
    if let Some(city) = &filters.city {
        if !property.city.to_lowercase().contains(&city.to_lowercase()) {
            return false;
        }
    }
    if let Some(owner_id) = filters.owner_id {
        if property.owner_id != owner_id {
            return false;
        }
    }
    if let Some(minimum) = filters.minimum_cents() {
        if i64::from(property.cost_per_night) < minimum {
            return false;
        }
    }
    if let Some(maximum) = filters.maximum_cents() {
        if i64::from(property.cost_per_night) > maximum {
            return false;
        }
    }
    if let Some(rating) = filters.minimum_rating {
        if average_rating < f64::from(rating) {
            return false;
        }
    }
    true
}

fn summarize(
    reservation: Reservation,
    property: &Property,
    average_rating: f64,
) -> ReservationSummary {
    ReservationSummary {
        reservation,
        owner_id: property.owner_id,
        title: property.title.clone(),
        description: property.description.clone(),
        thumbnail_photo_url: property.thumbnail_photo_url.clone(),
        cover_photo_url: property.cover_photo_url.clone(),
        cost_per_night: property.cost_per_night,
        parking_spaces: property.parking_spaces,
        number_of_bathrooms: property.number_of_bathrooms,
        number_of_bedrooms: property.number_of_bedrooms,
        country: property.country.clone(),
        street: property.street.clone(),
        city: property.city.clone(),
        province: property.province.clone(),
        post_code: property.post_code.clone(),
        average_rating,
    }
}
