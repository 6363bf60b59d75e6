//! The storage seam: one trait covering every operation the application
//! performs, a Postgres implementation, and the password policy for
//! registration.
//!
//! Callers depend on [`Store`], never on a concrete backend, so tests can
//! swap in [`MemoryStore`](crate::memory::MemoryStore) without a running
//! database.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::Result;
use crate::models::{NewProperty, NewUser, Property, PropertyListing, ReservationSummary, User};
use crate::repos::{PropertyRepo, ReservationRepo, UserRepo};
use crate::search::PropertyFilters;

/// Rows returned by the listing operations when the caller does not say
/// otherwise.
pub const DEFAULT_LIMIT: i64 = 10;

/// Normalize a caller-supplied limit before it reaches a backend.
///
/// `None` means [`DEFAULT_LIMIT`]. Negative limits ask for nothing and
/// clamp to zero; Postgres would reject them as invalid SQL, and the two
/// backends must answer the same call the same way.
pub(crate) fn effective_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).max(0)
}

/// What registration writes to the password column when
/// [`PasswordMode::FixedPlaceholder`] is active.
pub const PLACEHOLDER_PASSWORD: &str = "password";

/// How registration treats the password a caller supplies.
///
/// Registration has historically discarded the submitted password and stored
/// the literal string `"password"` for every account. Deployed datasets rely
/// on that value, so the behavior survives as the default, but as a declared
/// mode rather than a buried assignment. Opt into [`PasswordMode::Supplied`]
/// to store what the caller sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordMode {
    /// Ignore the supplied password and store [`PLACEHOLDER_PASSWORD`].
    #[default]
    FixedPlaceholder,
    /// Store the supplied password as given.
    Supplied,
}

impl PasswordMode {
    /// Resolve the value to write for a supplied password.
    pub fn stored<'a>(&self, supplied: &'a str) -> &'a str {
        match self {
            PasswordMode::FixedPlaceholder => PLACEHOLDER_PASSWORD,
            PasswordMode::Supplied => supplied,
        }
    }
}

/// Everything the application asks of its storage backend.
#[async_trait]
pub trait Store: Send + Sync {
    /// Find the user registered under exactly this email, if any.
    async fn user_with_email(&self, email: &str) -> Result<Option<User>>;

    /// Find a user by primary key, if present.
    async fn user_with_id(&self, id: i32) -> Result<Option<User>>;

    /// Register a user and return the stored row.
    ///
    /// What lands in the password column is decided by the backend's
    /// [`PasswordMode`].
    async fn add_user(&self, user: NewUser) -> Result<User>;

    /// A guest's completed stays, oldest first. `None` means
    /// [`DEFAULT_LIMIT`]; a negative limit yields no rows.
    async fn reservations_for_guest(
        &self,
        guest_id: i32,
        limit: Option<i64>,
    ) -> Result<Vec<ReservationSummary>>;

    /// Reviewed listings matching the filters, cheapest first. `None` means
    /// [`DEFAULT_LIMIT`]; a negative limit yields no rows.
    async fn search_properties(
        &self,
        filters: &PropertyFilters,
        limit: Option<i64>,
    ) -> Result<Vec<PropertyListing>>;

    /// Create a listing and return the stored row.
    async fn add_property(&self, property: NewProperty) -> Result<Property>;
}

/// The production [`Store`], backed by Postgres through the shared pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    passwords: PasswordMode,
}

impl PgStore {
    /// Wrap a pool with the default [`PasswordMode`].
    pub fn new(pool: PgPool) -> Self {
        Self::with_password_mode(pool, PasswordMode::default())
    }

    pub fn with_password_mode(pool: PgPool, passwords: PasswordMode) -> Self {
        Self { pool, passwords }
    }

    /// The underlying pool, for callers that run their own queries.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn user_with_email(&self, email: &str) -> Result<Option<User>> {
        UserRepo::new(&self.pool).find_by_email(email).await
    }

    async fn user_with_id(&self, id: i32) -> Result<Option<User>> {
        UserRepo::new(&self.pool).find_by_id(id).await
    }

    async fn add_user(&self, user: NewUser) -> Result<User> {
        let password = self.passwords.stored(&user.password);
        UserRepo::new(&self.pool)
            .create(&user.name, &user.email, password)
            .await
    }

    async fn reservations_for_guest(
        &self,
        guest_id: i32,
        limit: Option<i64>,
    ) -> Result<Vec<ReservationSummary>> {
        ReservationRepo::new(&self.pool)
            .completed_for_guest(guest_id, effective_limit(limit))
            .await
    }

    async fn search_properties(
        &self,
        filters: &PropertyFilters,
        limit: Option<i64>,
    ) -> Result<Vec<PropertyListing>> {
        PropertyRepo::new(&self.pool)
            .search(filters, effective_limit(limit))
            .await
    }

    async fn add_property(&self, property: NewProperty) -> Result<Property> {
        PropertyRepo::new(&self.pool).create(&property).await
    }
}
