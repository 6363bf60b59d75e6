//! Data-access layer for the LightBnB vacation-rental application.
//!
//! The crate is organized around a single [`Store`] trait that names every
//! operation the application performs: user lookup and registration, a
//! guest's completed reservations, and property search and creation.
//! [`PgStore`] implements it over a shared [`sqlx::PgPool`];
//! [`MemoryStore`] implements it over plain `Vec`s for tests. Connection
//! settings come from [`DatabaseConfig`] rather than literals in the code.

pub mod config;
pub mod error;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod repos;
pub mod search;
pub mod store;

pub use config::DatabaseConfig;
pub use error::{DbError, Result};
pub use memory::MemoryStore;
pub use models::{
    NewProperty, NewUser, Property, PropertyListing, Reservation, ReservationSummary, Review, User,
};
pub use pool::{connect, create_pool, create_pool_with_options};
pub use search::PropertyFilters;
pub use store::{PasswordMode, PgStore, Store, DEFAULT_LIMIT, PLACEHOLDER_PASSWORD};
