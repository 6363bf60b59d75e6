//! Repository layer
//!
//! One repository per table, each borrowing the shared [`sqlx::PgPool`].
//! Repositories hold no state of their own; they are cheap to construct per
//! call.

pub mod properties;
pub mod reservations;
pub mod users;

pub use properties::PropertyRepo;
pub use reservations::ReservationRepo;
pub use users::UserRepo;
