//! User repository
//!
//! Lookups return `Ok(None)` when no row matches; a missing user is an
//! expected outcome, not an error.

use sqlx::PgPool;

use crate::error::Result;
use crate::models::User;

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a user by exact email address.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Look up a user by primary key.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>("SELECT id, name, email, password FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(user)
    }

    /// Insert a user and return the stored row, id included.
    ///
    /// The password arrives here already resolved by the store's
    /// [`PasswordMode`](crate::store::PasswordMode); this method writes
    /// exactly what it is given.
    pub async fn create(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password)
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }
}
