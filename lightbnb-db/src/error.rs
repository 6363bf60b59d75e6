//! Error types for the LightBnB data layer.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DbError>;

/// Failures surfaced by the data-access layer.
///
/// Driver-level problems (connection loss, SQL errors, row decoding) are
/// wrapped as [`DbError::Sqlx`]. Configuration and uniqueness problems get
/// their own variants so callers can branch without string matching.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("configuration error: {reason}")]
    Config { reason: String },

    #[error("duplicate {resource}: {value}")]
    Duplicate { resource: &'static str, value: String },
}

impl DbError {
    pub fn config(reason: impl Into<String>) -> Self {
        DbError::Config {
            reason: reason.into(),
        }
    }

    pub fn duplicate(resource: &'static str, value: impl Into<String>) -> Self {
        DbError::Duplicate {
            resource,
            value: value.into(),
        }
    }

    /// True when the failure is a uniqueness conflict, either detected by the
    /// in-memory store or reported by Postgres as SQLSTATE 23505.
    pub fn is_duplicate(&self) -> bool {
        match self {
            DbError::Duplicate { .. } => true,
            DbError::Sqlx(err) => err
                .as_database_error()
                .and_then(|db| db.code())
                .as_deref()
                == Some("23505"),
            DbError::Config { .. } => false,
        }
    }
}
