//! Error types for model operations.

use thiserror::Error;

/// Errors that can occur while reading or writing records.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A database operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The requested row does not exist.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// The kind of row that was looked up (`user`, `planet`, ...).
        entity: &'static str,
        /// The key used for the lookup.
        key: String,
    },

    /// A uniqueness rule rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A field failed validation before reaching the database.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// The offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// Email/password pair did not match an active account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Hashing or parsing a stored password hash failed.
    #[error("password hash error: {0}")]
    PasswordHash(String),

    /// Reference data could not be decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reference data file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ModelError {
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}
