use std::path::PathBuf;

use thiserror::Error;

use crate::models::Entity;

/// Errors raised by the record store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be opened, read or written
    #[error("storage unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },

    /// An insert collided with a UNIQUE column
    #[error("duplicate {entity}: {detail}")]
    UniqueConstraintViolation { entity: Entity, detail: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Rejections raised while turning raw form input into a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("{field} must be a number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// More digits than the DECIMAL column keeps
    #[error("{field} allows at most {max_digits} significant digits, got {value:?}")]
    TooPrecise {
        field: &'static str,
        value: String,
        max_digits: u32,
    },
}
