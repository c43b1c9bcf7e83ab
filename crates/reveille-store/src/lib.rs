//! Persistence layer for reveille
//!
//! Provides:
//! - Key-value slots (the alarm list lives under [`ALARMS_KEY`])
//! - Audit log (append-only)

mod audit;
mod sqlite;
mod traits;

pub use audit::*;
pub use sqlite::*;
pub use traits::*;

use thiserror::Error;

/// Well-known slot holding the JSON alarm list
pub const ALARMS_KEY: &str = "alarms";

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<StoreError> for reveille_util::ReveilleError {
    fn from(e: StoreError) -> Self {
        reveille_util::ReveilleError::store(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
