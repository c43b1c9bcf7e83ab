//! Error types for reveille

use thiserror::Error;

use crate::AlarmId;

/// Core error type for reveille operations
#[derive(Debug, Error)]
pub enum ReveilleError {
    #[error("Alarm not found: {0}")]
    AlarmNotFound(AlarmId),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Bridge error: {0}")]
    BridgeError(String),

    #[error("Export error: {0}")]
    ExportError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReveilleError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreError(msg.into())
    }

    pub fn bridge(msg: impl Into<String>) -> Self {
        Self::BridgeError(msg.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::ExportError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ReveilleError>;
