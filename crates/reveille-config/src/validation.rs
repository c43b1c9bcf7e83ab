//! Configuration validation

use crate::schema::RawConfig;
use reveille_api::HapticLevel;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Accepted tick periods, in milliseconds
pub const TICK_INTERVAL_RANGE_MS: RangeInclusive<u64> = 100..=30_000;

/// Accepted banner durations, in seconds
pub const BANNER_SECONDS_RANGE: RangeInclusive<u64> = 1..=300;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("service.tick_interval_ms must be 100-30000, got {0}")]
    TickInterval(u64),

    #[error("alerts.haptic must be light, medium or heavy, got '{0}'")]
    HapticLevel(String),

    #[error("alerts.banner_seconds must be 1-300, got {0}")]
    BannerSeconds(u64),

    #[error("service.{field} cannot be empty")]
    EmptyPath { field: &'static str },
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let service = &config.service;
    if let Some(ms) = service.tick_interval_ms
        && !TICK_INTERVAL_RANGE_MS.contains(&ms)
    {
        errors.push(ValidationError::TickInterval(ms));
    }
    if service.data_dir.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
        errors.push(ValidationError::EmptyPath { field: "data_dir" });
    }
    if service.export_dir.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
        errors.push(ValidationError::EmptyPath { field: "export_dir" });
    }

    let alerts = &config.alerts;
    if let Some(haptic) = &alerts.haptic
        && HapticLevel::parse(haptic).is_none()
    {
        errors.push(ValidationError::HapticLevel(haptic.clone()));
    }
    if let Some(secs) = alerts.banner_seconds
        && !BANNER_SECONDS_RANGE.contains(&secs)
    {
        errors.push(ValidationError::BannerSeconds(secs));
    }

    errors
}
