//! Validated settings consumed by the service

use crate::schema::{RawAlertsConfig, RawConfig, RawServiceConfig};
use reveille_api::HapticLevel;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
const DEFAULT_BANNER_SECONDS: u64 = 10;

/// Validated configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub service: ServiceConfig,
    pub alerts: AlertsConfig,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            service: ServiceConfig::from_raw(raw.service),
            alerts: AlertsConfig::from_raw(raw.alerts),
        }
    }

    /// Point the database (and, unless configured separately, exports) elsewhere
    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        if self.service.export_dir == self.service.data_dir {
            self.service.export_dir = data_dir.clone();
        }
        self.service.data_dir = data_dir;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service: ServiceConfig::from_raw(RawServiceConfig::default()),
            alerts: AlertsConfig::from_raw(RawAlertsConfig::default()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub tick_interval: Duration,
}

impl ServiceConfig {
    fn from_raw(raw: RawServiceConfig) -> Self {
        let data_dir = raw.data_dir.unwrap_or_else(reveille_util::default_data_dir);
        Self {
            export_dir: raw.export_dir.unwrap_or_else(|| data_dir.clone()),
            data_dir,
            tick_interval: Duration::from_millis(
                raw.tick_interval_ms.unwrap_or(DEFAULT_TICK_INTERVAL_MS),
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AlertsConfig {
    pub haptic: HapticLevel,
    pub banner_duration: Duration,
    pub banner_seconds: u64,
    pub schedule_native_wakes: bool,
}

impl AlertsConfig {
    fn from_raw(raw: RawAlertsConfig) -> Self {
        let banner_seconds = raw.banner_seconds.unwrap_or(DEFAULT_BANNER_SECONDS);
        Self {
            haptic: raw
                .haptic
                .as_deref()
                .and_then(HapticLevel::parse)
                .unwrap_or_default(),
            banner_duration: Duration::from_secs(banner_seconds),
            banner_seconds,
            schedule_native_wakes: raw.schedule_native_wakes.unwrap_or(true),
        }
    }
}
