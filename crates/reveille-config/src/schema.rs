//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    #[serde(default)]
    pub service: RawServiceConfig,

    #[serde(default)]
    pub alerts: RawAlertsConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawServiceConfig {
    /// Directory holding the alarm database
    pub data_dir: Option<PathBuf>,

    /// Where exported alarm lists are written (default: data_dir)
    pub export_dir: Option<PathBuf>,

    /// Scheduler tick period in milliseconds (default: 1000)
    pub tick_interval_ms: Option<u64>,
}

/// How a fired alarm is presented
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawAlertsConfig {
    /// "light", "medium" or "heavy" (default: medium)
    pub haptic: Option<String>,

    /// How long the banner stays up, in seconds (default: 10)
    pub banner_seconds: Option<u64>,

    /// Ask the host to pre-schedule wakes for enabled alarms (default: true)
    pub schedule_native_wakes: Option<bool>,
}
