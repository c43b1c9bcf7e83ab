//! Notification bridge traits

use async_trait::async_trait;
use chrono::{DateTime, Local};
use reveille_api::HapticLevel;
use reveille_util::{AlarmId, WallClock};
use std::time::Duration;
use thiserror::Error;

use crate::{BridgeCapabilities, PlayableSound};

/// Errors from bridge operations
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Not supported on this host: {0}")]
    Unsupported(&'static str),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<BridgeError> for reveille_util::ReveilleError {
    fn from(e: BridgeError) -> Self {
        reveille_util::ReveilleError::bridge(e.to_string())
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;

/// Ask the host to surface an alarm at an absolute instant even if the
/// service is not running then
#[derive(Debug, Clone, PartialEq)]
pub struct WakeRequest {
    pub alarm_id: AlarmId,
    pub time: WallClock,
    pub label: Option<String>,
    pub fire_at: DateTime<Local>,
}

impl WakeRequest {
    pub fn fire_at_epoch_millis(&self) -> i64 {
        self.fire_at.timestamp_millis()
    }

    /// Banner body shown by the host wake
    pub fn body(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("Alarm at {}", self.time),
        }
    }
}

/// Realize one alarm fire
#[derive(Debug, Clone, PartialEq)]
pub struct FireRequest {
    pub alarm_id: AlarmId,
    pub label: Option<String>,
    pub time: WallClock,
    pub sound: PlayableSound,
    pub haptic: HapticLevel,
    /// How long the banner should stay visible
    pub banner_duration: Duration,
}

impl FireRequest {
    /// Banner headline: the label, or the alarm time when unlabelled
    pub fn title(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("Alarm {}", self.time),
        }
    }
}

/// Notification bridge trait - implemented by platform-specific bridges.
///
/// Implementations degrade silently when a capability is missing; errors are
/// reported back only so the caller can log them.
#[async_trait]
pub trait NotificationBridge: Send + Sync {
    /// Get the capabilities of this bridge
    fn capabilities(&self) -> &BridgeCapabilities;

    /// Pre-schedule a host wake. Re-scheduling the same alarm replaces the
    /// previous wake.
    async fn schedule_wake(&self, request: WakeRequest) -> BridgeResult<()>;

    /// Remove any host wake for the alarm. Unknown ids are a no-op.
    async fn cancel_wake(&self, alarm_id: AlarmId) -> BridgeResult<()>;

    /// Play the sound, show the banner and (optionally) vibrate
    async fn fire(&self, request: FireRequest) -> BridgeResult<()>;

    /// Play a sound on its own, as a sample for the picker
    async fn preview_sound(&self, sound: PlayableSound) -> BridgeResult<()>;

    /// Optional: check if the bridge is healthy
    fn is_healthy(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn wake(label: Option<&str>) -> WakeRequest {
        WakeRequest {
            alarm_id: AlarmId::new("a1"),
            time: WallClock::new(6, 5).unwrap(),
            label: label.map(str::to_string),
            fire_at: Local.with_ymd_and_hms(2024, 1, 16, 6, 5, 0).unwrap(),
        }
    }

    #[test]
    fn wake_body_falls_back_to_time() {
        assert_eq!(wake(None).body(), "Alarm at 06:05");
        assert_eq!(wake(Some("Flight")).body(), "Flight");
    }

    #[test]
    fn wake_epoch_millis() {
        let request = wake(None);
        assert_eq!(
            request.fire_at_epoch_millis(),
            request.fire_at.timestamp() * 1000
        );
    }
}
