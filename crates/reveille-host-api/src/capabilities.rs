//! Bridge capabilities model

use serde::{Deserialize, Serialize};

/// Describes what a notification bridge can do on this host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeCapabilities {
    /// Can play catalog tones or custom sounds
    pub can_play_sound: bool,

    /// Can show a visible banner/notification
    pub can_show_banner: bool,

    /// Can vibrate
    pub can_haptic: bool,

    /// Can ask the host to wake us (or notify) at an absolute instant
    pub can_schedule_wake: bool,
}

impl BridgeCapabilities {
    /// Nothing available; every call degrades to logging
    pub fn none() -> Self {
        Self {
            can_play_sound: false,
            can_show_banner: false,
            can_haptic: false,
            can_schedule_wake: false,
        }
    }

    /// Everything available
    pub fn full() -> Self {
        Self {
            can_play_sound: true,
            can_show_banner: true,
            can_haptic: true,
            can_schedule_wake: true,
        }
    }
}

impl Default for BridgeCapabilities {
    fn default() -> Self {
        Self::none()
    }
}
