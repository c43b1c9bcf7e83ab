//! Core events emitted by the engine

use reveille_api::{FireKind, HapticLevel, SoundRef};
use reveille_host_api::WakeRequest;
use reveille_util::{AlarmId, WallClock};

/// Events emitted by the alarm engine
#[derive(Debug, Clone, PartialEq)]
pub enum CoreEvent {
    /// An alarm is due; realize it on the bridge
    AlarmFired {
        alarm_id: AlarmId,
        kind: FireKind,
        label: Option<String>,
        time: WallClock,
        sound: SoundRef,
        snooze_count: u32,
        haptic: HapticLevel,
    },

    /// Ask the host to (re-)schedule the alarm's wake
    WakeRequested(WakeRequest),

    /// Drop any host wake for the alarm
    WakeCancelled { alarm_id: AlarmId },

    /// The stored list changed
    AlarmsChanged { count: usize },

    /// Play a sound sample; no alarm is involved
    PreviewRequested { sound: SoundRef },
}
