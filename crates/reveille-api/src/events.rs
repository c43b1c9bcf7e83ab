//! Event types for reveilled -> client streaming

use chrono::{DateTime, Local};
use reveille_util::{AlarmId, WallClock};
use serde::{Deserialize, Serialize};

use crate::{FireKind, HapticLevel, SoundRef, API_VERSION};

/// Event envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub api_version: u32,
    pub timestamp: DateTime<Local>,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(payload: EventPayload) -> Self {
        Self {
            api_version: API_VERSION,
            timestamp: reveille_util::now(),
            payload,
        }
    }
}

/// All events the service pushes to its client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    /// An alarm is ringing
    AlarmFired {
        alarm_id: AlarmId,
        kind: FireKind,
        label: Option<String>,
        time: WallClock,
        sound: SoundRef,
        /// Fires recorded so far, this one included
        snooze_count: u32,
        haptic: HapticLevel,
    },

    /// A host wake was requested for the alarm's next occurrence
    WakeScheduled {
        alarm_id: AlarmId,
        fire_at: DateTime<Local>,
    },

    WakeCancelled {
        alarm_id: AlarmId,
    },

    /// The stored alarm list changed
    AlarmsChanged {
        count: usize,
    },

    /// A sound sample was handed to the bridge
    SoundPreviewed {
        sound: SoundRef,
    },

    /// Service is shutting down
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CatalogSound;

    #[test]
    fn event_serialization() {
        let event = Event::new(EventPayload::AlarmFired {
            alarm_id: AlarmId::new("a1"),
            kind: FireKind::Snooze,
            label: Some("Gym".into()),
            time: WallClock::new(7, 0).unwrap(),
            sound: SoundRef::Catalog(CatalogSound::Melody),
            snooze_count: 2,
            haptic: HapticLevel::Heavy,
        });

        let json = serde_json::to_string(&event).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.api_version, API_VERSION);
        match parsed.payload {
            EventPayload::AlarmFired {
                kind,
                time,
                sound,
                snooze_count,
                ..
            } => {
                assert_eq!(kind, FireKind::Snooze);
                assert_eq!(time.to_string(), "07:00");
                assert_eq!(sound.as_token(), "melody");
                assert_eq!(snooze_count, 2);
            }
            other => panic!("Expected AlarmFired, got {:?}", other),
        }
    }

    #[test]
    fn unit_event_tag() {
        let value = serde_json::to_value(Event::new(EventPayload::Shutdown)).unwrap();
        assert_eq!(value["payload"]["type"], "shutdown");
    }
}
