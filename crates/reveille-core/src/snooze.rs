//! Per-alarm snooze state machine
//!
//! ```text
//! Idle --first fire--> Fired --interval elapsed--> Fired (anchor refreshed)
//!   ^                    |
//!   +----- dismiss ------+
//! any --disable--> Disabled --enable--> Idle, or Fired with the stale anchor
//! ```

use chrono::{DateTime, Local, Utc};
use reveille_api::Alarm;

/// Where an alarm sits in the snooze cycle, derived from its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnoozeState {
    /// Never fired (or dismissed since)
    Idle,
    /// Has a trigger anchor; may snooze-fire when the interval elapses
    Fired { anchor: DateTime<Utc> },
    Disabled,
}

impl SnoozeState {
    pub fn of(alarm: &Alarm) -> Self {
        if !alarm.enabled {
            return Self::Disabled;
        }
        match alarm.last_triggered {
            Some(anchor) => Self::Fired { anchor },
            None => Self::Idle,
        }
    }
}

/// Record a fire: anchor the cadence at `now` and bump the count.
/// Returns the new count.
pub fn record_fire(alarm: &mut Alarm, now: DateTime<Local>) -> u32 {
    let count = alarm.snooze_count.unwrap_or(0).saturating_add(1);
    alarm.last_triggered = Some(now.with_timezone(&Utc));
    alarm.snooze_count = Some(count);
    count
}

/// Stop ringing: back to Idle without touching `enabled`
pub fn dismiss(alarm: &mut Alarm) {
    alarm.last_triggered = None;
    alarm.snooze_count = None;
}
