//! Due-time evaluation

use chrono::{DateTime, Local};
use reveille_api::{Alarm, FireKind};
use reveille_util::{WallClock, same_minute, weekday_index};

use crate::SnoozeState;

/// What an alarm should do at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireDecision {
    None,
    First,
    Snooze,
}

impl FireDecision {
    pub fn kind(self) -> Option<FireKind> {
        match self {
            Self::None => None,
            Self::First => Some(FireKind::First),
            Self::Snooze => Some(FireKind::Snooze),
        }
    }
}

/// Whether the alarm's own time and weekday match `now`.
///
/// True for the whole matching minute; an empty day set matches every day.
pub fn is_first_fire_due(alarm: &Alarm, now: &DateTime<Local>) -> bool {
    if alarm.time != WallClock::of(now) {
        return false;
    }
    if !alarm.is_one_shot() && !alarm.days.contains_index(weekday_index(now)) {
        return false;
    }
    // Already rang during this very minute
    !alarm
        .last_triggered
        .is_some_and(|last| same_minute(&last.with_timezone(&Local), now))
}

/// Whether the snooze interval has elapsed since the last fire.
///
/// Independent of time and weekday; there is no cap on re-fires. Only a
/// [`SnoozeState::Fired`] alarm can be due.
pub fn is_snooze_due(alarm: &Alarm, now: &DateTime<Local>) -> bool {
    if !alarm.snooze_enabled {
        return false;
    }
    match SnoozeState::of(alarm) {
        SnoozeState::Fired { anchor } => {
            now.signed_duration_since(anchor) >= alarm.snooze_spacing()
        }
        SnoozeState::Idle | SnoozeState::Disabled => false,
    }
}

/// Decide whether `alarm` fires at `now`. Disabled alarms never fire, and a
/// first fire wins when both conditions hold.
pub fn should_fire(alarm: &Alarm, now: DateTime<Local>) -> FireDecision {
    if !alarm.enabled {
        FireDecision::None
    } else if is_first_fire_due(alarm, &now) {
        FireDecision::First
    } else if is_snooze_due(alarm, &now) {
        FireDecision::Snooze
    } else {
        FireDecision::None
    }
}
