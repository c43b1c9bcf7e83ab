//! Next-occurrence computation for host wakes

use chrono::{DateTime, Days, Local, TimeZone};
use reveille_util::WallClock;

/// The instant a host wake should be set for: today at `time`, or tomorrow
/// if that is not after `now`.
///
/// The weekday set is not consulted; a recurring alarm's wake may land on a
/// day it does not ring, and is re-armed after each first fire.
pub fn next_occurrence(time: WallClock, now: DateTime<Local>) -> DateTime<Local> {
    let today = now.date_naive().and_time(time.to_naive_time());
    let candidate = resolve_local(today, now);
    if candidate > now {
        return candidate;
    }

    match today.checked_add_days(Days::new(1)) {
        Some(tomorrow) => resolve_local(tomorrow, now),
        None => candidate,
    }
}

fn resolve_local(naive: chrono::NaiveDateTime, now: DateTime<Local>) -> DateTime<Local> {
    match Local.from_local_datetime(&naive).earliest() {
        Some(dt) => dt,
        // Skipped by a clock change; keep the nominal distance from now
        None => now + naive.signed_duration_since(now.naive_local()),
    }
}
