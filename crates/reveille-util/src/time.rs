//! Time utilities for reveille
//!
//! Alarms are defined in local wall-clock terms: a minute-resolution "HH:MM"
//! time of day plus a set of weekdays. Snooze spacing, on the other hand, is
//! plain elapsed duration and never looks at the calendar.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `REVEILLE_MOCK_TIME` environment variable can be set
//! to override the system time for all time-sensitive operations. This is
//! useful for watching an alarm ring without waiting for it.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-12-25 06:59:50`)
//!
//! Example:
//! ```bash
//! REVEILLE_MOCK_TIME="2025-12-25 06:59:50" cargo run -p reveilled
//! ```

use bitflags::bitflags;
use chrono::{DateTime, Datelike, Local, NaiveDateTime, NaiveTime, TimeZone, Timelike, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "REVEILLE_MOCK_TIME";

/// Format accepted by [`MOCK_TIME_ENV_VAR`]
pub const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Cached mock time offset from the real time when the process started.
/// This allows mock time to advance naturally.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

#[allow(clippy::disallowed_methods)] // This is the internal implementation that wraps Local::now()
fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                if let Ok(naive_dt) = NaiveDateTime::parse_from_str(&mock_time_str, MOCK_TIME_FORMAT) {
                    if let Some(mock_dt) = Local.from_local_datetime(&naive_dt).single() {
                        let offset = mock_dt.signed_duration_since(Local::now());
                        tracing::info!(
                            mock_time = %mock_time_str,
                            offset_secs = offset.num_seconds(),
                            "Mock time enabled"
                        );
                        return Some(offset);
                    }
                    tracing::warn!(
                        mock_time = %mock_time_str,
                        "Failed to convert mock time to local timezone"
                    );
                } else {
                    tracing::warn!(
                        mock_time = %mock_time_str,
                        expected_format = MOCK_TIME_FORMAT,
                        "Invalid mock time format"
                    );
                }
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
#[allow(clippy::disallowed_methods)] // This is the wrapper that provides mock time support
pub fn now() -> DateTime<Local> {
    let real_now = Local::now();

    match get_mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// Format a DateTime as the "HH:MM" string alarms are compared against.
pub fn format_clock_time(dt: &DateTime<Local>) -> String {
    dt.format("%H:%M").to_string()
}

/// Whether two instants fall in the same local calendar minute.
pub fn same_minute(a: &DateTime<Local>, b: &DateTime<Local>) -> bool {
    a.date_naive() == b.date_naive() && a.hour() == b.hour() && a.minute() == b.minute()
}

/// Errors from parsing wall-clock and weekday values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("expected HH:MM, got '{0}'")]
    Format(String),

    #[error("hour must be 00-23, got {0}")]
    Hour(u8),

    #[error("minute must be 00-59, got {0}")]
    Minute(u8),

    #[error("weekday index must be 0 (Monday) to 6 (Sunday), got {0}")]
    WeekdayIndex(u8),
}

/// A minute-resolution 24h time of day, written "HH:MM"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WallClock {
    pub hour: u8,
    pub minute: u8,
}

impl WallClock {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Parse the zero-padded "HH:MM" form.
    pub fn parse(s: &str) -> Result<Self, TimeParseError> {
        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(TimeParseError::Format(s.to_string()));
        }

        let hour: u8 = s[0..2]
            .parse()
            .map_err(|_| TimeParseError::Format(s.to_string()))?;
        let minute: u8 = s[3..5]
            .parse()
            .map_err(|_| TimeParseError::Format(s.to_string()))?;

        if hour >= 24 {
            return Err(TimeParseError::Hour(hour));
        }
        if minute >= 60 {
            return Err(TimeParseError::Minute(minute));
        }

        Ok(Self { hour, minute })
    }

    /// The wall-clock minute of a local instant (seconds truncated)
    pub fn of(dt: &DateTime<Local>) -> Self {
        Self::from_naive_time(dt.time())
    }

    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }

    /// Returns minutes since midnight
    pub fn as_minutes_from_midnight(&self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }
}

impl fmt::Display for WallClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for WallClock {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialOrd for WallClock {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WallClock {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_minutes_from_midnight()
            .cmp(&other.as_minutes_from_midnight())
    }
}

impl Serialize for WallClock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WallClock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Map a Sunday=0 day number to the Monday=0 index used by alarms.
pub fn weekday_index_from_sunday_based(native_day: u8) -> u8 {
    (native_day + 6) % 7
}

/// Today's alarm weekday index (0=Monday..6=Sunday) for a local instant.
pub fn weekday_index(dt: &DateTime<Local>) -> u8 {
    weekday_index_from_sunday_based(dt.weekday().num_days_from_sunday() as u8)
}

bitflags! {
    /// Set of weekdays an alarm recurs on, indexed 0=Monday..6=Sunday.
    ///
    /// Serialized as a sorted array of indices, e.g. `[0, 2, 4]`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Weekdays: u8 {
        const MONDAY = 1 << 0;
        const TUESDAY = 1 << 1;
        const WEDNESDAY = 1 << 2;
        const THURSDAY = 1 << 3;
        const FRIDAY = 1 << 4;
        const SATURDAY = 1 << 5;
        const SUNDAY = 1 << 6;
    }
}

impl Weekdays {
    pub const WORKWEEK: Weekdays = Weekdays::MONDAY
        .union(Weekdays::TUESDAY)
        .union(Weekdays::WEDNESDAY)
        .union(Weekdays::THURSDAY)
        .union(Weekdays::FRIDAY);
    pub const WEEKENDS: Weekdays = Weekdays::SATURDAY.union(Weekdays::SUNDAY);

    /// The single-day set for an index, if the index is valid
    pub fn from_index(index: u8) -> Option<Self> {
        if index < 7 {
            Some(Self::from_bits_retain(1 << index))
        } else {
            None
        }
    }

    /// Build a set from indices; duplicates collapse.
    pub fn from_indices<I>(indices: I) -> Result<Self, TimeParseError>
    where
        I: IntoIterator<Item = u8>,
    {
        indices.into_iter().try_fold(Self::empty(), |set, index| {
            Self::from_index(index)
                .map(|day| set | day)
                .ok_or(TimeParseError::WeekdayIndex(index))
        })
    }

    pub fn contains_index(&self, index: u8) -> bool {
        Self::from_index(index).is_some_and(|day| self.contains(day))
    }

    pub fn contains_weekday(&self, weekday: Weekday) -> bool {
        self.contains_index(weekday.num_days_from_monday() as u8)
    }

    /// Sorted list of member indices
    pub fn indices(&self) -> Vec<u8> {
        (0..7).filter(|i| self.contains_index(*i)).collect()
    }
}

impl Default for Weekdays {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for Weekdays {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.indices().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Weekdays {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let indices = Vec::<u8>::deserialize(deserializer)?;
        Self::from_indices(indices).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_clock_parse() {
        assert_eq!(WallClock::parse("07:00").unwrap(), WallClock::new(7, 0).unwrap());
        assert_eq!(WallClock::parse("00:00").unwrap(), WallClock::new(0, 0).unwrap());
        assert_eq!(WallClock::parse("23:59").unwrap(), WallClock::new(23, 59).unwrap());

        assert_eq!(WallClock::parse("24:00"), Err(TimeParseError::Hour(24)));
        assert_eq!(WallClock::parse("12:60"), Err(TimeParseError::Minute(60)));
        assert!(matches!(WallClock::parse("7:00"), Err(TimeParseError::Format(_))));
        assert!(matches!(WallClock::parse("07-00"), Err(TimeParseError::Format(_))));
        assert!(matches!(WallClock::parse("ab:cd"), Err(TimeParseError::Format(_))));
        assert!(matches!(WallClock::parse(""), Err(TimeParseError::Format(_))));
    }

    #[test]
    fn test_wall_clock_display_is_zero_padded() {
        assert_eq!(WallClock::new(7, 5).unwrap().to_string(), "07:05");
        assert_eq!(WallClock::new(0, 0).unwrap().to_string(), "00:00");
    }

    #[test]
    fn test_wall_clock_ordering() {
        let morning = WallClock::new(8, 0).unwrap();
        let noon = WallClock::new(12, 0).unwrap();
        assert!(morning < noon);
    }

    #[test]
    fn test_wall_clock_of_truncates_seconds() {
        let dt = Local.with_ymd_and_hms(2024, 1, 15, 7, 0, 59).unwrap();
        assert_eq!(WallClock::of(&dt), WallClock::new(7, 0).unwrap());
        assert_eq!(format_clock_time(&dt), "07:00");
    }

    #[test]
    fn test_wall_clock_serde() {
        let t = WallClock::new(6, 30).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"06:30\"");
        assert_eq!(serde_json::from_str::<WallClock>(&json).unwrap(), t);
        assert!(serde_json::from_str::<WallClock>("\"25:00\"").is_err());
    }

    #[test]
    fn test_weekday_index_remaps_sunday_based_numbering() {
        // Sunday=0 natively becomes 6, Monday=1 becomes 0
        assert_eq!(weekday_index_from_sunday_based(0), 6);
        assert_eq!(weekday_index_from_sunday_based(1), 0);
        assert_eq!(weekday_index_from_sunday_based(6), 5);

        // 2024-01-15 is a Monday, 2024-01-21 a Sunday
        let monday = Local.with_ymd_and_hms(2024, 1, 15, 7, 0, 0).unwrap();
        let sunday = Local.with_ymd_and_hms(2024, 1, 21, 7, 0, 0).unwrap();
        assert_eq!(weekday_index(&monday), 0);
        assert_eq!(weekday_index(&sunday), 6);
    }

    #[test]
    fn test_weekday_index_agrees_with_chrono() {
        for day in 15..22 {
            let dt = Local.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap();
            assert_eq!(
                weekday_index(&dt),
                dt.weekday().num_days_from_monday() as u8
            );
        }
    }

    #[test]
    fn test_weekdays_from_indices() {
        let days = Weekdays::from_indices([1, 2, 3, 4, 5]).unwrap();
        assert!(!days.contains_index(0));
        assert!(days.contains_index(1));
        assert!(days.contains_index(5));
        assert!(!days.contains_index(6));
        assert!(days.contains_weekday(Weekday::Sat));
        assert!(!days.contains_weekday(Weekday::Mon));

        assert_eq!(
            Weekdays::from_indices([7]),
            Err(TimeParseError::WeekdayIndex(7))
        );
    }

    #[test]
    fn test_weekdays_presets() {
        assert_eq!(Weekdays::WORKWEEK.indices(), vec![0, 1, 2, 3, 4]);
        assert_eq!(Weekdays::WEEKENDS.indices(), vec![5, 6]);
        assert!(Weekdays::default().is_empty());
    }

    #[test]
    fn test_weekdays_serde_sorted_and_deduplicated() {
        let days: Weekdays = serde_json::from_str("[4, 0, 4, 2]").unwrap();
        assert_eq!(serde_json::to_string(&days).unwrap(), "[0,2,4]");

        let empty: Weekdays = serde_json::from_str("[]").unwrap();
        assert!(empty.is_empty());

        assert!(serde_json::from_str::<Weekdays>("[9]").is_err());
    }

    #[test]
    fn test_same_minute() {
        let a = Local.with_ymd_and_hms(2024, 1, 15, 7, 0, 1).unwrap();
        let b = Local.with_ymd_and_hms(2024, 1, 15, 7, 0, 58).unwrap();
        let c = Local.with_ymd_and_hms(2024, 1, 15, 7, 1, 0).unwrap();
        let d = Local.with_ymd_and_hms(2024, 1, 16, 7, 0, 1).unwrap();

        assert!(same_minute(&a, &b));
        assert!(!same_minute(&a, &c));
        assert!(!same_minute(&a, &d));
    }

    #[test]
    fn test_parse_mock_time_format() {
        assert!(NaiveDateTime::parse_from_str("2025-12-25 06:59:50", MOCK_TIME_FORMAT).is_ok());
        assert!(NaiveDateTime::parse_from_str("2025-12-25T06:59:50", MOCK_TIME_FORMAT).is_err());
        assert!(NaiveDateTime::parse_from_str("06:59", MOCK_TIME_FORMAT).is_err());
    }

    #[test]
    fn test_now_returns_time() {
        let t = now();
        assert!(t.year() >= 2020);
        assert!(t.year() <= 2100);
    }
}
