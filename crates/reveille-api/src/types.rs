//! Alarm record and supporting types

use chrono::{DateTime, Utc};
use reveille_util::{AlarmId, TimeParseError, WallClock, Weekdays};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Shortest allowed snooze spacing, in minutes
pub const MIN_SNOOZE_INTERVAL: u32 = 1;

/// Longest allowed snooze spacing, in minutes
pub const MAX_SNOOZE_INTERVAL: u32 = 60;

/// Snooze spacing used when a draft does not name one
pub const DEFAULT_SNOOZE_INTERVAL: u32 = 5;

fn default_snooze_interval() -> u32 {
    DEFAULT_SNOOZE_INTERVAL
}

/// A stored interval outside the editable range makes the record malformed
fn deserialize_snooze_interval<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let minutes = u32::deserialize(deserializer)?;
    if (MIN_SNOOZE_INTERVAL..=MAX_SNOOZE_INTERVAL).contains(&minutes) {
        Ok(minutes)
    } else {
        Err(serde::de::Error::custom(format!(
            "snoozeInterval must be {}-{} minutes, got {}",
            MIN_SNOOZE_INTERVAL, MAX_SNOOZE_INTERVAL, minutes
        )))
    }
}

fn always_true() -> bool {
    true
}

/// One configured alarm, exactly as persisted.
///
/// Field names follow the persisted snapshot (`snoozeEnabled`,
/// `lastTriggered`, ...). Absent optionals are omitted on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    pub id: AlarmId,

    pub time: WallClock,

    pub enabled: bool,

    /// Empty means one-shot: rings at the next matching time on any day
    #[serde(default)]
    pub days: Weekdays,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub snooze_enabled: bool,

    /// Minutes between re-fires
    #[serde(
        default = "default_snooze_interval",
        deserialize_with = "deserialize_snooze_interval"
    )]
    pub snooze_interval: u32,

    /// Fires recorded since creation (or the last dismiss)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snooze_count: Option<u32>,

    /// Instant of the most recent fire; anchors the snooze cadence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_triggered: Option<DateTime<Utc>>,

    #[serde(default)]
    pub sound: SoundRef,
}

impl Alarm {
    /// Build a fresh alarm from validated settings. The snooze fields start absent.
    pub fn new(id: AlarmId, settings: AlarmSettings) -> Self {
        Self {
            id,
            time: settings.time,
            enabled: settings.enabled,
            days: settings.days,
            label: settings.label,
            snooze_enabled: settings.snooze_enabled,
            snooze_interval: settings.snooze_interval,
            snooze_count: None,
            last_triggered: None,
            sound: settings.sound,
        }
    }

    /// Overwrite the user-editable fields. `lastTriggered` and `snoozeCount`
    /// are left untouched.
    pub fn apply(&mut self, settings: AlarmSettings) {
        self.time = settings.time;
        self.enabled = settings.enabled;
        self.days = settings.days;
        self.label = settings.label;
        self.snooze_enabled = settings.snooze_enabled;
        self.snooze_interval = settings.snooze_interval;
        self.sound = settings.sound;
    }

    /// One-shot alarms carry no weekday restriction
    pub fn is_one_shot(&self) -> bool {
        self.days.is_empty()
    }

    pub fn snooze_spacing(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.snooze_interval))
    }

    /// Label if set, otherwise the "HH:MM" time
    pub fn display_name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self.time.to_string(),
        }
    }
}

/// The built-in alarm tones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogSound {
    Classic,
    Gentle,
    Urgent,
    Melody,
    Birdsong,
    Chimes,
}

impl CatalogSound {
    pub const ALL: [CatalogSound; 6] = [
        Self::Classic,
        Self::Gentle,
        Self::Urgent,
        Self::Melody,
        Self::Birdsong,
        Self::Chimes,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Gentle => "gentle",
            Self::Urgent => "urgent",
            Self::Melody => "melody",
            Self::Birdsong => "birdsong",
            Self::Chimes => "chimes",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }
}

impl fmt::Display for CatalogSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// What an alarm plays: a catalog tone or an opaque user-supplied token
/// (a file path, a data URL, ...).
///
/// Persisted as a single string; any value that is not a catalog id is custom.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SoundRef {
    Catalog(CatalogSound),
    Custom(String),
}

impl SoundRef {
    pub fn from_token(token: impl Into<String>) -> Self {
        let token = token.into();
        match CatalogSound::from_id(&token) {
            Some(sound) => Self::Catalog(sound),
            None => Self::Custom(token),
        }
    }

    pub fn as_token(&self) -> &str {
        match self {
            Self::Catalog(sound) => sound.id(),
            Self::Custom(token) => token,
        }
    }
}

impl Default for SoundRef {
    fn default() -> Self {
        Self::Catalog(CatalogSound::Classic)
    }
}

impl fmt::Display for SoundRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(sound) => write!(f, "{}", sound),
            Self::Custom(_) => f.write_str("custom"),
        }
    }
}

impl Serialize for SoundRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_token())
    }
}

impl<'de> Deserialize<'de> for SoundRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from_token)
    }
}

/// Catalog entry as shown to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Haptic feedback strength requested on fire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticLevel {
    Light,
    #[default]
    Medium,
    Heavy,
}

impl HapticLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "light" => Some(Self::Light),
            "medium" => Some(Self::Medium),
            "heavy" => Some(Self::Heavy),
            _ => None,
        }
    }
}

/// Why an alarm fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireKind {
    /// The alarm's own time (and weekday) matched
    First,
    /// The snooze interval elapsed since the last fire
    Snooze,
}

/// Errors rejecting user input before it becomes an Alarm
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Invalid time: {0}")]
    InvalidTime(TimeParseError),

    #[error("Invalid days: {0}")]
    InvalidDays(TimeParseError),

    #[error("Snooze interval must be 1-60 minutes, got {0}")]
    SnoozeInterval(u32),

    #[error("Sound cannot be empty")]
    EmptySound,
}

/// Unvalidated alarm fields as entered by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmDraft {
    pub time: String,

    #[serde(default)]
    pub days: Vec<u8>,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub snooze_enabled: bool,

    #[serde(default = "default_snooze_interval")]
    pub snooze_interval: u32,

    #[serde(default)]
    pub sound: Option<String>,

    /// Saving from the editor always (re-)enables the alarm
    #[serde(default = "always_true")]
    pub enabled: bool,
}

impl AlarmDraft {
    pub fn new(time: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            days: Vec::new(),
            label: None,
            snooze_enabled: false,
            snooze_interval: DEFAULT_SNOOZE_INTERVAL,
            sound: None,
            enabled: true,
        }
    }

    /// Check every field against the Alarm invariants
    pub fn validate(&self) -> Result<AlarmSettings, DraftError> {
        let time = WallClock::parse(self.time.trim()).map_err(DraftError::InvalidTime)?;
        let days = Weekdays::from_indices(self.days.iter().copied())
            .map_err(DraftError::InvalidDays)?;

        if !(MIN_SNOOZE_INTERVAL..=MAX_SNOOZE_INTERVAL).contains(&self.snooze_interval) {
            return Err(DraftError::SnoozeInterval(self.snooze_interval));
        }

        let sound = match self.sound.as_deref().map(str::trim) {
            None => SoundRef::default(),
            Some("") => return Err(DraftError::EmptySound),
            Some(token) => SoundRef::from_token(token),
        };

        let label = self
            .label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);

        Ok(AlarmSettings {
            time,
            enabled: self.enabled,
            days,
            label,
            snooze_enabled: self.snooze_enabled,
            snooze_interval: self.snooze_interval,
            sound,
        })
    }
}

/// Validated user-editable alarm fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmSettings {
    pub time: WallClock,
    pub enabled: bool,
    pub days: Weekdays,
    pub label: Option<String>,
    pub snooze_enabled: bool,
    pub snooze_interval: u32,
    pub sound: SoundRef,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_alarm() -> Alarm {
        let mut draft = AlarmDraft::new("07:00");
        draft.days = vec![0, 2, 4];
        draft.label = Some("Gym".into());
        draft.snooze_enabled = true;
        draft.snooze_interval = 10;
        draft.sound = Some("chimes".into());
        Alarm::new(AlarmId::new("1705302000000"), draft.validate().unwrap())
    }

    #[test]
    fn alarm_list_round_trips_field_for_field() {
        let mut fired = sample_alarm();
        fired.snooze_count = Some(3);
        fired.last_triggered = Some(Utc.with_ymd_and_hms(2024, 1, 15, 7, 0, 0).unwrap());

        let mut custom = sample_alarm();
        custom.id = AlarmId::new("custom");
        custom.label = None;
        custom.days = Weekdays::empty();
        custom.sound = SoundRef::Custom("data:audio/wav;base64,UklGRg==".into());

        let alarms = vec![sample_alarm(), fired, custom];
        let json = serde_json::to_string(&alarms).unwrap();
        let parsed: Vec<Alarm> = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, alarms);
    }

    #[test]
    fn alarm_uses_snapshot_field_names() {
        let mut alarm = sample_alarm();
        alarm.snooze_count = Some(1);
        alarm.last_triggered = Some(Utc.with_ymd_and_hms(2024, 1, 15, 7, 0, 0).unwrap());

        let value = serde_json::to_value(&alarm).unwrap();
        assert_eq!(value["time"], "07:00");
        assert_eq!(value["days"], serde_json::json!([0, 2, 4]));
        assert_eq!(value["snoozeEnabled"], true);
        assert_eq!(value["snoozeInterval"], 10);
        assert_eq!(value["snoozeCount"], 1);
        assert_eq!(value["lastTriggered"], "2024-01-15T07:00:00Z");
        assert_eq!(value["sound"], "chimes");
    }

    #[test]
    fn fresh_alarm_omits_snooze_state() {
        let value = serde_json::to_value(sample_alarm()).unwrap();
        assert!(value.get("snoozeCount").is_none());
        assert!(value.get("lastTriggered").is_none());
    }

    #[test]
    fn minimal_snapshot_record_gets_defaults() {
        let json = r#"{"id":"1","time":"06:45","enabled":true,"days":[],"snoozeEnabled":false,"snoozeInterval":5}"#;
        let alarm: Alarm = serde_json::from_str(json).unwrap();
        assert_eq!(alarm.sound, SoundRef::Catalog(CatalogSound::Classic));
        assert!(alarm.is_one_shot());
        assert_eq!(alarm.display_name(), "06:45");
    }

    #[test]
    fn snapshot_interval_out_of_range_is_rejected() {
        for interval in [0, 61, 500] {
            let json = format!(
                r#"{{"id":"1","time":"07:00","enabled":true,"snoozeEnabled":true,"snoozeInterval":{}}}"#,
                interval
            );
            assert!(serde_json::from_str::<Alarm>(&json).is_err());
        }

        let json = r#"{"id":"1","time":"07:00","enabled":true,"snoozeInterval":60}"#;
        let alarm: Alarm = serde_json::from_str(json).unwrap();
        assert_eq!(alarm.snooze_interval, 60);
    }

    #[test]
    fn sound_ref_classifies_tokens() {
        assert_eq!(SoundRef::from_token("urgent"), SoundRef::Catalog(CatalogSound::Urgent));
        assert_eq!(
            SoundRef::from_token("/home/me/rooster.ogg"),
            SoundRef::Custom("/home/me/rooster.ogg".into())
        );
        // Catalog ids are case-sensitive
        assert_eq!(SoundRef::from_token("Urgent"), SoundRef::Custom("Urgent".into()));
    }

    #[test]
    fn draft_validation_rejects_bad_fields() {
        let mut draft = AlarmDraft::new("25:00");
        assert!(matches!(draft.validate(), Err(DraftError::InvalidTime(_))));

        draft.time = "07:30".into();
        draft.days = vec![7];
        assert!(matches!(draft.validate(), Err(DraftError::InvalidDays(_))));

        draft.days = vec![1, 1, 3];
        draft.snooze_interval = 0;
        assert_eq!(draft.validate(), Err(DraftError::SnoozeInterval(0)));

        draft.snooze_interval = 61;
        assert_eq!(draft.validate(), Err(DraftError::SnoozeInterval(61)));

        draft.snooze_interval = 60;
        draft.sound = Some("  ".into());
        assert_eq!(draft.validate(), Err(DraftError::EmptySound));

        draft.sound = None;
        let settings = draft.validate().unwrap();
        assert_eq!(settings.days.indices(), vec![1, 3]);
    }

    #[test]
    fn draft_blank_label_becomes_absent() {
        let mut draft = AlarmDraft::new("08:00");
        draft.label = Some("   ".into());
        assert_eq!(draft.validate().unwrap().label, None);

        draft.label = Some(" Meeting ".into());
        assert_eq!(draft.validate().unwrap().label.as_deref(), Some("Meeting"));
    }

    #[test]
    fn draft_defaults_enable_the_alarm() {
        let draft: AlarmDraft = serde_json::from_str(r#"{"time":"08:00"}"#).unwrap();
        assert!(draft.enabled);
        assert_eq!(draft.snooze_interval, DEFAULT_SNOOZE_INTERVAL);
    }

    #[test]
    fn apply_keeps_snooze_anchor() {
        let mut alarm = sample_alarm();
        let anchor = Utc.with_ymd_and_hms(2024, 1, 15, 7, 0, 0).unwrap();
        alarm.last_triggered = Some(anchor);
        alarm.snooze_count = Some(2);

        alarm.apply(AlarmDraft::new("09:15").validate().unwrap());

        assert_eq!(alarm.time.to_string(), "09:15");
        assert_eq!(alarm.last_triggered, Some(anchor));
        assert_eq!(alarm.snooze_count, Some(2));
    }

    #[test]
    fn haptic_level_parsing() {
        assert_eq!(HapticLevel::parse("Heavy"), Some(HapticLevel::Heavy));
        assert_eq!(HapticLevel::parse("buzz"), None);
        assert_eq!(serde_json::to_string(&HapticLevel::Light).unwrap(), "\"light\"");
    }
}
