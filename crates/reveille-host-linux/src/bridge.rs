//! Linux notification bridge implementation

use async_trait::async_trait;
use chrono::{DateTime, Local};
use reveille_api::CatalogSound;
use reveille_host_api::{
    BridgeCapabilities, BridgeError, BridgeResult, FireRequest, NotificationBridge,
    PlayableSound, WakeRequest,
};
use reveille_util::AlarmId;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::DesktopTools;

const APP_NAME: &str = "reveille";
const WAKE_TITLE: &str = "⏰ Alarm";

/// Systemd unit name for an alarm's host wake. Characters systemd would
/// escape are replaced so the name stays predictable.
pub fn wake_unit_name(alarm_id: &AlarmId) -> String {
    let sanitized: String = alarm_id
        .as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("reveille-wake-{}", sanitized)
}

/// `OnCalendar=` value for a single absolute instant
pub fn on_calendar_spec(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Freedesktop sound-theme event played for each catalog tone
pub fn canberra_event(sound: CatalogSound) -> &'static str {
    match sound {
        CatalogSound::Classic => "alarm-clock-elapsed",
        CatalogSound::Gentle => "complete",
        CatalogSound::Urgent => "suspend-error",
        CatalogSound::Melody => "message-new-instant",
        CatalogSound::Birdsong => "phone-incoming-call",
        CatalogSound::Chimes => "bell",
    }
}

/// A custom token is playable only when it names a readable file
pub fn custom_sound_path(token: &str) -> Option<PathBuf> {
    let path = Path::new(token);
    if path.is_absolute() && path.is_file() {
        Some(path.to_path_buf())
    } else {
        None
    }
}

/// Linux desktop bridge
pub struct LinuxBridge {
    capabilities: BridgeCapabilities,
    tools: DesktopTools,
}

impl LinuxBridge {
    /// Create a bridge, probing the host for helpers
    pub fn new() -> Self {
        Self::with_tools(DesktopTools::detect())
    }

    pub fn with_tools(tools: DesktopTools) -> Self {
        Self {
            capabilities: tools.capabilities(),
            tools,
        }
    }

    async fn run(program: &str, args: &[String]) -> BridgeResult<()> {
        debug!(program, ?args, "Running helper");
        let output = Command::new(program).args(args).output().await?;
        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(BridgeError::CommandFailed(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )))
        }
    }

    async fn show_banner(&self, request: &FireRequest) -> BridgeResult<()> {
        let body = request.time.to_string();
        if !self.tools.notify_send {
            info!(title = %request.title(), body = %body, "Alarm banner");
            return Ok(());
        }

        let args = vec![
            format!("--app-name={}", APP_NAME),
            "--urgency=critical".to_string(),
            format!("--expire-time={}", request.banner_duration.as_millis()),
            format!("⏰ {}", request.title()),
            body,
        ];
        Self::run("notify-send", &args).await
    }

    async fn play_catalog(&self, sound: CatalogSound) -> BridgeResult<()> {
        if !self.tools.canberra {
            debug!(sound = %sound, "canberra-gtk-play unavailable, skipping tone");
            return Ok(());
        }
        let args = vec![
            "-i".to_string(),
            canberra_event(sound).to_string(),
            "-d".to_string(),
            APP_NAME.to_string(),
        ];
        Self::run("canberra-gtk-play", &args).await
    }

    async fn play_sound(&self, sound: &PlayableSound) -> BridgeResult<()> {
        match sound {
            PlayableSound::Tone { sound, spec } => {
                debug!(
                    sound = %sound,
                    duration_ms = spec.total_duration().as_millis() as u64,
                    "Playing catalog tone"
                );
                self.play_catalog(*sound).await
            }
            PlayableSound::Custom { token } => match custom_sound_path(token) {
                Some(path) if self.tools.paplay => {
                    let args = vec![path.display().to_string()];
                    Self::run("paplay", &args).await
                }
                _ => {
                    debug!("Custom sound not playable here, using default tone");
                    self.play_catalog(CatalogSound::Classic).await
                }
            },
        }
    }
}

impl Default for LinuxBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationBridge for LinuxBridge {
    fn capabilities(&self) -> &BridgeCapabilities {
        &self.capabilities
    }

    async fn schedule_wake(&self, request: WakeRequest) -> BridgeResult<()> {
        if !self.tools.systemd_run {
            return Err(BridgeError::Unsupported("schedule_wake"));
        }

        let unit = wake_unit_name(&request.alarm_id);

        // Replace any earlier timer for this alarm
        if let Err(e) = self.cancel_wake(request.alarm_id.clone()).await {
            debug!(unit = %unit, error = %e, "No previous wake to replace");
        }

        let args = vec![
            "--user".to_string(),
            format!("--unit={}", unit),
            format!("--on-calendar={}", on_calendar_spec(&request.fire_at)),
            "--timer-property=AccuracySec=1s".to_string(),
            "notify-send".to_string(),
            format!("--app-name={}", APP_NAME),
            "--urgency=critical".to_string(),
            WAKE_TITLE.to_string(),
            request.body(),
        ];
        Self::run("systemd-run", &args).await?;

        info!(
            alarm_id = %request.alarm_id,
            unit = %unit,
            fire_at = %request.fire_at,
            "Host wake scheduled"
        );
        Ok(())
    }

    async fn cancel_wake(&self, alarm_id: AlarmId) -> BridgeResult<()> {
        if !self.tools.systemctl {
            return Ok(());
        }

        let timer = format!("{}.timer", wake_unit_name(&alarm_id));
        let args = vec!["--user".to_string(), "stop".to_string(), timer.clone()];
        // Stopping a unit that does not exist fails; that is the no-op case
        if let Err(e) = Self::run("systemctl", &args).await {
            debug!(timer = %timer, error = %e, "Nothing to cancel");
        }
        Ok(())
    }

    async fn fire(&self, request: FireRequest) -> BridgeResult<()> {
        let (banner, sound) = tokio::join!(
            self.show_banner(&request),
            self.play_sound(&request.sound)
        );

        if !self.capabilities.can_haptic {
            debug!(haptic = ?request.haptic, "Haptic feedback unsupported, skipped");
        }

        if let Err(e) = &sound {
            warn!(alarm_id = %request.alarm_id, error = %e, "Alarm sound failed");
        }
        banner.and(sound)
    }

    async fn preview_sound(&self, sound: PlayableSound) -> BridgeResult<()> {
        self.play_sound(&sound).await
    }

    fn is_healthy(&self) -> bool {
        self.capabilities.can_show_banner || self.capabilities.can_play_sound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reveille_api::HapticLevel;
    use reveille_util::WallClock;
    use std::time::Duration;

    #[test]
    fn unit_name_is_sanitized() {
        assert_eq!(
            wake_unit_name(&AlarmId::new("3f2a-b_9")),
            "reveille-wake-3f2a-b_9"
        );
        assert_eq!(
            wake_unit_name(&AlarmId::new("a b/c.d")),
            "reveille-wake-a_b_c_d"
        );
    }

    #[test]
    fn calendar_spec_is_absolute() {
        let at = Local.with_ymd_and_hms(2024, 1, 16, 7, 5, 0).unwrap();
        assert_eq!(on_calendar_spec(&at), "2024-01-16 07:05:00");
    }

    #[test]
    fn every_catalog_sound_has_an_event() {
        for sound in CatalogSound::ALL {
            assert!(!canberra_event(sound).is_empty());
        }
    }

    #[test]
    fn custom_sound_must_be_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("rooster.ogg");
        std::fs::write(&file, b"OggS").unwrap();

        assert_eq!(custom_sound_path(file.to_str().unwrap()), Some(file.clone()));
        assert_eq!(custom_sound_path("data:audio/wav;base64,UklGRg=="), None);
        assert_eq!(custom_sound_path("relative.ogg"), None);
        assert_eq!(
            custom_sound_path(dir.path().join("missing.ogg").to_str().unwrap()),
            None
        );
    }

    #[tokio::test]
    async fn degrades_without_tools() {
        let bridge = LinuxBridge::with_tools(DesktopTools::default());

        let request = FireRequest {
            alarm_id: AlarmId::new("a1"),
            label: Some("Wake".into()),
            time: WallClock::new(7, 0).unwrap(),
            sound: PlayableSound::Custom {
                token: "data:audio/wav;base64,UklGRg==".into(),
            },
            haptic: HapticLevel::Medium,
            banner_duration: Duration::from_secs(10),
        };
        assert!(bridge.fire(request).await.is_ok());
        assert!(
            bridge
                .preview_sound(PlayableSound::Custom {
                    token: "relative.ogg".into(),
                })
                .await
                .is_ok()
        );
        assert!(bridge.cancel_wake(AlarmId::new("a1")).await.is_ok());
        assert!(!bridge.is_healthy());

        let wake = WakeRequest {
            alarm_id: AlarmId::new("a1"),
            time: WallClock::new(7, 0).unwrap(),
            label: None,
            fire_at: Local.with_ymd_and_hms(2024, 1, 16, 7, 0, 0).unwrap(),
        };
        assert!(matches!(
            bridge.schedule_wake(wake).await,
            Err(BridgeError::Unsupported(_))
        ));
    }
}
