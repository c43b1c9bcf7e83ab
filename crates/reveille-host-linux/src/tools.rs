//! Desktop tool detection

use reveille_host_api::BridgeCapabilities;
use std::process::Command;
use tracing::{info, warn};

/// Which desktop helpers are installed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DesktopTools {
    pub notify_send: bool,
    pub canberra: bool,
    pub paplay: bool,
    pub systemd_run: bool,
    pub systemctl: bool,
}

impl DesktopTools {
    /// Probe the host for every helper
    pub fn detect() -> Self {
        let tools = Self {
            notify_send: Self::probe("notify-send", &["--version"]),
            canberra: Self::probe("canberra-gtk-play", &["--version"]),
            paplay: Self::probe("paplay", &["--version"]),
            systemd_run: Self::probe("systemd-run", &["--version"]),
            systemctl: Self::probe("systemctl", &["--user", "--version"]),
        };

        info!(
            notify_send = tools.notify_send,
            canberra = tools.canberra,
            paplay = tools.paplay,
            systemd_run = tools.systemd_run,
            systemctl = tools.systemctl,
            "Detected desktop tools"
        );

        if !tools.notify_send {
            warn!("notify-send not found; alarm banners will only be logged");
        }
        if !tools.canberra && !tools.paplay {
            warn!("No sound player found; alarms will be silent");
        }

        tools
    }

    fn probe(program: &str, args: &[&str]) -> bool {
        Command::new(program)
            .args(args)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    pub fn capabilities(&self) -> BridgeCapabilities {
        BridgeCapabilities {
            can_play_sound: self.canberra || self.paplay,
            can_show_banner: self.notify_send,
            can_haptic: false,
            can_schedule_wake: self.systemd_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_follow_tools() {
        let tools = DesktopTools {
            paplay: true,
            systemd_run: true,
            ..Default::default()
        };
        let caps = tools.capabilities();
        assert!(caps.can_play_sound);
        assert!(!caps.can_show_banner);
        assert!(!caps.can_haptic);
        assert!(caps.can_schedule_wake);
    }

    #[test]
    fn missing_program_probes_false() {
        assert!(!DesktopTools::probe("reveille-no-such-program", &[]));
    }
}
