//! Linux notification bridge for reveille
//!
//! Provides:
//! - Banners via `notify-send`
//! - Catalog tones via `canberra-gtk-play`, custom sound files via `paplay`
//! - Host wakes as transient `systemd-run --user` timers
//! - Start-up detection of which of these tools exist

mod bridge;
mod tools;

pub use bridge::*;
pub use tools::*;
