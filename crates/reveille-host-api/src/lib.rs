//! Notification bridge interfaces for reveille
//!
//! This crate defines the capability-based contract between the alarm engine
//! and whatever realizes an alarm on the host: sound, banner, haptics and
//! pre-scheduled wake notifications. It contains no platform code itself.

mod capabilities;
mod mock;
mod sound;
mod traits;

pub use capabilities::*;
pub use mock::*;
pub use sound::*;
pub use traits::*;
