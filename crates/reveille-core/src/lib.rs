//! Alarm engine for reveille
//!
//! This crate is the heart of reveille, containing:
//! - The sound catalog and sound resolution
//! - Due-time evaluation (first fire vs. snooze re-fire)
//! - The per-alarm snooze state machine (Idle -> Fired -> ... )
//! - The alarm book: the persisted list and its replace-and-persist mutation
//! - The engine tying these together, and dispatch of its events to a
//!   notification bridge

mod book;
mod dispatch;
mod engine;
mod evaluator;
mod events;
mod export;
mod schedule;
mod snooze;
mod sound;

pub use book::*;
pub use dispatch::*;
pub use engine::*;
pub use evaluator::*;
pub use events::*;
pub use export::*;
pub use schedule::*;
pub use snooze::*;
pub use sound::*;
