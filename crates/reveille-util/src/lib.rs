//! Shared utilities for reveille
//!
//! This crate provides:
//! - ID types (AlarmId)
//! - Time utilities (mock-able local clock, HH:MM wall clock, weekday sets)
//! - Error types
//! - Default paths for config and data directories

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
