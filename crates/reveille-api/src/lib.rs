//! Data model and protocol types for reveille
//!
//! This crate defines the stable shapes shared by the engine and its clients:
//! - The persisted Alarm record and its edit draft
//! - Sound references and haptic levels
//! - Console commands and responses
//! - Events (service -> client)

mod commands;
mod events;
mod types;

pub use commands::*;
pub use events::*;
pub use types::*;

/// Current API version
pub const API_VERSION: u32 = 1;
