//! Terminal input (engine-facing).
//!
//! Maps `crossterm` key events into [`Command`]s: player intents for the
//! engine plus the host-level quit and new-game requests. Nothing here knows
//! about the session itself.

pub mod map;

pub use blockfall_types as types;

pub use map::{handle_key_event, is_restart, should_quit, Command};
