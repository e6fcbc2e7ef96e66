//! Terminal input module.
//!
//! This crate is independent of the game core. It maps `crossterm` key events
//! into [`PlayerAction`]s and tracks the board cursor the player selects with.

pub mod cursor;
pub mod map;

pub use tenmatch_types as types;

pub use cursor::Cursor;
pub use map::{handle_key_event, should_quit, PlayerAction};
