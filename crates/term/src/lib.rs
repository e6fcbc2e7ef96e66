//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids widget
//! toolkits and renders into a simple framebuffer that is flushed to the
//! terminal as a diff.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Show tiles in flight at their pixel positions, scaled to terminal cells
//! - Allow precise control over aspect ratio (4x2 terminal cells per board cell)

pub mod fb;
pub mod game_view;
pub mod popups;
pub mod renderer;

pub use tenmatch_core as core;
pub use tenmatch_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{number_color, FrameExtras, GameView, StatusView, SubmitView, Viewport};
pub use popups::{Popup, PopupLayer};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
