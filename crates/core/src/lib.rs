//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules, the tile motion engine and the session turn
//! loop. It has **no dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: the same seed and inputs produce the same game
//! - **Testable**: every rule is reachable from plain function calls
//! - **Portable**: runs in the terminal binary, tests, and benches alike
//!
//! # Module Structure
//!
//! - [`board`]: 10x10 board, tile arena and occupancy index, score
//! - [`matching`]: pairing two tiles along a clear line
//! - [`motion`]: sliding, collision resolution and snap-to-grid
//! - [`affordance`]: legal slide directions and arrow markers
//! - [`spawn`]: the spawn bar and new-tile injection
//! - [`countdown`]: the session clock
//! - [`session`]: everything above composed into one turn loop
//! - [`scoring`]: triangular bonus/penalty curve
//!
//! # Game Rules
//!
//! - **Match**: two tiles in the same row or column, with only empty cells
//!   between them, whose numbers are equal or sum to ten
//! - **Bonus**: a match `k` cells apart scores `k(k+1)/2`
//! - **Slide**: a tile glides until blocked; a slide of `n` cells costs
//!   `n(n+1)/2`, never taking the score below zero
//! - **Clock**: starts at the first match; the session is lost at zero
//! - **Win**: clear every tile
//!
//! # Example
//!
//! ```
//! use tenmatch_core::{GameSession, SelectOutcome, SessionConfig};
//! use tenmatch_types::GridPos;
//!
//! let config = SessionConfig { intro_ms: 0, ..SessionConfig::default() };
//! let mut session = GameSession::from_layout(
//!     config,
//!     &[(GridPos::new(0, 0), 5), (GridPos::new(0, 3), 5)],
//! );
//!
//! let a = session.tile_at(GridPos::new(0, 0)).unwrap();
//! let b = session.tile_at(GridPos::new(0, 3)).unwrap();
//! session.select(a);
//! assert!(matches!(session.select(b), SelectOutcome::Matched(_)));
//!
//! assert_eq!(session.score(), 6);
//! assert!(session.is_ended());
//! ```
//!
//! # Timing
//!
//! Call [`GameSession::update`](session::GameSession::update) every frame with
//! the elapsed milliseconds; the binary uses a fixed 16ms step.

pub mod affordance;
pub mod board;
pub mod config;
pub mod countdown;
pub mod events;
pub mod matching;
pub mod motion;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod spawn;
pub mod tile;

pub use tenmatch_types as types;

// Re-export commonly used types for convenience
pub use affordance::{Affordances, Marker};
pub use board::Board;
pub use config::{ConfigError, SessionConfig, SpeedPreset};
pub use countdown::Countdown;
pub use events::SessionEvent;
pub use matching::{check_match, try_match, MatchFailure, MatchOutcome, MatchResult};
pub use motion::{MotionController, Settled};
pub use scoring::{match_bonus, slide_penalty, triangular};
pub use session::{GameSession, SelectOutcome, SessionPhase};
pub use snapshot::{SessionSnapshot, TileView};
pub use spawn::{candidate_numbers, seed_board, SpawnPhase, SpawnScheduler};
pub use tile::{MotionState, Slide, Tile};
