//! Events emitted by the core for the animation layer.
//!
//! These are observational only: the session has already applied every state
//! change by the time an event is queued.

use crate::types::{Direction, EndReason, GridPos, TileId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Two tiles matched; `path` runs from the first to the second tile, inclusive.
    Matched {
        path: Vec<GridPos>,
        numbers: (u8, u8),
        points: u32,
    },
    SlideStarted {
        tile: TileId,
        direction: Direction,
        from: GridPos,
    },
    /// A sliding tile crossed into a new cell, leaving `vacated` behind.
    SlideStep {
        tile: TileId,
        vacated: GridPos,
        step_index: u32,
    },
    /// Two sliding tiles ran into each other and were both stopped.
    Collision { a: TileId, b: TileId },
    SlideSettled {
        tile: TileId,
        from: GridPos,
        to: GridPos,
        penalty: u32,
    },
    Spawned {
        tile: TileId,
        pos: GridPos,
        number: u8,
    },
    Ended(EndReason),
}
