//! Tile module - a numbered tile and its motion state

use crate::types::{Direction, GridPos, PixelPos, TileId};

/// Bookkeeping for a tile that is gliding across the board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slide {
    pub direction: Direction,
    /// Cell the slide departed from
    pub start: GridPos,
    /// Most recent grid cell the footprint rounded to
    pub last_cell: GridPos,
    /// Cell boundaries crossed so far
    pub traveled: u32,
    /// Destination as of the latest tick
    pub target: GridPos,
}

/// Whether a tile is resting or sliding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionState {
    Idle,
    Sliding(Slide),
}

/// A numbered tile
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    id: TileId,
    number: u8,
    pub(crate) pos: GridPos,
    pub(crate) pixel: PixelPos,
    pub(crate) motion: MotionState,
}

impl Tile {
    pub(crate) fn new(id: TileId, number: u8, pos: GridPos) -> Self {
        Self {
            id,
            number,
            pos,
            pixel: pos.to_pixel(),
            motion: MotionState::Idle,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    /// Logical cell (the departure cell while sliding)
    pub fn pos(&self) -> GridPos {
        self.pos
    }

    pub fn pixel(&self) -> PixelPos {
        self.pixel
    }

    pub fn motion(&self) -> MotionState {
        self.motion
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.motion, MotionState::Sliding(_))
    }

    pub fn slide(&self) -> Option<Slide> {
        match self.motion {
            MotionState::Sliding(slide) => Some(slide),
            MotionState::Idle => None,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        self.slide().map(|s| s.direction)
    }
}
