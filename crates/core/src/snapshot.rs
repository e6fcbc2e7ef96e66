use arrayvec::ArrayVec;

use crate::affordance::Marker;
use crate::session::SessionPhase;
use crate::spawn::SpawnPhase;
use crate::types::{EndReason, GridPos, PixelPos, TileId, CELL_COUNT, GRID_SIZE};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileView {
    pub id: TileId,
    pub number: u8,
    /// Logical cell (departure cell while sliding)
    pub pos: GridPos,
    pub pixel: PixelPos,
    pub moving: bool,
    pub selected: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// All tiles in id order
    pub tiles: ArrayVec<TileView, CELL_COUNT>,
    /// Numbers of registered tiles by `[row][col]` (0 = empty)
    pub grid: [[u8; GRID_SIZE as usize]; GRID_SIZE as usize],
    pub markers: ArrayVec<Marker, 4>,
    pub selected: Option<TileId>,
    pub score: u32,
    pub remaining_secs: u32,
    pub time_limit_secs: u32,
    /// Spawn bar level in `0.0..=1.0`
    pub spawn_bar: f32,
    pub spawn_phase: SpawnPhase,
    pub phase: SessionPhase,
}

impl SessionSnapshot {
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.grid = [[0u8; GRID_SIZE as usize]; GRID_SIZE as usize];
        self.markers.clear();
        self.selected = None;
        self.score = 0;
        self.remaining_secs = 0;
        self.time_limit_secs = 0;
        self.spawn_bar = 0.0;
        self.spawn_phase = SpawnPhase::Idle;
        self.phase = SessionPhase::Initializing;
    }

    pub fn tile(&self, id: TileId) -> Option<&TileView> {
        self.tiles.iter().find(|t| t.id == id)
    }

    pub fn moving_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.moving).count()
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        match self.phase {
            SessionPhase::Ended(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn playable(&self) -> bool {
        self.phase == SessionPhase::Playing
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            tiles: ArrayVec::new(),
            grid: [[0u8; GRID_SIZE as usize]; GRID_SIZE as usize],
            markers: ArrayVec::new(),
            selected: None,
            score: 0,
            remaining_secs: 0,
            time_limit_secs: 0,
            spawn_bar: 0.0,
            spawn_phase: SpawnPhase::Idle,
            phase: SessionPhase::Initializing,
        }
    }
}
