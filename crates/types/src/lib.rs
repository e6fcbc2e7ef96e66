//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, score submission).
//!
//! # Grid Geometry
//!
//! - **Grid**: 10 rows x 10 columns, addressed as `(row, col)`, `(0, 0)` top-left
//! - **Pixels**: each cell is `CELL_PX` wide; cell `(r, c)` has its top-left
//!   corner at `(c * CELL_PX, r * CELL_PX)`
//! - A tile's footprint is one `CELL_PX` square anchored at its pixel position
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds unless the name says otherwise:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `SPAWN_EMPTY_MS` | 5000 | Spawn bar depletion time |
//! | `SPAWN_FILL_MS` | 1000 | Spawn bar refill time after a spawn |
//! | `INTRO_MS` | 600 | Initializing phase before input is accepted |
//! | `DEFAULT_TIME_LIMIT_SECS` | 120 | Countdown length (seconds) |
//!
//! # Examples
//!
//! ```
//! use tenmatch_types::{Direction, GridPos, CELL_PX, GRID_SIZE};
//!
//! let pos = GridPos::new(0, 0);
//! assert!(pos.in_bounds());
//! assert!(!pos.step(Direction::Up).in_bounds());
//!
//! let right = pos.step(Direction::Right);
//! assert_eq!(right, GridPos::new(0, 1));
//! assert_eq!(right.to_pixel().x, CELL_PX);
//!
//! assert_eq!(Direction::from_str("left"), Some(Direction::Left));
//! assert_eq!(GRID_SIZE, 10);
//! ```

/// Grid side length in cells (10 rows, 10 columns)
pub const GRID_SIZE: u8 = 10;

/// Total number of cells on the grid
pub const CELL_COUNT: usize = (GRID_SIZE as usize) * (GRID_SIZE as usize);

/// Side length of one cell in pixels
pub const CELL_PX: f32 = 50.0;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Slide step per tick for the "slow" speed preset
pub const SLOW_SLIDE_STEP_PX: f32 = 5.0;

/// Slide step per tick for the "normal" speed preset
pub const DEFAULT_SLIDE_STEP_PX: f32 = 10.0;

/// Slide step per tick for the "fast" speed preset
pub const FAST_SLIDE_STEP_PX: f32 = 25.0;

/// Largest accepted slide step (half a cell per tick)
pub const MAX_SLIDE_STEP_PX: f32 = CELL_PX / 2.0;

/// Default countdown length in seconds
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 120;

/// Spawn bar depletion time
pub const SPAWN_EMPTY_MS: u32 = 5000;

/// Spawn bar refill time
pub const SPAWN_FILL_MS: u32 = 1000;

/// Initializing phase duration
pub const INTRO_MS: u32 = 600;

/// Number of compatible pairs placed on a fresh board
pub const DEFAULT_INITIAL_PAIRS: u8 = 20;

/// Flat part of the end-of-session bonus
pub const FINISH_BASE_BONUS: u32 = 300;

/// End-of-session bonus per remaining second
pub const FINISH_BONUS_PER_SEC: u32 = 5;

/// Number of ranked entries kept by a record table
pub const RECORD_TABLE_LEN: usize = 10;

/// Two numbers are compatible when they are equal or sum to this value
pub const PAIR_SUM: u8 = 10;

/// Whether two tile numbers may be matched (equal, or summing to 10)
///
/// ```
/// use tenmatch_types::numbers_compatible;
///
/// assert!(numbers_compatible(5, 5));
/// assert!(numbers_compatible(3, 7));
/// assert!(!numbers_compatible(2, 9));
/// ```
pub fn numbers_compatible(a: u8, b: u8) -> bool {
    a == b || a + b == PAIR_SUM
}


/// The four slide directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in a stable order (up, down, left, right)
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Row/column delta of one step in this direction
    pub fn delta(&self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// The opposite direction
    ///
    /// ```
    /// use tenmatch_types::Direction;
    ///
    /// assert_eq!(Direction::Up.opposite(), Direction::Down);
    /// assert_eq!(Direction::Right.opposite(), Direction::Left);
    /// ```
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True for left/right
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// True when both directions move along the same axis
    pub fn same_axis(&self, other: Direction) -> bool {
        self.is_horizontal() == other.is_horizontal()
    }

    /// Parse direction from string (case-insensitive)
    ///
    /// Accepts full names or single letters: "up" | "u", "down" | "d",
    /// "left" | "l", "right" | "r"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// A cell coordinate on the grid
///
/// Signed so that stepping off the edge is representable; use
/// [`GridPos::in_bounds`] before indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub row: i8,
    pub col: i8,
}

impl GridPos {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Check if position is inside the 10x10 grid
    pub fn in_bounds(&self) -> bool {
        self.row >= 0 && self.row < GRID_SIZE as i8 && self.col >= 0 && self.col < GRID_SIZE as i8
    }

    /// Flat row-major index, `None` when off the grid
    #[inline(always)]
    pub fn index(&self) -> Option<usize> {
        if !self.in_bounds() {
            return None;
        }
        Some((self.row as usize) * (GRID_SIZE as usize) + (self.col as usize))
    }

    /// Inverse of [`GridPos::index`]
    pub fn from_index(idx: usize) -> Self {
        let size = GRID_SIZE as usize;
        Self::new((idx / size) as i8, (idx % size) as i8)
    }

    /// The neighbouring position one step in `dir` (may be off the grid)
    pub fn step(&self, dir: Direction) -> Self {
        let (dr, dc) = dir.delta();
        Self::new(self.row + dr, self.col + dc)
    }

    /// Manhattan distance in cells
    pub fn manhattan(&self, other: GridPos) -> u32 {
        (self.row as i32 - other.row as i32).unsigned_abs()
            + (self.col as i32 - other.col as i32).unsigned_abs()
    }

    /// True when both positions share a row or a column
    pub fn is_colinear(&self, other: GridPos) -> bool {
        self.row == other.row || self.col == other.col
    }

    /// Pixel position of this cell's top-left corner
    pub fn to_pixel(&self) -> PixelPos {
        PixelPos::new(self.col as f32 * CELL_PX, self.row as f32 * CELL_PX)
    }
}

/// Continuous tile coordinate (top-left corner of the footprint)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPos {
    pub x: f32,
    pub y: f32,
}

impl PixelPos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Grid cell whose origin is closest to this position
    pub fn nearest_cell(&self) -> GridPos {
        GridPos::new(
            (self.y / CELL_PX).round() as i8,
            (self.x / CELL_PX).round() as i8,
        )
    }

    /// Coordinate along the axis of `dir`, signed so that moving in `dir`
    /// increases it
    pub fn along(&self, dir: Direction) -> f32 {
        match dir {
            Direction::Right => self.x,
            Direction::Left => -self.x,
            Direction::Down => self.y,
            Direction::Up => -self.y,
        }
    }

    /// Offset between two positions across the axis of `dir`
    pub fn lateral_offset(&self, other: PixelPos, dir: Direction) -> f32 {
        if dir.is_horizontal() {
            (self.y - other.y).abs()
        } else {
            (self.x - other.x).abs()
        }
    }

    /// This position moved `distance` pixels in `dir`
    pub fn advanced(&self, dir: Direction, distance: f32) -> Self {
        match dir {
            Direction::Right => Self::new(self.x + distance, self.y),
            Direction::Left => Self::new(self.x - distance, self.y),
            Direction::Down => Self::new(self.x, self.y + distance),
            Direction::Up => Self::new(self.x, self.y - distance),
        }
    }

    /// Whether two cell-sized footprints overlap (shared edges do not count)
    pub fn overlaps(&self, other: PixelPos) -> bool {
        (self.x - other.x).abs() < CELL_PX && (self.y - other.y).abs() < CELL_PX
    }
}

/// Stable identity of a tile instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

/// Why a session ended
///
/// - **Cleared**: the last tiles were matched (win)
/// - **TimeExpired**: the countdown reached zero (loss)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndReason {
    Cleared,
    TimeExpired,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::Cleared => "cleared",
            EndReason::TimeExpired => "timeExpired",
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(self, EndReason::Cleared)
    }
}

/// Final tally handed to record keeping once a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionResult {
    pub score: u32,
    pub bonus: u32,
    pub total: u32,
}

impl SessionResult {
    /// Build the tally: `bonus = 300 + 5 * remaining_secs`, `total = score + bonus`
    pub fn from_final(score: u32, remaining_secs: u32) -> Self {
        let bonus = FINISH_BASE_BONUS + FINISH_BONUS_PER_SEC * remaining_secs;
        Self {
            score,
            bonus,
            total: score.saturating_add(bonus),
        }
    }
}
