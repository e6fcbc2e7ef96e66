//! Board module - owns the tiles, the 10x10 cell index and the score
//!
//! Tiles live in an arena keyed by [`TileId`]; the grid is a flat row-major array
//! of `Option<TileId>` for cache locality and zero-allocation lookups.
//! Every mutation goes through `place`/`clear`/`move_tile`/`remove`, so arena and
//! index never disagree about a resting tile.
//!
//! A sliding tile stays registered at its departure cell until it settles. That
//! cell counts as *passable* for other sliders, and a tile settling into it
//! takes the registration over, leaving the slider in flight without a seat
//! until it settles somewhere else.

use std::collections::{BTreeMap, BTreeSet};

use arrayvec::ArrayVec;

use crate::tile::Tile;
use crate::types::{GridPos, TileId, CELL_COUNT};

/// The game board - arena of tiles plus a 10x10 occupancy index
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (row * GRID_SIZE + col)
    cells: [Option<TileId>; CELL_COUNT],
    tiles: BTreeMap<TileId, Tile>,
    next_id: u32,
    score: u32,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; CELL_COUNT],
            tiles: BTreeMap::new(),
            next_id: 1,
            score: 0,
        }
    }

    /// Tile registered at `pos`, if any
    pub fn occupant(&self, pos: GridPos) -> Option<TileId> {
        pos.index().and_then(|idx| self.cells[idx])
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    pub(crate) fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(&id)
    }

    /// Tile registered at `pos`, if any
    pub fn tile_at(&self, pos: GridPos) -> Option<&Tile> {
        self.occupant(pos).and_then(|id| self.tiles.get(&id))
    }

    /// All tiles in id order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Ids of tiles currently sliding, in id order
    pub fn moving_ids(&self) -> Vec<TileId> {
        self.tiles
            .values()
            .filter(|t| t.is_moving())
            .map(|t| t.id())
            .collect()
    }

    pub fn any_moving(&self) -> bool {
        self.tiles.values().any(|t| t.is_moving())
    }

    /// Create a tile and place it at `pos`
    ///
    /// Returns `None` if the number is not 1-9 or the cell is off the board or taken.
    pub fn spawn_tile(&mut self, number: u8, pos: GridPos) -> Option<TileId> {
        if !(1..=9).contains(&number) || !self.is_empty(pos) {
            return None;
        }
        let id = TileId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.tiles.insert(id, Tile::new(id, number, pos));
        self.place(id, pos).then_some(id)
    }

    /// Seat an existing tile at an empty cell
    ///
    /// Returns false if the tile is unknown or `pos` is off the board or occupied.
    pub fn place(&mut self, id: TileId, pos: GridPos) -> bool {
        let Some(idx) = pos.index() else {
            return false;
        };
        if self.cells[idx].is_some() {
            return false;
        }
        let Some(tile) = self.tiles.get_mut(&id) else {
            return false;
        };
        tile.pos = pos;
        self.cells[idx] = Some(id);
        true
    }

    /// Empty a cell (no-op if already empty or off the board)
    pub fn clear(&mut self, pos: GridPos) {
        if let Some(idx) = pos.index() {
            self.cells[idx] = None;
        }
    }

    /// Re-seat a tile after a slide: clear `old` (if still ours), take `new`
    ///
    /// `new` may be empty, already ours, or held by another tile that is still
    /// sliding away from it. A resting tile is never displaced.
    pub fn move_tile(&mut self, old: GridPos, new: GridPos, id: TileId) -> bool {
        if !self.tiles.contains_key(&id) || !self.can_seat(new, id) {
            return false;
        }
        if self.occupant(old) == Some(id) {
            self.clear(old);
        }
        let Some(idx) = new.index() else {
            return false;
        };
        self.cells[idx] = Some(id);
        if let Some(tile) = self.tiles.get_mut(&id) {
            tile.pos = new;
        }
        true
    }

    /// Clear a tile's cell and drop it from the arena
    pub fn remove(&mut self, id: TileId) -> Option<Tile> {
        let tile = self.tiles.remove(&id)?;
        if self.occupant(tile.pos) == Some(id) {
            self.clear(tile.pos);
        }
        Some(tile)
    }

    /// Check if position is on the board and empty
    pub fn is_empty(&self, pos: GridPos) -> bool {
        pos.in_bounds() && self.occupant(pos).is_none()
    }

    /// Check if a slide may pass through `pos`
    ///
    /// On the board and either empty or held by a tile that is sliding away.
    pub fn is_passable(&self, pos: GridPos) -> bool {
        if !pos.in_bounds() {
            return false;
        }
        match self.tile_at(pos) {
            None => true,
            Some(tile) => tile.is_moving(),
        }
    }

    /// Check if tile `id` may settle at `pos`
    pub fn can_seat(&self, pos: GridPos, id: TileId) -> bool {
        if !pos.in_bounds() {
            return false;
        }
        match self.tile_at(pos) {
            None => true,
            Some(tile) => tile.id() == id || tile.is_moving(),
        }
    }

    /// All empty cells in row-major order
    pub fn empty_cells(&self) -> ArrayVec<GridPos, CELL_COUNT> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(idx, _)| GridPos::from_index(idx))
            .collect()
    }

    /// First empty cell in row-major order
    pub fn any_empty_cell(&self) -> Option<GridPos> {
        self.cells
            .iter()
            .position(|cell| cell.is_none())
            .map(GridPos::from_index)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// True once no tile remains anywhere (seated or in flight)
    pub fn all_cells_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Distinct numbers currently on the board
    pub fn numbers_present(&self) -> BTreeSet<u8> {
        self.tiles.values().map(|t| t.number()).collect()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Subtract a penalty, floored at zero
    pub fn deduct_score(&mut self, points: u32) {
        self.score = crate::scoring::apply_penalty(self.score, points);
    }

    /// Check that arena and cell index agree
    ///
    /// Every occupied cell names a tile whose position is that cell, and every
    /// resting tile is registered at its position.
    pub fn is_consistent(&self) -> bool {
        for (idx, cell) in self.cells.iter().enumerate() {
            if let Some(id) = cell {
                match self.tiles.get(id) {
                    Some(tile) if tile.pos == GridPos::from_index(idx) => {}
                    _ => return false,
                }
            }
        }
        self.tiles
            .values()
            .filter(|t| !t.is_moving())
            .all(|t| self.occupant(t.pos) == Some(t.id()))
    }

    /// Grid of tile numbers (0 = empty) for compact display/testing
    pub fn number_grid(&self) -> [[u8; 10]; 10] {
        let mut out = [[0u8; 10]; 10];
        for (idx, cell) in self.cells.iter().enumerate() {
            if let Some(tile) = cell.and_then(|id| self.tiles.get(&id)) {
                let pos = GridPos::from_index(idx);
                out[pos.row as usize][pos.col as usize] = tile.number();
            }
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
