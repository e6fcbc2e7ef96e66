//! Board cursor for keyboard play.

use crate::types::{Direction, GridPos};

/// Highlighted cell; stays on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pos: GridPos,
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            pos: GridPos::new(0, 0),
        }
    }

    pub fn at(pos: GridPos) -> Self {
        let mut cursor = Self::new();
        cursor.jump(pos);
        cursor
    }

    pub fn pos(&self) -> GridPos {
        self.pos
    }

    /// Move one cell; returns false at the board edge
    pub fn step(&mut self, dir: Direction) -> bool {
        let next = self.pos.step(dir);
        if !next.in_bounds() {
            return false;
        }
        self.pos = next;
        true
    }

    /// Move to `pos` if it is on the board
    pub fn jump(&mut self, pos: GridPos) {
        if pos.in_bounds() {
            self.pos = pos;
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}
