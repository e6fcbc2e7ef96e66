//! Motion controller - slides tiles, resolves collisions, settles arrivals.
//!
//! A slide runs `Idle -> Sliding -> (Colliding) -> Settled -> Idle`. Each tick:
//!
//! 1. every sliding tile rescans its target from its current cell and advances
//!    by at most `step_px` along its axis (never overshooting the target);
//! 2. every overlapping pair of sliders is classified and, on a collision,
//!    both tiles are halted;
//! 3. arrived and halted tiles are snapped to the grid and written back into
//!    the board, paying the slide penalty.
//!
//! The target is rescanned every tick rather than fixed at slide start, so a
//! lane that opens up because a blocking tile starts sliding away is followed.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::board::Board;
use crate::events::SessionEvent;
use crate::scoring::slide_penalty;
use crate::tile::{MotionState, Slide};
use crate::types::{
    Direction, GridPos, PixelPos, TileId, CELL_PX, DEFAULT_SLIDE_STEP_PX, GRID_SIZE,
    MAX_SLIDE_STEP_PX,
};

/// A slide that has been written back into the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settled {
    pub tile: TileId,
    pub from: GridPos,
    pub to: GridPos,
    pub distance: u32,
    pub penalty: u32,
    pub collided: bool,
}

/// Advances sliding tiles with a fixed per-tick step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionController {
    step_px: f32,
}

impl MotionController {
    /// A step that is not positive (or NaN) falls back to the default, and
    /// anything above half a cell is capped so overlaps are never skipped.
    pub fn new(step_px: f32) -> Self {
        let step_px = if step_px > 0.0 {
            step_px.min(MAX_SLIDE_STEP_PX)
        } else {
            warn!(step_px, "slide step must be positive, using default");
            DEFAULT_SLIDE_STEP_PX
        };
        Self { step_px }
    }

    pub fn step_px(&self) -> f32 {
        self.step_px
    }

    /// Furthest cell reachable from `from` in `dir` through passable cells
    ///
    /// Returns `from` itself when the first cell ahead is blocked or off the board.
    pub fn scan_target(board: &Board, from: GridPos, dir: Direction) -> GridPos {
        let mut cur = from;
        loop {
            let next = cur.step(dir);
            if !board.is_passable(next) {
                return cur;
            }
            cur = next;
        }
    }

    /// Start sliding a resting tile
    ///
    /// Returns false (and changes nothing) if the tile is unknown, already
    /// sliding, or has nowhere to go in `dir`.
    pub fn begin_slide(
        &self,
        board: &mut Board,
        id: TileId,
        dir: Direction,
        events: &mut Vec<SessionEvent>,
    ) -> bool {
        let Some(tile) = board.tile(id) else {
            return false;
        };
        if tile.is_moving() {
            return false;
        }
        let from = tile.pos();
        let target = Self::scan_target(board, from, dir);
        if target == from {
            return false;
        }

        let Some(tile) = board.tile_mut(id) else {
            return false;
        };
        tile.motion = MotionState::Sliding(Slide {
            direction: dir,
            start: from,
            last_cell: from,
            traveled: 0,
            target,
        });

        debug!(tile = id.0, ?dir, ?from, ?target, "slide started");
        events.push(SessionEvent::SlideStarted {
            tile: id,
            direction: dir,
            from,
        });
        true
    }

    /// Run one tick for every sliding tile and return the slides that settled
    pub fn step(&self, board: &mut Board, events: &mut Vec<SessionEvent>) -> Vec<Settled> {
        let ids = board.moving_ids();
        if ids.is_empty() {
            return Vec::new();
        }

        let mut arrived: BTreeSet<TileId> = BTreeSet::new();
        let mut halted: BTreeSet<TileId> = BTreeSet::new();

        // Advance everyone first; collisions are judged on the new positions.
        for &id in &ids {
            match self.advance(board, id, events) {
                Advance::Arrived => {
                    arrived.insert(id);
                }
                Advance::Blocked => {
                    halted.insert(id);
                }
                Advance::Moving => {}
            }
        }

        let movers: Vec<(TileId, Slide, PixelPos)> = ids
            .iter()
            .filter_map(|&id| {
                let tile = board.tile(id)?;
                Some((id, tile.slide()?, tile.pixel()))
            })
            .collect();
        for (i, a) in movers.iter().enumerate() {
            for b in &movers[i + 1..] {
                if collides(&a.1, a.2, &b.1, b.2) {
                    debug!(a = a.0 .0, b = b.0 .0, "slide collision");
                    halted.insert(a.0);
                    halted.insert(b.0);
                    events.push(SessionEvent::Collision { a: a.0, b: b.0 });
                }
            }
        }

        // Arrivals claim their targets before halted tiles look for a seat.
        let mut settled = Vec::with_capacity(arrived.len() + halted.len());
        for &id in arrived.iter().filter(|id| !halted.contains(*id)) {
            if let Some(s) = self.settle(board, id, false, events) {
                settled.push(s);
            }
        }
        for &id in &halted {
            if let Some(s) = self.settle(board, id, true, events) {
                settled.push(s);
            }
        }
        settled
    }

    /// Move one slider towards its (rescanned) target
    fn advance(&self, board: &mut Board, id: TileId, events: &mut Vec<SessionEvent>) -> Advance {
        let Some(mut slide) = board.tile(id).and_then(|t| t.slide()) else {
            return Advance::Moving;
        };

        // Only a tile placed from outside the motion pass can land here; the
        // slider halts and settles behind it.
        let cell_taken = board
            .tile_at(slide.last_cell)
            .is_some_and(|t| t.id() != id && !t.is_moving());
        if cell_taken {
            return Advance::Blocked;
        }

        let dir = slide.direction;
        slide.target = Self::scan_target(board, slide.last_cell, dir);

        let Some(tile) = board.tile_mut(id) else {
            return Advance::Moving;
        };
        let goal = slide.target.to_pixel();
        let remaining = goal.along(dir) - tile.pixel.along(dir);
        let reached = remaining <= self.step_px;
        tile.pixel = if reached {
            goal
        } else {
            tile.pixel.advanced(dir, self.step_px)
        };

        let cell = tile.pixel.nearest_cell();
        let ahead = cells_ahead(slide.last_cell, cell, dir);
        if ahead > 0 {
            for _ in 0..ahead {
                let vacated = slide.last_cell;
                slide.last_cell = vacated.step(dir);
                slide.traveled += 1;
                events.push(SessionEvent::SlideStep {
                    tile: id,
                    vacated,
                    step_index: slide.traveled,
                });
            }
        } else {
            slide.last_cell = cell;
        }
        tile.motion = MotionState::Sliding(slide);

        if reached {
            Advance::Arrived
        } else {
            Advance::Moving
        }
    }

    /// Snap a slider to the grid and write it back into the board
    fn settle(
        &self,
        board: &mut Board,
        id: TileId,
        collided: bool,
        events: &mut Vec<SessionEvent>,
    ) -> Option<Settled> {
        let tile = board.tile(id)?;
        let slide = tile.slide()?;
        let old = tile.pos();
        let preferred = tile.pixel().nearest_cell();

        let Some(seat) = find_seat(board, id, preferred, &slide) else {
            warn!(tile = id.0, ?preferred, "no free cell to settle in, retrying next tick");
            return None;
        };
        if !board.move_tile(old, seat, id) {
            warn!(tile = id.0, ?seat, "settle rejected by board");
            return None;
        }

        let tile = board.tile_mut(id)?;
        tile.pixel = seat.to_pixel();
        tile.motion = MotionState::Idle;

        let distance = slide.start.manhattan(seat);
        let penalty = slide_penalty(distance);
        board.deduct_score(penalty);

        debug!(tile = id.0, from = ?slide.start, to = ?seat, penalty, collided, "slide settled");
        events.push(SessionEvent::SlideSettled {
            tile: id,
            from: slide.start,
            to: seat,
            penalty,
        });

        Some(Settled {
            tile: id,
            from: slide.start,
            to: seat,
            distance,
            penalty,
            collided,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Advance {
    Moving,
    Arrived,
    Blocked,
}

/// Signed number of cells from `from` to `to` along `dir`
fn cells_ahead(from: GridPos, to: GridPos, dir: Direction) -> i32 {
    let (dr, dc) = dir.delta();
    (to.row as i32 - from.row as i32) * dr as i32 + (to.col as i32 - from.col as i32) * dc as i32
}

/// Classify an overlapping pair of sliders
///
/// - same direction: never a collision
/// - opposite directions: head-on when laterally within half a cell
/// - perpendicular: a collision unless one tile is heading into the cell the
///   other is vacating
pub fn collides(a: &Slide, a_px: PixelPos, b: &Slide, b_px: PixelPos) -> bool {
    if !a_px.overlaps(b_px) {
        return false;
    }
    if a.direction == b.direction {
        return false;
    }
    if a.direction == b.direction.opposite() {
        return a_px.lateral_offset(b_px, a.direction) < CELL_PX / 2.0;
    }
    !(b.start == a.target || a.start == b.target)
}

/// Pick the cell a stopping slider settles in without displacing a resting tile
///
/// Order: the preferred cell, the last cell reached, back along the path to the
/// start, then the closest free cell anywhere on the board.
fn find_seat(board: &Board, id: TileId, preferred: GridPos, slide: &Slide) -> Option<GridPos> {
    if board.can_seat(preferred, id) {
        return Some(preferred);
    }

    let back = slide.direction.opposite();
    let mut cur = slide.last_cell;
    for _ in 0..=GRID_SIZE {
        if board.can_seat(cur, id) {
            return Some(cur);
        }
        if cur == slide.start || !cur.in_bounds() {
            break;
        }
        cur = cur.step(back);
    }

    (0..crate::types::CELL_COUNT)
        .map(GridPos::from_index)
        .filter(|&pos| board.can_seat(pos, id))
        .min_by_key(|&pos| (pos.manhattan(preferred), pos.index()))
}
