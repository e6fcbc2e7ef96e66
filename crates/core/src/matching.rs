//! Match engine - validates and executes a pairing of two tiles.
//!
//! Two tiles match when they are colinear, their numbers are equal or sum to
//! ten, and every cell strictly between them is empty. Adjacent tiles have no
//! cells in between, so the line check passes trivially.

use tracing::debug;

use crate::board::Board;
use crate::scoring::match_bonus;
use crate::types::{numbers_compatible, Direction, GridPos, TileId};

/// Why a pairing was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchFailure {
    MissingTile,
    Moving,
    SameTile,
    Incompatible,
    NotColinear,
    Blocked,
}

/// A successful match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Cells from the first tile to the second, inclusive
    pub path: Vec<GridPos>,
    /// Line distance between the two tiles
    pub distance: u32,
    pub points: u32,
    pub numbers: (u8, u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Matched(MatchOutcome),
    NoMatch(MatchFailure),
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched(_))
    }
}

/// Check whether `a` and `b` may be matched, without touching the board
///
/// On success returns the ordered cell path from `a` to `b`.
pub fn check_match(board: &Board, a: TileId, b: TileId) -> Result<Vec<GridPos>, MatchFailure> {
    if a == b {
        return Err(MatchFailure::SameTile);
    }
    let (Some(ta), Some(tb)) = (board.tile(a), board.tile(b)) else {
        return Err(MatchFailure::MissingTile);
    };
    if ta.is_moving() || tb.is_moving() {
        return Err(MatchFailure::Moving);
    }
    if !numbers_compatible(ta.number(), tb.number()) {
        return Err(MatchFailure::Incompatible);
    }

    let (from, to) = (ta.pos(), tb.pos());
    let Some(dir) = direction_between(from, to) else {
        return Err(MatchFailure::NotColinear);
    };

    let mut path = Vec::with_capacity(from.manhattan(to) as usize + 1);
    path.push(from);
    let mut cur = from.step(dir);
    while cur != to {
        if !board.is_empty(cur) {
            return Err(MatchFailure::Blocked);
        }
        path.push(cur);
        cur = cur.step(dir);
    }
    path.push(to);
    Ok(path)
}

/// Attempt a match; on success both tiles are removed and the score grows
pub fn try_match(board: &mut Board, a: TileId, b: TileId) -> MatchResult {
    let path = match check_match(board, a, b) {
        Ok(path) => path,
        Err(failure) => return MatchResult::NoMatch(failure),
    };

    let distance = (path.len() - 1) as u32;
    let points = match_bonus(distance);
    let (Some(ta), Some(tb)) = (board.remove(a), board.remove(b)) else {
        return MatchResult::NoMatch(MatchFailure::MissingTile);
    };
    board.add_score(points);

    debug!(
        a = ta.number(),
        b = tb.number(),
        distance,
        points,
        "tiles matched"
    );

    MatchResult::Matched(MatchOutcome {
        path,
        distance,
        points,
        numbers: (ta.number(), tb.number()),
    })
}

/// Unit direction from `from` towards `to` when they share a row or column
fn direction_between(from: GridPos, to: GridPos) -> Option<Direction> {
    if from == to || !from.is_colinear(to) {
        return None;
    }
    Some(if from.row == to.row {
        if to.col > from.col {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if to.row > from.row {
        Direction::Down
    } else {
        Direction::Up
    })
}
