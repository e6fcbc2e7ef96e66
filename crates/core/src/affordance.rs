//! Affordance calculator - legal slide directions and arrow markers for the
//! selected tile.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::types::{Direction, GridPos, TileId};

/// Arrow drawn next to the selected tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub direction: Direction,
    /// Cell immediately outward from the selected tile
    pub anchor: GridPos,
}

/// Slide options for the current selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Affordances {
    legal: ArrayVec<Direction, 4>,
    markers: ArrayVec<Marker, 4>,
}

impl Affordances {
    pub fn none() -> Self {
        Self::default()
    }

    /// Directions the selected tile may slide in
    pub fn legal(&self) -> &[Direction] {
        &self.legal
    }

    pub fn is_legal(&self, dir: Direction) -> bool {
        self.legal.contains(&dir)
    }

    /// Markers to render; a legal direction may have its marker suppressed
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn is_empty(&self) -> bool {
        self.legal.is_empty()
    }
}

/// Compute affordances for `selected`
///
/// Nothing is offered when there is no selection or the tile is sliding. A
/// direction is legal when the neighbouring cell is on the board and passable.
/// Its marker is hidden while another sliding tile is drawn over the anchor
/// cell, unless that cell is the slider's own departure cell.
pub fn compute(board: &Board, selected: Option<TileId>) -> Affordances {
    let mut out = Affordances::none();
    let Some(tile) = selected.and_then(|id| board.tile(id)) else {
        return out;
    };
    if tile.is_moving() {
        return out;
    }

    for dir in Direction::ALL {
        let anchor = tile.pos().step(dir);
        if !board.is_passable(anchor) {
            continue;
        }
        out.legal.push(dir);
        if !covered_by_slider(board, tile.id(), anchor) {
            out.markers.push(Marker {
                direction: dir,
                anchor,
            });
        }
    }
    out
}

fn covered_by_slider(board: &Board, selected: TileId, anchor: GridPos) -> bool {
    let anchor_px = anchor.to_pixel();
    board.tiles().any(|t| {
        t.id() != selected
            && t
                .slide()
                .is_some_and(|s| s.start != anchor && t.pixel().overlaps(anchor_px))
    })
}
