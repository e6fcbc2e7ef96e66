//! Spawn scheduler - the phased spawn bar and new-tile injection.
//!
//! # Phases
//!
//! ```text
//! Idle --first match--> Emptying --empty_ms--> WaitingSpawn --spawn--> Filling --fill_ms--> Emptying
//!                                                   |
//!                                                   +--spawn fills board--> Halted --match--> Emptying
//! ```
//!
//! Any phase moves to `Stopped` when the session ends. Spawning is attempted
//! only while no tile is sliding, so a new tile never lands in a lane a slide
//! is still allowed to target.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::board::Board;
use crate::events::SessionEvent;
use crate::types::{GridPos, TileId, PAIR_SUM};

/// Spawn bar phase; timestamps are session milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnPhase {
    /// Before the first match
    Idle,
    Emptying { since: u64 },
    WaitingSpawn,
    Filling { since: u64 },
    /// Board full; resumes after the next match
    Halted,
    /// Session over
    Stopped,
}

impl SpawnPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnPhase::Idle => "idle",
            SpawnPhase::Emptying { .. } => "emptying",
            SpawnPhase::WaitingSpawn => "waitingSpawn",
            SpawnPhase::Filling { .. } => "filling",
            SpawnPhase::Halted => "halted",
            SpawnPhase::Stopped => "stopped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnScheduler {
    phase: SpawnPhase,
    empty_ms: u32,
    fill_ms: u32,
}

impl SpawnScheduler {
    pub fn new(empty_ms: u32, fill_ms: u32) -> Self {
        Self {
            phase: SpawnPhase::Idle,
            empty_ms,
            fill_ms,
        }
    }

    pub fn phase(&self) -> SpawnPhase {
        self.phase
    }

    /// Hook for every successful match
    ///
    /// Starts the cycle on the first match and wakes a halted scheduler.
    pub fn on_match(&mut self, now: u64) {
        if matches!(self.phase, SpawnPhase::Idle | SpawnPhase::Halted) {
            self.phase = SpawnPhase::Emptying { since: now };
        }
    }

    pub fn stop(&mut self) {
        self.phase = SpawnPhase::Stopped;
    }

    /// Advance the phase clock and spawn when due
    ///
    /// Returns the new tile, if one was placed this call.
    pub fn update<R: Rng>(
        &mut self,
        now: u64,
        board: &mut Board,
        rng: &mut R,
        events: &mut Vec<SessionEvent>,
    ) -> Option<TileId> {
        match self.phase {
            SpawnPhase::Emptying { since } if elapsed(now, since) >= self.empty_ms as u64 => {
                self.phase = SpawnPhase::WaitingSpawn;
            }
            SpawnPhase::Filling { since } if elapsed(now, since) >= self.fill_ms as u64 => {
                self.phase = SpawnPhase::Emptying { since: now };
                return None;
            }
            _ => {}
        }

        if self.phase != SpawnPhase::WaitingSpawn || board.any_moving() {
            return None;
        }

        let (id, pos, number) = spawn_one(board, rng)?;
        events.push(SessionEvent::Spawned {
            tile: id,
            pos,
            number,
        });

        self.phase = if board.is_full() {
            debug!("board full, spawning halted");
            SpawnPhase::Halted
        } else {
            SpawnPhase::Filling { since: now }
        };
        Some(id)
    }

    /// Spawn bar level in `0.0..=1.0`
    ///
    /// Full before the first match, drains while emptying, refills while filling.
    pub fn bar_fraction(&self, now: u64) -> f32 {
        match self.phase {
            SpawnPhase::Idle => 1.0,
            SpawnPhase::Emptying { since } => 1.0 - progress(now, since, self.empty_ms),
            SpawnPhase::Filling { since } => progress(now, since, self.fill_ms),
            SpawnPhase::WaitingSpawn | SpawnPhase::Halted | SpawnPhase::Stopped => 0.0,
        }
    }
}

fn elapsed(now: u64, since: u64) -> u64 {
    now.saturating_sub(since)
}

fn progress(now: u64, since: u64, duration_ms: u32) -> f32 {
    if duration_ms == 0 {
        return 1.0;
    }
    (elapsed(now, since) as f32 / duration_ms as f32).clamp(0.0, 1.0)
}

/// Numbers a new tile may carry: every number on the board and its complement
///
/// An empty board allows any number.
pub fn candidate_numbers(board: &Board) -> BTreeSet<u8> {
    let present = board.numbers_present();
    if present.is_empty() {
        return (1..PAIR_SUM).collect();
    }
    present
        .into_iter()
        .flat_map(|n| [n, PAIR_SUM - n])
        .collect()
}

/// Place one tile on a random empty cell with a random eligible number
pub fn spawn_one<R: Rng>(board: &mut Board, rng: &mut R) -> Option<(TileId, GridPos, u8)> {
    let pos = *board.empty_cells().choose(rng)?;
    let candidates: Vec<u8> = candidate_numbers(board).into_iter().collect();
    let number = *candidates.choose(rng)?;
    let id = board.spawn_tile(number, pos)?;
    debug!(tile = id.0, ?pos, number, "tile spawned");
    Some((id, pos, number))
}

/// Fill a board with `pairs` matchable pairs at random empty cells
///
/// Each pair is either two equal numbers or two numbers summing to ten.
/// Returns the number of pairs placed, which is smaller than requested only
/// when the board runs out of room.
pub fn seed_board<R: Rng>(board: &mut Board, rng: &mut R, pairs: u8) -> usize {
    let mut placed = 0;
    for _ in 0..pairs {
        let cells: Vec<GridPos> = board
            .empty_cells()
            .choose_multiple(rng, 2)
            .copied()
            .collect();
        let [a, b] = cells[..] else {
            break;
        };

        let first = rng.gen_range(1..PAIR_SUM);
        let second = if rng.gen_bool(0.5) {
            first
        } else {
            PAIR_SUM - first
        };
        if board.spawn_tile(first, a).is_some() && board.spawn_tile(second, b).is_some() {
            placed += 1;
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{numbers_compatible, Direction, CELL_COUNT};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_candidates_include_complements() {
        let mut board = Board::new();
        board.spawn_tile(3, GridPos::new(0, 0)).unwrap();
        board.spawn_tile(5, GridPos::new(0, 1)).unwrap();
        let expected: BTreeSet<u8> = [3, 5, 7].into_iter().collect();
        assert_eq!(candidate_numbers(&board), expected);
    }

    #[test]
    fn test_only_fives_spawn_fives() {
        let mut rng = rng();
        for _ in 0..50 {
            let mut board = Board::new();
            board.spawn_tile(5, GridPos::new(4, 4)).unwrap();
            board.spawn_tile(5, GridPos::new(8, 1)).unwrap();
            let (_, _, number) = spawn_one(&mut board, &mut rng).unwrap();
            assert_eq!(number, 5);
        }
    }

    #[test]
    fn test_idle_until_first_match() {
        let mut sched = SpawnScheduler::new(5000, 1000);
        let mut board = Board::new();
        board.spawn_tile(2, GridPos::new(0, 0)).unwrap();
        let mut events = Vec::new();

        assert!(sched.update(60_000, &mut board, &mut rng(), &mut events).is_none());
        assert_eq!(sched.phase(), SpawnPhase::Idle);
        assert_eq!(sched.bar_fraction(60_000), 1.0);
    }

    #[test]
    fn test_phase_cycle() {
        let mut sched = SpawnScheduler::new(5000, 1000);
        let mut board = Board::new();
        board.spawn_tile(2, GridPos::new(0, 0)).unwrap();
        let mut rng = rng();
        let mut events = Vec::new();

        sched.on_match(1000);
        assert_eq!(sched.phase(), SpawnPhase::Emptying { since: 1000 });
        assert!((sched.bar_fraction(3500) - 0.5).abs() < 1e-6);

        assert!(sched.update(5999, &mut board, &mut rng, &mut events).is_none());
        let id = sched.update(6000, &mut board, &mut rng, &mut events).unwrap();
        assert_eq!(sched.phase(), SpawnPhase::Filling { since: 6000 });
        assert_eq!(board.tile_count(), 2);
        assert!(numbers_compatible(board.tile(id).unwrap().number(), 2));
        assert!(matches!(events.last(), Some(SessionEvent::Spawned { tile, .. }) if *tile == id));

        sched.update(7000, &mut board, &mut rng, &mut events);
        assert_eq!(sched.phase(), SpawnPhase::Emptying { since: 7000 });
    }

    #[test]
    fn test_waits_while_tiles_slide() {
        use crate::motion::MotionController;

        let mut sched = SpawnScheduler::new(10, 10);
        let mut board = Board::new();
        let id = board.spawn_tile(2, GridPos::new(0, 0)).unwrap();
        let mut events = Vec::new();
        MotionController::new(10.0).begin_slide(&mut board, id, Direction::Right, &mut events);

        sched.on_match(0);
        assert!(sched.update(100, &mut board, &mut rng(), &mut events).is_none());
        assert_eq!(sched.phase(), SpawnPhase::WaitingSpawn);
        assert_eq!(sched.bar_fraction(100), 0.0);
    }

    #[test]
    fn test_halts_on_full_board_and_resumes_after_match() {
        let mut sched = SpawnScheduler::new(0, 0);
        let mut board = Board::new();
        for idx in 0..CELL_COUNT - 1 {
            board.spawn_tile(5, GridPos::from_index(idx)).unwrap();
        }
        let mut events = Vec::new();

        sched.on_match(0);
        assert!(sched.update(0, &mut board, &mut rng(), &mut events).is_some());
        assert!(board.is_full());
        assert_eq!(sched.phase(), SpawnPhase::Halted);
        assert!(sched.update(10, &mut board, &mut rng(), &mut events).is_none());

        sched.on_match(20);
        assert_eq!(sched.phase(), SpawnPhase::Emptying { since: 20 });
    }

    #[test]
    fn test_full_board_keeps_waiting_until_a_cell_frees() {
        let mut sched = SpawnScheduler::new(100, 100);
        let mut board = Board::new();
        for idx in 0..CELL_COUNT {
            board.spawn_tile(5, GridPos::from_index(idx)).unwrap();
        }
        let mut rng = rng();
        let mut events = Vec::new();

        sched.on_match(0);
        assert!(sched.update(150, &mut board, &mut rng, &mut events).is_none());
        assert_eq!(sched.phase(), SpawnPhase::WaitingSpawn);
        assert!(sched.update(300, &mut board, &mut rng, &mut events).is_none());
        assert_eq!(sched.phase(), SpawnPhase::WaitingSpawn);
        assert!(events.is_empty());

        let freed = [GridPos::new(3, 7), GridPos::new(6, 1)];
        for pos in freed {
            let gone = board.occupant(pos).unwrap();
            board.remove(gone).unwrap();
        }
        let id = sched.update(400, &mut board, &mut rng, &mut events).unwrap();
        let pos = board.tile(id).unwrap().pos();
        assert!(freed.contains(&pos));
        assert_eq!(board.tile(id).unwrap().number(), 5);
        assert_eq!(sched.phase(), SpawnPhase::Filling { since: 400 });
        assert!(matches!(events.as_slice(), [SessionEvent::Spawned { tile, .. }] if *tile == id));
    }

    #[test]
    fn test_stopped_is_permanent() {
        let mut sched = SpawnScheduler::new(0, 0);
        sched.stop();
        sched.on_match(5);
        assert_eq!(sched.phase(), SpawnPhase::Stopped);
    }

    #[test]
    fn test_seed_board_places_compatible_pairs() {
        let mut board = Board::new();
        let placed = seed_board(&mut board, &mut rng(), 20);
        assert_eq!(placed, 20);
        assert_eq!(board.tile_count(), 40);
        assert!(board.is_consistent());

        let mut full = Board::new();
        assert_eq!(seed_board(&mut full, &mut rng(), 60), 50);
        assert!(full.is_full());
    }
}
