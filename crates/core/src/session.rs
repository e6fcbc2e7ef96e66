//! Game session - composes board, matching, motion, spawning and the clock
//! into one tick-driven turn loop.
//!
//! Player input enters through exactly two calls, [`GameSession::select`] and
//! [`GameSession::slide`]. Everything else advances in [`GameSession::update`],
//! which runs one frame:
//!
//! 1. motion: advance sliders, resolve collisions, settle arrivals
//! 2. countdown
//! 3. spawn scheduler
//! 4. affordance refresh
//!
//! Renderer-facing events accumulate until [`GameSession::drain_events`].

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::affordance::{self, Affordances};
use crate::board::Board;
use crate::config::SessionConfig;
use crate::countdown::Countdown;
use crate::events::SessionEvent;
use crate::matching::{try_match, MatchOutcome, MatchResult};
use crate::motion::MotionController;
use crate::snapshot::{SessionSnapshot, TileView};
use crate::spawn::{seed_board, SpawnPhase, SpawnScheduler};
use crate::types::{Direction, EndReason, GridPos, SessionResult, TileId};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Opening animation; input is ignored
    Initializing,
    Playing,
    Ended(EndReason),
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Initializing => "initializing",
            SessionPhase::Playing => "playing",
            SessionPhase::Ended(_) => "ended",
        }
    }
}

/// What a call to [`GameSession::select`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Unknown or sliding tile, or the session is not accepting input
    Ignored,
    Selected,
    /// The selected tile was picked again
    Deselected,
    Matched(MatchOutcome),
    /// A second tile did not match; it becomes the selection
    Reselected,
}

pub struct GameSession {
    config: SessionConfig,
    board: Board,
    motion: MotionController,
    spawner: SpawnScheduler,
    countdown: Countdown,
    rng: StdRng,
    selected: Option<TileId>,
    affordances: Affordances,
    phase: SessionPhase,
    now_ms: u64,
    events: Vec<SessionEvent>,
}

impl GameSession {
    /// Start a session with a randomly seeded opening board
    ///
    /// The configuration is used as given; call [`SessionConfig::validate`] first.
    pub fn new(config: SessionConfig) -> Self {
        let mut session = Self::empty(config);
        let placed = seed_board(
            &mut session.board,
            &mut session.rng,
            session.config.initial_pairs,
        );
        debug!(pairs = placed, seed = session.config.seed, "opening board seeded");
        session
    }

    /// Start a session on a fixed layout of `(cell, number)` entries
    ///
    /// Entries that are off the board, carry a number outside 1-9, or land on
    /// an occupied cell are skipped.
    pub fn from_layout(config: SessionConfig, layout: &[(GridPos, u8)]) -> Self {
        let mut session = Self::empty(config);
        for &(pos, number) in layout {
            if session.board.spawn_tile(number, pos).is_none() {
                warn!(?pos, number, "skipping invalid layout entry");
            }
        }
        session
    }

    fn empty(config: SessionConfig) -> Self {
        let phase = if config.intro_ms == 0 {
            SessionPhase::Playing
        } else {
            SessionPhase::Initializing
        };
        Self {
            board: Board::new(),
            motion: MotionController::new(config.slide_step_px),
            spawner: SpawnScheduler::new(config.spawn_empty_ms, config.spawn_fill_ms),
            countdown: Countdown::new(config.time_limit_secs),
            rng: StdRng::seed_from_u64(config.seed),
            selected: None,
            affordances: Affordances::none(),
            phase,
            now_ms: 0,
            events: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, SessionPhase::Ended(_))
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        match self.phase {
            SessionPhase::Ended(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn score(&self) -> u32 {
        self.board.score()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    /// Session milliseconds elapsed so far
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn selected(&self) -> Option<TileId> {
        self.selected
    }

    pub fn affordances(&self) -> &Affordances {
        &self.affordances
    }

    pub fn spawn_phase(&self) -> SpawnPhase {
        self.spawner.phase()
    }

    /// Tile registered at `pos`
    pub fn tile_at(&self, pos: GridPos) -> Option<TileId> {
        self.board.occupant(pos)
    }

    /// Final tally, once the session has ended
    pub fn result(&self) -> Option<SessionResult> {
        self.is_ended()
            .then(|| SessionResult::from_final(self.score(), self.remaining_secs()))
    }

    fn accepts_input(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    /// Select a tile, or pair it with the current selection
    pub fn select(&mut self, id: TileId) -> SelectOutcome {
        if !self.accepts_input() {
            return SelectOutcome::Ignored;
        }
        match self.board.tile(id) {
            Some(tile) if !tile.is_moving() => {}
            _ => return SelectOutcome::Ignored,
        }

        let outcome = match self.selected {
            None => {
                self.selected = Some(id);
                SelectOutcome::Selected
            }
            Some(current) if current == id => {
                self.selected = None;
                SelectOutcome::Deselected
            }
            Some(current) => match try_match(&mut self.board, current, id) {
                MatchResult::Matched(outcome) => {
                    self.selected = None;
                    self.events.push(SessionEvent::Matched {
                        path: outcome.path.clone(),
                        numbers: outcome.numbers,
                        points: outcome.points,
                    });
                    self.after_match();
                    SelectOutcome::Matched(outcome)
                }
                MatchResult::NoMatch(reason) => {
                    debug!(?reason, "no match, moving selection");
                    self.selected = Some(id);
                    SelectOutcome::Reselected
                }
            },
        };
        self.refresh_affordances();
        outcome
    }

    /// Start sliding a resting tile; false if it cannot move that way
    pub fn slide(&mut self, id: TileId, dir: Direction) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let started = self
            .motion
            .begin_slide(&mut self.board, id, dir, &mut self.events);
        if started {
            self.refresh_affordances();
        }
        started
    }

    /// Advance the session by one frame of `elapsed_ms`
    pub fn update(&mut self, elapsed_ms: u32) {
        if self.is_ended() {
            return;
        }
        self.now_ms += elapsed_ms as u64;

        if self.phase == SessionPhase::Initializing {
            if self.now_ms < self.config.intro_ms as u64 {
                return;
            }
            self.phase = SessionPhase::Playing;
        }

        for settled in self.motion.step(&mut self.board, &mut self.events) {
            if self.selected == Some(settled.tile) {
                self.selected = None;
            }
        }

        if self.countdown.tick(elapsed_ms) {
            self.end(EndReason::TimeExpired);
            return;
        }

        self.spawner
            .update(self.now_ms, &mut self.board, &mut self.rng, &mut self.events);

        self.refresh_affordances();
    }

    /// Events queued since the last drain, in emission order
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.clear();
        for tile in self.board.tiles() {
            let pushed = out.tiles.try_push(TileView {
                id: tile.id(),
                number: tile.number(),
                pos: tile.pos(),
                pixel: tile.pixel(),
                moving: tile.is_moving(),
                selected: self.selected == Some(tile.id()),
            });
            debug_assert!(pushed.is_ok(), "more tiles than cells");
        }
        out.grid = self.board.number_grid();
        out.markers
            .extend(self.affordances.markers().iter().copied());
        out.selected = self.selected;
        out.score = self.score();
        out.remaining_secs = self.remaining_secs();
        out.time_limit_secs = self.config.time_limit_secs;
        out.spawn_bar = self.spawner.bar_fraction(self.now_ms);
        out.spawn_phase = self.spawner.phase();
        out.phase = self.phase;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut snap = SessionSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    fn after_match(&mut self) {
        self.countdown.arm();
        self.spawner.on_match(self.now_ms);
        if self.board.all_cells_empty() {
            self.end(EndReason::Cleared);
        }
    }

    fn end(&mut self, reason: EndReason) {
        self.phase = SessionPhase::Ended(reason);
        self.spawner.stop();
        self.countdown.stop();
        self.selected = None;
        self.affordances = Affordances::none();
        self.events.push(SessionEvent::Ended(reason));
        info!(
            reason = reason.as_str(),
            score = self.score(),
            remaining_secs = self.remaining_secs(),
            "session ended"
        );
    }

    fn refresh_affordances(&mut self) {
        if self.selected.is_some_and(|id| self.board.tile(id).is_none()) {
            self.selected = None;
        }
        self.affordances = affordance::compute(&self.board, self.selected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig {
            intro_ms: 0,
            seed: 11,
            ..SessionConfig::default()
        }
    }

    #[test]
    fn test_new_session_seeds_board() {
        let session = GameSession::new(config());
        assert_eq!(session.board().tile_count(), 40);
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.spawn_phase(), SpawnPhase::Idle);
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = GameSession::new(config());
        let b = GameSession::new(config());
        assert_eq!(a.board().number_grid(), b.board().number_grid());
    }

    #[test]
    fn test_intro_blocks_input() {
        let cfg = SessionConfig {
            intro_ms: 100,
            ..config()
        };
        let mut session = GameSession::from_layout(cfg, &[(GridPos::new(0, 0), 4)]);
        let id = session.tile_at(GridPos::new(0, 0)).unwrap();

        assert_eq!(session.select(id), SelectOutcome::Ignored);
        session.update(64);
        assert_eq!(session.phase(), SessionPhase::Initializing);
        session.update(64);
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.select(id), SelectOutcome::Selected);
    }

    #[test]
    fn test_select_toggle_and_reselect() {
        let mut session = GameSession::from_layout(
            config(),
            &[(GridPos::new(0, 0), 4), (GridPos::new(2, 2), 4)],
        );
        let a = session.tile_at(GridPos::new(0, 0)).unwrap();
        let b = session.tile_at(GridPos::new(2, 2)).unwrap();

        assert_eq!(session.select(a), SelectOutcome::Selected);
        assert!(!session.affordances().is_empty());
        assert_eq!(session.select(a), SelectOutcome::Deselected);
        assert!(session.affordances().is_empty());

        session.select(a);
        assert_eq!(session.select(b), SelectOutcome::Reselected);
        assert_eq!(session.selected(), Some(b));
        assert_eq!(session.select(TileId(77)), SelectOutcome::Ignored);
        assert_eq!(session.selected(), Some(b));
    }

    #[test]
    fn test_first_match_arms_clock_and_spawner() {
        let mut session = GameSession::from_layout(
            config(),
            &[
                (GridPos::new(0, 0), 3),
                (GridPos::new(0, 1), 7),
                (GridPos::new(5, 5), 1),
            ],
        );
        let a = session.tile_at(GridPos::new(0, 0)).unwrap();
        let b = session.tile_at(GridPos::new(0, 1)).unwrap();

        session.update(5000);
        assert_eq!(session.remaining_secs(), 120);

        session.select(a);
        assert!(matches!(session.select(b), SelectOutcome::Matched(_)));
        assert_eq!(session.score(), 1);
        assert!(matches!(session.spawn_phase(), SpawnPhase::Emptying { .. }));

        session.update(1000);
        assert_eq!(session.remaining_secs(), 119);
        assert!(!session.is_ended());
    }

    #[test]
    fn test_result_only_after_end() {
        let mut session = GameSession::from_layout(
            config(),
            &[(GridPos::new(4, 0), 5), (GridPos::new(4, 9), 5)],
        );
        assert!(session.result().is_none());

        let a = session.tile_at(GridPos::new(4, 0)).unwrap();
        let b = session.tile_at(GridPos::new(4, 9)).unwrap();
        session.select(a);
        session.select(b);

        let result = session.result().unwrap();
        assert_eq!(result.score, 45);
        assert_eq!(result.bonus, 300 + 5 * 120);
        assert_eq!(result.total, 45 + 900);
    }

    #[test]
    fn test_snapshot_reflects_selection() {
        let mut session = GameSession::from_layout(config(), &[(GridPos::new(9, 9), 8)]);
        let id = session.tile_at(GridPos::new(9, 9)).unwrap();
        session.select(id);

        let snap = session.snapshot();
        assert_eq!(snap.tiles.len(), 1);
        assert!(snap.tiles[0].selected);
        assert_eq!(snap.grid[9][9], 8);
        assert_eq!(snap.markers.len(), 2);
        assert_eq!(snap.selected, Some(id));
    }
}
