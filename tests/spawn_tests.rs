//! Spawn tests driven through a full session

use rand::rngs::StdRng;
use rand::SeedableRng;

use tenmatch::core::{
    candidate_numbers, seed_board, Board, GameSession, SessionConfig, SessionEvent, SpawnPhase,
};
use tenmatch::types::{numbers_compatible, GridPos, SPAWN_EMPTY_MS, TICK_MS};

fn config(seed: u64) -> SessionConfig {
    SessionConfig {
        intro_ms: 0,
        seed,
        ..SessionConfig::default()
    }
}

fn spawned(events: &[SessionEvent]) -> Vec<(GridPos, u8)> {
    events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::Spawned { pos, number, .. } => Some((*pos, *number)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_board_of_fives_only_spawns_fives() {
    for seed in 0..10 {
        let mut session = GameSession::from_layout(
            config(seed),
            &[
                (GridPos::new(0, 0), 5),
                (GridPos::new(0, 1), 5),
                (GridPos::new(7, 7), 5),
            ],
        );
        let a = session.tile_at(GridPos::new(0, 0)).unwrap();
        let b = session.tile_at(GridPos::new(0, 1)).unwrap();
        session.select(a);
        session.select(b);
        session.drain_events();

        let ticks = SPAWN_EMPTY_MS / TICK_MS + 2;
        for _ in 0..ticks {
            session.update(TICK_MS);
        }

        let spawned = spawned(&session.drain_events());
        assert_eq!(spawned.len(), 1, "seed {seed}");
        let (pos, number) = spawned[0];
        assert_eq!(number, 5);
        assert_eq!(session.board().tile_at(pos).map(|t| t.number()), Some(5));
        assert_eq!(session.board().tile_count(), 2);
        assert!(matches!(session.spawn_phase(), SpawnPhase::Filling { .. }));
    }
}

#[test]
fn test_nothing_spawns_before_first_match() {
    let mut session = GameSession::new(config(3));
    let before = session.board().tile_count();
    for _ in 0..1000 {
        session.update(TICK_MS);
    }
    assert_eq!(session.board().tile_count(), before);
    assert_eq!(session.spawn_phase(), SpawnPhase::Idle);
    assert_eq!(session.snapshot().spawn_bar, 1.0);
}

#[test]
fn test_spawned_numbers_always_have_a_partner() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut board = Board::new();
    seed_board(&mut board, &mut rng, 6);

    let present = board.numbers_present();
    for candidate in candidate_numbers(&board) {
        assert!(
            present.iter().any(|&n| numbers_compatible(n, candidate)),
            "{candidate} has no partner on the board"
        );
    }
}

#[test]
fn test_empty_board_allows_every_number() {
    let board = Board::new();
    let all: Vec<u8> = candidate_numbers(&board).into_iter().collect();
    assert_eq!(all, (1..=9).collect::<Vec<_>>());
}
