use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tenmatch::core::{affordance, check_match, Board, GameSession, SessionConfig};
use tenmatch::types::{Direction, GridPos};

fn config() -> SessionConfig {
    SessionConfig {
        intro_ms: 0,
        seed: 12345,
        ..SessionConfig::default()
    }
}

fn bench_idle_tick(c: &mut Criterion) {
    let mut session = GameSession::new(config());

    c.bench_function("session_tick_16ms", |b| {
        b.iter(|| {
            session.update(black_box(16));
        })
    });
}

fn bench_slide_to_rest(c: &mut Criterion) {
    // Ten sliders crossing the board in alternating directions.
    let layout: Vec<(GridPos, u8)> = (0..10)
        .map(|row| (GridPos::new(row, (row % 2) * 9), (row as u8 % 9) + 1))
        .collect();

    c.bench_function("slide_ten_tiles_to_rest", |b| {
        b.iter(|| {
            let mut session = GameSession::from_layout(config(), &layout);
            for row in 0..10 {
                if let Some(id) = session.tile_at(layout[row].0) {
                    let dir = if row % 2 == 0 {
                        Direction::Right
                    } else {
                        Direction::Left
                    };
                    session.slide(id, dir);
                }
            }
            while session.board().any_moving() {
                session.update(16);
            }
            black_box(session.score());
        })
    });
}

fn bench_check_match(c: &mut Criterion) {
    let mut board = Board::new();
    let a = board.spawn_tile(3, GridPos::new(5, 0)).unwrap();
    let b = board.spawn_tile(7, GridPos::new(5, 9)).unwrap();

    c.bench_function("check_match_long_line", |bench| {
        bench.iter(|| black_box(check_match(&board, a, b).is_ok()))
    });
}

fn bench_affordances(c: &mut Criterion) {
    let session = GameSession::new(config());
    let selected = session.board().tiles().next().map(|t| t.id());

    c.bench_function("compute_affordances", |b| {
        b.iter(|| black_box(affordance::compute(session.board(), selected)))
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let session = GameSession::new(config());
    let mut snap = session.snapshot();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| session.snapshot_into(black_box(&mut snap)))
    });
}

criterion_group!(
    benches,
    bench_idle_tick,
    bench_slide_to_rest,
    bench_check_match,
    bench_affordances,
    bench_snapshot
);
criterion_main!(benches);
