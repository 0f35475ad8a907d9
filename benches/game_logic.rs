use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blockfall::core::{Board, GameSession, GameSnapshot, SequenceRng};
use blockfall::types::PieceKind;

fn bench_tick(c: &mut Criterion) {
    let mut state = GameSession::new(12345);

    c.bench_function("game_tick_16ms", |b| {
        b.iter(|| {
            if state.game_over() {
                state = GameSession::new(12345);
            }
            state.tick(black_box(16));
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new();
            // Fill bottom 4 rows
            for y in 16..20 {
                for x in 0..10 {
                    board.set(x, y, Some(PieceKind::I));
                }
            }
            board.clear_full_rows()
        })
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    c.bench_function("hard_drop_until_game_over", |b| {
        b.iter(|| {
            let mut state = GameSession::with_rng(SequenceRng::new(PieceKind::ALL));
            while state.hard_drop() {}
            state.score()
        })
    });
}

fn bench_move(c: &mut Criterion) {
    let mut state = GameSession::new(12345);

    c.bench_function("move_left_right", |b| {
        b.iter(|| {
            state.move_right();
            state.move_left();
        })
    });
}

fn bench_rotate(c: &mut Criterion) {
    let mut state = GameSession::new(12345);

    c.bench_function("rotate", |b| {
        b.iter(|| {
            state.rotate();
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let state = GameSession::new(12345);
    let mut snap = GameSnapshot::default();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| {
            state.snapshot_into(black_box(&mut snap));
        })
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_line_clear,
    bench_hard_drop,
    bench_move,
    bench_rotate,
    bench_snapshot
);
criterion_main!(benches);
