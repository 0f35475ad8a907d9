//! Integration tests for the session engine

use blockfall::core::{Board, GameSession, Phase, PieceRng, SequenceRng, SimpleRng};
use blockfall::types::{GameAction, PieceKind};

fn scripted(kinds: &[PieceKind]) -> GameSession<SequenceRng> {
    GameSession::with_rng(SequenceRng::new(kinds.iter().copied()))
}

/// Rotate the spawned I upright and slide it to `column`.
fn stand_i_at<R: PieceRng>(state: &mut GameSession<R>, column: i8) {
    assert!(state.rotate());
    let mut x = state.active().unwrap().x;
    while x < column {
        assert!(state.move_right());
        x += 1;
    }
    while x > column {
        assert!(state.move_left());
        x -= 1;
    }
}

#[test]
fn test_o_piece_lands_on_floor() {
    let mut state = scripted(&[PieceKind::O, PieceKind::T]);
    assert!(state.apply_action(GameAction::MoveRight));
    assert_eq!(state.active().unwrap().x, 4);

    assert!(state.apply_action(GameAction::HardDrop));

    let board = state.board();
    for (x, y) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
        assert_eq!(board.get(x, y), Some(Some(PieceKind::O)), "({x}, {y})");
    }
    assert_eq!(board.occupied_count(), 4);
    assert_eq!(state.score(), 0);
    assert_eq!(state.lines(), 0);
    assert_eq!(state.active().unwrap().kind, PieceKind::T);
}

#[test]
fn test_vertical_i_clears_single_row() {
    let board = Board::from_rows(&["IIIII.IIII"]).unwrap();
    let mut state = GameSession::with_board(board, SequenceRng::new([PieceKind::I, PieceKind::O]));

    stand_i_at(&mut state, 5);
    assert!(state.hard_drop());

    let ev = state.take_last_event().unwrap();
    assert_eq!(ev.lines_cleared, 1);
    assert_eq!(ev.points, 100);
    assert_eq!(state.score(), 100);
    assert_eq!(state.lines(), 1);

    // The three upper cells of the I slid down one row.
    let board = state.board();
    assert_eq!(board.occupied_count(), 3);
    for y in 17..20 {
        assert!(board.is_occupied(5, y));
    }
}

#[test]
fn test_two_rows_score_with_level() {
    let board = Board::from_rows(&[".IIIIIIIII", ".IIIIIIIII"]).unwrap();
    let mut state = GameSession::with_board(board, SequenceRng::repeat(PieceKind::I));

    stand_i_at(&mut state, 0);
    state.hard_drop();

    assert_eq!(state.score(), 200);
    assert_eq!(state.lines(), 2);
    assert_eq!(state.board().occupied_count(), 2);
    assert!(state.board().is_occupied(0, 18));
    assert!(state.board().is_occupied(0, 19));
}

#[test]
fn test_blocked_spawn_is_game_over() {
    // Columns 3-4 filled to the top.
    let board = Board::from_rows(&["...ZZ....."; 20]).unwrap();
    let before = board.clone();
    let state = GameSession::with_board(board, SequenceRng::repeat(PieceKind::O));

    assert_eq!(state.phase(), Phase::GameOver);
    assert!(state.game_over());
    assert!(state.active().is_none());
    assert_eq!(state.board(), &before);
    assert_eq!(state.lines(), 0);
}

#[test]
fn test_stacking_until_game_over() {
    // O pieces dropped straight down fill columns 3-4 two rows at a time.
    let mut state = GameSession::with_rng(SequenceRng::repeat(PieceKind::O));

    let mut drops = 0;
    while state.hard_drop() {
        drops += 1;
        assert!(drops <= 10);
    }

    assert_eq!(drops, 10);
    assert!(state.game_over());
    assert_eq!(state.board().occupied_count(), 40);
}

#[test]
fn test_actions_after_game_over_are_noops() {
    let mut state = GameSession::with_rng(SequenceRng::repeat(PieceKind::O));
    while state.hard_drop() {}
    assert!(state.game_over());

    let before = state.snapshot();
    for action in [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::SoftDrop,
        GameAction::Rotate,
        GameAction::HardDrop,
    ] {
        assert!(!state.apply_action(action));
    }
    assert!(!state.tick(60_000));
    assert_eq!(state.snapshot(), before);
}

#[test]
fn test_hard_drop_lands_at_lowest_free_row() {
    for seed in 1..50u32 {
        let mut state = GameSession::new(seed);
        // Rough up the stack a bit first.
        for _ in 0..(seed % 5) {
            state.move_left();
            state.hard_drop();
        }
        if state.game_over() {
            continue;
        }

        let ghost = state.ghost_y().unwrap();
        while state.soft_drop() {}
        let piece = state.active().unwrap();

        assert_eq!(piece.y, ghost, "seed {seed}");
        assert!(!state.check_collision(0, 0));
        assert!(state.check_collision(0, 1));
    }
}

#[test]
fn test_spawn_never_collides() {
    for seed in 1..30u32 {
        let state = GameSession::new(seed);
        let piece = state.active().unwrap();
        assert_eq!((piece.x, piece.y), (3, 0));
        assert!(!state.check_collision(0, 0));
    }
}

#[test]
fn test_rotation_rejected_keeps_shape() {
    // Vertical I flush against the right wall cannot turn flat.
    let mut state = scripted(&[PieceKind::I]);
    stand_i_at(&mut state, 9);
    let before = state.active().unwrap();

    assert!(!state.apply_action(GameAction::Rotate));
    assert_eq!(state.active().unwrap(), before);
}

#[test]
fn test_rotation_blocked_by_locked_cells() {
    // A locked cell at (3, 2) blocks the turned T.
    let mut board = Board::new();
    board.set(3, 2, Some(PieceKind::Z));
    let mut state = GameSession::with_board(board, SequenceRng::repeat(PieceKind::T));

    // T at (3, 0) covers (4,0) (3..=5,1); rotated it covers (3,0) (3,1) (4,1) (3,2).
    let before = state.active().unwrap();
    assert!(!state.rotate());
    assert_eq!(state.active().unwrap(), before);

    state.move_right();
    assert!(state.rotate());
}

#[test]
fn test_gravity_cadence() {
    let mut state = scripted(&[PieceKind::O]);

    for _ in 0..62 {
        state.tick(16);
    }
    // 62 * 16 = 992ms: not yet.
    assert_eq!(state.active().unwrap().y, 0);

    state.tick(16);
    assert_eq!(state.active().unwrap().y, 1);
    assert_eq!(state.drop_timer_ms(), 0);
}

#[test]
fn test_grounded_piece_locks_on_gravity() {
    let mut state = scripted(&[PieceKind::O, PieceKind::S]);
    while state.soft_drop() {}

    assert!(state.tick(1000));
    assert_eq!(state.board().occupied_count(), 4);
    assert_eq!(state.active().unwrap().kind, PieceKind::S);
    assert_eq!(state.phase(), Phase::Falling);
}

#[test]
fn test_level_up_speeds_up_gravity() {
    // Twelve rows open only in column 0: three upright I pieces clear four
    // rows each, 400 points a time at level 1.
    let rows = [".IIIIIIIII"; 12];
    let board = Board::from_rows(&rows).unwrap();
    let mut state = GameSession::with_board(board, SequenceRng::repeat(PieceKind::I));

    for expected in [400, 800, 1200] {
        stand_i_at(&mut state, 0);
        assert!(state.hard_drop());
        assert_eq!(state.score(), expected);
    }

    let ev = state.last_event().unwrap();
    assert!(ev.leveled_up());
    assert_eq!(state.level(), 2);
    assert_eq!(state.lines(), 12);
    assert_eq!(state.drop_interval_ms(), 500);
    assert_eq!(state.board().occupied_count(), 0);

    assert!(!state.tick(499));
    assert!(state.tick(1));
    assert_eq!(state.active().unwrap().y, 1);
}

#[test]
fn test_score_and_level_invariants_over_random_games() {
    for seed in 1..20u32 {
        let mut state = GameSession::new(seed);
        let mut prev_level = state.level();
        let mut moves = 0u32;

        while !state.game_over() && moves < 500 {
            match moves % 4 {
                0 => state.move_left(),
                1 => state.rotate(),
                2 => state.move_right(),
                _ => state.hard_drop(),
            };
            moves += 1;

            if let Some(ev) = state.take_last_event() {
                assert_eq!(ev.points, ev.lines_cleared * 100 * ev.level_before);
            }
            assert_eq!(state.level(), state.score() / 1000 + 1);
            assert!(state.level() >= prev_level);
            prev_level = state.level();
        }
    }
}

#[test]
fn test_same_seed_same_game() {
    let mut a = GameSession::new(777);
    let mut b = GameSession::with_rng(SimpleRng::new(777));

    for i in 0..200 {
        let action = match i % 3 {
            0 => GameAction::MoveLeft,
            1 => GameAction::Rotate,
            _ => GameAction::HardDrop,
        };
        a.apply_action(action);
        b.apply_action(action);
        a.tick(16);
        b.tick(16);
        assert_eq!(a.snapshot(), b.snapshot());
    }
}

#[test]
fn test_sessions_are_independent() {
    let mut a = GameSession::new(5);
    let b = GameSession::new(5);

    a.hard_drop();
    assert_eq!(a.board().occupied_count(), 4);
    assert_eq!(b.board().occupied_count(), 0);
}

#[test]
fn test_soft_drop_does_not_score() {
    let mut state = scripted(&[PieceKind::T]);
    while state.apply_action(GameAction::SoftDrop) {}
    assert_eq!(state.score(), 0);
    assert_eq!(state.board().occupied_count(), 0);
}
