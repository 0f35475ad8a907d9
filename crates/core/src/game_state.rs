//! Game state module - the session engine
//!
//! Ties the board, the active piece, the random source and scoring together.
//! A session moves through four phases:
//!
//! ```text
//! Spawning --(fits)--> Falling --(grounded on tick / hard drop)--> Locking
//!     ^                                                               |
//!     +---------------------------------------------------------------+
//! Spawning --(overlaps)--> GameOver (terminal)
//! ```
//!
//! `Spawning` and `Locking` are transient: they complete inside the call that
//! entered them, so callers only ever observe `Falling` or `GameOver`.

use log::{debug, info, trace};

use crate::pieces::{base_shape, ShapeMatrix};
use crate::rng::{PieceRng, SimpleRng};
use crate::scoring::{calculate_score, drop_interval_ms};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::*;
use crate::Board;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub shape: ShapeMatrix,
    /// Column of the shape's top-left corner
    pub x: i8,
    /// Row of the shape's top-left corner (may be negative)
    pub y: i8,
}

impl ActivePiece {
    /// Create a piece of `kind` in its base orientation at the spawn position
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: base_shape(kind),
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }

    pub fn color(&self) -> Rgb {
        self.kind.color()
    }

    /// Same piece moved by (dx, dy)
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Same piece with its shape rotated 90° clockwise in place
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated_cw(),
            ..*self
        }
    }

    /// Absolute board coordinates of every occupied cell
    pub fn board_cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape
            .cells()
            .into_iter()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Does this piece, moved by (dx, dy), collide with the board or its walls?
    ///
    /// A cell collides when its column is outside the board, its row is at or
    /// below the floor, or it is on the board and the board cell is occupied.
    /// Rows above the top never collide with the board. Offsets are widened
    /// before adding, so any (dx, dy) is safe to ask about.
    pub fn collides(&self, board: &Board, dx: i8, dy: i8) -> bool {
        let width = i16::from(board.width());
        let height = i16::from(board.height());

        self.board_cells().any(|(x, y)| {
            let nx = i16::from(x) + i16::from(dx);
            let ny = i16::from(y) + i16::from(dy);
            if nx < 0 || nx >= width || ny >= height {
                return true;
            }
            // In range on both axes from here, so the casts are lossless.
            ny >= 0 && board.is_occupied(nx as i8, ny as i8)
        })
    }
}

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Spawning,
    Falling,
    Locking,
    GameOver,
}

/// Complete state of one game
///
/// Owns everything it touches; independent sessions never share state.
#[derive(Debug, Clone)]
pub struct GameSession<R = SimpleRng> {
    board: Board,
    active: Option<ActivePiece>,
    /// Kind that spawns after the active piece
    next: PieceKind,
    rng: R,
    phase: Phase,
    score: u32,
    level: u32,
    lines: u32,
    /// Elapsed time since the last gravity step
    drop_timer_ms: u32,
    /// Last lock event (consumed by observers).
    last_event: Option<LockEvent>,
}

impl GameSession<SimpleRng> {
    /// Start a new game on an empty board with a seeded RNG
    pub fn new(seed: u32) -> Self {
        Self::with_rng(SimpleRng::new(seed))
    }
}

impl Default for GameSession<SimpleRng> {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<R: PieceRng> GameSession<R> {
    /// Start a new game on an empty board
    pub fn with_rng(rng: R) -> Self {
        Self::with_board(Board::new(), rng)
    }

    /// Start a game on a prepared board.
    ///
    /// The first piece spawns immediately; if it does not fit, the session
    /// begins in `GameOver`.
    pub fn with_board(board: Board, mut rng: R) -> Self {
        let next = rng.next_kind();
        let mut session = Self {
            board,
            active: None,
            next,
            rng,
            phase: Phase::Spawning,
            score: 0,
            level: STARTING_LEVEL,
            lines: 0,
            drop_timer_ms: 0,
            last_event: None,
        };
        session.spawn_piece();
        session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Total rows cleared this game
    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn next_kind(&self) -> PieceKind {
        self.next
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Current gravity interval based on level
    pub fn drop_interval_ms(&self) -> u32 {
        drop_interval_ms(self.level)
    }

    pub fn drop_timer_ms(&self) -> u32 {
        self.drop_timer_ms
    }

    pub fn last_event(&self) -> Option<LockEvent> {
        self.last_event
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Would the active piece collide if moved by (dx, dy)?
    ///
    /// With no active piece (game over) everything collides.
    pub fn check_collision(&self, dx: i8, dy: i8) -> bool {
        match self.active {
            Some(ref piece) => piece.collides(&self.board, dx, dy),
            None => true,
        }
    }

    /// Row the active piece would land on if hard-dropped now
    pub fn ghost_y(&self) -> Option<i8> {
        let mut piece = self.active?;
        while !piece.collides(&self.board, 0, 1) {
            piece.y += 1;
        }
        Some(piece.y)
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);
        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.next = self.next;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.drop_interval_ms = self.drop_interval_ms();
        out.game_over = self.game_over();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Spawn the queued kind and draw the one after it.
    ///
    /// The gravity clock is left alone: time banked before a hard drop
    /// carries over to the new piece.
    ///
    /// Returns false (and ends the game) if the new piece overlaps the board.
    fn spawn_piece(&mut self) -> bool {
        self.phase = Phase::Spawning;

        let upcoming = self.rng.next_kind();
        let kind = std::mem::replace(&mut self.next, upcoming);
        let piece = ActivePiece::spawn(kind);

        if piece.collides(&self.board, 0, 0) {
            self.active = None;
            self.phase = Phase::GameOver;
            info!(
                "game over: {} blocked at spawn, final score {} (level {}, {} lines)",
                kind.as_str(),
                self.score,
                self.level,
                self.lines
            );
            return false;
        }

        debug!("spawned {} at ({}, {}), next {}", kind.as_str(), piece.x, piece.y, self.next.as_str());
        self.active = Some(piece);
        self.phase = Phase::Falling;
        true
    }

    /// Move the active piece if the target position is free
    fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if self.phase != Phase::Falling {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        if active.collides(&self.board, dx, dy) {
            return false;
        }
        self.active = Some(active.shifted(dx, dy));
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move(1, 0)
    }

    /// Move down one row. Never locks, even when grounded.
    pub fn soft_drop(&mut self) -> bool {
        self.try_move(0, 1)
    }

    /// Rotate 90° clockwise, keeping the old shape if the new one collides.
    pub fn rotate(&mut self) -> bool {
        if self.phase != Phase::Falling {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let rotated = active.rotated();
        if rotated.collides(&self.board, 0, 0) {
            return false;
        }
        self.active = Some(rotated);
        true
    }

    /// Drop to the lowest free row and lock immediately.
    pub fn hard_drop(&mut self) -> bool {
        if self.phase != Phase::Falling {
            return false;
        }
        let Some(mut active) = self.active else {
            return false;
        };

        let start_y = active.y;
        while !active.collides(&self.board, 0, 1) {
            active.y += 1;
        }
        trace!("hard drop {} rows", active.y - start_y);

        self.active = Some(active);
        self.lock_piece();
        true
    }

    /// One gravity step: fall a row, or lock if the piece is grounded.
    pub fn step(&mut self) -> bool {
        if self.phase != Phase::Falling {
            return false;
        }
        if self.try_move(0, 1) {
            trace!("gravity -> y={}", self.active.map(|p| p.y).unwrap_or_default());
        } else {
            self.lock_piece();
        }
        true
    }

    /// Advance the gravity clock by `elapsed_ms`.
    ///
    /// Once the accumulated time reaches the level's interval, one gravity
    /// step runs and the accumulator restarts at zero. Returns true if the
    /// state changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.phase != Phase::Falling {
            return false;
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);
        if self.drop_timer_ms < self.drop_interval_ms() {
            return false;
        }

        self.drop_timer_ms = 0;
        self.step()
    }

    /// Apply a player intent
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::Rotate => self.rotate(),
            GameAction::HardDrop => self.hard_drop(),
        }
    }

    /// Write the active piece into the board, clear rows, score, respawn.
    fn lock_piece(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        self.phase = Phase::Locking;

        let kind = active.kind;
        self.board
            .lock_cells(active.board_cells().map(|(x, y)| (x, y, kind)));

        let cleared = self.board.clear_full_rows();
        let level_before = self.level;
        let result = calculate_score(cleared, self.score, self.level);
        self.score = result.score;
        self.level = result.level;
        self.lines += cleared;

        if cleared > 0 {
            debug!(
                "locked {} at ({}, {}), cleared {} (+{} -> {})",
                kind.as_str(),
                active.x,
                active.y,
                cleared,
                result.points,
                self.score
            );
        } else {
            debug!("locked {} at ({}, {})", kind.as_str(), active.x, active.y);
        }
        if self.level > level_before {
            info!(
                "level {} -> {} (gravity every {}ms)",
                level_before,
                self.level,
                self.drop_interval_ms()
            );
        }

        self.last_event = Some(LockEvent {
            kind,
            lines_cleared: cleared,
            points: result.points,
            level_before,
            level_after: self.level,
        });

        self.spawn_piece();
    }
}
