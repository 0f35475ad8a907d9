//! Snapshot module - read-only, serializable view of a session
//!
//! A [`GameSnapshot`] is what renderers and observers consume: the locked
//! grid, the active piece with its color, the landing row and the counters.
//! It is plain data, so `snapshot_into` can refill one buffer every frame.

use serde::Serialize;

use crate::game_state::ActivePiece;
use crate::pieces::ShapeMatrix;
use crate::types::{Cell, PieceKind, Rgb, BOARD_HEIGHT, BOARD_WIDTH, BASE_DROP_MS, STARTING_LEVEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub color: Rgb,
    pub shape: ShapeMatrix,
    pub x: i8,
    pub y: i8,
}

impl ActiveSnapshot {
    /// Is board cell (x, y) covered by this piece?
    pub fn covers(&self, x: i8, y: i8) -> bool {
        let dx = i16::from(x) - i16::from(self.x);
        let dy = i16::from(y) - i16::from(self.y);
        dx >= 0 && dy >= 0 && self.shape.get(dx as usize, dy as usize)
    }
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind,
            color: value.color(),
            shape: value.shape,
            x: value.x,
            y: value.y,
        }
    }
}

/// Read-only view of a session for presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GameSnapshot {
    /// Locked cells, `board[y][x]`
    pub board: [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: PieceKind,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub drop_interval_ms: u32,
    pub game_over: bool,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.board = [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.active = None;
        self.ghost_y = None;
        self.next = PieceKind::I;
        self.score = 0;
        self.level = STARTING_LEVEL;
        self.lines = 0;
        self.drop_interval_ms = BASE_DROP_MS;
        self.game_over = false;
    }

    /// Color of whatever occupies (x, y): the active piece first, then the board.
    pub fn color_at(&self, x: i8, y: i8) -> Option<Rgb> {
        if let Some(active) = self.active {
            if active.covers(x, y) {
                return Some(active.color);
            }
        }
        if x < 0 || y < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        self.board[y as usize][x as usize].map(|kind| kind.color())
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            board: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            next: PieceKind::I,
            score: 0,
            level: 0,
            lines: 0,
            drop_interval_ms: 0,
            game_over: false,
        };
        s.clear();
        s
    }
}
