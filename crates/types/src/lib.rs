//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! They are plain data with no behaviour beyond conversions, so the engine,
//! the terminal front-end and any other presentation layer can share them.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//! - **Spawn position**: (`BOARD_WIDTH / 2 - 2`, 0) = (3, 0) for every piece
//!
//! # Timing and Scoring
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_DROP_MS` | 1000 | Gravity interval at level 1; level L uses `1000 / L` |
//! | `TICK_MS` | 16 | Default host frame cadence (~60 FPS) |
//! | `LINE_CLEAR_POINTS` | 100 | Points per cleared row, multiplied by level |
//! | `POINTS_PER_LEVEL` | 1000 | Score needed per level step |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{GameAction, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(piece.color().hex(), "#a000f0");
//!
//! let action = GameAction::from_str("hardDrop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Column of the shape matrix's top-left corner for a freshly spawned piece
pub const SPAWN_X: i8 = (BOARD_WIDTH / 2) as i8 - 2;

/// Row of the shape matrix's top-left corner for a freshly spawned piece
pub const SPAWN_Y: i8 = 0;

/// Gravity interval at level 1 (1000ms = 1 second per row)
pub const BASE_DROP_MS: u32 = 1000;

/// Default host frame cadence in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Points awarded per cleared row at level 1
pub const LINE_CLEAR_POINTS: u32 = 100;

/// Score needed to advance one level
pub const POINTS_PER_LEVEL: u32 = 1000;

/// Level of a fresh session
pub const STARTING_LEVEL: u32 = 1;

/// 24-bit RGB color token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS-style `#rrggbb` representation
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The seven piece kinds
///
/// Each kind has a fixed base shape (see `blockfall_core::pieces`) and color:
/// - **I**: Cyan, 1x4 bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Purple
/// - **L**: Orange
/// - **J**: Blue
/// - **S**: Green
/// - **Z**: Red
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl PieceKind {
    /// Every kind, in selection-index order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Number of distinct kinds
    pub const COUNT: u32 = 7;

    /// Map a selection index in `0..COUNT` to a kind. Out-of-range indices wrap.
    pub fn from_index(index: u32) -> Self {
        Self::ALL[(index % Self::COUNT) as usize]
    }

    /// Selection index in `0..COUNT`; inverse of [`PieceKind::from_index`]
    pub fn index(&self) -> u32 {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::L => 3,
            PieceKind::J => 4,
            PieceKind::S => 5,
            PieceKind::Z => 6,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("Z"), Some(PieceKind::Z));
    /// assert_eq!(PieceKind::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "l" => Some(PieceKind::L),
            "j" => Some(PieceKind::J),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Uppercase single-letter name
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::L => "L",
            PieceKind::J => "J",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
        }
    }

    /// Color token used for this kind's cells
    pub fn color(&self) -> Rgb {
        match self {
            PieceKind::I => Rgb::new(0x00, 0xf0, 0xf0),
            PieceKind::O => Rgb::new(0xf0, 0xf0, 0x00),
            PieceKind::T => Rgb::new(0xa0, 0x00, 0xf0),
            PieceKind::L => Rgb::new(0xf0, 0xa0, 0x00),
            PieceKind::J => Rgb::new(0x00, 0x00, 0xf0),
            PieceKind::S => Rgb::new(0x00, 0xf0, 0x00),
            PieceKind::Z => Rgb::new(0xf0, 0x00, 0x00),
        }
    }
}

/// Player intents accepted by the engine
///
/// A presentation layer produces these from whatever input device it owns.
/// All of them are no-ops once the game is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down without locking
    SoftDrop,
    /// Rotate piece 90° clockwise (rejected on collision, no wall kicks)
    Rotate,
    /// Drop piece to its lowest valid row and lock it immediately
    HardDrop,
}

impl GameAction {
    /// Parse action from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("ROTATE"), Some(GameAction::Rotate));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "rotate" => Some(GameAction::Rotate),
            "harddrop" => Some(GameAction::HardDrop),
            _ => None,
        }
    }

    /// Convert to camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::Rotate => "rotate",
            GameAction::HardDrop => "hardDrop",
        }
    }
}

/// Event recorded by the engine every time a piece locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub lines_cleared: u32,
    /// Points awarded for this lock (0 when no row was cleared)
    pub points: u32,
    pub level_before: u32,
    pub level_after: u32,
}

impl LockEvent {
    pub fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Locked cell; its color is `PieceKind::color()`
pub type Cell = Option<PieceKind>;
