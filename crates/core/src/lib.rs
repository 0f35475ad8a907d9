//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the game rules, state management, and simulation logic.
//! It has no dependency on terminals or I/O; the only side channel is the `log`
//! facade, which is silent unless the host installs a logger.
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid of locked cells, row detection and collapse
//! - [`game_state`]: the session engine (active piece, intents, gravity, locking)
//! - [`pieces`]: shape matrices and clockwise rotation
//! - [`rng`]: pluggable piece selection
//! - [`scoring`]: line-clear points, levels and gravity intervals
//! - [`snapshot`]: read-only view handed to presentation layers
//!
//! # Game Rules
//!
//! - Every piece spawns with its matrix's top-left corner at (3, 0); if it
//!   overlaps locked cells the game is over.
//! - Rotation is clockwise only and is simply rejected when it collides.
//! - A grounded piece locks on the next gravity step; hard drop locks at once.
//! - Clearing `n` rows awards `n * 100 * level`; level is `score / 1000 + 1`.
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameSession;
//! use blockfall_types::GameAction;
//!
//! let mut game = GameSession::new(12345);
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(game.board().occupied_count(), 4);
//! assert_eq!(game.score(), 0);
//! ```
//!
//! # Timing
//!
//! The host calls [`GameSession::tick`](game_state::GameSession::tick) with the
//! elapsed milliseconds (typically every 16ms). Gravity fires once the
//! accumulated time reaches `1000 / level` ms.

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::{ActivePiece, GameSession, Phase};
pub use pieces::{base_shape, ShapeMatrix};
pub use rng::{PieceRng, SequenceRng, SimpleRng};
pub use scoring::{calculate_score, drop_interval_ms, level_for_score, line_clear_points, ScoreResult};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
