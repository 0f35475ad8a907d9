//! Terminal front-end for blockfall.
//!
//! [`GameView`] paints a [`core::GameSnapshot`] into a [`FrameBuffer`] of
//! glyphs tagged with what they show, and [`TerminalRenderer`] writes the
//! glyphs that changed since the previous frame through crossterm. `core`
//! stays free of any terminal dependency.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{number_width, FrameBuffer, Glyph, Paint};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::{encode_frame, TerminalRenderer};
