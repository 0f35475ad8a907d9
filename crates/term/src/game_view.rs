//! Game view: lays a [`GameSnapshot`] out on a [`FrameBuffer`].
//!
//! Pure painting, no I/O. The well is centered in the viewport with the
//! counters, next piece and key help to its right when there is room.

use crate::core::{base_shape, ActiveSnapshot, GameSnapshot};
use crate::fb::{number_width, FrameBuffer, Paint};
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const BLOCK: char = '█';
const GHOST: char = '░';
const WELL: char = '·';

const HINTS: [&str; 3] = ["←→ move  ↑ rotate", "↓ soft  space drop", "q quit"];

/// Screen rectangle of the bordered playfield
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl Frame {
    /// Center column for a run of `len` glyphs
    fn centered(&self, len: u16) -> u16 {
        self.x.saturating_add(self.w.saturating_sub(len) / 2)
    }
}

/// Paints a [`GameSnapshot`] as a bordered well plus a side panel.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
    show_ghost: bool,
}

impl Default for GameView {
    fn default() -> Self {
        // Two columns per cell keeps blocks roughly square.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
            show_ghost: true,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            ..Self::default()
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    pub fn with_ghost(mut self, show_ghost: bool) -> Self {
        self.show_ghost = show_ghost;
        self
    }

    /// Paint a snapshot into `fb`, resizing it to the viewport.
    ///
    /// Reusing one framebuffer across frames keeps this allocation-free.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.reset(viewport.width, viewport.height);

        let frame = self.frame(viewport);
        self.paint_border(fb, frame);

        for (y, row) in snap.board.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let (ch, paint) = match cell {
                    Some(kind) => (BLOCK, Paint::Block(kind.color())),
                    None => (WELL, Paint::Well),
                };
                self.paint_cell(fb, frame, x as u16, y as u16, ch, paint);
            }
        }

        if let Some(active) = snap.active {
            // Ghost first so the piece itself wins where they overlap.
            if let Some(ghost_y) = snap.ghost_y.filter(|_| self.show_ghost) {
                self.paint_piece(fb, frame, &active, ghost_y, GHOST, Paint::Ghost);
            }
            self.paint_piece(fb, frame, &active, active.y, BLOCK, Paint::Block(active.color));
        }

        self.paint_panel(fb, snap, viewport, frame);

        if snap.game_over {
            self.paint_game_over(fb, snap, frame);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::default();
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn frame(&self, viewport: Viewport) -> Frame {
        let w = u16::from(BOARD_WIDTH) * self.cell_w + 2;
        let h = u16::from(BOARD_HEIGHT) * self.cell_h + 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(h) / 2,
            AnchorY::Top => 0,
        };
        Frame {
            x: viewport.width.saturating_sub(w) / 2,
            y,
            w,
            h,
        }
    }

    fn paint_border(&self, fb: &mut FrameBuffer, frame: Frame) {
        let Frame { x, y, w, h } = frame;
        let (right, bottom) = (x + w - 1, y + h - 1);

        for px in x + 1..right {
            fb.paint(px, y, '─', Paint::Frame);
            fb.paint(px, bottom, '─', Paint::Frame);
        }
        for py in y + 1..bottom {
            fb.paint(x, py, '│', Paint::Frame);
            fb.paint(right, py, '│', Paint::Frame);
        }
        fb.paint(x, y, '┌', Paint::Frame);
        fb.paint(right, y, '┐', Paint::Frame);
        fb.paint(x, bottom, '└', Paint::Frame);
        fb.paint(right, bottom, '┘', Paint::Frame);
    }

    /// Fill the screen area of board cell (x, y).
    fn paint_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: u16, y: u16, ch: char, paint: Paint) {
        let px = frame.x + 1 + x * self.cell_w;
        let py = frame.y + 1 + y * self.cell_h;
        fb.paint_rect(px, py, self.cell_w, self.cell_h, ch, paint);
    }

    /// Paint the active piece's shape with its top edge at board row `top`.
    fn paint_piece(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        piece: &ActiveSnapshot,
        top: i8,
        ch: char,
        paint: Paint,
    ) {
        for (dx, dy) in piece.shape.cells() {
            if let Some((x, y)) = on_board(piece.x + dx, top + dy) {
                self.paint_cell(fb, frame, x, y, ch, paint);
            }
        }
    }

    fn paint_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport, frame: Frame) {
        let x = frame.x.saturating_add(frame.w).saturating_add(2);
        if viewport.width.saturating_sub(x) < 10 {
            return;
        }

        let mut y = frame.y;
        for (label, value) in [("SCORE", snap.score), ("LEVEL", snap.level), ("LINES", snap.lines)] {
            fb.text(x, y, label, Paint::Label);
            fb.number(x, y.saturating_add(1), value, Paint::Value);
            y = y.saturating_add(3);
        }

        fb.text(x, y, "NEXT", Paint::Label);
        y = y.saturating_add(1);
        let next = base_shape(snap.next);
        let preview = Paint::Preview(snap.next.color());
        for (dx, dy) in next.cells() {
            let px = x.saturating_add(dx as u16 * 2);
            fb.paint_rect(px, y.saturating_add(dy as u16), 2, 1, BLOCK, preview);
        }
        y = y.saturating_add(u16::from(next.rows()) + 1);

        for line in HINTS {
            if y >= viewport.height {
                break;
            }
            fb.text(x, y, line, Paint::Hint);
            y = y.saturating_add(1);
        }
    }

    fn paint_game_over(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, frame: Frame) {
        let mid = frame.y.saturating_add(frame.h / 2);

        fb.text(frame.centered(9), mid.saturating_sub(1), "GAME OVER", Paint::Banner);

        // "SCORE " and the number, centered as one run.
        let x = frame.centered(6 + number_width(snap.score));
        let after = fb.text(x, mid, "SCORE ", Paint::Banner);
        fb.number(after, mid, snap.score, Paint::Banner);

        fb.text(frame.centered(9), mid.saturating_add(1), "R restart", Paint::Hint);
    }
}

/// Board coordinates as unsigned, or None if off the visible board.
fn on_board(x: i8, y: i8) -> Option<(u16, u16)> {
    let on = (0..BOARD_WIDTH as i8).contains(&x) && (0..BOARD_HEIGHT as i8).contains(&y);
    on.then(|| (x as u16, y as u16))
}
