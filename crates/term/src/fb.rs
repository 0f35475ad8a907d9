//! Character grid the game view paints into.
//!
//! Each glyph records what it depicts (a block in its piece color, an empty
//! well cell, a panel label, ...) as a [`Paint`]. Colors and attributes are
//! only chosen when the renderer writes the grid out, so the view never
//! deals in terminal styling.

use crate::types::Rgb;

/// What a screen position shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Paint {
    /// Anything outside the playfield and panel
    #[default]
    Backdrop,
    /// Empty board cell
    Well,
    /// Locked or falling block
    Block(Rgb),
    /// Landing preview of the active piece
    Ghost,
    /// Upcoming piece in the side panel
    Preview(Rgb),
    /// Playfield border
    Frame,
    /// Panel heading
    Label,
    /// Panel counter
    Value,
    /// Key help
    Hint,
    /// Game-over overlay
    Banner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub paint: Paint,
}

impl Glyph {
    pub const BLANK: Glyph = Glyph {
        ch: ' ',
        paint: Paint::Backdrop,
    };
}

impl Default for Glyph {
    fn default() -> Self {
        Self::BLANK
    }
}

/// Row-major grid of glyphs, one per terminal cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    glyphs: Vec<Glyph>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let mut fb = Self::default();
        fb.reset(width, height);
        fb
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Blank every glyph and take on the given size.
    ///
    /// The allocation is reused, so repainting at a steady terminal size never
    /// allocates.
    pub fn reset(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.glyphs.clear();
        self.glyphs
            .resize(usize::from(width) * usize::from(height), Glyph::BLANK);
    }

    fn offset(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Glyph> {
        self.offset(x, y).map(|i| self.glyphs[i])
    }

    /// Glyphs of screen row `y`; empty below the last row.
    pub fn row(&self, y: u16) -> &[Glyph] {
        match self.offset(0, y) {
            Some(start) => &self.glyphs[start..start + usize::from(self.width)],
            None => &[],
        }
    }

    /// Paint one position. Off-screen positions are ignored.
    pub fn paint(&mut self, x: u16, y: u16, ch: char, paint: Paint) {
        if let Some(i) = self.offset(x, y) {
            self.glyphs[i] = Glyph { ch, paint };
        }
    }

    pub fn paint_rect(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, paint: Paint) {
        for py in y..y.saturating_add(h) {
            for px in x..x.saturating_add(w) {
                self.paint(px, py, ch, paint);
            }
        }
    }

    /// Write `text` from column `x`, clipped at the right edge.
    ///
    /// Returns the column just past the text, clipped or not.
    pub fn text(&mut self, x: u16, y: u16, text: &str, paint: Paint) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            self.paint(col, y, ch, paint);
            col = col.saturating_add(1);
        }
        col
    }

    /// Write `value` in decimal without allocating.
    ///
    /// Returns the column just past the last digit.
    pub fn number(&mut self, x: u16, y: u16, value: u32, paint: Paint) -> u16 {
        let mut place = 1;
        while value / place >= 10 {
            place *= 10;
        }

        let mut col = x;
        loop {
            let digit = (value / place % 10) as u8;
            self.paint(col, y, char::from(b'0' + digit), paint);
            col = col.saturating_add(1);
            if place == 1 {
                return col;
            }
            place /= 10;
        }
    }

    /// Characters of row `y`, for tests and debugging.
    pub fn row_text(&self, y: u16) -> String {
        self.row(y).iter().map(|g| g.ch).collect()
    }
}

/// Columns `value` takes when written with [`FrameBuffer::number`]
pub fn number_width(value: u32) -> u16 {
    value.checked_ilog10().map_or(1, |log| log as u16 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_returns_next_column() {
        let mut fb = FrameBuffer::new(12, 1);
        assert_eq!(fb.number(0, 0, 0, Paint::Value), 1);
        assert_eq!(fb.number(2, 0, u32::MAX, Paint::Value), 12);
        assert_eq!(fb.row_text(0), "0 4294967295");
    }

    #[test]
    fn number_width_matches_written_digits() {
        for value in [0, 7, 10, 999, 1000, 1_000_000_000, u32::MAX] {
            let mut fb = FrameBuffer::new(12, 1);
            assert_eq!(fb.number(0, 0, value, Paint::Value), number_width(value), "{value}");
        }
    }

    #[test]
    fn text_is_clipped_at_the_edge() {
        let mut fb = FrameBuffer::new(3, 2);
        assert_eq!(fb.text(1, 0, "LEVEL", Paint::Label), 6);
        fb.paint(5, 5, 'x', Paint::Hint);
        assert_eq!(fb.row_text(0), " LE");
        assert_eq!(fb.row_text(1), "   ");
        assert_eq!(fb.get(2, 0).map(|g| g.paint), Some(Paint::Label));
    }

    #[test]
    fn reset_blanks_and_resizes() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.paint(0, 0, '█', Paint::Block(Rgb::new(1, 2, 3)));
        fb.reset(4, 3);

        assert_eq!((fb.width(), fb.height()), (4, 3));
        assert_eq!(fb.get(0, 0), Some(Glyph::BLANK));
        assert_eq!(fb.get(4, 0), None);
        assert_eq!(fb.row(2).len(), 4);
        assert!(fb.row(3).is_empty());
    }
}
