//! Terminal output for painted frames.
//!
//! The renderer remembers the frame currently on screen. Each new frame is
//! compared with it row by row and only the spans of glyphs that differ are
//! written, so a falling piece costs a handful of cells per frame. The first
//! frame, and any frame whose size differs from the one on screen, repaints
//! everything.

use std::io::{self, Write};
use std::ops::Range;

use anyhow::Result;
use crossterm::{
    cursor, execute,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{FrameBuffer, Glyph, Paint};
use crate::types::Rgb;

const WELL_BG: Color = Color::Rgb { r: 30, g: 30, b: 40 };
const SCREEN_BG: Color = Color::Rgb { r: 0, g: 0, b: 0 };
const TEXT: Color = Color::Rgb { r: 210, g: 210, b: 210 };

pub struct TerminalRenderer {
    out: io::Stdout,
    /// Frame currently on screen
    shown: Option<FrameBuffer>,
    bytes: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            shown: None,
            bytes: Vec::with_capacity(16 * 1024),
        }
    }

    /// Switch to raw mode on the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap
        )?;
        self.shown = None;
        Ok(())
    }

    /// Restore the terminal the way `enter` found it.
    pub fn exit(&mut self) -> Result<()> {
        execute!(
            self.out,
            ResetColor,
            SetAttribute(Attribute::Reset),
            terminal::EnableLineWrap,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Show `fb`, writing only what changed since the last frame.
    ///
    /// The renderer keeps `fb` as the frame on screen and hands back the
    /// previous one in its place, ready to be painted over for the next frame.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.bytes.clear();
        encode_frame(self.shown.as_ref(), fb, &mut self.bytes)?;
        if !self.bytes.is_empty() {
            self.out.write_all(&self.bytes)?;
            self.out.flush()?;
        }

        match self.shown.as_mut() {
            Some(shown) => std::mem::swap(shown, fb),
            None => self.shown = Some(std::mem::take(fb)),
        }
        Ok(())
    }
}

/// Encode the commands that turn `shown` into `next` on screen.
///
/// With no frame shown, or one of another size, the screen is cleared and
/// every glyph is written. Returns the number of glyphs written.
pub fn encode_frame(shown: Option<&FrameBuffer>, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<usize> {
    let shown = shown.filter(|s| s.width() == next.width() && s.height() == next.height());
    if shown.is_none() {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
    }

    let mut pen = None;
    let mut written = 0;
    for y in 0..next.height() {
        let row = next.row(y);
        let old = shown.map(|s| s.row(y));

        let mut from = 0;
        while let Some(span) = next_changed_span(old, row, from) {
            out.queue(cursor::MoveTo(span.start as u16, y))?;
            for glyph in &row[span.clone()] {
                if pen != Some(glyph.paint) {
                    set_pen(out, glyph.paint)?;
                    pen = Some(glyph.paint);
                }
                out.queue(Print(glyph.ch))?;
            }
            written += span.len();
            from = span.end;
        }
    }

    if pen.is_some() {
        out.queue(SetAttribute(Attribute::Reset))?;
        out.queue(ResetColor)?;
    }
    Ok(written)
}

/// First run of glyphs at or after `from` that differs from `old`.
///
/// Without an old row every glyph counts as changed.
fn next_changed_span(old: Option<&[Glyph]>, row: &[Glyph], from: usize) -> Option<Range<usize>> {
    let unchanged = |x: usize| old.is_some_and(|old| old.get(x) == Some(&row[x]));
    let start = (from..row.len()).find(|&x| !unchanged(x))?;
    let end = (start..row.len()).find(|&x| unchanged(x)).unwrap_or(row.len());
    Some(start..end)
}

/// Foreground, background and optional attribute for what a glyph depicts
fn palette(paint: Paint) -> (Color, Color, Option<Attribute>) {
    match paint {
        Paint::Backdrop => (TEXT, SCREEN_BG, None),
        Paint::Well => (Color::Rgb { r: 90, g: 90, b: 100 }, WELL_BG, Some(Attribute::Dim)),
        Paint::Block(rgb) => (piece_color(rgb), WELL_BG, Some(Attribute::Bold)),
        Paint::Ghost => (Color::Rgb { r: 140, g: 140, b: 140 }, WELL_BG, Some(Attribute::Dim)),
        Paint::Preview(rgb) => (piece_color(rgb), SCREEN_BG, Some(Attribute::Bold)),
        Paint::Frame => (Color::Rgb { r: 200, g: 200, b: 200 }, SCREEN_BG, None),
        Paint::Label => (TEXT, SCREEN_BG, Some(Attribute::Bold)),
        Paint::Value => (TEXT, SCREEN_BG, None),
        Paint::Hint => (TEXT, SCREEN_BG, Some(Attribute::Dim)),
        Paint::Banner => (Color::Rgb { r: 255, g: 255, b: 255 }, SCREEN_BG, Some(Attribute::Bold)),
    }
}

fn piece_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn set_pen(out: &mut Vec<u8>, paint: Paint) -> Result<()> {
    let (fg, bg, attr) = palette(paint);
    // Resetting attributes first so bold or dim never leaks into the next span.
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(fg))?;
    out.queue(SetBackgroundColor(bg))?;
    if let Some(attr) = attr {
        out.queue(SetAttribute(attr))?;
    }
    Ok(())
}
