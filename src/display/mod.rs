//! Rendering layer. All terminal output lives here.
//!
//! The library hands over finished `FrameBuffer`s; this module only
//! translates cells into crossterm commands, painting just what changed
//! since the last present.

mod screens;

pub use screens::TerminalPresenter;

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use heart_battle::error::Result;
use heart_battle::frame::{Cell, FrameBuffer, Tint};
use heart_battle::round::Screen;

// ── Colour palette ────────────────────────────────────────────────────────────

pub fn color(tint: Tint) -> Color {
    match tint {
        Tint::Default => Color::Reset,
        Tint::Red => Color::Red,
        Tint::Yellow => Color::Yellow,
        Tint::Green => Color::Green,
        Tint::Cyan => Color::Cyan,
        Tint::Blue => Color::DarkBlue,
        Tint::Magenta => Color::Magenta,
        Tint::White => Color::White,
        Tint::Grey => Color::DarkGrey,
    }
}

// ── Screen ────────────────────────────────────────────────────────────────────

pub struct TerminalScreen<W: Write> {
    out: W,
    /// Last frame that reached the terminal.
    previous: Option<FrameBuffer>,
}

impl<W: Write> TerminalScreen<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            previous: None,
        }
    }

    fn paint(&mut self, cells: impl Iterator<Item = (u16, u16, Cell)>) -> std::io::Result<()> {
        let mut tint = None;
        for (x, y, cell) in cells {
            if tint != Some(cell.tint) {
                self.out.queue(style::SetForegroundColor(color(cell.tint)))?;
                tint = Some(cell.tint);
            }
            self.out.queue(cursor::MoveTo(x, y))?;
            self.out.queue(Print(cell.glyph))?;
        }
        Ok(())
    }
}

impl<W: Write> Screen for TerminalScreen<W> {
    fn size(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    fn present(&mut self, frame: &FrameBuffer, full_redraw: bool) -> Result<()> {
        match self.previous.take() {
            Some(previous) if !full_redraw => {
                self.paint(frame.diff(&previous).into_iter())?;
            }
            _ => {
                self.out.queue(terminal::Clear(terminal::ClearType::All))?;
                self.paint(frame.cells().filter(|(_, _, c)| !c.is_blank()))?;
            }
        }

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, frame.height().saturating_sub(1)))?;
        self.out.flush()?;
        self.previous = Some(frame.clone());
        Ok(())
    }
}
