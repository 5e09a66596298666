//! Cell-grid frame buffer.
//!
//! Each frame is composed from scratch out of the round state, then diffed
//! against the previously presented frame; only changed cells go to the
//! terminal. An entity's old cell simply shows up in the diff as blank, so
//! no entity ever has to remember where it was drawn last.

use crate::compute::RoundState;
use crate::entities::{EntityKind, HazardKind};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tint {
    #[default]
    Default,
    Red,
    Yellow,
    Green,
    Cyan,
    Blue,
    Magenta,
    White,
    Grey,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub tint: Tint,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        glyph: ' ',
        tint: Tint::Default,
    };

    pub fn is_blank(&self) -> bool {
        *self == Cell::BLANK
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            None
        } else {
            Some(y as usize * self.width as usize + x as usize)
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Paint one cell; anything off the buffer is clipped.
    pub fn put(&mut self, x: i32, y: i32, glyph: char, tint: Tint) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell { glyph, tint };
        }
    }

    pub fn text(&mut self, x: i32, y: i32, text: &str, tint: Tint) {
        for (i, ch) in text.chars().enumerate() {
            self.put(x + i as i32, y, ch, tint);
        }
    }

    /// Every cell with its coordinates, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (u16, u16, Cell)> + '_ {
        let w = self.width.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| ((i % w) as u16, (i / w) as u16, *c))
    }

    /// Cells currently showing `glyph`.
    pub fn find(&self, glyph: char) -> Vec<(u16, u16)> {
        self.cells()
            .filter(|(_, _, c)| c.glyph == glyph)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    /// Cells that differ from `previous`. A size change repaints everything.
    pub fn diff(&self, previous: &FrameBuffer) -> Vec<(u16, u16, Cell)> {
        if self.width != previous.width || self.height != previous.height {
            return self.cells().collect();
        }
        self.cells()
            .zip(previous.cells.iter())
            .filter(|((_, _, now), before)| now != *before)
            .map(|(changed, _)| changed)
            .collect()
    }
}

// ── Composition ───────────────────────────────────────────────────────────────

fn hazard_tint(kind: HazardKind) -> Tint {
    match kind {
        HazardKind::Laser => Tint::Magenta,
        HazardKind::Projectile => Tint::White,
        HazardKind::Bomb => Tint::Yellow,
    }
}

/// Render the round into a `width × height` buffer: HUD on row 0, the arena
/// border, every live entity inside the interior, then the heart on top.
pub fn compose(state: &RoundState, width: u16, height: u16) -> FrameBuffer {
    let mut buf = FrameBuffer::new(width, height);
    draw_hud(&mut buf, state);
    draw_border(&mut buf, state);

    for entity in state.entities.iter().filter(|e| e.is_active()) {
        let (cx, cy) = entity.body.cell();
        if !state.arena.contains_cell(cx, cy) {
            continue;
        }
        let tint = match &entity.kind {
            EntityKind::Spaceship(_) => Tint::Green,
            _ if entity.is_detonating() => Tint::Red,
            _ => entity.hazard_kind().map(hazard_tint).unwrap_or_default(),
        };
        buf.put(cx, cy, entity.glyph(), tint);
    }

    let heart = &state.heart;
    if heart.body.is_active() {
        let (cx, cy) = heart.body.cell();
        // Blink grey while invincible.
        let tint = if heart.invincibility_frames % 4 >= 2 {
            Tint::Grey
        } else {
            Tint::Red
        };
        buf.put(cx, cy, heart.body.glyph, tint);
    }

    buf
}

fn draw_hud(buf: &mut FrameBuffer, state: &RoundState) {
    let x = state.arena.x;
    let y = state.arena.y - 1;
    let round = format!("Round {}", state.round);
    let health = format!("HP {:>3}", state.heart.health);
    let score = format!("Score {:>6}", state.heart.score);
    buf.text(x, y, &round, Tint::Cyan);
    buf.text(x + round.chars().count() as i32 + 2, y, &health, Tint::Red);
    let right = x + state.arena.width - score.chars().count() as i32;
    buf.text(right, y, &score, Tint::Yellow);
}

fn draw_border(buf: &mut FrameBuffer, state: &RoundState) {
    let a = &state.arena;
    let (x0, y0) = (a.x, a.y);
    let (x1, y1) = (a.x + a.width - 1, a.y + a.height - 1);

    for x in x0 + 1..x1 {
        buf.put(x, y0, '─', Tint::Blue);
        buf.put(x, y1, '─', Tint::Blue);
    }
    for y in y0 + 1..y1 {
        buf.put(x0, y, '│', Tint::Blue);
        buf.put(x1, y, '│', Tint::Blue);
    }
    buf.put(x0, y0, '┌', Tint::Blue);
    buf.put(x1, y0, '┐', Tint::Blue);
    buf.put(x0, y1, '└', Tint::Blue);
    buf.put(x1, y1, '┘', Tint::Blue);
}
