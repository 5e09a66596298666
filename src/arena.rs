//! The battle box: a bordered rectangle of terminal cells.
//!
//! Continuous coordinates map to cells by `floor`. The interior spans
//! `[x+1, x+width-1) × [y+1, y+height-1)`; the outermost ring of cells is
//! the border.

/// How far (in cells) an entity may overshoot the interior before it is
/// considered outside and retired.
pub const EDGE_MARGIN: f32 = 1.0;

/// Keeps clamped positions strictly below the exclusive interior edge.
const CLAMP_EPSILON: f32 = 0.001;

#[derive(Clone, Debug, PartialEq)]
pub struct BattleBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    needs_redraw: bool,
}

impl BattleBox {
    /// A freshly built box always owes a full paint.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            needs_redraw: true,
        }
    }

    /// Centre a `width × height` box inside a terminal of the given size,
    /// leaving row 0 free for the HUD.
    pub fn centered(term_w: u16, term_h: u16, width: u16, height: u16) -> Self {
        let x = (term_w.saturating_sub(width) / 2) as i32;
        let y = ((term_h.saturating_sub(height) / 2) as i32).max(1);
        Self::new(x, y, width as i32, height as i32)
    }

    // ── Interior edges (continuous) ──────────────────────────────────────────

    pub fn left(&self) -> f32 {
        (self.x + 1) as f32
    }

    /// Exclusive.
    pub fn right(&self) -> f32 {
        (self.x + self.width - 1) as f32
    }

    pub fn top(&self) -> f32 {
        (self.y + 1) as f32
    }

    /// Exclusive.
    pub fn bottom(&self) -> f32 {
        (self.y + self.height - 1) as f32
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.left() + self.right()) / 2.0,
            (self.top() + self.bottom()) / 2.0,
        )
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    /// True when the point lies inside the interior.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x < self.right() && y >= self.top() && y < self.bottom()
    }

    pub fn contains_cell(&self, cx: i32, cy: i32) -> bool {
        cx > self.x && cx < self.x + self.width - 1 && cy > self.y && cy < self.y + self.height - 1
    }

    /// True once the point is beyond the interior by more than `EDGE_MARGIN`.
    /// Points in the margin band are neither contained nor outside.
    pub fn is_outside(&self, x: f32, y: f32) -> bool {
        x < self.left() - EDGE_MARGIN
            || x >= self.right() + EDGE_MARGIN
            || y < self.top() - EDGE_MARGIN
            || y >= self.bottom() + EDGE_MARGIN
    }

    /// Pull a point back into the interior.
    pub fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x.clamp(self.left(), self.right() - CLAMP_EPSILON),
            y.clamp(self.top(), self.bottom() - CLAMP_EPSILON),
        )
    }

    // ── Redraw flag ──────────────────────────────────────────────────────────

    pub fn set_needs_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Read and clear the redraw flag.
    pub fn take_needs_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.needs_redraw, false)
    }
}
