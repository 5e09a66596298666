//! Round entities: the heart, enemy ships and the hazards they fire.
//!
//! Every simulated object shares a `Body` (continuous position, motion,
//! glyph, liveness). Per-type behaviour is selected by the closed
//! `EntityKind` set; the heart is kept apart because the round owns exactly
//! one of it.

use crate::arena::BattleBox;

// ── Scoring & damage tables ───────────────────────────────────────────────────

pub const SCORE_PER_SPACESHIP: u32 = 100;
pub const SCORE_PER_LASER: u32 = 15;
pub const SCORE_PER_PROJECTILE: u32 = 10;
pub const SCORE_PER_BOMB: u32 = 25;

pub const LASER_DAMAGE: u32 = 2;
pub const PROJECTILE_DAMAGE: u32 = 1;
pub const BOMB_DAMAGE: u32 = 3;

/// Damage a ship takes for each frame the heart overlaps it.
pub const RAM_DAMAGE: u32 = 1;

/// Grace window after the heart is hit (≈1 s at 30 FPS).
pub const INVINCIBILITY_FRAMES: u32 = 30;

/// Frames from launch until a bomb detonates.
pub const BOMB_TIMER: u32 = 45;

/// Chebyshev radius (cells) of a detonating bomb.
pub const BLAST_RADIUS: i32 = 1;

// ── Motion ────────────────────────────────────────────────────────────────────

/// Vertical cells per frame; horizontal speed is scaled by the aspect ratio.
pub const HEART_SPEED: f32 = 0.5;
pub const DEFAULT_ASPECT_RATIO: f32 = 2.0;

/// Hazards step at most one cell per frame so none can hop over the heart.
pub const LASER_SPEED: f32 = 1.0;
pub const PROJECTILE_SPEED: f32 = 0.6;
pub const BOMB_SPEED: f32 = 0.2;

/// Radians added to a ship's oscillation phase each frame.
const SHIP_OSCILLATION_STEP: f32 = 0.15;

// ── Glyphs ────────────────────────────────────────────────────────────────────

pub const HEART_GLYPH: char = '♥';
pub const SHIP_GLYPH: char = '◄';
pub const LASER_GLYPH: char = '═';
pub const PROJECTILE_GLYPH: char = '•';
pub const BOMB_GLYPH: char = '◉';
pub const BLAST_GLYPH: char = '✸';

/// Scale `(dx, dy)` to unit length; degenerate input becomes `(0, 0)`.
pub fn normalize(dx: f32, dy: f32) -> (f32, f32) {
    let len = (dx * dx + dy * dy).sqrt();
    if !len.is_finite() || len <= f32::EPSILON {
        (0.0, 0.0)
    } else {
        (dx / len, dy / len)
    }
}

// ── Body ──────────────────────────────────────────────────────────────────────

/// Kinematic and render record shared by every entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    /// Horizontal position (fractional columns).
    pub x: f32,
    /// Vertical position (fractional rows).
    pub y: f32,
    /// Unit direction of travel.
    pub dx: f32,
    pub dy: f32,
    /// Cells per frame along `(dx, dy)`.
    pub speed: f32,
    pub glyph: char,
    active: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, glyph: char) -> Self {
        Self {
            x,
            y,
            dx: 0.0,
            dy: 0.0,
            speed: 0.0,
            glyph,
            active: true,
        }
    }

    /// Builder: set a (normalized) heading and speed.
    pub fn with_motion(mut self, dx: f32, dy: f32, speed: f32) -> Self {
        let (dx, dy) = normalize(dx, dy);
        self.dx = dx;
        self.dy = dy;
        self.speed = speed;
        self
    }

    pub fn advance(&mut self) {
        self.x += self.dx * self.speed;
        self.y += self.dy * self.speed;
    }

    /// The terminal cell this body occupies.
    pub fn cell(&self) -> (i32, i32) {
        (self.x.floor() as i32, self.y.floor() as i32)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Idempotent; a body never comes back.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Both bodies live and within `radius` cells of each other (Chebyshev).
    pub fn within(&self, other: &Body, radius: i32) -> bool {
        if !self.active || !other.active {
            return false;
        }
        let (ax, ay) = self.cell();
        let (bx, by) = other.cell();
        (ax - bx).abs() <= radius && (ay - by).abs() <= radius
    }
}

// ── Heart (player) ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Heart {
    pub body: Body,
    pub health: u32,
    pub score: u32,
    /// While non-zero all damage is ignored.
    pub invincibility_frames: u32,
    pub moving: bool,
    /// Multiplier applied to horizontal motion only.
    pub aspect_ratio: f32,
}

impl Heart {
    pub fn new(x: f32, y: f32, health: u32, aspect_ratio: f32) -> Self {
        let mut body = Body::new(x, y, HEART_GLYPH);
        body.speed = HEART_SPEED;
        if health == 0 {
            body.deactivate();
        }
        Self {
            body,
            health,
            score: 0,
            invincibility_frames: 0,
            moving: false,
            aspect_ratio,
        }
    }

    /// Point the heart along `(dx, dy)`. A zero vector stops it.
    pub fn set_direction(&mut self, dx: f32, dy: f32) {
        let (dx, dy) = normalize(dx, dy);
        self.moving = dx != 0.0 || dy != 0.0;
        self.body.dx = dx;
        self.body.dy = dy;
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility_frames > 0
    }

    /// Returns whether the damage landed. Ignored while invincible or dead.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if amount == 0 || self.is_invincible() || !self.body.is_active() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.invincibility_frames = INVINCIBILITY_FRAMES;
        if self.health == 0 {
            self.body.deactivate();
        }
        true
    }

    pub fn add_score(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }

    /// Move (if steering), stay inside the arena, tick down invincibility.
    pub fn update(&mut self, arena: &BattleBox) {
        if self.moving && self.body.is_active() {
            self.body.x += self.body.dx * self.body.speed * self.aspect_ratio;
            self.body.y += self.body.dy * self.body.speed;
        }
        let (x, y) = arena.clamp(self.body.x, self.body.y);
        self.body.x = x;
        self.body.y = y;
        self.invincibility_frames = self.invincibility_frames.saturating_sub(1);
    }
}

// ── Spaceship ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Spaceship {
    pub health: u32,
    /// Frames until the next shot is allowed.
    pub fire_cooldown: u32,
    pub max_fire_cooldown: u32,
    pub reached_left_edge: bool,
    /// Row the ship oscillates around.
    pub lane_y: f32,
    pub phase: f32,
    pub amplitude: f32,
}

// ── Hazards ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HazardKind {
    /// Fast horizontal beam, always fired straight left.
    Laser,
    /// Aimed shot.
    Projectile,
    /// Slow aimed lob that detonates when its timer runs out.
    Bomb,
}

impl HazardKind {
    pub fn damage(self) -> u32 {
        match self {
            HazardKind::Laser => LASER_DAMAGE,
            HazardKind::Projectile => PROJECTILE_DAMAGE,
            HazardKind::Bomb => BOMB_DAMAGE,
        }
    }

    pub fn score(self) -> u32 {
        match self {
            HazardKind::Laser => SCORE_PER_LASER,
            HazardKind::Projectile => SCORE_PER_PROJECTILE,
            HazardKind::Bomb => SCORE_PER_BOMB,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            HazardKind::Laser => LASER_GLYPH,
            HazardKind::Projectile => PROJECTILE_GLYPH,
            HazardKind::Bomb => BOMB_GLYPH,
        }
    }

    pub fn speed(self) -> f32 {
        match self {
            HazardKind::Laser => LASER_SPEED,
            HazardKind::Projectile => PROJECTILE_SPEED,
            HazardKind::Bomb => BOMB_SPEED,
        }
    }
}

// ── Entity ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    Spaceship(Spaceship),
    Laser,
    Projectile,
    Bomb {
        /// Frames until detonation.
        timer: u32,
        /// Set for the single frame in which the blast can hit.
        detonating: bool,
    },
}

/// A non-player entity owned by the round.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub body: Body,
    pub kind: EntityKind,
}

impl Entity {
    /// A ship entering at `x` and flying left along `lane_y`.
    pub fn spaceship(
        x: f32,
        lane_y: f32,
        speed: f32,
        health: u32,
        max_fire_cooldown: u32,
        amplitude: f32,
    ) -> Self {
        Self {
            body: Body::new(x, lane_y, SHIP_GLYPH).with_motion(-1.0, 0.0, speed),
            kind: EntityKind::Spaceship(Spaceship {
                health,
                fire_cooldown: max_fire_cooldown,
                max_fire_cooldown,
                reached_left_edge: false,
                lane_y,
                phase: 0.0,
                amplitude,
            }),
        }
    }

    /// A hazard launched from `(x, y)` toward `target`. Lasers ignore the
    /// target and fly straight left.
    pub fn hazard(kind: HazardKind, x: f32, y: f32, target: (f32, f32)) -> Self {
        let (dx, dy) = match kind {
            HazardKind::Laser => (-1.0, 0.0),
            HazardKind::Projectile | HazardKind::Bomb => {
                let aim = normalize(target.0 - x, target.1 - y);
                if aim == (0.0, 0.0) {
                    (-1.0, 0.0)
                } else {
                    aim
                }
            }
        };
        let body = Body::new(x, y, kind.glyph()).with_motion(dx, dy, kind.speed());
        let kind = match kind {
            HazardKind::Laser => EntityKind::Laser,
            HazardKind::Projectile => EntityKind::Projectile,
            HazardKind::Bomb => EntityKind::Bomb {
                timer: BOMB_TIMER,
                detonating: false,
            },
        };
        Self { body, kind }
    }

    pub fn is_active(&self) -> bool {
        self.body.is_active()
    }

    pub fn deactivate(&mut self) {
        self.body.deactivate();
    }

    pub fn hazard_kind(&self) -> Option<HazardKind> {
        match self.kind {
            EntityKind::Spaceship(_) => None,
            EntityKind::Laser => Some(HazardKind::Laser),
            EntityKind::Projectile => Some(HazardKind::Projectile),
            EntityKind::Bomb { .. } => Some(HazardKind::Bomb),
        }
    }

    pub fn ship(&self) -> Option<&Spaceship> {
        match &self.kind {
            EntityKind::Spaceship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn is_detonating(&self) -> bool {
        matches!(self.kind, EntityKind::Bomb { detonating: true, .. })
    }

    /// Glyph to paint this frame.
    pub fn glyph(&self) -> char {
        if self.is_detonating() {
            BLAST_GLYPH
        } else {
            self.body.glyph
        }
    }

    pub fn hit_radius(&self) -> i32 {
        if self.is_detonating() {
            BLAST_RADIUS
        } else {
            0
        }
    }

    pub fn collides_with(&self, other: &Body) -> bool {
        self.body.within(other, self.hit_radius())
    }

    /// Advance one frame.
    pub fn update(&mut self, arena: &BattleBox) {
        if !self.body.is_active() {
            return;
        }
        match &mut self.kind {
            EntityKind::Spaceship(ship) => {
                self.body.advance();
                ship.phase += SHIP_OSCILLATION_STEP;
                self.body.y = ship.lane_y + ship.amplitude * ship.phase.sin();
                ship.fire_cooldown = ship.fire_cooldown.saturating_sub(1);
            }
            EntityKind::Laser | EntityKind::Projectile => {
                self.body.advance();
                if arena.is_outside(self.body.x, self.body.y) {
                    self.body.deactivate();
                }
            }
            EntityKind::Bomb { timer, detonating } => {
                // A detonating bomb is retired by the round after its blast frame.
                if *detonating {
                    return;
                }
                self.body.advance();
                if arena.is_outside(self.body.x, self.body.y) {
                    self.body.deactivate();
                    return;
                }
                *timer = timer.saturating_sub(1);
                if *timer == 0 {
                    *detonating = true;
                    self.body.speed = 0.0;
                }
            }
        }

        if self.has_reached_left(arena.left()) {
            if let EntityKind::Spaceship(ship) = &mut self.kind {
                ship.reached_left_edge = true;
            }
            self.body.deactivate();
        }
    }

    // ── Ship-only operations (no-ops for hazards) ────────────────────────────

    pub fn can_fire(&self) -> bool {
        match &self.kind {
            EntityKind::Spaceship(ship) => self.body.is_active() && ship.fire_cooldown == 0,
            _ => false,
        }
    }

    pub fn reset_fire_cooldown(&mut self) {
        if let EntityKind::Spaceship(ship) = &mut self.kind {
            ship.fire_cooldown = ship.max_fire_cooldown;
        }
    }

    /// Returns `true` only on the hit that destroys the ship.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.body.is_active() {
            return false;
        }
        match &mut self.kind {
            EntityKind::Spaceship(ship) => {
                ship.health = ship.health.saturating_sub(amount);
                if ship.health == 0 {
                    self.body.deactivate();
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    pub fn has_reached_left(&self, left_edge: f32) -> bool {
        matches!(self.kind, EntityKind::Spaceship(_)) && self.body.x < left_edge
    }
}
