//! Round simulation: pure per-frame state transitions.
//!
//! `tick` takes an immutable reference to the current `RoundState`, the
//! frame's steering and an RNG handle, and returns a brand-new `RoundState`.
//! Side effects are limited to the injected RNG (and trace logging), so a
//! seeded RNG makes a whole round reproducible.

use rand::Rng;

use crate::arena::BattleBox;
use crate::entities::{Entity, Heart, RAM_DAMAGE, SCORE_PER_SPACESHIP};
use crate::rounds::{RoundPlan, Wave};

/// Horizontal gap between ships of one wave as they enter.
const SHIP_SPACING: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundStatus {
    /// Built, first frame not yet run.
    Setup,
    Active,
    Cleared,
    Failed,
}

impl RoundStatus {
    pub fn is_over(self) -> bool {
        matches!(self, RoundStatus::Cleared | RoundStatus::Failed)
    }

    /// `1` cleared, `-1` failed, `0` while the round is still running.
    pub fn code(self) -> i32 {
        match self {
            RoundStatus::Cleared => 1,
            RoundStatus::Failed => -1,
            RoundStatus::Setup | RoundStatus::Active => 0,
        }
    }
}

/// Directional input for one frame; each axis is -1, 0 or 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Steering {
    pub dx: i8,
    pub dy: i8,
}

impl Steering {
    pub const IDLE: Steering = Steering { dx: 0, dy: 0 };

    pub fn new(dx: i8, dy: i8) -> Self {
        Self {
            dx: dx.signum(),
            dy: dy.signum(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Everything one round needs. Cloneable so `tick` can return a fresh copy.
#[derive(Clone, Debug)]
pub struct RoundState {
    pub round: u8,
    pub arena: BattleBox,
    pub heart: Heart,
    pub entities: Vec<Entity>,
    pub plan: RoundPlan,
    /// Index of the first wave not yet spawned.
    pub next_wave: usize,
    pub status: RoundStatus,
    pub frame: u64,
}

impl RoundState {
    pub fn waves_exhausted(&self) -> bool {
        self.next_wave >= self.plan.waves.len()
    }

    pub fn ships(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.ship().is_some())
    }
}

// ── Constructor ───────────────────────────────────────────────────────────────

/// Build a round in `Setup`, the heart at the centre of the arena carrying
/// the incoming health and score.
pub fn init_round(
    round: u8,
    health: u32,
    score: u32,
    arena: BattleBox,
    aspect_ratio: f32,
    plan: RoundPlan,
) -> RoundState {
    let (cx, cy) = arena.center();
    let mut heart = Heart::new(cx, cy, health, aspect_ratio);
    heart.score = score;
    RoundState {
        round,
        arena,
        heart,
        entities: Vec::new(),
        plan,
        next_wave: 0,
        status: RoundStatus::Setup,
        frame: 0,
    }
}

// ── Per-frame tick ────────────────────────────────────────────────────────────

/// Advance the round by one frame.
///
/// Order: spawn due waves → steer → move everything → ships fire →
/// collisions → purge → termination check. Finished rounds come back
/// unchanged.
pub fn tick(state: &RoundState, steering: Steering, rng: &mut impl Rng) -> RoundState {
    let mut next = state.clone();

    match next.status {
        RoundStatus::Cleared | RoundStatus::Failed => return next,
        RoundStatus::Setup => {
            next.status = RoundStatus::Active;
            next.arena.set_needs_redraw();
            tracing::info!(
                round = next.round,
                health = next.heart.health,
                score = next.heart.score,
                "round started"
            );
        }
        RoundStatus::Active => {}
    }

    next.frame += 1;

    // ── 1. Spawn ─────────────────────────────────────────────────────────────
    spawn_due_waves(&mut next, rng);

    // ── 2. Steer ─────────────────────────────────────────────────────────────
    next.heart
        .set_direction(steering.dx as f32, steering.dy as f32);

    // ── 3. Move ──────────────────────────────────────────────────────────────
    next.heart.update(&next.arena);
    for entity in next.entities.iter_mut() {
        entity.update(&next.arena);
    }

    // ── 4. Ships fire ────────────────────────────────────────────────────────
    fire_hazards(&mut next, rng);

    // ── 5. Collisions ────────────────────────────────────────────────────────
    resolve_collisions(&mut next);

    // ── 6. Purge ─────────────────────────────────────────────────────────────
    retire_spent(&mut next);

    // ── 7. Termination ───────────────────────────────────────────────────────
    if !next.heart.is_alive() {
        next.status = RoundStatus::Failed;
        tracing::info!(round = next.round, frame = next.frame, score = next.heart.score, "round failed");
    } else if (next.waves_exhausted() && next.entities.is_empty())
        || next.frame >= next.plan.time_limit
    {
        next.status = RoundStatus::Cleared;
        tracing::info!(
            round = next.round,
            frame = next.frame,
            health = next.heart.health,
            score = next.heart.score,
            "round cleared"
        );
    }

    next
}

fn spawn_due_waves(state: &mut RoundState, rng: &mut impl Rng) {
    while let Some(wave) = state.plan.waves.get(state.next_wave).cloned() {
        if wave.at_frame > state.frame {
            break;
        }
        for i in 0..wave.ships {
            let ship = spawn_ship(&state.arena, &wave, i, rng);
            state.entities.push(ship);
        }
        tracing::debug!(round = state.round, wave = state.next_wave, ships = wave.ships, "wave entered");
        state.next_wave += 1;
    }
}

/// Ships enter on the right-most interior column, later ones queued further
/// right, each on a random lane that leaves room for its oscillation.
fn spawn_ship(arena: &BattleBox, wave: &Wave, index: u32, rng: &mut impl Rng) -> Entity {
    let x = arena.right() - 1.0 + index as f32 * SHIP_SPACING;
    let lo = arena.top() + wave.amplitude;
    let hi = arena.bottom() - 1.0 - wave.amplitude;
    let lane_y = if lo < hi {
        rng.gen_range(lo..hi)
    } else {
        arena.center().1
    };
    Entity::spaceship(
        x,
        lane_y,
        wave.ship_speed,
        wave.ship_health,
        wave.fire_cooldown,
        wave.amplitude,
    )
}

/// Ships aim at the centre of the heart's cell; any aimed shot stepping at
/// most a cell per frame then passes through that cell. Ships still queued
/// beyond the right edge hold their fire until they enter the arena.
fn fire_hazards(state: &mut RoundState, rng: &mut impl Rng) {
    let (cx, cy) = state.heart.body.cell();
    let target = (cx as f32 + 0.5, cy as f32 + 0.5);
    let mix = state.plan.mix;
    let arena = &state.arena;
    let mut spawned = Vec::new();

    for ship in state.entities.iter_mut() {
        if !ship.can_fire() || !arena.contains(ship.body.x, ship.body.y) {
            continue;
        }
        if let Some(kind) = mix.pick(rng) {
            spawned.push(Entity::hazard(kind, ship.body.x, ship.body.y, target));
        }
        ship.reset_fire_cooldown();
    }

    state.entities.extend(spawned);
}

/// Heart against every live entity. Hazards are single-use: touching the
/// heart consumes them and scores, whether or not the grace window absorbed
/// the damage. Stops the moment the heart dies.
fn resolve_collisions(state: &mut RoundState) {
    let heart = &mut state.heart;

    for entity in state.entities.iter_mut() {
        if !heart.is_alive() {
            break;
        }
        if !entity.collides_with(&heart.body) {
            continue;
        }
        match entity.hazard_kind() {
            Some(kind) => {
                let damaged = heart.take_damage(kind.damage());
                heart.add_score(kind.score());
                entity.deactivate();
                tracing::debug!(?kind, damaged, health = heart.health, "heart hit");
            }
            None => {
                if entity.take_damage(RAM_DAMAGE) {
                    heart.add_score(SCORE_PER_SPACESHIP);
                    tracing::debug!(score = heart.score, "spaceship destroyed");
                }
            }
        }
    }
}

fn retire_spent(state: &mut RoundState) {
    for entity in state.entities.iter_mut() {
        if entity.is_detonating() && entity.is_active() {
            tracing::debug!(x = entity.body.x, y = entity.body.y, "bomb detonated");
            entity.deactivate();
        }
    }
    state.entities.retain(Entity::is_active);
}
