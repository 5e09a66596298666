//! The three fixed rounds: when ships arrive, how tough they are and what
//! they shoot.

use rand::Rng;

use crate::entities::HazardKind;

pub const ROUND_COUNT: u8 = 3;

/// A group of ships entering together.
#[derive(Clone, Debug, PartialEq)]
pub struct Wave {
    /// Round frame on which the ships appear.
    pub at_frame: u64,
    pub ships: u32,
    pub ship_health: u32,
    /// Cells per frame, leftward.
    pub ship_speed: f32,
    /// Frames between a ship's shots.
    pub fire_cooldown: u32,
    /// Peak vertical deviation from the ship's lane, in rows.
    pub amplitude: f32,
}

/// Relative weights for the hazard a ship fires. All zero = ships never fire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HazardMix {
    pub laser: u32,
    pub projectile: u32,
    pub bomb: u32,
}

impl HazardMix {
    pub const NONE: HazardMix = HazardMix {
        laser: 0,
        projectile: 0,
        bomb: 0,
    };

    pub fn total(&self) -> u32 {
        self.laser + self.projectile + self.bomb
    }

    pub fn pick(&self, rng: &mut impl Rng) -> Option<HazardKind> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let roll = rng.gen_range(0..total);
        if roll < self.laser {
            Some(HazardKind::Laser)
        } else if roll < self.laser + self.projectile {
            Some(HazardKind::Projectile)
        } else {
            Some(HazardKind::Bomb)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoundPlan {
    /// Sorted by `at_frame`.
    pub waves: Vec<Wave>,
    pub mix: HazardMix,
    /// Surviving this many frames clears the round even if ships remain.
    pub time_limit: u64,
}

impl RoundPlan {
    pub fn last_wave_frame(&self) -> u64 {
        self.waves.last().map(|w| w.at_frame).unwrap_or(0)
    }
}

// ── Difficulty tables ─────────────────────────────────────────────────────────

fn wave_schedule(round: u8) -> &'static [(u64, u32)] {
    match round {
        1 => &[(30, 2), (180, 3), (330, 3)],
        2 => &[(30, 3), (160, 3), (290, 4), (420, 4)],
        _ => &[(30, 3), (140, 4), (250, 4), (360, 5), (470, 5)],
    }
}

fn ship_health(round: u8) -> u32 {
    match round {
        1 => 2,
        2 => 3,
        _ => 4,
    }
}

fn ship_speed(round: u8) -> f32 {
    match round {
        1 => 0.20,
        2 => 0.25,
        _ => 0.30,
    }
}

fn fire_cooldown(round: u8) -> u32 {
    match round {
        1 => 60,
        2 => 45,
        _ => 35,
    }
}

fn hazard_mix(round: u8) -> HazardMix {
    match round {
        1 => HazardMix {
            laser: 0,
            projectile: 1,
            bomb: 0,
        },
        2 => HazardMix {
            laser: 1,
            projectile: 2,
            bomb: 0,
        },
        _ => HazardMix {
            laser: 2,
            projectile: 3,
            bomb: 1,
        },
    }
}

/// Build the plan for `round` (1-based). Rounds past the last reuse it.
pub fn round_plan(round: u8) -> RoundPlan {
    let round = round.clamp(1, ROUND_COUNT);
    let waves: Vec<Wave> = wave_schedule(round)
        .iter()
        .map(|&(at_frame, ships)| Wave {
            at_frame,
            ships,
            ship_health: ship_health(round),
            ship_speed: ship_speed(round),
            fire_cooldown: fire_cooldown(round),
            amplitude: if round == 1 { 0.5 } else { 1.0 },
        })
        .collect();
    let mut plan = RoundPlan {
        waves,
        mix: hazard_mix(round),
        time_limit: 0,
    };
    // ≈40 s at 30 FPS after the final wave enters.
    plan.time_limit = plan.last_wave_frame() + 1200;
    plan
}
