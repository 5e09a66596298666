//! Round controller: drives `compute::tick` in real time against an input
//! source and a screen.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::arena::BattleBox;
use crate::compute::{init_round, tick, RoundStatus, Steering};
use crate::config::Settings;
use crate::error::{GameError, Result};
use crate::frame::{compose, FrameBuffer};
use crate::rounds::{round_plan, RoundPlan};
use crate::session::{RoundRunner, Session};

/// Non-blocking input. Returning `Steering::IDLE` means "no direction this
/// frame", never "wait".
pub trait Controls {
    fn poll(&mut self) -> Result<Steering>;

    /// Called as each round starts. Input state from before the round
    /// (held keys, pending repeats) must not leak into it.
    fn reset(&mut self) {}
}

pub trait Screen {
    /// Current drawable size in cells.
    fn size(&self) -> Result<(u16, u16)>;

    /// Show `frame`. When `full_redraw` is set the whole surface must be
    /// repainted rather than diffed.
    fn present(&mut self, frame: &FrameBuffer, full_redraw: bool) -> Result<()>;
}

/// What a finished round reports back to the sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundOutcome {
    pub status: RoundStatus,
    pub health: u32,
    pub score: u32,
}

impl RoundOutcome {
    /// `1` cleared, `-1` failed.
    pub fn code(&self) -> i32 {
        self.status.code()
    }

    pub fn cleared(&self) -> bool {
        self.status == RoundStatus::Cleared
    }
}

pub struct Controller<C, S, R> {
    settings: Settings,
    controls: C,
    screen: S,
    rng: R,
    plans: Vec<RoundPlan>,
}

impl<C: Controls, S: Screen, R: Rng> Controller<C, S, R> {
    pub fn new(settings: Settings, controls: C, screen: S, rng: R) -> Self {
        Self {
            settings,
            controls,
            screen,
            rng,
            plans: Vec::new(),
        }
    }

    /// Replace the built-in wave plans; `plans[0]` is round 1. Rounds without
    /// an entry fall back to the built-in plan.
    pub fn with_plans(mut self, plans: Vec<RoundPlan>) -> Self {
        self.plans = plans;
        self
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn controls(&self) -> &C {
        &self.controls
    }

    fn plan_for(&self, round: u8) -> RoundPlan {
        (round as usize)
            .checked_sub(1)
            .and_then(|i| self.plans.get(i))
            .cloned()
            .unwrap_or_else(|| round_plan(round))
    }

    fn arena(&self) -> Result<(BattleBox, u16, u16)> {
        let (w, h) = self.screen.size()?;
        // One spare row above the box for the HUD.
        let need_w = self.settings.arena_width;
        let need_h = self.settings.arena_height + 1;
        if w < need_w || h < need_h {
            return Err(GameError::TerminalTooSmall {
                need_w,
                need_h,
                have_w: w,
                have_h: h,
            });
        }
        let arena = BattleBox::centered(w, h, self.settings.arena_width, self.settings.arena_height);
        Ok((arena, w, h))
    }

    /// Play one round to completion, starting from `session`'s health and
    /// score. Frames are paced to `settings.frame_ms`.
    pub fn run_round(&mut self, session: Session) -> Result<RoundOutcome> {
        let (arena, width, height) = self.arena()?;
        let plan = self.plan_for(session.round);
        let mut state = init_round(
            session.round,
            session.health,
            session.score,
            arena,
            self.settings.aspect_ratio,
            plan,
        );
        let frame_len = Duration::from_millis(self.settings.frame_ms);
        self.controls.reset();

        loop {
            let frame_start = Instant::now();

            let steering = self.controls.poll()?;
            state = tick(&state, steering, &mut self.rng);

            let full_redraw = state.arena.take_needs_redraw();
            let frame = compose(&state, width, height);
            self.screen.present(&frame, full_redraw)?;

            if state.status.is_over() {
                break;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < frame_len {
                std::thread::sleep(frame_len - elapsed);
            }
        }

        Ok(RoundOutcome {
            status: state.status,
            health: state.heart.health,
            score: state.heart.score,
        })
    }
}

impl<C: Controls, S: Screen, R: Rng> RoundRunner for Controller<C, S, R> {
    fn run_round(&mut self, session: Session) -> Result<RoundOutcome> {
        Controller::run_round(self, session)
    }
}
