//! Game sequencing: three rounds in a row, health and score carried forward
//! in a `Session` passed by value.

use crate::compute::RoundStatus;
use crate::error::Result;
use crate::round::RoundOutcome;
use crate::rounds::ROUND_COUNT;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Session {
    pub round: u8,
    pub health: u32,
    pub score: u32,
}

impl Session {
    pub fn new(health: u32) -> Self {
        Self {
            round: 1,
            health,
            score: 0,
        }
    }
}

/// Anything that can play a single round.
pub trait RoundRunner {
    fn run_round(&mut self, session: Session) -> Result<RoundOutcome>;
}

/// Screens shown between rounds. Has no view of the simulation.
pub trait Presenter {
    fn show_introduction(&mut self) -> Result<()>;
    fn show_round_info(&mut self, round: u8) -> Result<()>;
    fn show_round_complete(&mut self, round: u8, score: u32) -> Result<()>;
    fn game_over(&mut self, won: bool, final_round: u8, score: u32) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameSummary {
    pub won: bool,
    /// Last round played.
    pub final_round: u8,
    pub health: u32,
    pub score: u32,
}

/// Run rounds 1..=3. A failed round ends the game at once with health 0 and
/// the score it reported.
pub fn play<R: RoundRunner, P: Presenter>(
    runner: &mut R,
    presenter: &mut P,
    starting_health: u32,
) -> Result<GameSummary> {
    presenter.show_introduction()?;

    let mut session = Session::new(starting_health);
    for round in 1..=ROUND_COUNT {
        session.round = round;
        presenter.show_round_info(round)?;

        let outcome = runner.run_round(session)?;
        if outcome.status == RoundStatus::Failed {
            tracing::info!(round, score = outcome.score, "game lost");
            presenter.game_over(false, round, outcome.score)?;
            return Ok(GameSummary {
                won: false,
                final_round: round,
                health: 0,
                score: outcome.score,
            });
        }

        session = Session {
            round,
            health: outcome.health,
            score: outcome.score,
        };
        presenter.show_round_complete(round, session.score)?;
    }

    tracing::info!(health = session.health, score = session.score, "game won");
    presenter.game_over(true, ROUND_COUNT, session.score)?;
    Ok(GameSummary {
        won: true,
        final_round: ROUND_COUNT,
        health: session.health,
        score: session.score,
    })
}
