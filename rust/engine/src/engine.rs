use tracing::warn;

use crate::errors::{AgentError, EngineError};
use crate::player::Action;
use crate::round::{Observation, Round};
use crate::rules::validate_action;
use crate::scorer::{RoundReport, Scorecard};
use crate::shoe::Shoe;

/// Drives one round for one agent and scores every decision against the
/// oracle.
///
/// The agent is not called from here: callers take the pending
/// [`Observation`], obtain an answer however they like (a closure, a blocking
/// call, an awaited future with a timeout) and hand the answer back through
/// [`Evaluation::submit`]. No lock is held in between.
///
/// # Examples
///
/// ```
/// use bjbench_engine::engine::Evaluation;
///
/// let mut eval = Evaluation::start(42, "optimal").expect("deal");
/// while let Some(obs) = eval.pending() {
///     let answer = Ok(obs.optimal_action());
///     eval.submit(answer).expect("engine defect");
/// }
/// let report = eval.finish().expect("settled");
/// assert_eq!(report.summary.correct, report.summary.decisions);
/// ```
#[derive(Debug, Clone)]
pub struct Evaluation {
    round: Round,
    card: Scorecard,
}

impl Evaluation {
    pub fn start(seed: u64, agent: &str) -> Result<Self, EngineError> {
        Ok(Self::with_round(Round::deal(seed)?, agent))
    }

    pub fn with_shoe(seed: u64, shoe: Shoe, agent: &str) -> Result<Self, EngineError> {
        Ok(Self::with_round(Round::with_shoe(seed, shoe)?, agent))
    }

    pub fn with_round(round: Round, agent: &str) -> Self {
        let card = Scorecard::new(round.seed(), agent);
        Self { round, card }
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn pending(&self) -> Option<Observation> {
        self.round.observation()
    }

    /// Scores and applies the agent's answer to the pending decision.
    ///
    /// Agent failures, including an illegal choice, are replaced by a stand
    /// and recorded as incorrect. Returns the action actually applied.
    ///
    /// # Errors
    ///
    /// Only engine defects: no pending decision, or a failure inside the round.
    pub fn submit(&mut self, response: Result<Action, AgentError>) -> Result<Action, EngineError> {
        let obs = self.round.observation().ok_or(if self.round.is_settled() {
            EngineError::RoundSettled
        } else {
            EngineError::NoPendingDecision
        })?;
        let optimal = obs.optimal_action();
        let checked = response.and_then(|a| validate_action(&obs.legal, a));
        let applied = match &checked {
            Ok(a) => *a,
            Err(err) => {
                warn!(
                    seed = self.round.seed(),
                    hand = %obs.hand,
                    error = %err,
                    "agent failure, standing instead"
                );
                Action::Stand
            }
        };
        self.card.record(obs, &checked, applied, optimal);
        self.round.act(applied)?;
        Ok(applied)
    }

    pub fn finish(self) -> Result<RoundReport, EngineError> {
        self.card.finish(&self.round)
    }
}

/// Plays a whole round with a synchronous decision function.
pub fn play_round<F>(seed: u64, agent: &str, decide: F) -> Result<RoundReport, EngineError>
where
    F: FnMut(&Observation) -> Result<Action, AgentError>,
{
    drive(Evaluation::start(seed, agent)?, decide)
}

/// Same as [`play_round`] but deals from a caller-supplied shoe.
pub fn play_round_with_shoe<F>(
    seed: u64,
    shoe: Shoe,
    agent: &str,
    decide: F,
) -> Result<RoundReport, EngineError>
where
    F: FnMut(&Observation) -> Result<Action, AgentError>,
{
    drive(Evaluation::with_shoe(seed, shoe, agent)?, decide)
}

fn drive<F>(mut eval: Evaluation, mut decide: F) -> Result<RoundReport, EngineError>
where
    F: FnMut(&Observation) -> Result<Action, AgentError>,
{
    while let Some(obs) = eval.pending() {
        let answer = decide(&obs);
        eval.submit(answer)?;
    }
    eval.finish()
}
