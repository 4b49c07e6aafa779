use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::{AgentError, EngineError};
use crate::player::Action;
use crate::round::{HandOutcome, HandPath, Observation, Round};

/// One scored decision, or a settlement-only row for a hand that was never
/// asked anything (naturals, a dealer blackjack, split aces).
///
/// A hand's delta sits on the last decision taken on it; earlier decisions on
/// the same hand carry zero. Summing `delta` over a round's records therefore
/// gives the round balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub seed: u64,
    pub agent: String,
    pub decision_num: usize,
    pub hand: HandPath,
    /// State shown to the agent; `None` on settlement-only rows.
    pub snapshot: Option<Observation>,
    /// What the agent asked for, when it named an action at all.
    pub requested: Option<Action>,
    #[serde(default)]
    pub agent_error: Option<AgentError>,
    /// What the engine actually applied.
    pub action: Option<Action>,
    pub optimal_action: Option<Action>,
    pub correct: Option<bool>,
    pub outcome: Option<HandOutcome>,
    pub delta: f64,
}

impl DecisionRecord {
    pub fn is_decision(&self) -> bool {
        self.action.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub seed: u64,
    pub agent: String,
    pub correct: usize,
    pub decisions: usize,
    pub balance: f64,
    pub outcomes: Vec<HandOutcome>,
    pub dealer_cards: Vec<Card>,
    pub dealer_total: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    pub summary: RoundSummary,
    pub records: Vec<DecisionRecord>,
}

/// Collects decisions while a round is played and turns them into a report
/// once it settles.
#[derive(Debug, Clone)]
pub struct Scorecard {
    seed: u64,
    agent: String,
    records: Vec<DecisionRecord>,
}

impl Scorecard {
    pub fn new(seed: u64, agent: impl Into<String>) -> Self {
        Self {
            seed,
            agent: agent.into(),
            records: Vec::new(),
        }
    }

    /// Scores one decision. `response` is the agent's answer after legality
    /// checking; any error makes the decision incorrect regardless of what was
    /// substituted.
    pub fn record(
        &mut self,
        snapshot: Observation,
        response: &Result<Action, AgentError>,
        applied: Action,
        optimal: Action,
    ) {
        let (requested, agent_error) = match response {
            Ok(a) => (Some(*a), None),
            Err(err) => {
                let requested = match err {
                    AgentError::IllegalAction { action } => Some(*action),
                    _ => None,
                };
                (requested, Some(err.clone()))
            }
        };
        let correct = response.is_ok() && applied == optimal;
        self.records.push(DecisionRecord {
            seed: self.seed,
            agent: self.agent.clone(),
            decision_num: self.records.len(),
            hand: snapshot.hand,
            snapshot: Some(snapshot),
            requested,
            agent_error,
            action: Some(applied),
            optimal_action: Some(optimal),
            correct: Some(correct),
            outcome: None,
            delta: 0.0,
        });
    }

    pub fn records(&self) -> &[DecisionRecord] {
        &self.records
    }

    /// Attaches settlements to the records and builds the round summary.
    ///
    /// # Errors
    ///
    /// [`EngineError::RoundInProgress`] if the round has not settled.
    pub fn finish(mut self, round: &Round) -> Result<RoundReport, EngineError> {
        let dealer = round.dealer_hand().ok_or(EngineError::RoundInProgress)?;

        for settlement in round.settlements() {
            let last = self
                .records
                .iter()
                .rposition(|r| r.hand == settlement.hand && r.is_decision());
            match last {
                Some(i) => {
                    self.records[i].outcome = Some(settlement.outcome);
                    self.records[i].delta = settlement.delta;
                }
                None => {
                    let decision_num = self.records.len();
                    self.records.push(DecisionRecord {
                        seed: self.seed,
                        agent: self.agent.clone(),
                        decision_num,
                        hand: settlement.hand,
                        snapshot: None,
                        requested: None,
                        agent_error: None,
                        action: None,
                        optimal_action: None,
                        correct: None,
                        outcome: Some(settlement.outcome),
                        delta: settlement.delta,
                    });
                }
            }
        }

        let decisions = self.records.iter().filter(|r| r.is_decision()).count();
        let correct = self
            .records
            .iter()
            .filter(|r| r.correct == Some(true))
            .count();
        let summary = RoundSummary {
            seed: self.seed,
            agent: self.agent,
            correct,
            decisions,
            balance: round.balance(),
            outcomes: round.settlements().iter().map(|s| s.outcome).collect(),
            dealer_cards: dealer.cards().to_vec(),
            dealer_total: dealer.total(),
        };
        Ok(RoundReport {
            summary,
            records: self.records,
        })
    }
}

/// Totals for one agent over many rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub agent: String,
    pub rounds: usize,
    pub total_balance: f64,
    pub avg_balance: f64,
    pub optimal_matches: usize,
    pub total_decisions: usize,
    pub accuracy_pct: f64,
}

impl AgentSummary {
    /// Aggregates the reports belonging to `agent`; reports for other agents
    /// are ignored.
    pub fn from_reports<'a>(
        agent: &str,
        reports: impl IntoIterator<Item = &'a RoundReport>,
    ) -> Self {
        let mut rounds = 0;
        let mut total_balance = 0.0;
        let mut optimal_matches = 0;
        let mut total_decisions = 0;
        for r in reports.into_iter().filter(|r| r.summary.agent == agent) {
            rounds += 1;
            total_balance += r.summary.balance;
            optimal_matches += r.summary.correct;
            total_decisions += r.summary.decisions;
        }
        let avg_balance = if rounds == 0 {
            0.0
        } else {
            total_balance / rounds as f64
        };
        let accuracy_pct = if total_decisions == 0 {
            0.0
        } else {
            optimal_matches as f64 * 100.0 / total_decisions as f64
        };
        Self {
            agent: agent.to_string(),
            rounds,
            total_balance,
            avg_balance,
            optimal_matches,
            total_decisions,
            accuracy_pct,
        }
    }
}
