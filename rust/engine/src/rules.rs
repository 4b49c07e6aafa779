use serde::{Deserialize, Serialize};

use crate::errors::AgentError;
use crate::player::Action;

/// Fixed table rules. These are constants of the benchmark, not settings: every
/// agent is measured against exactly this game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseRules {
    pub num_decks: usize,
    /// Dealer stands on every 17, soft or hard.
    pub dealer_stands_soft_17: bool,
    pub blackjack_payout: f64,
    pub surrender_loss: f64,
    pub double_after_split: bool,
    /// One split per original pair; split hands never split again.
    pub max_splits: usize,
    /// Split aces get exactly one card each and a 21 pays even money.
    pub split_aces_one_card: bool,
    pub dealer_peeks: bool,
}

pub const HOUSE_RULES: HouseRules = HouseRules {
    num_decks: 6,
    dealer_stands_soft_17: true,
    blackjack_payout: 1.5,
    surrender_loss: 0.5,
    double_after_split: true,
    max_splits: 1,
    split_aces_one_card: true,
    dealer_peeks: true,
};

/// The actions available at one decision point. Hit and stand are always
/// available; the rest depend on the hand.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LegalActions {
    pub can_double: bool,
    pub can_split: bool,
    pub can_surrender: bool,
}

impl LegalActions {
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Hit | Action::Stand => true,
            Action::Double => self.can_double,
            Action::Split => self.can_split,
            Action::Surrender => self.can_surrender,
        }
    }

    pub fn to_vec(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|a| self.allows(*a))
            .collect()
    }
}

/// Checks an agent's choice against the legal set.
///
/// # Errors
///
/// Returns [`AgentError::IllegalAction`] when the action is not currently
/// available. Callers substitute a stand and score the decision incorrect.
///
/// # Examples
///
/// ```
/// use bjbench_engine::player::Action;
/// use bjbench_engine::rules::{validate_action, LegalActions};
///
/// let legal = LegalActions { can_double: false, can_split: false, can_surrender: false };
/// assert_eq!(validate_action(&legal, Action::Hit), Ok(Action::Hit));
/// assert!(validate_action(&legal, Action::Surrender).is_err());
/// ```
pub fn validate_action(legal: &LegalActions, action: Action) -> Result<Action, AgentError> {
    if legal.allows(action) {
        Ok(action)
    } else {
        Err(AgentError::IllegalAction { action })
    }
}
