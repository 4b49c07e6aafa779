use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::Action;

/// Fatal errors. Each one means the engine itself reached a state it should
/// never reach; the affected round is aborted and nothing else is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Shoe exhausted after {dealt} cards")]
    ShoeExhausted { dealt: usize },
    #[error("Round already settled")]
    RoundSettled,
    #[error("Hand {index} is not active")]
    HandNotActive { index: usize },
    #[error("Split attempted on a hand that was already split")]
    SplitDepthExceeded,
    #[error("Action {action} is not legal on hand {hand}")]
    IllegalTransition { action: Action, hand: usize },
    #[error("No decision is pending")]
    NoPendingDecision,
    #[error("Round has not settled yet")]
    RoundInProgress,
}

/// Per-decision failures caused by the agent. These never abort a round: the
/// engine substitutes a stand and the decision is scored incorrect.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentError {
    #[error("Illegal action requested: {action}")]
    IllegalAction { action: Action },
    #[error("Agent did not answer within {millis} ms")]
    Timeout { millis: u64 },
    #[error("Malformed agent response: {message}")]
    Protocol { message: String },
}
