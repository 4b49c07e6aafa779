//! # bjbench-ai: Agents and Benchmark Runner
//!
//! Agent implementations and the machinery that plays them against the
//! blackjack engine: a timeout-aware async round driver, a concurrent seed
//! runner, runner configuration and logging setup.
//!
//! ## Core Components
//!
//! - [`Agent`] - Synchronous decision-making interface
//! - [`driver::AsyncAgent`] - Async interface; [`driver::Blocking`] adapts any [`Agent`]
//! - [`agents`] - Built-in agents (`optimal`, `always_hit`, `always_stand`) and [`agents::FnAgent`]
//! - [`create_agent`] - Factory for built-in agents by name
//! - [`driver`] - [`driver::play_round_async`] with per-decision timeouts
//! - [`runner`] - [`runner::run_seeds`] over a seed range, bounded concurrency
//! - [`config`] - Layered runner configuration
//! - [`logging`] - Subscriber setup and a capturing subscriber for tests
//!
//! ## Quick Start
//!
//! ```rust
//! use bjbench_ai::{create_agent, Agent};
//! use bjbench_engine::engine::play_round;
//!
//! let agent = create_agent("optimal").expect("built-in agent");
//! let report = play_round(42, agent.name(), |obs| agent.decide(obs)).expect("round");
//! assert_eq!(report.summary.correct, report.summary.decisions);
//! ```

use bjbench_engine::errors::AgentError;
use bjbench_engine::player::Action;
use bjbench_engine::round::Observation;
use thiserror::Error;

pub mod agents;
pub mod config;
pub mod driver;
pub mod logging;
pub mod runner;

/// Names accepted by [`create_agent`].
pub const AGENT_NAMES: [&str; 3] = ["optimal", "always_hit", "always_stand"];

/// Something that picks an action for a decision point.
///
/// The observation holds everything the agent may see: its cards, the dealer
/// upcard and the legal actions. The hole card and the shoe are never exposed.
///
/// # Example Implementation
///
/// ```rust
/// use bjbench_ai::Agent;
/// use bjbench_engine::errors::AgentError;
/// use bjbench_engine::player::Action;
/// use bjbench_engine::round::Observation;
///
/// struct StandOnTwelve;
///
/// impl Agent for StandOnTwelve {
///     fn decide(&self, obs: &Observation) -> Result<Action, AgentError> {
///         Ok(if obs.total() >= 12 { Action::Stand } else { Action::Hit })
///     }
///
///     fn name(&self) -> &str {
///         "stand_on_twelve"
///     }
/// }
/// ```
pub trait Agent: Send + Sync {
    /// Returns the chosen action, or an error when the agent could not produce
    /// one. Errors and illegal choices are scored as incorrect and the engine
    /// stands instead.
    fn decide(&self, obs: &Observation) -> Result<Action, AgentError>;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown agent: {0}")]
pub struct UnknownAgent(pub String);

/// Creates a built-in agent by name.
///
/// # Example
///
/// ```rust
/// use bjbench_ai::create_agent;
///
/// let agent = create_agent("always_stand").unwrap();
/// assert_eq!(agent.name(), "always_stand");
/// assert!(create_agent("card_counter").is_err());
/// ```
pub fn create_agent(name: &str) -> Result<Box<dyn Agent>, UnknownAgent> {
    match name {
        "optimal" => Ok(Box::new(agents::OptimalAgent)),
        "always_hit" => Ok(Box::new(agents::AlwaysHit)),
        "always_stand" => Ok(Box::new(agents::AlwaysStand)),
        other => Err(UnknownAgent(other.to_string())),
    }
}
