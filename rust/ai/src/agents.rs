//! Built-in agents.
//!
//! [`OptimalAgent`] answers from the basic-strategy oracle and so scores 100%
//! by construction. [`AlwaysHit`] and [`AlwaysStand`] are fixed baselines for
//! comparison. [`FnAgent`] turns a closure into an agent, which is the
//! simplest way to plug in an external decision source.

use bjbench_engine::errors::AgentError;
use bjbench_engine::player::Action;
use bjbench_engine::round::Observation;

use crate::Agent;

#[derive(Debug, Clone, Copy, Default)]
pub struct OptimalAgent;

impl Agent for OptimalAgent {
    fn decide(&self, obs: &Observation) -> Result<Action, AgentError> {
        Ok(obs.optimal_action())
    }

    fn name(&self) -> &str {
        "optimal"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysHit;

impl Agent for AlwaysHit {
    fn decide(&self, _obs: &Observation) -> Result<Action, AgentError> {
        Ok(Action::Hit)
    }

    fn name(&self) -> &str {
        "always_hit"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysStand;

impl Agent for AlwaysStand {
    fn decide(&self, _obs: &Observation) -> Result<Action, AgentError> {
        Ok(Action::Stand)
    }

    fn name(&self) -> &str {
        "always_stand"
    }
}

/// Adapts a closure to [`Agent`].
///
/// ```rust
/// use bjbench_ai::agents::FnAgent;
/// use bjbench_ai::Agent;
/// use bjbench_engine::player::Action;
///
/// let agent = FnAgent::new("text", |_obs| "  HIT ".parse::<Action>());
/// assert_eq!(agent.name(), "text");
/// ```
pub struct FnAgent<F> {
    name: String,
    f: F,
}

impl<F> FnAgent<F>
where
    F: Fn(&Observation) -> Result<Action, AgentError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Agent for FnAgent<F>
where
    F: Fn(&Observation) -> Result<Action, AgentError> + Send + Sync,
{
    fn decide(&self, obs: &Observation) -> Result<Action, AgentError> {
        (self.f)(obs)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> std::fmt::Debug for FnAgent<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnAgent").field("name", &self.name).finish()
    }
}
