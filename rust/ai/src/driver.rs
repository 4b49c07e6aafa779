//! Async round driver.
//!
//! Agents that answer over a network or from another process are modelled
//! as [`AsyncAgent`]s. Each query is bounded by a timeout; a late agent is
//! scored as a [`AgentError::Timeout`] and the engine stands for it.
//! Synchronous agents join through [`Blocking`], which moves every call onto
//! tokio's blocking pool so a stuck call can still time out.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use bjbench_engine::engine::Evaluation;
use bjbench_engine::errors::{AgentError, EngineError};
use bjbench_engine::player::Action;
use bjbench_engine::round::Observation;
use bjbench_engine::scorer::RoundReport;
use tracing::debug;

use crate::Agent;

pub type AgentFuture<'a> = Pin<Box<dyn Future<Output = Result<Action, AgentError>> + Send + 'a>>;

/// Async counterpart of [`Agent`].
pub trait AsyncAgent: Send + Sync {
    fn respond(&self, obs: Observation) -> AgentFuture<'_>;

    fn agent_name(&self) -> &str;
}

/// Runs a synchronous [`Agent`] as an [`AsyncAgent`].
///
/// Each decision runs under `spawn_blocking`. When the driver gives up on a
/// call, the call keeps running on the blocking pool but its answer is
/// discarded.
///
/// ```rust
/// use bjbench_ai::agents::AlwaysStand;
/// use bjbench_ai::driver::{AsyncAgent, Blocking};
///
/// let agent = Blocking::new(AlwaysStand);
/// assert_eq!(agent.agent_name(), "always_stand");
/// ```
pub struct Blocking<A: ?Sized> {
    agent: Arc<A>,
}

impl<A: Agent + 'static> Blocking<A> {
    pub fn new(agent: A) -> Self {
        Self {
            agent: Arc::new(agent),
        }
    }
}

impl<A: Agent + ?Sized + 'static> Blocking<A> {
    pub fn from_arc(agent: Arc<A>) -> Self {
        Self { agent }
    }
}

impl<A: ?Sized> std::fmt::Debug for Blocking<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blocking").finish_non_exhaustive()
    }
}

impl<A: Agent + ?Sized + 'static> AsyncAgent for Blocking<A> {
    fn respond(&self, obs: Observation) -> AgentFuture<'_> {
        let agent = Arc::clone(&self.agent);
        Box::pin(async move {
            match tokio::task::spawn_blocking(move || agent.decide(&obs)).await {
                Ok(answer) => answer,
                Err(err) => Err(AgentError::Protocol {
                    message: format!("agent call failed: {}", err),
                }),
            }
        })
    }

    fn agent_name(&self) -> &str {
        self.agent.name()
    }
}

/// Plays one round, giving the agent at most `timeout` per decision.
///
/// No engine state is locked while the agent is awaited. Only engine defects
/// come back as errors; every agent failure is folded into the report.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use bjbench_ai::agents::OptimalAgent;
/// use bjbench_ai::driver::{play_round_async, Blocking};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let report = play_round_async(9, &Blocking::new(OptimalAgent), Duration::from_secs(1))
///     .await
///     .expect("round");
/// assert_eq!(report.summary.agent, "optimal");
/// # });
/// ```
pub async fn play_round_async<A>(
    seed: u64,
    agent: &A,
    timeout: Duration,
) -> Result<RoundReport, EngineError>
where
    A: AsyncAgent + ?Sized,
{
    let mut eval = Evaluation::start(seed, agent.agent_name())?;
    while let Some(obs) = eval.pending() {
        let hand = obs.hand;
        let answer = match tokio::time::timeout(timeout, agent.respond(obs)).await {
            Ok(answer) => answer,
            Err(_) => Err(AgentError::Timeout {
                millis: timeout.as_millis() as u64,
            }),
        };
        let applied = eval.submit(answer)?;
        debug!(seed, hand = %hand, action = %applied, "decision applied");
    }
    eval.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{AlwaysStand, FnAgent, OptimalAgent};
    use bjbench_engine::engine::play_round;
    use std::time::Instant;

    struct Sleepy {
        delay: Duration,
    }

    impl AsyncAgent for Sleepy {
        fn respond(&self, obs: Observation) -> AgentFuture<'_> {
            let delay = self.delay;
            Box::pin(async move {
                tokio::time::sleep(delay).await;
                Ok(obs.optimal_action())
            })
        }

        fn agent_name(&self) -> &str {
            "sleepy"
        }
    }

    #[tokio::test]
    async fn sync_agents_match_the_sync_driver() {
        for seed in 0..25 {
            let async_report =
                play_round_async(seed, &Blocking::new(OptimalAgent), Duration::from_secs(1))
                .await
                .unwrap();
            let sync_report =
                play_round(seed, "optimal", |obs| Ok(obs.optimal_action())).unwrap();
            assert_eq!(async_report, sync_report);
        }
    }

    #[tokio::test]
    async fn late_answers_time_out_and_stand() {
        let agent = Sleepy {
            delay: Duration::from_millis(500),
        };
        for seed in 0..5 {
            let report = play_round_async(seed, &agent, Duration::from_millis(10))
                .await
                .unwrap();
            let stood = play_round(seed, "sleepy", |_| Ok(Action::Stand)).unwrap();
            assert_eq!(report.summary.balance, stood.summary.balance);
            for record in report.records.iter().filter(|r| r.is_decision()) {
                assert_eq!(record.action, Some(Action::Stand));
                assert_eq!(record.correct, Some(false));
                assert_eq!(record.agent_error, Some(AgentError::Timeout { millis: 10 }));
            }
        }
    }

    #[tokio::test]
    async fn prompt_async_answers_are_used() {
        let agent = Sleepy {
            delay: Duration::from_millis(1),
        };
        let report = play_round_async(4, &agent, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(report.summary.correct, report.summary.decisions);
    }

    #[tokio::test]
    async fn trait_objects_are_accepted() {
        let agent: Box<dyn AsyncAgent> = Box::new(Blocking::new(AlwaysStand));
        let report = play_round_async(1, agent.as_ref(), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(report.summary.agent, "always_stand");
    }

    #[tokio::test]
    async fn blocking_sync_agents_still_time_out() {
        let agent = Blocking::new(FnAgent::new("stuck", |_obs| {
            std::thread::sleep(Duration::from_millis(300));
            Ok(Action::Hit)
        }));
        let mut decisions = 0;
        for seed in 0..5 {
            let started = Instant::now();
            let report = play_round_async(seed, &agent, Duration::from_millis(10))
                .await
                .unwrap();
            assert!(started.elapsed() < Duration::from_millis(250), "seed {}", seed);
            for record in report.records.iter().filter(|r| r.is_decision()) {
                decisions += 1;
                assert_eq!(record.requested, None);
                assert_eq!(record.action, Some(Action::Stand));
                assert_eq!(record.correct, Some(false));
                assert_eq!(record.agent_error, Some(AgentError::Timeout { millis: 10 }));
            }
        }
        assert!(decisions > 0);
    }

    #[tokio::test]
    async fn panicking_sync_agent_is_a_protocol_error() {
        let agent = Blocking::new(FnAgent::new("broken", |_obs| -> Result<Action, AgentError> {
            panic!("agent bug")
        }));
        for seed in 0..5 {
            let report = play_round_async(seed, &agent, Duration::from_secs(1))
                .await
                .unwrap();
            for record in report.records.iter().filter(|r| r.is_decision()) {
                assert_eq!(record.action, Some(Action::Stand));
                assert!(matches!(record.agent_error, Some(AgentError::Protocol { .. })));
            }
        }
    }
}
