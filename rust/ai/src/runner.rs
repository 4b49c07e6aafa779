//! Concurrent benchmark runner.
//!
//! Every (seed, agent) pair is one independent round. Rounds run as tokio
//! tasks with at most `concurrency` in flight; a round that fails with an
//! [`EngineError`] is reported on its own and never cancels the others.

use std::sync::Arc;

use bjbench_engine::errors::EngineError;
use bjbench_engine::scorer::{AgentSummary, RoundReport};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::config::RunnerConfig;
use crate::driver::{play_round_async, AsyncAgent, Blocking};
use crate::{create_agent, UnknownAgent};

/// A round aborted by an engine defect.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundFailure {
    pub seed: u64,
    pub agent: String,
    pub error: EngineError,
}

#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// Ordered by seed, then by the agent order given to [`run_seeds`].
    pub reports: Vec<RoundReport>,
    pub failures: Vec<RoundFailure>,
}

impl RunOutcome {
    /// One summary per agent, in order of first appearance.
    pub fn summaries(&self) -> Vec<AgentSummary> {
        let mut names: Vec<&str> = Vec::new();
        for report in &self.reports {
            let name = report.summary.agent.as_str();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
            .into_iter()
            .map(|name| AgentSummary::from_reports(name, &self.reports))
            .collect()
    }
}

/// Builds the agents named in the config.
pub fn configured_agents(config: &RunnerConfig) -> Result<Vec<Arc<dyn AsyncAgent>>, UnknownAgent> {
    config
        .agents
        .iter()
        .map(|name| {
            create_agent(name)
                .map(|a| Arc::new(Blocking::<dyn crate::Agent>::from_arc(Arc::from(a))) as Arc<dyn AsyncAgent>)
        })
        .collect()
}

/// Plays every seed in `config.seeds()` for every agent.
pub async fn run_seeds(config: &RunnerConfig, agents: &[Arc<dyn AsyncAgent>]) -> RunOutcome {
    let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
    let timeout = config.agent_timeout();
    let mut tasks = JoinSet::new();

    info!(
        start_seed = config.start_seed,
        num_rounds = config.num_rounds,
        agents = agents.len(),
        concurrency = config.concurrency,
        "benchmark run started"
    );

    'seeds: for seed in config.seeds() {
        for (slot, agent) in agents.iter().enumerate() {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break 'seeds;
            };
            let agent = Arc::clone(agent);
            tasks.spawn(async move {
                let _permit = permit;
                let result = play_round_async(seed, agent.as_ref(), timeout).await;
                (seed, slot, agent.agent_name().to_string(), result)
            });
        }
    }

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((seed, slot, _, Ok(report))) => reports.push((seed, slot, report)),
            Ok((seed, slot, agent, Err(err))) => {
                error!(seed, agent = %agent, error = %err, "round aborted");
                failures.push((
                    seed,
                    slot,
                    RoundFailure {
                        seed,
                        agent,
                        error: err,
                    },
                ));
            }
            Err(join_err) => error!(error = %join_err, "round task did not complete"),
        }
    }
    reports.sort_by_key(|(seed, slot, _)| (*seed, *slot));
    failures.sort_by_key(|(seed, slot, _)| (*seed, *slot));

    let outcome = RunOutcome {
        reports: reports.into_iter().map(|(_, _, r)| r).collect(),
        failures: failures.into_iter().map(|(_, _, f)| f).collect(),
    };
    info!(
        rounds = outcome.reports.len(),
        failures = outcome.failures.len(),
        "benchmark run finished"
    );
    outcome
}
