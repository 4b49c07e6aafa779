use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;
use thiserror::Error;

use crate::AGENT_NAMES;

/// Settings for a benchmark run. House rules are fixed and not part of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunnerConfig {
    pub start_seed: u64,
    pub num_rounds: u64,
    pub concurrency: usize,
    pub agent_timeout_ms: u64,
    pub agents: Vec<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            start_seed: 0,
            num_rounds: 1_000,
            concurrency: 8,
            agent_timeout_ms: 5_000,
            agents: AGENT_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RunnerConfig {
    pub fn agent_timeout(&self) -> Duration {
        Duration::from_millis(self.agent_timeout_ms)
    }

    pub fn seeds(&self) -> std::ops::Range<u64> {
        self.start_seed..self.start_seed.saturating_add(self.num_rounds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_rounds == 0 {
            return Err(ConfigError::Invalid("num_rounds must be >0".into()));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid("concurrency must be >0".into()));
        }
        if self.agent_timeout_ms == 0 {
            return Err(ConfigError::Invalid("agent_timeout_ms must be >0".into()));
        }
        if self.agents.is_empty() {
            return Err(ConfigError::Invalid("agents cannot be empty".into()));
        }
        if let Some(unknown) = self
            .agents
            .iter()
            .find(|a| !AGENT_NAMES.contains(&a.as_str()))
        {
            return Err(ConfigError::Invalid(format!("unknown agent: {}", unknown)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSources {
    pub start_seed: ValueSource,
    pub num_rounds: ValueSource,
    pub concurrency: ValueSource,
    pub agent_timeout_ms: ValueSource,
    pub agents: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            start_seed: ValueSource::Default,
            num_rounds: ValueSource::Default,
            concurrency: ValueSource::Default,
            agent_timeout_ms: ValueSource::Default,
            agents: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: RunnerConfig,
    pub sources: ConfigSources,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub fn load() -> Result<RunnerConfig, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Resolves defaults, then the TOML file named by `BJBENCH_CONFIG`, then
/// `BJBENCH_*` variables, from the process environment.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    resolve(|key| std::env::var(key).ok())
}

/// Same as [`load_with_sources`] with an explicit variable lookup.
pub fn resolve<F>(lookup: F) -> Result<ConfigResolved, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = RunnerConfig::default();
    let mut sources = ConfigSources::default();
    let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(path) = var("BJBENCH_CONFIG") {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.start_seed {
            cfg.start_seed = v;
            sources.start_seed = ValueSource::File;
        }
        if let Some(v) = f.num_rounds {
            cfg.num_rounds = v;
            sources.num_rounds = ValueSource::File;
        }
        if let Some(v) = f.concurrency {
            cfg.concurrency = v;
            sources.concurrency = ValueSource::File;
        }
        if let Some(v) = f.agent_timeout_ms {
            cfg.agent_timeout_ms = v;
            sources.agent_timeout_ms = ValueSource::File;
        }
        if let Some(v) = f.agents {
            cfg.agents = v;
            sources.agents = ValueSource::File;
        }
    }

    if let Some(seed) = var("BJBENCH_START_SEED") {
        cfg.start_seed = parse_number(&seed, "BJBENCH_START_SEED")?;
        sources.start_seed = ValueSource::Env;
    }
    if let Some(rounds) = var("BJBENCH_NUM_ROUNDS") {
        cfg.num_rounds = parse_number(&rounds, "BJBENCH_NUM_ROUNDS")?;
        sources.num_rounds = ValueSource::Env;
    }
    if let Some(conc) = var("BJBENCH_CONCURRENCY") {
        cfg.concurrency = parse_number(&conc, "BJBENCH_CONCURRENCY")?;
        sources.concurrency = ValueSource::Env;
    }
    if let Some(ms) = var("BJBENCH_AGENT_TIMEOUT_MS") {
        cfg.agent_timeout_ms = parse_number(&ms, "BJBENCH_AGENT_TIMEOUT_MS")?;
        sources.agent_timeout_ms = ValueSource::Env;
    }
    if let Some(list) = var("BJBENCH_AGENTS") {
        cfg.agents = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        sources.agents = ValueSource::Env;
    }

    cfg.validate()?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    start_seed: Option<u64>,
    #[serde(default)]
    num_rounds: Option<u64>,
    #[serde(default)]
    concurrency: Option<usize>,
    #[serde(default)]
    agent_timeout_ms: Option<u64>,
    #[serde(default)]
    agents: Option<Vec<String>>,
}

fn parse_number<T: std::str::FromStr>(raw: &str, key: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{} is not a valid number: {}", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        fs::write(file.path(), body).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let resolved = resolve(env(&[])).unwrap();
        assert_eq!(resolved.config, RunnerConfig::default());
        assert_eq!(resolved.sources, ConfigSources::default());
    }

    #[test]
    fn env_overrides_defaults() {
        let resolved = resolve(env(&[
            ("BJBENCH_START_SEED", "100"),
            ("BJBENCH_NUM_ROUNDS", "50"),
            ("BJBENCH_AGENTS", "optimal, always_hit"),
        ]))
        .unwrap();
        assert_eq!(resolved.config.start_seed, 100);
        assert_eq!(resolved.config.num_rounds, 50);
        assert_eq!(resolved.config.agents, vec!["optimal", "always_hit"]);
        assert_eq!(resolved.sources.start_seed, ValueSource::Env);
        assert_eq!(resolved.sources.concurrency, ValueSource::Default);
        assert_eq!(resolved.config.seeds(), 100..150);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let resolved = resolve(env(&[("BJBENCH_CONCURRENCY", "")])).unwrap();
        assert_eq!(resolved.config.concurrency, 8);
        assert_eq!(resolved.sources.concurrency, ValueSource::Default);
    }

    #[test]
    fn file_then_env() {
        let file = write_config("start_seed = 7\nconcurrency = 2\nagents = [\"always_stand\"]\n");
        let resolved = resolve(env(&[
            ("BJBENCH_CONFIG", file.path().to_str().unwrap()),
            ("BJBENCH_CONCURRENCY", "4"),
        ]))
        .unwrap();
        assert_eq!(resolved.config.start_seed, 7);
        assert_eq!(resolved.sources.start_seed, ValueSource::File);
        assert_eq!(resolved.config.concurrency, 4);
        assert_eq!(resolved.sources.concurrency, ValueSource::Env);
        assert_eq!(resolved.config.agents, vec!["always_stand"]);
    }

    #[test]
    fn bad_file_is_a_parse_error() {
        let file = write_config("concurrency = \"many\"\n");
        let err = resolve(env(&[("BJBENCH_CONFIG", file.path().to_str().unwrap())])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = resolve(env(&[("BJBENCH_CONFIG", "/nonexistent/bjbench.toml")])).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn rejects_bad_values() {
        for (key, value) in [
            ("BJBENCH_CONCURRENCY", "0"),
            ("BJBENCH_AGENT_TIMEOUT_MS", "0"),
            ("BJBENCH_NUM_ROUNDS", "0"),
            ("BJBENCH_NUM_ROUNDS", "lots"),
            ("BJBENCH_AGENTS", "optimal,card_counter"),
            ("BJBENCH_AGENTS", " , "),
        ] {
            let err = resolve(env(&[(key, value)])).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{}={}", key, value);
        }
    }
}
