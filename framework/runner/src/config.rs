use anyhow::Context;
use parley_questions::Strategy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::cli::ParleyScenarioCli;

pub const DEFAULT_CLIENTS: usize = 10;
pub const DEFAULT_MAX_CONCURRENT: usize = 5;
pub const DEFAULT_TURNS_PER_CONVERSATION: usize = 5;
/// Pause between turns of one conversation, simulating think-time. Not counted towards latency.
pub const DEFAULT_THINK_TIME_MS: u64 = 100;

/// The shape of one load test run.
///
/// Loadable from a YAML file, with command line flags layered on top.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunConfig {
    /// Number of independent simulated conversations to run.
    pub clients: usize,
    /// Maximum number of conversations permitted to have requests in flight simultaneously.
    pub max_concurrent: usize,
    pub strategy: Strategy,
    pub turns_per_conversation: usize,
    pub think_time_ms: u64,
    /// Minimum successful-request count before a p99 latency estimate is reported.
    pub p99_min_samples: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            clients: DEFAULT_CLIENTS,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            strategy: Strategy::Mixed,
            turns_per_conversation: DEFAULT_TURNS_PER_CONVERSATION,
            think_time_ms: DEFAULT_THINK_TIME_MS,
            p99_min_samples: parley_instruments::DEFAULT_P99_MIN_SAMPLES,
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read run configuration {}", path.display()))?;
        let config: RunConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse run configuration {}", path.display()))?;
        Ok(config)
    }

    /// Build the run configuration from command line arguments, layering any flags the user set
    /// over the YAML file when one was given.
    pub fn from_cli(cli: &ParleyScenarioCli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };

        if let Some(clients) = cli.clients {
            config.clients = clients;
        }
        if let Some(max_concurrent) = cli.max_concurrent {
            config.max_concurrent = max_concurrent;
        }
        if let Some(strategy) = &cli.strategy {
            config.strategy = Strategy::from_tag(strategy);
        }
        if let Some(turns) = cli.turns {
            config.turns_per_conversation = turns;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.clients >= 1, "clients must be at least 1");
        anyhow::ensure!(
            self.max_concurrent >= 1,
            "max_concurrent must be at least 1"
        );
        anyhow::ensure!(
            self.turns_per_conversation >= 1,
            "turns_per_conversation must be at least 1"
        );
        Ok(())
    }

    pub fn think_time(&self) -> Duration {
        Duration::from_millis(self.think_time_ms)
    }
}
