use std::path::PathBuf;

use crate::config::RunConfig;

/// Everything the runner needs to execute one scenario.
///
/// Built by the scenario binary from its CLI arguments, then handed to [crate::run::run].
pub struct ScenarioDefinition {
    /// The name of the scenario, which should be unique within the test suite.
    ///
    /// Recommended value is `env!("CARGO_PKG_NAME")`.
    pub name: String,
    pub config: RunConfig,
    /// Stop the whole run after this many seconds. Conversations still in flight fail their next
    /// exchange with a cancellation error and halt.
    pub duration_s: Option<u64>,
    pub no_progress: bool,
    /// When set, the final report is appended to this file as one JSON line.
    pub out_path: Option<PathBuf>,
    /// Environment recorded into the report metadata, e.g. the model under test.
    pub env: Vec<(String, String)>,
}

impl ScenarioDefinition {
    pub fn new(name: &str, config: RunConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
            duration_s: None,
            no_progress: false,
            out_path: None,
            env: Vec::new(),
        }
    }

    pub fn with_duration_s(mut self, duration_s: Option<u64>) -> Self {
        self.duration_s = duration_s;
        self
    }

    pub fn with_no_progress(mut self, no_progress: bool) -> Self {
        self.no_progress = no_progress;
        self
    }

    pub fn with_out_path(mut self, out_path: Option<PathBuf>) -> Self {
        self.out_path = out_path;
        self
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }
}
