use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sha3::Digest;
use std::collections::HashMap;
use std::io::{BufRead, Read, Write};
use std::path::PathBuf;

/// Identity and shape of one load test run.
///
/// Chosen by the runner before any client starts and carried unchanged into the final report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunMeta {
    /// The unique run id. Chosen by the runner, unique for each run.
    pub run_id: String,
    /// The name of the scenario that was run.
    pub scenario_name: String,
    /// The time the run started, as a Unix timestamp in seconds.
    pub started_at: i64,
    /// Number of simulated clients configured for the run.
    pub clients: usize,
    /// Maximum number of conversations admitted concurrently.
    pub max_concurrent: usize,
    /// The question strategy tag the run was configured with.
    pub strategy: String,
    /// Planned number of turns per conversation.
    pub turns_per_conversation: usize,
    /// Environment variables set for the run.
    ///
    /// This won't capture all environment variables, just the ones the runner is aware of or
    /// that the scenario includes itself.
    pub env: HashMap<String, String>,
}

impl RunMeta {
    pub fn new(
        scenario_name: impl Into<String>,
        clients: usize,
        max_concurrent: usize,
        strategy: impl Into<String>,
        turns_per_conversation: usize,
    ) -> Self {
        Self {
            run_id: nanoid::nanoid!(),
            scenario_name: scenario_name.into(),
            started_at: chrono::Utc::now().timestamp(),
            clients,
            max_concurrent,
            strategy: strategy.into(),
            turns_per_conversation,
            env: HashMap::with_capacity(0),
        }
    }

    pub fn add_env(&mut self, key: String, value: String) {
        self.env.insert(key, value);
    }

    /// Compute a fingerprint for the configuration of this run.
    ///
    /// The fingerprint identifies the run shape rather than the run itself: two runs configured
    /// identically produce the same fingerprint even though their run ids and timestamps differ.
    /// Computed with [sha3::Sha3_256] over the shape fields and recorded environment.
    pub fn fingerprint(&self) -> String {
        let mut hasher = sha3::Sha3_256::new();
        Digest::update(&mut hasher, self.scenario_name.as_bytes());
        Digest::update(&mut hasher, self.clients.to_le_bytes());
        Digest::update(&mut hasher, self.max_concurrent.to_le_bytes());
        Digest::update(&mut hasher, self.strategy.as_bytes());
        Digest::update(&mut hasher, self.turns_per_conversation.to_le_bytes());
        self.env
            .iter()
            .sorted_by_key(|(k, _)| k.to_owned())
            .for_each(|(k, v)| {
                Digest::update(&mut hasher, k.as_bytes());
                Digest::update(&mut hasher, v.as_bytes());
            });

        format!("{:x}", hasher.finalize())
    }
}

/// Latency distribution over the successful requests of a run, in seconds.
///
/// Percentiles use nearest-rank estimation into the ascending latency list; p99 is only reported
/// when the run produced enough successful requests for the tail estimate to mean anything.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LatencyStats {
    pub min_s: f64,
    pub max_s: f64,
    pub avg_s: f64,
    pub p50_s: f64,
    pub p95_s: f64,
    pub p99_s: Option<f64>,
}

/// Token accounting over the successful requests of a run.
///
/// Present only when at least one successful request carried a token count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenStats {
    pub total_tokens: u64,
    /// Integer-divided average across all successful requests.
    pub avg_tokens_per_request: u64,
}

/// The final aggregate report for one load test run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadTestReport {
    pub meta: RunMeta,
    pub duration_seconds: f64,
    pub total_clients: usize,
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    /// Success percentage formatted to one decimal place, e.g. `"97.5%"`. Absent on a no-data
    /// report.
    pub success_rate: Option<String>,
    pub throughput_rps: Option<f64>,
    pub latency_stats: Option<LatencyStats>,
    pub token_stats: Option<TokenStats>,
    /// Explicit indicator for the degenerate run with no successful requests.
    pub error: Option<String>,
}

impl LoadTestReport {
    /// True when the run produced no successful requests and so carries no distribution stats.
    pub fn is_no_data(&self) -> bool {
        self.error.is_some()
    }
}

/// Append the report to a file.
///
/// The report is serialized to JSON and written as a single line followed by a newline. The
/// recommended file extension is `.jsonl`.
pub fn append_run_report(report: &LoadTestReport, path: PathBuf) -> anyhow::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;
    store_run_report(report, &mut file)?;
    let _ = file.write("\n".as_bytes())?;
    Ok(())
}

/// Serialize the report to a writer.
pub fn store_run_report<W: Write>(report: &LoadTestReport, writer: &mut W) -> anyhow::Result<()> {
    serde_json::to_writer(writer, report)?;
    Ok(())
}

/// Load a single report from a reader.
pub fn load_run_report<R: Read>(reader: R) -> anyhow::Result<LoadTestReport> {
    let reader = std::io::BufReader::new(reader);
    let report: LoadTestReport = serde_json::from_reader(reader)?;
    Ok(report)
}

/// Load reports from a file containing one JSON object per line, the format produced by
/// [append_run_report].
pub fn load_run_reports(path: PathBuf) -> anyhow::Result<Vec<LoadTestReport>> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let mut reports = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let report: LoadTestReport = serde_json::from_str(&line)?;
        reports.push(report);
    }
    Ok(reports)
}
