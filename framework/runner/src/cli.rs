use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
pub struct ParleyScenarioCli {
    /// Base URL of the service to test, e.g. `https://api.example.com`
    #[clap(short, long)]
    pub connection_string: String,

    /// The number of simulated clients to run
    #[clap(long)]
    pub clients: Option<usize>,

    /// The maximum number of conversations allowed to have requests in flight at once
    #[clap(long)]
    pub max_concurrent: Option<usize>,

    /// Question strategy tag. Unknown tags fall back to the mixed composite strategy.
    #[clap(long)]
    pub strategy: Option<String>,

    /// Number of turns per conversation
    #[clap(long)]
    pub turns: Option<usize>,

    /// Model name requested from the service
    #[clap(long, default_value = "gpt-3.5-turbo")]
    pub model: String,

    /// Per-request timeout in seconds
    #[clap(long, default_value = "60")]
    pub timeout: u64,

    /// Stop the run after this many seconds. Conversations still in flight fail their next
    /// exchange and halt, which is recorded like any other failure.
    #[clap(long)]
    pub duration: Option<u64>,

    /// Path to a YAML run configuration. Command line flags override values from the file.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Append the final report to this file, one JSON object per line
    #[clap(long)]
    pub out_path: Option<PathBuf>,

    /// Do not show a progress bar on the CLI.
    ///
    /// Recommended for CI/CD environments where the progress bar is just adding noise to the logs.
    #[clap(long, default_value = "false")]
    pub no_progress: bool,
}
