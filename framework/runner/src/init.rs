use crate::cli::ParleyScenarioCli;
use clap::Parser;

/// Initialise the CLI and logging for the Parley runner.
pub fn init() -> ParleyScenarioCli {
    env_logger::init();

    ParleyScenarioCli::parse()
}
