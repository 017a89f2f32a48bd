mod cli;
mod config;
mod conversation;
mod definition;
mod init;
mod monitor;
mod progress;
mod run;
mod scheduler;
mod shutdown;
mod types;

pub mod prelude {
    pub use crate::cli::ParleyScenarioCli;
    pub use crate::config::{
        RunConfig, DEFAULT_THINK_TIME_MS, DEFAULT_TURNS_PER_CONVERSATION,
    };
    pub use crate::conversation::run_conversation;
    pub use crate::definition::ScenarioDefinition;
    pub use crate::init::init;
    pub use crate::run::run;
    pub use crate::scheduler::{run_load_test, CLIENT_SEED_MULTIPLIER};
    pub use crate::types::ParleyResult;

    pub use parley_core::prelude::{DelegatedStopListener, StopHandle, StopSignalError};
}
