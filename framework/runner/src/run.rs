use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use parley_client::Endpoint;
use parley_instruments::print_report_summary;
use parley_questions::QuestionSource;
use parley_summary_model::{append_run_report, LoadTestReport, RunMeta};

use crate::definition::ScenarioDefinition;
use crate::monitor::start_monitor;
use crate::progress::conversation_progress;
use crate::scheduler::run_load_test;
use crate::shutdown::start_stop_listener;

/// Execute a scenario and return its report.
///
/// Owns the Tokio runtime for the run; the scenario's `main` stays synchronous. A single
/// conversation failing never fails the run. The only fatal errors are failing to establish the
/// run at all (invalid configuration, runtime creation) and failing to persist the report.
pub fn run(
    definition: ScenarioDefinition,
    endpoint: Arc<dyn Endpoint>,
    questions: Arc<dyn QuestionSource>,
) -> anyhow::Result<LoadTestReport> {
    definition.config.validate()?;

    log::info!("Running scenario: {}", definition.name);

    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let stop_handle = start_stop_listener(&runtime)?;

    let mut meta = RunMeta::new(
        &definition.name,
        definition.config.clients,
        definition.config.max_concurrent,
        definition.config.strategy.to_string(),
        definition.config.turns_per_conversation,
    );
    for (key, value) in &definition.env {
        meta.add_env(key.clone(), value.clone());
    }

    // Time-bounded runs arm a timer that fires the stop signal; in-flight conversations then fail
    // their next exchange with a cancellation error and halt like any other failure.
    if let Some(duration_s) = definition.duration_s {
        let stop_handle = stop_handle.clone();
        runtime.spawn(async move {
            tokio::time::sleep(Duration::from_secs(duration_s)).await;
            log::info!("Run duration of {duration_s}s elapsed, stopping the run");
            stop_handle.stop();
        });
    }

    start_monitor(stop_handle.new_listener());

    let progress =
        (!definition.no_progress).then(|| conversation_progress(definition.config.clients as u64));

    let report = runtime.block_on(run_load_test(
        &definition.config,
        meta,
        endpoint,
        questions,
        &stop_handle,
        progress,
    ));

    // Winds down the monitor thread; the conversations have already finished.
    stop_handle.stop();

    print_report_summary(&report);

    if let Some(out_path) = &definition.out_path {
        append_run_report(&report, out_path.clone())
            .with_context(|| format!("Failed to append report to {}", out_path.display()))?;
        log::info!("Report appended to {}", out_path.display());
    }

    Ok(report)
}
