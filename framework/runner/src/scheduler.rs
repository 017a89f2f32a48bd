use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use indicatif::ProgressBar;
use tokio::sync::Semaphore;

use parley_client::Endpoint;
use parley_core::prelude::StopHandle;
use parley_instruments::{aggregate, ConversationOutcome};
use parley_questions::QuestionSource;
use parley_summary_model::{LoadTestReport, RunMeta};

use crate::config::RunConfig;
use crate::conversation::run_conversation;

/// Fixed multiplier deriving each client's question seed from its index.
///
/// The derivation is a correctness requirement, not an optimisation: runs with the same client
/// count and strategy must generate identical per-client prompt sets, and no two clients within
/// one run may share a seed.
pub const CLIENT_SEED_MULTIPLIER: u64 = 1337;

/// Run every configured conversation and reduce the outcomes to the final report.
///
/// One task per client, all spawned up front and joined before aggregation; no task outlives this
/// function. The admission gate is a counting semaphore: a conversation holds one permit from
/// before its question generation until it finishes on any path, so at most
/// `config.max_concurrent` conversations have requests in flight at any moment. Admission order
/// among waiting clients is unspecified.
///
/// Individual failures never abort the run; they are recorded in the outcomes and show up in the
/// report's failed counts.
pub async fn run_load_test(
    config: &RunConfig,
    meta: RunMeta,
    endpoint: Arc<dyn Endpoint>,
    questions: Arc<dyn QuestionSource>,
    stop_handle: &StopHandle,
    progress: Option<ProgressBar>,
) -> LoadTestReport {
    log::info!(
        "Starting load test: {} clients, {} max concurrent, strategy {}",
        config.clients,
        config.max_concurrent,
        config.strategy
    );

    let gate = Arc::new(Semaphore::new(config.max_concurrent));
    let started = Instant::now();

    let mut handles = Vec::with_capacity(config.clients);
    for client_id in 0..config.clients {
        let gate = gate.clone();
        let endpoint = endpoint.clone();
        let questions = questions.clone();
        let stop_listener = stop_handle.new_listener();
        let progress = progress.clone();

        let strategy = config.strategy;
        let turns = config.turns_per_conversation;
        let think_time = config.think_time();

        handles.push(tokio::spawn(async move {
            // Held for the whole conversation and released on every exit path by drop.
            let _permit = match gate.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    // The gate lives as long as this task, so this cannot happen in practice.
                    log::error!("Admission gate closed before client {} started", client_id);
                    return ConversationOutcome::new(client_id);
                }
            };

            let seed = client_id as u64 * CLIENT_SEED_MULTIPLIER;
            let outcome = match questions.generate(strategy, seed).await {
                Ok(mut prompts) => {
                    prompts.truncate(turns);
                    run_conversation(client_id, prompts, endpoint, stop_listener, think_time)
                        .await
                }
                Err(e) => {
                    // Fatal to this client only; it completes with zero turns recorded.
                    log::error!("Question generation failed for client {}: {}", client_id, e);
                    ConversationOutcome::new(client_id)
                }
            };

            if let Some(progress) = &progress {
                progress.inc(1);
            }

            outcome
        }));
    }

    log::info!("Waiting for {} conversations to complete", handles.len());

    let mut outcomes = Vec::with_capacity(config.clients);
    for (client_id, joined) in join_all(handles).await.into_iter().enumerate() {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                // A panicked conversation degrades to an empty outcome rather than failing the run.
                log::error!("Conversation task for client {} panicked: {:?}", client_id, e);
                outcomes.push(ConversationOutcome::new(client_id));
            }
        }
    }

    let duration = started.elapsed();
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    aggregate(&outcomes, duration, meta, config.p99_min_samples)
}
