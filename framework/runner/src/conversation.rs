use std::sync::Arc;
use std::time::{Duration, Instant};

use parley_client::{Endpoint, Message};
use parley_core::prelude::{DelegatedStopListener, StopSignalError};
use parley_instruments::ConversationOutcome;

/// Drive one simulated client through a multi-turn conversation.
///
/// Turns are strictly sequential: every request carries the full history of prior turns, so a
/// turn cannot start until the previous reply has arrived. The simulated user abandons the
/// session on the first failed exchange; no retry, no skip. A stop signal fails the in-flight
/// exchange with a [StopSignalError], which follows the same abandon path.
pub async fn run_conversation(
    client_id: usize,
    prompts: Vec<String>,
    endpoint: Arc<dyn Endpoint>,
    mut stop_listener: DelegatedStopListener,
    think_time: Duration,
) -> ConversationOutcome {
    let mut outcome = ConversationOutcome::new(client_id);
    let mut history: Vec<Message> = Vec::with_capacity(prompts.len() * 2);

    let planned_turns = prompts.len();
    for (turn, prompt) in prompts.into_iter().enumerate() {
        history.push(Message::user(prompt));

        let started = Instant::now();
        let result = tokio::select! {
            result = endpoint.exchange(&history) => result.map_err(|e| e.to_string()),
            _ = stop_listener.wait_for_stop() => Err(StopSignalError::default().to_string()),
        };
        let latency = started.elapsed();

        match result {
            Ok(exchange) => {
                history.push(Message::assistant(exchange.reply));
                outcome.record_success(latency, exchange.total_tokens);
            }
            Err(e) => {
                log::debug!("Client {} failed on turn {}: {}", client_id, turn + 1, e);
                outcome.record_failure(latency, e);
                break;
            }
        }

        // Think-time pacing between turns, skipped after the last one. A stop during the pause
        // ends the conversation without recording another turn.
        if turn + 1 < planned_turns {
            tokio::select! {
                _ = tokio::time::sleep(think_time) => {}
                _ = stop_listener.wait_for_stop() => {
                    log::debug!("Client {} stopping between turns", client_id);
                    break;
                }
            }
        }
    }

    outcome
}
