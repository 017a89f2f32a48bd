use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Success {
        /// Token usage reported by the endpoint, when available.
        total_tokens: Option<u64>,
    },
    Failure {
        /// Human-readable description of what went wrong.
        error: String,
    },
}

/// One request/response exchange, immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    index: usize,
    latency: Duration,
    outcome: TurnOutcome,
}

impl Turn {
    /// 1-based position of this turn within its conversation.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Wall-clock duration of the exchange, excluding think-time pacing.
    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn outcome(&self) -> &TurnOutcome {
        &self.outcome
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, TurnOutcome::Success { .. })
    }

    pub fn total_tokens(&self) -> Option<u64> {
        match &self.outcome {
            TurnOutcome::Success { total_tokens } => *total_tokens,
            TurnOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            TurnOutcome::Success { .. } => None,
            TurnOutcome::Failure { error } => Some(error),
        }
    }
}

/// The ordered turn history of one simulated client.
///
/// Owned exclusively by the conversation that produces it until handed to the scheduler.
/// Turn indexes are assigned here, in insertion order. Once a failure is recorded the outcome is
/// halted and no further turn can be appended, so the turn list is always a prefix of the planned
/// sequence with at most one failure, at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationOutcome {
    client_id: usize,
    turns: Vec<Turn>,
}

impl ConversationOutcome {
    pub fn new(client_id: usize) -> Self {
        Self {
            client_id,
            turns: Vec::new(),
        }
    }

    pub fn client_id(&self) -> usize {
        self.client_id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// True once a failed turn has been recorded.
    pub fn is_halted(&self) -> bool {
        self.turns.last().is_some_and(|turn| !turn.is_success())
    }

    pub fn record_success(&mut self, latency: Duration, total_tokens: Option<u64>) {
        self.record(latency, TurnOutcome::Success { total_tokens });
    }

    pub fn record_failure(&mut self, latency: Duration, error: String) {
        self.record(latency, TurnOutcome::Failure { error });
    }

    fn record(&mut self, latency: Duration, outcome: TurnOutcome) {
        if self.is_halted() {
            debug_assert!(false, "turn recorded after conversation halted");
            log::error!(
                "Discarding turn recorded after client {} halted",
                self.client_id
            );
            return;
        }

        self.turns.push(Turn {
            index: self.turns.len() + 1,
            latency,
            outcome,
        });
    }
}
