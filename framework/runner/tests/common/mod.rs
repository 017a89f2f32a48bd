use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use parley_client::{ChatExchange, Endpoint, EndpointError, Message, Role};
use parley_questions::{QuestionSource, QuestionSourceError, Strategy};

/// Scriptable endpoint standing in for the service under test.
///
/// Tracks the number of exchanges in flight so tests can assert the admission gate holds, and
/// records the prompts it sees so tests can check seed derivation.
pub struct StubEndpoint {
    pub latency: Duration,
    pub total_tokens: Option<u64>,
    /// When set, fail the exchange for this 1-based turn number with a 500 status.
    pub fail_on_turn: Option<usize>,

    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    prompts_seen: Mutex<Vec<String>>,
    first_prompts: Mutex<Vec<String>>,
    history_lens: Mutex<Vec<usize>>,
}

impl StubEndpoint {
    pub fn new(latency: Duration, total_tokens: Option<u64>) -> Self {
        Self {
            latency,
            total_tokens,
            fail_on_turn: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            prompts_seen: Mutex::new(Vec::new()),
            first_prompts: Mutex::new(Vec::new()),
            history_lens: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on_turn(latency: Duration, turn: usize) -> Self {
        let mut stub = Self::new(latency, None);
        stub.fail_on_turn = Some(turn);
        stub
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn prompts_seen(&self) -> Vec<String> {
        self.prompts_seen.lock().unwrap().clone()
    }

    pub fn first_prompts(&self) -> Vec<String> {
        self.first_prompts.lock().unwrap().clone()
    }

    pub fn history_lens(&self) -> Vec<usize> {
        self.history_lens.lock().unwrap().clone()
    }
}

#[async_trait]
impl Endpoint for StubEndpoint {
    async fn exchange(&self, history: &[Message]) -> Result<ChatExchange, EndpointError> {
        let entered = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(entered, Ordering::SeqCst);

        let turn = history
            .iter()
            .filter(|message| message.role == Role::User)
            .count();
        if let Some(prompt) = history.last() {
            self.prompts_seen.lock().unwrap().push(prompt.content.clone());
            if turn == 1 {
                self.first_prompts.lock().unwrap().push(prompt.content.clone());
            }
        }
        self.history_lens.lock().unwrap().push(history.len());

        tokio::time::sleep(self.latency).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_on_turn == Some(turn) {
            return Err(EndpointError::Status {
                status: 500,
                body: "stub failure".to_string(),
            });
        }

        Ok(ChatExchange {
            reply: format!("reply to turn {turn}"),
            total_tokens: self.total_tokens,
        })
    }
}

/// Question source with predictable prompts, optionally failing for one seed.
pub struct ScriptedQuestions {
    pub fail_for_seed: Option<u64>,
}

impl ScriptedQuestions {
    pub fn new() -> Self {
        Self {
            fail_for_seed: None,
        }
    }
}

#[async_trait]
impl QuestionSource for ScriptedQuestions {
    async fn generate(
        &self,
        _strategy: Strategy,
        seed: u64,
    ) -> Result<Vec<String>, QuestionSourceError> {
        if self.fail_for_seed == Some(seed) {
            return Err(QuestionSourceError::Generation(format!(
                "no questions for seed {seed}"
            )));
        }

        Ok((0..8).map(|i| format!("question {i} for seed {seed}")).collect())
    }
}
