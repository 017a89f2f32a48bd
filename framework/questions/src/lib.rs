//! Prompt generation for simulated conversations.
//!
//! Every prompt set is produced by a [QuestionGenerator] seeded explicitly by the caller, so the
//! same `(strategy, seed)` pair always yields the same prompts. The strategies inject random
//! parameters into the prompt text to keep generated questions distinct between clients, which
//! defeats response caching on the service under test.

mod generator;
mod strategy;

use async_trait::async_trait;

pub use generator::{QuestionGenerator, QUESTIONS_PER_SET};
pub use strategy::Strategy;

#[derive(Debug, thiserror::Error)]
pub enum QuestionSourceError {
    #[error("failed to generate questions: {0}")]
    Generation(String),
}

/// Capability consumed by the scheduler to obtain a prompt sequence for one client.
///
/// Implementations must be deterministic: the same `(strategy, seed)` always yields the same
/// sequence, with at least as many prompts as the run plans to consume per conversation.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn generate(
        &self,
        strategy: Strategy,
        seed: u64,
    ) -> Result<Vec<String>, QuestionSourceError>;
}

/// The default [QuestionSource], backed by a fresh [QuestionGenerator] per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeneratedQuestions;

#[async_trait]
impl QuestionSource for GeneratedQuestions {
    async fn generate(
        &self,
        strategy: Strategy,
        seed: u64,
    ) -> Result<Vec<String>, QuestionSourceError> {
        let mut generator = QuestionGenerator::new(seed);
        Ok(generator.generate(strategy))
    }
}
