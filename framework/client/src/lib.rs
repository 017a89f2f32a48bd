//! The endpoint capability: one conversational exchange against the service under test.
//!
//! The harness core only needs three things from an exchange: the reply text (to extend the
//! conversation history), the token usage when the service reports it, and whether the exchange
//! failed. Everything else about the wire protocol stays inside this crate.

mod chat;
mod message;

use async_trait::async_trait;

pub use chat::{ChatCompletionsEndpoint, ChatEndpointConfig};
pub use message::{Message, Role};

/// The outcome of one successful exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatExchange {
    pub reply: String,
    /// Total token usage as reported by the service. Not all services report usage.
    pub total_tokens: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("invalid endpoint configuration: {0}")]
    InvalidConfig(String),
}

/// Capability for performing one conversational exchange.
///
/// Exactly one attempt per call: implementations must not retry internally. There is no latency
/// contract; the conversation measures elapsed time around the call.
#[async_trait]
pub trait Endpoint: Send + Sync {
    async fn exchange(&self, history: &[Message]) -> Result<ChatExchange, EndpointError>;
}
