use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ChatExchange, Endpoint, EndpointError, Message};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for a [ChatCompletionsEndpoint].
#[derive(Debug, Clone)]
pub struct ChatEndpointConfig {
    /// Base URL of the service under test, e.g. `https://api.example.com`.
    pub base_url: Url,
    /// Bearer token passed through on every request, when the service needs one.
    pub api_key: Option<String>,
    pub model: String,
    pub request_timeout: Duration,
}

impl ChatEndpointConfig {
    pub fn new(base_url: Url, model: impl Into<String>) -> Self {
        Self {
            base_url,
            api_key: None,
            model: model.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// [Endpoint] implementation speaking the OpenAI-style chat completions protocol.
pub struct ChatCompletionsEndpoint {
    client: reqwest::Client,
    chat_url: Url,
    api_key: Option<String>,
    model: String,
}

impl ChatCompletionsEndpoint {
    pub fn new(config: ChatEndpointConfig) -> Result<Self, EndpointError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        // Url::join resolves relative to the last path segment, so anchor the base with a
        // trailing slash before appending the completions path.
        let mut base = config.base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let chat_url = Url::parse(&base)
            .and_then(|base| base.join("v1/chat/completions"))
            .map_err(|e| EndpointError::InvalidConfig(format!("invalid base URL: {e}")))?;

        Ok(Self {
            client,
            chat_url,
            api_key: config.api_key,
            model: config.model,
        })
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: u64,
}

#[async_trait]
impl Endpoint for ChatCompletionsEndpoint {
    async fn exchange(&self, history: &[Message]) -> Result<ChatExchange, EndpointError> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: history,
            temperature: 0.7,
            max_tokens: 150,
        };

        let mut request = self.client.post(self.chat_url.clone()).json(&payload);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EndpointError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatCompletionResponse = response.json().await?;
        parse_exchange(body)
    }
}

fn parse_exchange(body: ChatCompletionResponse) -> Result<ChatExchange, EndpointError> {
    let reply = body
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| EndpointError::MalformedResponse("response has no choices".to_string()))?;

    Ok(ChatExchange {
        reply,
        total_tokens: body.usage.map(|usage| usage.total_tokens),
    })
}
