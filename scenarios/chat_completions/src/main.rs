use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use parley_client::{ChatCompletionsEndpoint, ChatEndpointConfig};
use parley_questions::GeneratedQuestions;
use parley_runner::prelude::*;
use url::Url;

/// Environment variable holding the bearer token for the service under test, when it needs one.
const API_KEY_ENV: &str = "PARLEY_API_KEY";

fn main() -> ParleyResult<()> {
    let cli = init();

    let config = RunConfig::from_cli(&cli)?;

    let base_url = Url::parse(&cli.connection_string)
        .with_context(|| format!("Invalid connection string: {}", cli.connection_string))?;

    let mut endpoint_config = ChatEndpointConfig::new(base_url, &cli.model)
        .with_request_timeout(Duration::from_secs(cli.timeout));
    if let Ok(api_key) = std::env::var(API_KEY_ENV) {
        endpoint_config = endpoint_config.with_api_key(api_key);
    }
    let endpoint =
        ChatCompletionsEndpoint::new(endpoint_config).context("Failed to build chat endpoint")?;

    let definition = ScenarioDefinition::new(env!("CARGO_PKG_NAME"), config)
        .with_duration_s(cli.duration)
        .with_no_progress(cli.no_progress)
        .with_out_path(cli.out_path.clone())
        .with_env("model", &cli.model)
        .with_env("connection_string", &cli.connection_string);

    let report = run(definition, Arc::new(endpoint), Arc::new(GeneratedQuestions))?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
