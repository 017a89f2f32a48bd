mod common;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use parley_questions::GeneratedQuestions;
use parley_runner::prelude::*;
use parley_summary_model::RunMeta;

use common::{ScriptedQuestions, StubEndpoint};

fn test_config(clients: usize, max_concurrent: usize) -> RunConfig {
    RunConfig {
        clients,
        max_concurrent,
        think_time_ms: 1,
        ..Default::default()
    }
}

fn test_meta(config: &RunConfig) -> RunMeta {
    RunMeta::new(
        "scheduler-test",
        config.clients,
        config.max_concurrent,
        config.strategy.to_string(),
        config.turns_per_conversation,
    )
}

#[tokio::test]
async fn full_run_accounts_for_every_request() {
    let config = test_config(10, 5);
    let endpoint = Arc::new(StubEndpoint::new(Duration::from_millis(5), Some(20)));
    let questions = Arc::new(ScriptedQuestions::new());
    let stop_handle = StopHandle::default();

    let report = run_load_test(
        &config,
        test_meta(&config),
        endpoint.clone(),
        questions,
        &stop_handle,
        None,
    )
    .await;

    assert_eq!(report.total_clients, 10);
    assert_eq!(report.total_requests, 50);
    assert_eq!(report.successful_requests, 50);
    assert_eq!(report.failed_requests, 0);
    assert_eq!(report.success_rate, Some("100.0%".to_string()));
    assert!(!report.is_no_data());

    let latency = report.latency_stats.unwrap();
    assert!(latency.min_s > 0.0);
    assert!(latency.max_s >= latency.min_s);
    // 50 samples, below the default threshold for a p99 estimate.
    assert_eq!(latency.p99_s, None);

    let tokens = report.token_stats.unwrap();
    assert_eq!(tokens.total_tokens, 1000);
    assert_eq!(tokens.avg_tokens_per_request, 20);
}

#[tokio::test]
async fn failing_turn_cuts_conversations_short() {
    let config = test_config(4, 4);
    let endpoint = Arc::new(StubEndpoint::failing_on_turn(Duration::from_millis(2), 3));
    let questions = Arc::new(ScriptedQuestions::new());
    let stop_handle = StopHandle::default();

    let report = run_load_test(
        &config,
        test_meta(&config),
        endpoint,
        questions,
        &stop_handle,
        None,
    )
    .await;

    // Each client makes two successful turns and abandons on the failed third; turns four and
    // five are never attempted.
    assert_eq!(report.total_requests, 12);
    assert_eq!(report.successful_requests, 8);
    assert_eq!(report.failed_requests, 4);
    assert_eq!(report.success_rate, Some("66.7%".to_string()));
}

#[tokio::test]
async fn admission_gate_bounds_in_flight_requests() {
    let config = test_config(16, 4);
    let endpoint = Arc::new(StubEndpoint::new(Duration::from_millis(20), None));
    let questions = Arc::new(ScriptedQuestions::new());
    let stop_handle = StopHandle::default();

    let report = run_load_test(
        &config,
        test_meta(&config),
        endpoint.clone(),
        questions,
        &stop_handle,
        None,
    )
    .await;

    assert_eq!(report.successful_requests, 16 * config.turns_per_conversation);
    assert!(
        endpoint.max_in_flight() <= 4,
        "saw {} requests in flight with a gate of 4",
        endpoint.max_in_flight()
    );
}

#[tokio::test]
async fn prompt_sets_are_deterministic_per_client() {
    let run_once = || async {
        let config = RunConfig {
            clients: 5,
            max_concurrent: 5,
            strategy: parley_questions::Strategy::Mathematical,
            think_time_ms: 1,
            ..Default::default()
        };
        let endpoint = Arc::new(StubEndpoint::new(Duration::from_millis(1), None));
        let questions = Arc::new(GeneratedQuestions);
        let stop_handle = StopHandle::default();

        run_load_test(
            &config,
            test_meta(&config),
            endpoint.clone(),
            questions,
            &stop_handle,
            None,
        )
        .await;

        let mut prompts = endpoint.prompts_seen();
        prompts.sort();
        (prompts, endpoint.first_prompts())
    };

    let (first_prompts_sorted, first_openers) = run_once().await;
    let (second_prompts_sorted, _) = run_once().await;

    assert_eq!(first_prompts_sorted.len(), 25);
    // Seeds derive from the client index alone, so two runs with the same shape generate the
    // same per-client prompt sets.
    assert_eq!(first_prompts_sorted, second_prompts_sorted);

    // Within one run no two clients share a seed, so their opening prompts differ.
    let mut openers = first_openers;
    openers.sort();
    openers.dedup();
    assert_eq!(openers.len(), 5);
}

#[tokio::test]
async fn generation_failure_only_affects_its_own_client() {
    let config = test_config(3, 3);
    let endpoint = Arc::new(StubEndpoint::new(Duration::from_millis(1), None));
    // Client 0 has seed 0; its question generation fails and it records no turns.
    let questions = Arc::new(ScriptedQuestions {
        fail_for_seed: Some(0),
    });
    let stop_handle = StopHandle::default();

    let report = run_load_test(
        &config,
        test_meta(&config),
        endpoint,
        questions,
        &stop_handle,
        None,
    )
    .await;

    assert_eq!(report.total_clients, 3);
    assert_eq!(report.total_requests, 2 * config.turns_per_conversation);
    assert_eq!(report.failed_requests, 0);
}

#[tokio::test]
async fn stop_signal_cancels_conversations_in_flight() {
    let config = test_config(6, 3);
    let endpoint = Arc::new(StubEndpoint::new(Duration::from_secs(30), None));
    let questions = Arc::new(ScriptedQuestions::new());
    let stop_handle = StopHandle::default();

    {
        let stop_handle = stop_handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            stop_handle.stop();
        });
    }

    let report = run_load_test(
        &config,
        test_meta(&config),
        endpoint,
        questions,
        &stop_handle,
        None,
    )
    .await;

    // Every client fails its first exchange with a cancellation and abandons.
    assert_eq!(report.total_requests, 6);
    assert_eq!(report.failed_requests, 6);
    assert_eq!(report.successful_requests, 0);
    assert!(report.is_no_data());
    assert_eq!(report.success_rate, None);
    assert!(report.latency_stats.is_none());
}
