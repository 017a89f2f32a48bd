use std::time::Duration;

use itertools::Itertools;
use parley_summary_model::{LatencyStats, LoadTestReport, RunMeta, TokenStats};

use crate::ConversationOutcome;

/// Minimum number of successful requests before a p99 estimate is reported.
///
/// Tail percentiles over small samples are noise; below this many successes the report marks p99
/// as not applicable. Runs that need a different guard can pass their own value to [aggregate].
pub const DEFAULT_P99_MIN_SAMPLES: usize = 100;

/// Reduce the collected outcomes of a run into the final report.
///
/// Pure and deterministic: no I/O, no clock reads, everything derives from the arguments. The raw
/// outcome collection is input-only and can be dropped by the caller afterwards.
pub fn aggregate(
    outcomes: &[ConversationOutcome],
    duration: Duration,
    meta: RunMeta,
    p99_min_samples: usize,
) -> LoadTestReport {
    let turns = outcomes.iter().flat_map(|outcome| outcome.turns());
    let (successful, failed): (Vec<_>, Vec<_>) = turns.partition(|turn| turn.is_success());

    let total_requests = successful.len() + failed.len();
    let duration_seconds = duration.as_secs_f64();

    if successful.is_empty() {
        return LoadTestReport {
            meta,
            duration_seconds,
            total_clients: outcomes.len(),
            total_requests,
            successful_requests: 0,
            failed_requests: failed.len(),
            success_rate: None,
            throughput_rps: None,
            latency_stats: None,
            token_stats: None,
            error: Some("No successful requests".to_string()),
        };
    }

    let latencies: Vec<f64> = successful
        .iter()
        .map(|turn| turn.latency().as_secs_f64())
        .sorted_by(f64::total_cmp)
        .collect();

    let latency_stats = latency_stats(&latencies, p99_min_samples);
    let token_stats = token_stats(&successful);

    let success_rate = successful.len() as f64 / total_requests as f64 * 100.0;
    let throughput_rps =
        (duration_seconds > 0.0).then(|| total_requests as f64 / duration_seconds);

    LoadTestReport {
        meta,
        duration_seconds,
        total_clients: outcomes.len(),
        total_requests,
        successful_requests: successful.len(),
        failed_requests: failed.len(),
        success_rate: Some(format!("{:.1}%", success_rate)),
        throughput_rps,
        latency_stats: Some(latency_stats),
        token_stats,
        error: None,
    }
}

/// Nearest-rank percentile: the element at index `floor(p * n)` of the ascending list.
///
/// No interpolation, matching standard nearest-rank estimation. The index is clamped to the last
/// element to guard against `p * n` landing exactly on `n` through floating point rounding.
fn nearest_rank(sorted: &[f64], percentile: f64) -> f64 {
    let index = ((percentile * sorted.len() as f64) as usize).min(sorted.len() - 1);
    sorted[index]
}

fn latency_stats(sorted: &[f64], p99_min_samples: usize) -> LatencyStats {
    // Callers guarantee at least one sample.
    let min_s = sorted[0];
    let max_s = sorted[sorted.len() - 1];
    let avg_s = sorted.iter().sum::<f64>() / sorted.len() as f64;

    LatencyStats {
        min_s,
        max_s,
        avg_s,
        p50_s: nearest_rank(sorted, 0.50),
        p95_s: nearest_rank(sorted, 0.95),
        p99_s: (sorted.len() > p99_min_samples).then(|| nearest_rank(sorted, 0.99)),
    }
}

fn token_stats(successful: &[&crate::Turn]) -> Option<TokenStats> {
    if !successful.iter().any(|turn| turn.total_tokens().is_some()) {
        return None;
    }

    let total_tokens: u64 = successful.iter().filter_map(|turn| turn.total_tokens()).sum();

    Some(TokenStats {
        total_tokens,
        avg_tokens_per_request: total_tokens / successful.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn meta() -> RunMeta {
        RunMeta::new("test", 1, 1, "mixed", 5)
    }

    fn outcome_with_latencies(client_id: usize, latencies_s: &[f64]) -> ConversationOutcome {
        let mut outcome = ConversationOutcome::new(client_id);
        for latency in latencies_s {
            outcome.record_success(Duration::from_secs_f64(*latency), None);
        }
        outcome
    }

    #[test]
    fn p50_uses_nearest_rank() {
        let outcome = outcome_with_latencies(0, &[0.1, 0.2, 0.3, 0.4, 0.5]);

        let report = aggregate(
            &[outcome],
            Duration::from_secs(1),
            meta(),
            DEFAULT_P99_MIN_SAMPLES,
        );

        // floor(0.5 * 5) = 2 into the sorted list.
        let stats = report.latency_stats.unwrap();
        assert_eq!(stats.p50_s, 0.3);
        assert_eq!(stats.min_s, 0.1);
        assert_eq!(stats.max_s, 0.5);
        assert!((stats.avg_s - 0.3).abs() < 1e-9);
    }

    #[test]
    fn latencies_are_sorted_before_ranking() {
        let outcome = outcome_with_latencies(0, &[0.5, 0.1, 0.4, 0.2, 0.3]);

        let report = aggregate(
            &[outcome],
            Duration::from_secs(1),
            meta(),
            DEFAULT_P99_MIN_SAMPLES,
        );

        assert_eq!(report.latency_stats.unwrap().p50_s, 0.3);
    }

    #[test]
    fn p99_needs_more_samples_than_the_guard() {
        let at_guard = outcome_with_latencies(0, &vec![0.1; 100]);
        let report = aggregate(
            &[at_guard],
            Duration::from_secs(1),
            meta(),
            DEFAULT_P99_MIN_SAMPLES,
        );
        assert_eq!(report.latency_stats.unwrap().p99_s, None);

        let over_guard = outcome_with_latencies(0, &vec![0.1; 101]);
        let report = aggregate(
            &[over_guard],
            Duration::from_secs(1),
            meta(),
            DEFAULT_P99_MIN_SAMPLES,
        );
        assert_eq!(report.latency_stats.unwrap().p99_s, Some(0.1));
    }

    #[test]
    fn p99_guard_is_configurable() {
        let outcome = outcome_with_latencies(0, &[0.1, 0.2, 0.3, 0.4, 0.5]);

        let report = aggregate(&[outcome], Duration::from_secs(1), meta(), 3);

        // floor(0.99 * 5) = 4 into the sorted list.
        assert_eq!(report.latency_stats.unwrap().p99_s, Some(0.5));
    }

    #[test]
    fn counts_are_conserved() {
        let mut first = ConversationOutcome::new(0);
        first.record_success(Duration::from_millis(100), Some(20));
        first.record_success(Duration::from_millis(100), Some(20));

        let mut second = ConversationOutcome::new(1);
        second.record_success(Duration::from_millis(100), Some(20));
        second.record_failure(Duration::from_millis(10), "Status 500".to_string());

        let report = aggregate(
            &[first, second],
            Duration::from_secs(2),
            meta(),
            DEFAULT_P99_MIN_SAMPLES,
        );

        assert_eq!(report.total_requests, 4);
        assert_eq!(report.successful_requests + report.failed_requests, 4);
        assert_eq!(report.total_clients, 2);
        assert_eq!(report.success_rate, Some("75.0%".to_string()));
        assert_eq!(report.throughput_rps, Some(2.0));
    }

    #[test]
    fn no_successes_yields_explicit_no_data_report() {
        let mut outcome = ConversationOutcome::new(0);
        outcome.record_failure(Duration::from_millis(10), "Status 503".to_string());

        let report = aggregate(
            &[outcome],
            Duration::from_secs(1),
            meta(),
            DEFAULT_P99_MIN_SAMPLES,
        );

        assert!(report.is_no_data());
        assert_eq!(report.failed_requests, 1);
        assert_eq!(report.successful_requests, 0);
        assert_eq!(report.latency_stats, None);
        assert_eq!(report.token_stats, None);
        assert_eq!(report.throughput_rps, None);
    }

    #[test]
    fn token_stats_require_at_least_one_token_count() {
        let outcome = outcome_with_latencies(0, &[0.1, 0.2]);
        let report = aggregate(
            &[outcome],
            Duration::from_secs(1),
            meta(),
            DEFAULT_P99_MIN_SAMPLES,
        );
        assert_eq!(report.token_stats, None);

        let mut outcome = ConversationOutcome::new(0);
        outcome.record_success(Duration::from_millis(100), Some(30));
        outcome.record_success(Duration::from_millis(100), None);
        let report = aggregate(
            &[outcome],
            Duration::from_secs(1),
            meta(),
            DEFAULT_P99_MIN_SAMPLES,
        );

        // The average divides across all successful requests, not only token-bearing ones.
        let tokens = report.token_stats.unwrap();
        assert_eq!(tokens.total_tokens, 30);
        assert_eq!(tokens.avg_tokens_per_request, 15);
    }
}
