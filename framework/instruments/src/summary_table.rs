use parley_summary_model::LoadTestReport;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct TotalsRow {
    clients: usize,
    requests: usize,
    successful: usize,
    failed: usize,
    success_rate: String,
    #[tabled(display = "float2")]
    throughput_rps: f64,
    #[tabled(display = "float2")]
    duration_s: f64,
}

#[derive(Tabled)]
struct LatencyRow {
    #[tabled(display = "float3")]
    min_s: f64,
    #[tabled(display = "float3")]
    p50_s: f64,
    #[tabled(display = "float3")]
    p95_s: f64,
    p99_s: String,
    #[tabled(display = "float3")]
    max_s: f64,
    #[tabled(display = "float3")]
    avg_s: f64,
}

fn float2(n: &f64) -> String {
    format!("{:.2}", n)
}

fn float3(n: &f64) -> String {
    format!("{:.3}", n)
}

/// Print the end-of-run console summary.
pub fn print_report_summary(report: &LoadTestReport) {
    println!("\nLoad test summary for run {}", report.meta.run_id);

    if let Some(error) = &report.error {
        println!(
            "{}: {} failed requests in {:.2}s",
            error, report.failed_requests, report.duration_seconds
        );
        return;
    }

    let totals = TotalsRow {
        clients: report.total_clients,
        requests: report.total_requests,
        successful: report.successful_requests,
        failed: report.failed_requests,
        success_rate: report.success_rate.clone().unwrap_or_default(),
        throughput_rps: report.throughput_rps.unwrap_or_default(),
        duration_s: report.duration_seconds,
    };

    let mut table = Table::new([totals]);
    table.with(Style::modern());
    println!("{table}");

    if let Some(stats) = &report.latency_stats {
        let latency = LatencyRow {
            min_s: stats.min_s,
            p50_s: stats.p50_s,
            p95_s: stats.p95_s,
            p99_s: stats
                .p99_s
                .map(|p99| format!("{:.3}", p99))
                .unwrap_or_else(|| "N/A".to_string()),
            max_s: stats.max_s,
            avg_s: stats.avg_s,
        };

        let mut table = Table::new([latency]);
        table.with(Style::modern());
        println!("{table}");
    }

    if let Some(tokens) = &report.token_stats {
        println!(
            "Tokens: {} total, {} per successful request",
            tokens.total_tokens, tokens.avg_tokens_per_request
        );
    }
}
