use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};
use uuid::Uuid;

use loadkit_report::summary::EndpointSummary;
use loadkit_report::writer::WriteMode;
use loadkit_report::{aggregate, sample, summary, writer};
use loadkit_runner::k6;
use loadkit_runner::probe;
use loadkit_runner::scenario::{Route, ScenarioProfile};

/// Exit codes: 0 success, 1 threshold exceeded or k6 reported failure,
/// 2 I/O failure, 3 setup failure (target never ready, k6 missing).
#[derive(Parser)]
#[command(
    name = "loadkit-run",
    about = "Run a k6 scenario against a target and report per-endpoint statistics"
)]
struct Args {
    /// Base URL of the system under test
    #[arg(long, env = "LOADKIT_BASE_URL")]
    base_url: String,

    /// Scenario profile: smoke | load | stress | spike
    #[arg(long, default_value = "load")]
    scenario: String,

    /// Total run duration (seconds)
    #[arg(long, default_value_t = 60)]
    duration: u64,

    /// Baseline virtual users (profiles scale from this)
    #[arg(long, default_value_t = 10)]
    vus: u32,

    /// Routes to exercise, as NAME=/path (repeatable)
    #[arg(long = "route", default_value = "Home=/")]
    routes: Vec<String>,

    /// Directory run artifacts are written into
    #[arg(long, default_value = "results")]
    out_dir: PathBuf,

    /// Also append this run to <out-dir>/trend.csv for run-over-run tracking
    #[arg(long)]
    append: bool,

    /// Stream metrics to this InfluxDB URL as well
    #[arg(long, env = "LOADKIT_INFLUX_URL")]
    influx_url: Option<String>,

    /// k6 binary to invoke
    #[arg(long, env = "K6_BIN", default_value = "k6")]
    k6_bin: PathBuf,

    /// Skip the pre-run target readiness probe
    #[arg(long)]
    no_probe: bool,

    /// Fail the run if the failed-check rate exceeds this fraction
    #[arg(long, default_value_t = 0.01)]
    max_error_rate: f64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let profile = ScenarioProfile::from_name(&args.scenario).unwrap_or_else(|| {
        eprintln!(
            "Unknown scenario {:?}. Valid values: smoke, load, stress, spike",
            args.scenario
        );
        process::exit(3);
    });

    let routes: Vec<Route> = args
        .routes
        .iter()
        .map(|spec| {
            Route::parse(spec).unwrap_or_else(|| {
                eprintln!("Invalid route {spec:?}. Expected NAME=/path");
                process::exit(3);
            })
        })
        .collect();

    if !args.no_probe {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + probe::READY_TIMEOUT;
        if let Err(e) = probe::poll_until_ready(&client, &args.base_url, deadline).await {
            eprintln!("Target not ready: {e}");
            process::exit(3);
        }
    }

    if let Err(e) = std::fs::create_dir_all(&args.out_dir) {
        eprintln!("Failed to create {}: {e}", args.out_dir.display());
        process::exit(2);
    }

    let run_id = Uuid::new_v4();
    let raw_path = args.out_dir.join(format!("raw-{run_id}.json"));

    let script = profile.render_script(&args.base_url, &routes, args.vus, args.duration);
    let mut k6_proc = k6::spawn(
        &args.k6_bin,
        &script,
        &raw_path,
        args.influx_url.as_deref(),
    )
    .unwrap_or_else(|e| {
        eprintln!("Failed to start k6: {e}");
        process::exit(3);
    });

    print!("Running {}s {} scenario ", args.duration, profile.as_name());
    std::io::stdout().flush().ok();

    let dot_handle = tokio::spawn(async {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.tick().await; // consume the immediate first tick
        loop {
            interval.tick().await;
            print!(".");
            std::io::stdout().flush().ok();
        }
    });

    let status = k6_proc.wait().unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(3);
    });

    dot_handle.abort();
    println!();

    drop(k6_proc);

    let scan = sample::read_samples(&raw_path).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(2);
    });
    if scan.skipped > 0 {
        eprintln!("Warning: skipped {} malformed line(s)", scan.skipped);
    }

    let buckets = aggregate::aggregate(scan.samples);
    if buckets.is_empty() {
        eprintln!("Warning: {}", loadkit_common::LoadKitError::EmptyInput);
    }
    let error_rate = aggregate::overall_error_rate(&buckets);
    let summaries = summary::summarize(&buckets);

    let csv_path = args.out_dir.join(format!("report-{run_id}.csv"));
    if let Err(e) = writer::write_report(&csv_path, &summaries, WriteMode::Create) {
        eprintln!("{e}");
        process::exit(2);
    }
    let json_path = args.out_dir.join(format!("report-{run_id}.json"));
    if let Err(e) = writer::write_json(&json_path, &summaries) {
        eprintln!("{e}");
        process::exit(2);
    }
    if args.append {
        let trend_path = args.out_dir.join("trend.csv");
        if let Err(e) = writer::write_report(&trend_path, &summaries, WriteMode::Append) {
            eprintln!("{e}");
            process::exit(2);
        }
    }

    print_report(&args, run_id, profile, &summaries, error_rate, status.success());

    let error_rate_exceeded = error_rate > args.max_error_rate;
    let exit_code = if !status.success() || error_rate_exceeded { 1 } else { 0 };
    process::exit(exit_code);
}

fn print_report(
    args: &Args,
    run_id: Uuid,
    profile: ScenarioProfile,
    summaries: &[EndpointSummary],
    error_rate: f64,
    k6_ok: bool,
) {
    let error_rate_exceeded = error_rate > args.max_error_rate;
    let overall_pass = k6_ok && !error_rate_exceeded;
    let pass_fail = |exceeded: bool| if exceeded { "✗" } else { "✓" };

    let total_requests: u64 = summaries.iter().map(|s| s.total_requests).sum();

    println!("LoadKit Run Results");
    println!("===================");
    println!("Run ID:                {run_id}");
    println!("Scenario:              {}", profile.as_name());
    println!("Duration:              {:.1} s", args.duration as f64);
    println!("Target:                {}", args.base_url);
    println!();
    println!("Requests:              {}", format_thousands(total_requests));
    for s in summaries {
        println!(
            "  {:<20} {:>8} reqs   p95 {:>8.1} ms   p99 {:>8.1} ms",
            s.endpoint, s.total_requests, s.p95_ms, s.p99_ms
        );
    }
    println!();
    println!(
        "Error rate:            {:.3}%    [threshold: {:.3}%]  {}",
        error_rate * 100.0,
        args.max_error_rate * 100.0,
        pass_fail(error_rate_exceeded),
    );
    println!(
        "k6 exit:               {}",
        pass_fail(!k6_ok),
    );
    println!();
    println!("Result: {}", if overall_pass { "PASS" } else { "FAIL" });
}

fn format_thousands(n: u64) -> String {
    if n >= 1_000_000 {
        format!("~{}M", n / 1_000_000)
    } else if n >= 1_000 {
        format!("~{}K", n / 1_000)
    } else {
        n.to_string()
    }
}
