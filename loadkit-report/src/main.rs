use clap::Parser;
use loadkit_common::LoadKitError;
use std::path::PathBuf;
use std::process;

use loadkit_report::writer::WriteMode;
use loadkit_report::{aggregate, sample, summary, writer};

/// Exit codes: 0 success (including an empty report), 1 I/O failure.
/// Usage errors exit with clap's own code.
#[derive(Parser)]
#[command(
    name = "loadkit-report",
    about = "Summarize a k6 NDJSON metrics file into per-endpoint CSV/JSON reports"
)]
struct Args {
    /// Path to the k6 NDJSON output file
    input: PathBuf,

    /// Directory the reports are written into
    #[arg(default_value = ".")]
    out_dir: PathBuf,

    /// Append to an existing report instead of overwriting it
    #[arg(long)]
    append: bool,

    /// Also write the summaries as report.json
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    let scan = sample::read_samples(&args.input).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });
    if scan.skipped > 0 {
        eprintln!("Warning: skipped {} malformed line(s)", scan.skipped);
    }

    let buckets = aggregate::aggregate(scan.samples);
    if buckets.is_empty() {
        // still writes the header-only report below
        eprintln!("Warning: {}", LoadKitError::EmptyInput);
    }
    let summaries = summary::summarize(&buckets);

    let csv_path = args.out_dir.join("report.csv");
    let mode = if args.append { WriteMode::Append } else { WriteMode::Create };
    writer::write_report(&csv_path, &summaries, mode).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    if args.json {
        let json_path = args.out_dir.join("report.json");
        writer::write_json(&json_path, &summaries).unwrap_or_else(|e| {
            eprintln!("{e}");
            process::exit(1);
        });
    }

    println!(
        "Wrote {} endpoint row(s) to {}",
        summaries.len(),
        csv_path.display()
    );
}
