use loadkit_common::{LoadKitError, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::summary::EndpointSummary;

/// Column order is fixed; downstream tooling indexes by position.
pub const CSV_HEADER: [&str; 19] = [
    "Endpoint",
    "Date/Time",
    "Total Requests",
    "Success Rate %",
    "Min Response Time (ms)",
    "Max Response Time (ms)",
    "Avg Response Time (ms)",
    "Median Response Time (ms)",
    "P95 Response Time (ms)",
    "P99 Response Time (ms)",
    "Avg Blocked (ms)",
    "Avg Connecting (ms)",
    "Avg Sending (ms)",
    "Avg Waiting (ms)",
    "Avg Receiving (ms)",
    "Data Sent (bytes)",
    "Data Received (bytes)",
    "Requests/sec",
    "Peak RPS",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Truncate or create the file; header plus one row per endpoint.
    Create,
    /// Keep existing rows, separating runs with one blank line. On a
    /// missing or empty file this behaves exactly like [`WriteMode::Create`];
    /// the header is never written twice.
    Append,
}

/// Write (or extend) the CSV report at `path`.
///
/// The whole run is rendered into one buffer and written with a single
/// call, keeping interleaving coarse if two runs ever race on the same
/// trend file; concurrent runs are otherwise expected to serialize by
/// convention.
pub fn write_report(path: &Path, summaries: &[EndpointSummary], mode: WriteMode) -> Result<()> {
    let prior_len = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    let appending = mode == WriteMode::Append && prior_len > 0;

    let mut out = String::new();
    if appending {
        out.push('\n');
    } else {
        out.push_str(&header_row());
    }
    for summary in summaries {
        out.push_str(&summary_row(summary));
    }

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(appending)
        .truncate(!appending)
        .open(path)
        .map_err(|e| LoadKitError::io(path, &e))?;
    file.write_all(out.as_bytes())
        .map_err(|e| LoadKitError::io(path, &e))
}

/// Write the summaries as a pretty-printed JSON array.
pub fn write_json(path: &Path, summaries: &[EndpointSummary]) -> Result<()> {
    let json = serde_json::to_string_pretty(summaries)
        .map_err(|e| LoadKitError::Io(format!("{}: {}", path.display(), e)))?;
    std::fs::write(path, json).map_err(|e| LoadKitError::io(path, &e))
}

/// The fixed header line, fields double-quoted.
pub fn header_row() -> String {
    render_row(CSV_HEADER.iter().map(|c| c.to_string()))
}

/// One data row for `summary`, fields double-quoted in header order.
pub fn summary_row(summary: &EndpointSummary) -> String {
    let date_time = summary
        .started_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();

    render_row(
        [
            summary.endpoint.clone(),
            date_time,
            summary.total_requests.to_string(),
            format!("{:.2}", summary.success_rate_percent),
            format!("{:.2}", summary.min_ms),
            format!("{:.2}", summary.max_ms),
            format!("{:.2}", summary.avg_ms),
            format!("{:.2}", summary.median_ms),
            format!("{:.2}", summary.p95_ms),
            format!("{:.2}", summary.p99_ms),
            format!("{:.2}", summary.avg_blocked_ms),
            format!("{:.2}", summary.avg_connecting_ms),
            format!("{:.2}", summary.avg_sending_ms),
            format!("{:.2}", summary.avg_waiting_ms),
            format!("{:.2}", summary.avg_receiving_ms),
            summary.bytes_sent.to_string(),
            summary.bytes_received.to_string(),
            format!("{:.2}", summary.requests_per_second),
            summary.peak_rps.to_string(),
        ]
        .into_iter(),
    )
}

fn render_row(fields: impl Iterator<Item = String>) -> String {
    let quoted: Vec<String> = fields.map(|f| quote(&f)).collect();
    format!("{}\n", quoted.join(","))
}

/// Wrap a field in double quotes, doubling any embedded quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
