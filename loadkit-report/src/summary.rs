use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::aggregate::EndpointBucket;
use crate::stats::{self, Stats};

/// Immutable per-endpoint snapshot derived from a finalized bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointSummary {
    pub endpoint: String,
    /// Wall-clock time of the endpoint's first sample, when the input
    /// carried timestamps.
    pub started_at: Option<DateTime<Utc>>,
    pub total_requests: u64,
    pub success_rate_percent: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub avg_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub avg_blocked_ms: f64,
    pub avg_connecting_ms: f64,
    pub avg_sending_ms: f64,
    pub avg_waiting_ms: f64,
    pub avg_receiving_ms: f64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub requests_per_second: f64,
    pub peak_rps: u64,
}

impl EndpointSummary {
    /// Compute the snapshot for one bucket. The bucket is not consumed, but
    /// nothing mutates a summary after this returns.
    pub fn from_bucket(endpoint: &str, bucket: &EndpointBucket) -> EndpointSummary {
        let mut durations = bucket.durations_ms.clone();
        stats::sort_ascending(&mut durations);
        let s = Stats::from_sorted(&durations);

        let total_requests = if bucket.requests > 0 {
            bucket.requests
        } else {
            // the counter metric is absent from some inputs; every duration
            // sample still represents exactly one completed request
            bucket.durations_ms.len() as u64
        };

        let checks_total = bucket.checks_passed + bucket.checks_failed;
        // 0.0 when no checks were recorded, never a NaN from 0/0
        let success_rate_percent = if checks_total == 0 {
            0.0
        } else {
            bucket.checks_passed as f64 / checks_total as f64 * 100.0
        };

        // span is clamped to one second so a short burst does not inflate
        // the requests/sec column
        let span_secs = match (bucket.first_seen, bucket.last_seen) {
            (Some(first), Some(last)) => {
                ((last - first).num_milliseconds() as f64 / 1000.0).max(1.0)
            }
            _ => 1.0,
        };

        EndpointSummary {
            endpoint: endpoint.to_string(),
            started_at: bucket.first_seen,
            total_requests,
            success_rate_percent,
            min_ms: s.min,
            max_ms: s.max,
            avg_ms: s.avg,
            median_ms: s.median,
            p95_ms: stats::percentile(&durations, 95.0),
            p99_ms: stats::percentile(&durations, 99.0),
            avg_blocked_ms: bucket.blocked.avg_ms(),
            avg_connecting_ms: bucket.connecting.avg_ms(),
            avg_sending_ms: bucket.sending.avg_ms(),
            avg_waiting_ms: bucket.waiting.avg_ms(),
            avg_receiving_ms: bucket.receiving.avg_ms(),
            bytes_sent: bucket.bytes_sent,
            bytes_received: bucket.bytes_received,
            requests_per_second: total_requests as f64 / span_secs,
            peak_rps: bucket.per_second.values().copied().max().unwrap_or(0),
        }
    }
}

/// Finalize every bucket, preserving the aggregator's endpoint order.
pub fn summarize(buckets: &BTreeMap<String, EndpointBucket>) -> Vec<EndpointSummary> {
    buckets
        .iter()
        .map(|(name, bucket)| EndpointSummary::from_bucket(name, bucket))
        .collect()
}
