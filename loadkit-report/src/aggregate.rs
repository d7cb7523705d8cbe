use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::endpoint;
use crate::sample::Sample;

/// Accumulator for one request timing phase. Only the average is reported,
/// so the raw sequence is not retained.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PhaseAccum {
    pub sum_ms: f64,
    pub count: u64,
}

impl PhaseAccum {
    fn record(&mut self, value: f64) {
        self.sum_ms += value;
        self.count += 1;
    }

    /// Average in milliseconds; 0.0 before any samples.
    pub fn avg_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum_ms / self.count as f64
        }
    }
}

/// Per-endpoint accumulation over one aggregation pass.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EndpointBucket {
    /// One entry per completed request, in input order (unsorted).
    pub durations_ms: Vec<f64>,
    /// Value of the `http_reqs` counter metric; 0 when the input omits it.
    pub requests: u64,
    pub checks_passed: u64,
    pub checks_failed: u64,
    pub blocked: PhaseAccum,
    pub connecting: PhaseAccum,
    pub sending: PhaseAccum,
    pub waiting: PhaseAccum,
    pub receiving: PhaseAccum,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    /// Requests observed per wall-clock second, for the peak-RPS column.
    pub per_second: BTreeMap<i64, u64>,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
}

impl EndpointBucket {
    fn observe_time(&mut self, time: Option<DateTime<Utc>>) {
        let Some(t) = time else { return };
        if self.first_seen.map_or(true, |f| t < f) {
            self.first_seen = Some(t);
        }
        if self.last_seen.map_or(true, |l| t > l) {
            self.last_seen = Some(t);
        }
    }
}

/// Route every sample into a bucket keyed by its resolved endpoint.
///
/// Single pass, single thread; deterministic given input order. The map is
/// a `BTreeMap` so report rows come out in a stable endpoint order.
pub fn aggregate(samples: impl IntoIterator<Item = Sample>) -> BTreeMap<String, EndpointBucket> {
    let mut buckets: BTreeMap<String, EndpointBucket> = BTreeMap::new();

    for sample in samples {
        let key = endpoint::resolve(&sample);
        let bucket = buckets.entry(key).or_default();
        bucket.observe_time(sample.time);

        match sample.metric.as_str() {
            "http_reqs" => bucket.requests += sample.value as u64,
            "http_req_duration" => {
                bucket.durations_ms.push(sample.value);
                if let Some(t) = sample.time {
                    *bucket.per_second.entry(t.timestamp()).or_insert(0) += 1;
                }
            }
            "checks" => {
                if sample.value >= 1.0 {
                    bucket.checks_passed += 1;
                } else {
                    bucket.checks_failed += 1;
                }
            }
            "http_req_blocked" => bucket.blocked.record(sample.value),
            "http_req_connecting" => bucket.connecting.record(sample.value),
            "http_req_sending" => bucket.sending.record(sample.value),
            "http_req_waiting" => bucket.waiting.record(sample.value),
            "http_req_receiving" => bucket.receiving.record(sample.value),
            "data_sent" => bucket.bytes_sent += sample.value as u64,
            "data_received" => bucket.bytes_received += sample.value as u64,
            // metrics outside the report (iterations, vus, ...) are ignored
            _ => {}
        }
    }

    buckets
}

/// Failed-check fraction across all buckets; 0.0 when no checks were
/// recorded at all (never a NaN from 0/0).
pub fn overall_error_rate(buckets: &BTreeMap<String, EndpointBucket>) -> f64 {
    let failed: u64 = buckets.values().map(|b| b.checks_failed).sum();
    let total: u64 = buckets.values().map(|b| b.checks_passed + b.checks_failed).sum();
    if total == 0 {
        0.0
    } else {
        failed as f64 / total as f64
    }
}
