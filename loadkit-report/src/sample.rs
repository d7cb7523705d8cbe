use chrono::{DateTime, Utc};
use loadkit_common::{LoadKitError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// One measurement emitted by the load tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub metric: String,
    pub value: f64,
    /// Wall-clock time of the measurement, when the input carried one.
    pub time: Option<DateTime<Utc>>,
    pub tags: HashMap<String, String>,
}

/// Raw shape of one NDJSON line as k6 writes it.
#[derive(Deserialize)]
struct RawLine {
    metric: String,
    /// `"Metric"` for declaration lines, `"Point"` for measurements.
    /// The field is optional; lines without it are treated as points.
    #[serde(rename = "type")]
    kind: Option<String>,
    data: RawData,
}

#[derive(Deserialize)]
struct RawData {
    value: Option<f64>,
    time: Option<DateTime<Utc>>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

/// Streaming reader over a newline-delimited JSON metrics file.
///
/// Malformed lines are never fatal: each one is dropped and counted, and
/// the count is available from [`SampleReader::skipped`] once the iterator
/// is exhausted. Metric declaration lines (`"type": "Metric"`) and records
/// without a numeric value are filtered without counting as skipped.
pub struct SampleReader {
    lines: Lines<BufReader<File>>,
    skipped: usize,
}

impl SampleReader {
    /// Open `path` for streaming. Fails only when the file cannot be
    /// opened; individual lines are handled during iteration.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| LoadKitError::io(path, &e))?;
        Ok(SampleReader {
            lines: BufReader::new(file).lines(),
            skipped: 0,
        })
    }

    /// Lines dropped so far because they could not be read or parsed.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for SampleReader {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        loop {
            let line = match self.lines.next()? {
                Ok(l) => l,
                Err(_) => {
                    self.skipped += 1;
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<RawLine>(&line) {
                Ok(raw) => {
                    if let Some(sample) = to_sample(raw) {
                        return Some(sample);
                    }
                    // declaration line or value-less record: filtered, not skipped
                }
                Err(_) => self.skipped += 1,
            }
        }
    }
}

fn to_sample(raw: RawLine) -> Option<Sample> {
    if raw.kind.as_deref() == Some("Metric") {
        return None;
    }
    let value = raw.data.value?;
    Some(Sample {
        metric: raw.metric,
        value,
        time: raw.data.time,
        tags: raw.data.tags,
    })
}

/// Result of one eager pass over a metrics file.
#[derive(Debug)]
pub struct SampleScan {
    pub samples: Vec<Sample>,
    /// Count of malformed lines dropped during the pass.
    pub skipped: usize,
}

/// Read the whole file in one pass.
pub fn read_samples(path: &Path) -> Result<SampleScan> {
    let mut reader = SampleReader::open(path)?;
    let samples: Vec<Sample> = reader.by_ref().collect();
    Ok(SampleScan {
        samples,
        skipped: reader.skipped(),
    })
}
