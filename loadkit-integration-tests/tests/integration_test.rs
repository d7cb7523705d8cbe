use loadkit_report::writer::WriteMode;
use loadkit_report::{aggregate, sample, summary, writer};
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

fn ndjson_fixture(lines: &[&str]) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    for l in lines {
        writeln!(f, "{l}").unwrap();
    }
    f
}

/// Full pipeline over the two-sample acceptance input: the summary for
/// endpoint A must report min=100, max=200, avg=150, median=200.
#[test]
fn test_two_sample_pipeline() {
    let input = ndjson_fixture(&[
        r#"{"metric":"http_req_duration","data":{"value":100,"tags":{"endpoint":"A"}}}"#,
        r#"{"metric":"http_req_duration","data":{"value":200,"tags":{"endpoint":"A"}}}"#,
    ]);

    let scan = sample::read_samples(input.path()).unwrap();
    assert_eq!(scan.samples.len(), 2);
    assert_eq!(scan.skipped, 0);

    let buckets = aggregate::aggregate(scan.samples);
    let summaries = summary::summarize(&buckets);
    assert_eq!(summaries.len(), 1);

    let s = &summaries[0];
    assert_eq!(s.endpoint, "A");
    assert_eq!(s.total_requests, 2);
    assert_eq!(s.min_ms, 100.0);
    assert_eq!(s.max_ms, 200.0);
    assert_eq!(s.avg_ms, 150.0);
    assert_eq!(s.median_ms, 200.0);
}

#[test]
fn test_pipeline_to_csv_and_json() {
    let input = ndjson_fixture(&[
        r#"{"metric":"http_req_duration","type":"Point","data":{"time":"2026-08-06T10:00:00Z","value":120.5,"tags":{"endpoint":"Apps"}}}"#,
        r#"{"metric":"http_req_duration","type":"Point","data":{"time":"2026-08-06T10:00:01Z","value":80.5,"tags":{"endpoint":"Apps"}}}"#,
        r#"{"metric":"checks","type":"Point","data":{"time":"2026-08-06T10:00:01Z","value":1,"tags":{"check":"Apps - status is 200"}}}"#,
        r#"{"metric":"data_received","type":"Point","data":{"time":"2026-08-06T10:00:01Z","value":4096,"tags":{"endpoint":"Apps"}}}"#,
        "this line is garbage",
    ]);
    let dir = tempdir().unwrap();

    let scan = sample::read_samples(input.path()).unwrap();
    assert_eq!(scan.skipped, 1);

    let buckets = aggregate::aggregate(scan.samples);
    let summaries = summary::summarize(&buckets);

    // the check sample resolves to "Apps" through its check-name prefix,
    // so everything lands in one bucket
    assert_eq!(summaries.len(), 1);
    let s = &summaries[0];
    assert_eq!(s.endpoint, "Apps");
    assert_eq!(s.success_rate_percent, 100.0);
    assert_eq!(s.bytes_received, 4096);

    let csv_path = dir.path().join("report.csv");
    writer::write_report(&csv_path, &summaries, WriteMode::Create).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("\"Endpoint\",\"Date/Time\","));
    assert!(lines[1].starts_with("\"Apps\",\"2026-08-06 10:00:00\","));

    let json_path = dir.path().join("report.json");
    writer::write_json(&json_path, &summaries).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value[0]["endpoint"], "Apps");
    assert_eq!(value[0]["bytes_received"], 4096);
}

/// Run-over-run trend tracking: two pipeline invocations appending to the
/// same file keep one header and separate the runs with a blank line.
#[test]
fn test_trend_append_across_runs() {
    let dir = tempdir().unwrap();
    let trend = dir.path().join("trend.csv");

    for value in [100, 300] {
        let line = format!(
            r#"{{"metric":"http_req_duration","data":{{"value":{value},"tags":{{"endpoint":"A"}}}}}}"#
        );
        let input = ndjson_fixture(&[&line]);
        let scan = sample::read_samples(input.path()).unwrap();
        let buckets = aggregate::aggregate(scan.samples);
        let summaries = summary::summarize(&buckets);
        writer::write_report(&trend, &summaries, WriteMode::Append).unwrap();
    }

    let content = std::fs::read_to_string(&trend).unwrap();
    assert_eq!(content.matches("\"Endpoint\"").count(), 1);

    let blocks: Vec<&str> = content.split("\n\n").collect();
    assert_eq!(blocks.len(), 2, "runs must be separated by one blank line");
    assert!(blocks[0].contains("\"100.00\""));
    assert!(blocks[1].contains("\"300.00\""));
}

/// An input with no parsable samples still produces a header-only report.
#[test]
fn test_empty_input_writes_header_only_report() {
    let input = ndjson_fixture(&["garbage", "more garbage"]);
    let dir = tempdir().unwrap();

    let scan = sample::read_samples(input.path()).unwrap();
    assert_eq!(scan.skipped, 2);
    let buckets = aggregate::aggregate(scan.samples);
    assert!(buckets.is_empty());

    let summaries = summary::summarize(&buckets);
    let csv_path = dir.path().join("report.csv");
    writer::write_report(&csv_path, &summaries, WriteMode::Create).unwrap();

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 1);
    assert!(csv.starts_with("\"Endpoint\""));
}
