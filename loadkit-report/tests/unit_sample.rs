use chrono::TimeZone;
use loadkit_common::LoadKitError;
use loadkit_report::sample::{read_samples, SampleReader};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn fixture(lines: &[&str]) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    for l in lines {
        writeln!(f, "{l}").unwrap();
    }
    f
}

#[test]
fn test_valid_and_malformed_counts() {
    // 3 valid points, 2 malformed lines
    let f = fixture(&[
        r#"{"metric":"http_req_duration","type":"Point","data":{"time":"2026-08-06T10:00:00Z","value":123.4,"tags":{"endpoint":"Apps"}}}"#,
        "not json at all",
        r#"{"metric":"http_reqs","data":{"value":1}}"#,
        r#"{"metric":}"#,
        r#"{"metric":"checks","data":{"value":0,"tags":{"check":"Apps - status is 200"}}}"#,
    ]);
    let scan = read_samples(f.path()).unwrap();
    assert_eq!(scan.samples.len(), 3);
    assert_eq!(scan.skipped, 2);
}

#[test]
fn test_parsed_sample_fields() {
    let f = fixture(&[
        r#"{"metric":"http_req_duration","type":"Point","data":{"time":"2026-08-06T10:00:00Z","value":123.4,"tags":{"endpoint":"Apps"}}}"#,
    ]);
    let scan = read_samples(f.path()).unwrap();
    let s = &scan.samples[0];
    assert_eq!(s.metric, "http_req_duration");
    assert_eq!(s.value, 123.4);
    assert_eq!(s.tags.get("endpoint").map(String::as_str), Some("Apps"));
    let t = s.time.expect("time should parse");
    assert_eq!(t, chrono::Utc.with_ymd_and_hms(2026, 8, 6, 10, 0, 0).unwrap());
}

#[test]
fn test_metric_declarations_filtered_without_counting() {
    // the declaration line is valid JSON, so it is neither a sample nor a skip
    let f = fixture(&[
        r#"{"metric":"http_req_duration","type":"Metric","data":{"type":"trend","contains":"time"}}"#,
        r#"{"metric":"http_req_duration","data":{"value":10.0}}"#,
    ]);
    let scan = read_samples(f.path()).unwrap();
    assert_eq!(scan.samples.len(), 1);
    assert_eq!(scan.skipped, 0);
}

#[test]
fn test_value_less_point_filtered() {
    let f = fixture(&[r#"{"metric":"http_reqs","data":{"tags":{"endpoint":"A"}}}"#]);
    let scan = read_samples(f.path()).unwrap();
    assert!(scan.samples.is_empty());
    assert_eq!(scan.skipped, 0);
}

#[test]
fn test_blank_lines_ignored() {
    let f = fixture(&["", r#"{"metric":"http_reqs","data":{"value":1}}"#, ""]);
    let scan = read_samples(f.path()).unwrap();
    assert_eq!(scan.samples.len(), 1);
    assert_eq!(scan.skipped, 0);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = read_samples(Path::new("definitely-missing.json")).unwrap_err();
    assert!(matches!(err, LoadKitError::Io(_)));
}

#[test]
fn test_lazy_reader_skip_count_after_exhaustion() {
    let f = fixture(&["garbage", r#"{"metric":"http_reqs","data":{"value":2}}"#]);
    let mut reader = SampleReader::open(f.path()).unwrap();
    let samples: Vec<_> = reader.by_ref().collect();
    assert_eq!(samples.len(), 1);
    assert_eq!(reader.skipped(), 1);
}
