use loadkit_runner::k6::run_args;
use std::path::Path;

// `run_args` is the only function in k6.rs that is pure enough to
// unit-test in isolation.  The remaining items are justified below:
//
// - `K6Process::drop` — single-line OS call (`child.kill()`).  Verifying
//   it requires spawning a real child process and platform-specific
//   signal checks.
//
// - `spawn` / `K6Process::wait` — require a k6 binary on the machine
//   running the tests; exercised by real runs of `loadkit-run`.

#[test]
fn test_run_args_without_influx() {
    let args = run_args(Path::new("/tmp/scenario.js"), Path::new("results/raw.json"), None);
    assert_eq!(
        args,
        vec![
            "run".to_string(),
            "--quiet".to_string(),
            "--out=json=results/raw.json".to_string(),
            "/tmp/scenario.js".to_string(),
        ],
    );
}

#[test]
fn test_run_args_with_influx() {
    let args = run_args(
        Path::new("/tmp/scenario.js"),
        Path::new("results/raw.json"),
        Some("http://127.0.0.1:8086/k6"),
    );
    assert!(args.contains(&"--out=influxdb=http://127.0.0.1:8086/k6".to_string()));
    // the script path stays last so k6 parses the flags before it
    assert_eq!(args.last().map(String::as_str), Some("/tmp/scenario.js"));
}
