use loadkit_common::{LoadKitError, Result};
use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use tempfile::NamedTempFile;

/// Handle to a running k6 subprocess. The child is killed on drop so an
/// interrupted run never leaves a load generator behind.
pub struct K6Process {
    child: Child,
    // Kept alive so the rendered scenario script stays on disk until the
    // process exits.
    _script: NamedTempFile,
}

impl Drop for K6Process {
    fn drop(&mut self) {
        self.child.kill().ok();
    }
}

impl K6Process {
    /// Block until k6 exits.
    pub fn wait(&mut self) -> Result<ExitStatus> {
        self.child
            .wait()
            .map_err(|e| LoadKitError::Io(format!("Failed to wait for k6: {e}")))
    }
}

/// Build the argument list for `k6 run`.
/// Exposed for deterministic testing.
pub fn run_args(script: &Path, raw_out: &Path, influx_url: Option<&str>) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        "--quiet".to_string(),
        format!("--out=json={}", raw_out.display()),
    ];
    if let Some(url) = influx_url {
        args.push(format!("--out=influxdb={url}"));
    }
    args.push(script.display().to_string());
    args
}

/// Write `script_body` to a temp file and spawn k6 against it.
///
/// Raw NDJSON metrics land in `raw_out`; when `influx_url` is set, k6 also
/// streams the metrics there. Returns `Err` if the temp file cannot be
/// written or the binary cannot be spawned; the caller maps this to exit
/// code 3 as documented in the CLI help.
pub fn spawn(
    k6_bin: &Path,
    script_body: &str,
    raw_out: &Path,
    influx_url: Option<&str>,
) -> Result<K6Process> {
    let mut script = NamedTempFile::new()
        .map_err(|e| LoadKitError::Io(format!("Failed to create scenario tempfile: {e}")))?;
    script
        .write_all(script_body.as_bytes())
        .map_err(|e| LoadKitError::Io(format!("Failed to write scenario script: {e}")))?;

    let child = Command::new(k6_bin)
        .args(run_args(script.path(), raw_out, influx_url))
        .stdout(Stdio::null())
        .spawn()
        .map_err(|e| LoadKitError::Io(format!("Failed to spawn {}: {e}", k6_bin.display())))?;

    Ok(K6Process { child, _script: script })
}
