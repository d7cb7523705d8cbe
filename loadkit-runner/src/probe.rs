use loadkit_common::{LoadKitError, Result};
use std::time::{Duration, Instant};

pub const READY_TIMEOUT: Duration = Duration::from_secs(30);

/// Poll `url` with GET requests until any HTTP response arrives or
/// `deadline` passes.
///
/// A response with any status counts as ready: the point is to prove
/// something is listening before load starts, not to health-check the
/// application.
pub async fn poll_until_ready(
    client: &reqwest::Client,
    url: &str,
    deadline: Instant,
) -> Result<()> {
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(LoadKitError::Io(format!("timed out waiting for {url}")));
        }
        let probe = Duration::min(remaining, Duration::from_millis(500));
        match client.get(url).timeout(probe).send().await {
            Ok(_) => return Ok(()),
            Err(_) => tokio::time::sleep(Duration::from_millis(250)).await,
        }
    }
}
