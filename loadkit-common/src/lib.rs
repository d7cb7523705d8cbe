use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default InfluxDB database k6 writes its metrics into.
pub const DEFAULT_INFLUX_DATABASE: &str = "k6";

/// Error types for LoadKit operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadKitError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Parse error on line {line}: {detail}")]
    Parse { line: usize, detail: String },

    #[error("No samples found in input")]
    EmptyInput,
}

impl LoadKitError {
    /// Wrap an `std::io::Error` with the path it occurred on.
    pub fn io(path: &std::path::Path, err: &std::io::Error) -> Self {
        LoadKitError::Io(format!("{}: {}", path.display(), err))
    }
}

/// Result type for LoadKit operations
pub type Result<T> = std::result::Result<T, LoadKitError>;

/// Monitoring-stack endpoints shared by the runner and dashboard tools.
///
/// Loaded once at startup from CLI flags / environment and passed into the
/// functions that need it; no tool keeps module-level configuration state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Base URL of the InfluxDB instance k6 streams metrics to.
    pub influx_url: String,
    /// InfluxDB database name.
    #[serde(default = "default_influx_database")]
    pub influx_database: String,
    /// Grafana base URL, when a dashboard should link back to it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grafana_url: Option<String>,
}

fn default_influx_database() -> String {
    DEFAULT_INFLUX_DATABASE.to_string()
}
