use loadkit_common::{LoadKitError, MonitorConfig, Result};
use serde_json::{json, Value};
use std::path::Path;

/// Name the dashboard panels reference the datasource by.
pub const DATASOURCE_NAME: &str = "LoadKit InfluxDB";

/// Build the InfluxDB datasource definition Grafana imports.
pub fn datasource(config: &MonitorConfig) -> Value {
    json!({
        "name": DATASOURCE_NAME,
        "type": "influxdb",
        "access": "proxy",
        "url": config.influx_url,
        "database": config.influx_database,
        "isDefault": true,
    })
}

/// Build the load-test dashboard: requests/sec, response-time percentiles,
/// error rate, and data volume, each grouped by endpoint.
pub fn dashboard(title: &str) -> Value {
    let panels = vec![
        panel(
            1,
            "Requests per Second",
            "reqps",
            &[concat!(
                "SELECT sum(\"value\") FROM \"http_reqs\" ",
                "WHERE $timeFilter GROUP BY time(1s), \"endpoint\" fill(0)"
            )],
        ),
        panel(
            2,
            "Response Time",
            "ms",
            &[
                concat!(
                    "SELECT percentile(\"value\", 95) FROM \"http_req_duration\" ",
                    "WHERE $timeFilter GROUP BY time(5s), \"endpoint\""
                ),
                concat!(
                    "SELECT percentile(\"value\", 99) FROM \"http_req_duration\" ",
                    "WHERE $timeFilter GROUP BY time(5s), \"endpoint\""
                ),
            ],
        ),
        panel(
            3,
            "Error Rate",
            "percent",
            &[concat!(
                "SELECT (1 - mean(\"value\")) * 100 FROM \"checks\" ",
                "WHERE $timeFilter GROUP BY time(5s), \"endpoint\""
            )],
        ),
        panel(
            4,
            "Data Volume",
            "bytes",
            &[
                "SELECT sum(\"value\") FROM \"data_sent\" WHERE $timeFilter GROUP BY time(5s)",
                "SELECT sum(\"value\") FROM \"data_received\" WHERE $timeFilter GROUP BY time(5s)",
            ],
        ),
    ];

    json!({
        "title": title,
        "timezone": "browser",
        "refresh": "5s",
        "time": { "from": "now-15m", "to": "now" },
        "panels": panels,
    })
}

fn panel(id: u64, title: &str, unit: &str, queries: &[&str]) -> Value {
    let targets: Vec<Value> = queries
        .iter()
        .enumerate()
        .map(|(i, q)| {
            json!({
                "refId": ((b'A' + i as u8) as char).to_string(),
                "query": q,
                "rawQuery": true,
                "resultFormat": "time_series",
            })
        })
        .collect();

    json!({
        "id": id,
        "type": "timeseries",
        "title": title,
        "datasource": DATASOURCE_NAME,
        // two panels per row
        "gridPos": { "h": 8, "w": 12, "x": ((id - 1) % 2) * 12, "y": ((id - 1) / 2) * 8 },
        "fieldConfig": { "defaults": { "unit": unit } },
        "targets": targets,
    })
}

/// Write both artifacts into `out_dir`.
pub fn write_artifacts(config: &MonitorConfig, title: &str, out_dir: &Path) -> Result<()> {
    let pairs = [
        ("influx-datasource.json", datasource(config)),
        ("grafana-dashboard.json", dashboard(title)),
    ];
    for (name, value) in pairs {
        let path = out_dir.join(name);
        let body = serde_json::to_string_pretty(&value)
            .map_err(|e| LoadKitError::Io(format!("{}: {e}", path.display())))?;
        std::fs::write(&path, body).map_err(|e| LoadKitError::io(&path, &e))?;
    }
    Ok(())
}
