use clap::Parser;
use loadkit_common::{MonitorConfig, DEFAULT_INFLUX_DATABASE};
use std::path::PathBuf;
use std::process;

/// Exit codes: 0 success, 1 I/O failure. Usage errors exit with clap's
/// own code.
#[derive(Parser)]
#[command(
    name = "loadkit-dashboard",
    about = "Generate the Grafana dashboard and InfluxDB datasource JSON"
)]
struct Args {
    /// InfluxDB base URL the datasource points at
    #[arg(long, env = "LOADKIT_INFLUX_URL")]
    influx_url: String,

    /// InfluxDB database k6 streams metrics into
    #[arg(long, env = "LOADKIT_INFLUX_DATABASE", default_value = DEFAULT_INFLUX_DATABASE)]
    influx_database: String,

    /// Grafana base URL, recorded in the generated config
    #[arg(long, env = "LOADKIT_GRAFANA_URL")]
    grafana_url: Option<String>,

    /// Dashboard title
    #[arg(long, default_value = "LoadKit Load Tests")]
    title: String,

    /// Directory the JSON artifacts are written into
    #[arg(long, default_value = "provisioning")]
    out_dir: PathBuf,
}

fn main() {
    let args = Args::parse();

    let config = MonitorConfig {
        influx_url: args.influx_url,
        influx_database: args.influx_database,
        grafana_url: args.grafana_url,
    };

    if let Err(e) = std::fs::create_dir_all(&args.out_dir) {
        eprintln!("Failed to create {}: {e}", args.out_dir.display());
        process::exit(1);
    }
    if let Err(e) = loadkit_dashboard::write_artifacts(&config, &args.title, &args.out_dir) {
        eprintln!("{e}");
        process::exit(1);
    }

    println!(
        "Wrote grafana-dashboard.json and influx-datasource.json to {}",
        args.out_dir.display()
    );
}
