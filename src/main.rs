//! CLI entry point for the station feed service.
//!
//! `serve` runs the HTTP façade; `fetch` performs a single station lookup
//! against the upstream feed and logs the assembled payload.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use station_feed::{
    api::{AppState, run_http_server},
    assemble::ResponseAssembler,
    config::{DEFAULT_PARTITION, DEFAULT_UNIT, DEFAULT_UPSTREAM, ServiceConfig},
    fetch::{FeedClient, WebSocketClient},
    output::{print_json, print_pretty},
    stations,
};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_LOG_FILE: &str = "logs/station_feed.log";

#[derive(Parser)]
#[command(name = "station_feed")]
#[command(about = "HTTP façade over a single-station WebSocket data feed", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConfigArgs {
    /// WebSocket base address of the upstream feed
    #[arg(long, env = "FEED_UPSTREAM", default_value = DEFAULT_UPSTREAM, global = true)]
    upstream: String,

    /// Partition reported in every response
    #[arg(long, env = "PAYLOAD_PARTITION", default_value_t = DEFAULT_PARTITION, global = true)]
    partition: i64,

    /// Unit label reported in every response
    #[arg(long, env = "PAYLOAD_UNIT", default_value = DEFAULT_UNIT, global = true)]
    unit: String,

    /// Seconds to wait for the upstream connection to open
    #[arg(long, env = "FEED_CONNECT_TIMEOUT_SECS", default_value_t = 5, global = true)]
    connect_timeout_secs: u64,

    /// Seconds to wait for the upstream data frame
    #[arg(long, env = "FEED_READ_TIMEOUT_SECS", default_value_t = 10, global = true)]
    read_timeout_secs: u64,
}

impl ConfigArgs {
    fn into_config(self) -> ServiceConfig {
        ServiceConfig {
            upstream: self.upstream,
            partition: self.partition,
            unit: self.unit,
            ..ServiceConfig::default()
        }
        .with_timeouts(
            Duration::from_secs(self.connect_timeout_secs),
            Duration::from_secs(self.read_timeout_secs),
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve GET /station/{station_type_id}/{station_id}
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
        bind: SocketAddr,
    },
    /// Retrieve and assemble one station payload, then log it
    Fetch {
        #[arg(value_name = "STATION_TYPE_ID")]
        station_type_id: String,

        #[arg(value_name = "STATION_ID")]
        station_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing()?;

    let cli = Cli::parse();
    let config = cli.config.into_config();
    info!(
        upstream = %config.upstream,
        partition = config.partition,
        unit = %config.unit,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Serve { bind } => {
            let client = WebSocketClient::from_config(&config);
            run_http_server(AppState::new(config, client), bind).await?;
        }
        Commands::Fetch {
            station_type_id,
            station_id,
        } => {
            fetch(&config, &station_type_id, &station_id).await?;
        }
    }

    Ok(())
}

/// Installs two tracing layers: ANSI stderr filtered by `RUST_LOG`, and JSON
/// lines to a daily-rolled file at `LOG_FILE_PATH` filtered by `RUST_LOG_JSON`.
///
/// The returned guard flushes the file writer on drop.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let log_file = Path::new(&log_file_path);
    let log_dir = log_file.parent().unwrap_or(Path::new("logs"));
    let log_name = log_file
        .file_name()
        .unwrap_or(OsStr::new("station_feed.log"));

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, log_name));

    let console = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_file = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(console)
        .with(json_file)
        .try_init()?;

    Ok(guard)
}

/// Runs the same lookup as the HTTP route, outside of a server.
#[tracing::instrument(skip(config))]
async fn fetch(config: &ServiceConfig, station_type_id: &str, station_id: &str) -> Result<()> {
    let path = format!("/station/{station_type_id}/{station_id}");
    let station = stations::resolve(station_type_id, station_id, &path)?;

    let client = WebSocketClient::from_config(config);
    let raw = client.retrieve(&path).await?;
    let payload = ResponseAssembler::new(config).assemble(&raw, station)?;

    print_pretty(&payload);
    print_json(&payload)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_creates_log_file_once() {
        let dir = std::env::temp_dir().join("station_feed_tracing_test");
        let _ = std::fs::remove_dir_all(&dir);
        // Only test in this binary that touches the environment.
        unsafe {
            std::env::set_var("LOG_FILE_PATH", dir.join("service.log"));
        }

        let guard = init_tracing().unwrap();
        info!("tracing initialised");
        drop(guard);

        let files = std::fs::read_dir(&dir).unwrap().count();
        assert!(files > 0);

        // The global subscriber is already installed.
        assert!(init_tracing().is_err());
    }

    #[test]
    fn test_cli_builds_config() {
        let cli = Cli::try_parse_from([
            "station_feed",
            "--upstream",
            "ws://127.0.0.1:9000",
            "--partition",
            "3",
            "--unit",
            "cm",
            "--read-timeout-secs",
            "2",
            "fetch",
            "5",
            "987",
        ])
        .unwrap();

        let config = cli.config.into_config();
        assert_eq!(config.upstream, "ws://127.0.0.1:9000");
        assert_eq!(config.partition, 3);
        assert_eq!(config.unit, "cm");
        assert_eq!(config.read_timeout, Duration::from_secs(2));
        assert!(matches!(cli.command, Commands::Fetch { .. }));
    }
}
